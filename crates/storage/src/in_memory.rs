//! In-memory stores for dev and tests.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use creditline_core::{LoanOrder, OrderId, OrderStatus, Tariff, TariffId, UserId};

use crate::contract::{OrderStore, TariffStore};
use crate::error::StorageError;

/// In-memory tariff catalog, seeded at construction.
#[derive(Debug, Default)]
pub struct InMemoryTariffStore {
    inner: RwLock<Vec<Tariff>>,
}

impl InMemoryTariffStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(tariffs: Vec<Tariff>) -> Self {
        Self {
            inner: RwLock::new(tariffs),
        }
    }
}

#[async_trait]
impl TariffStore for InMemoryTariffStore {
    async fn list_tariffs(&self) -> Result<Vec<Tariff>, StorageError> {
        let tariffs = self
            .inner
            .read()
            .map_err(|_| StorageError::backend("tariff store lock poisoned"))?;
        Ok(tariffs.clone())
    }

    async fn tariff_exists(&self, tariff_id: TariffId) -> Result<bool, StorageError> {
        let tariffs = self
            .inner
            .read()
            .map_err(|_| StorageError::backend("tariff store lock poisoned"))?;
        Ok(tariffs.iter().any(|t| t.id == tariff_id))
    }
}

/// In-memory order store.
///
/// Keeps insertion order, matching the row order the SQL store returns for
/// a user scan.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    inner: RwLock<Vec<LoanOrder>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<LoanOrder>, StorageError> {
        let orders = self
            .inner
            .read()
            .map_err(|_| StorageError::backend("order store lock poisoned"))?;
        Ok(orders.iter().filter(|o| o.user_id == user_id).cloned().collect())
    }

    async fn list_by_status(&self, status: OrderStatus) -> Result<Vec<LoanOrder>, StorageError> {
        let orders = self
            .inner
            .read()
            .map_err(|_| StorageError::backend("order store lock poisoned"))?;
        Ok(orders.iter().filter(|o| o.status == status).cloned().collect())
    }

    async fn order_exists(&self, order_id: OrderId) -> Result<bool, StorageError> {
        let orders = self
            .inner
            .read()
            .map_err(|_| StorageError::backend("order store lock poisoned"))?;
        Ok(orders.iter().any(|o| o.order_id == order_id))
    }

    async fn order_exists_for_user(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<bool, StorageError> {
        let orders = self
            .inner
            .read()
            .map_err(|_| StorageError::backend("order store lock poisoned"))?;
        Ok(orders
            .iter()
            .any(|o| o.user_id == user_id && o.order_id == order_id))
    }

    async fn get_order(&self, order_id: OrderId) -> Result<LoanOrder, StorageError> {
        let orders = self
            .inner
            .read()
            .map_err(|_| StorageError::backend("order store lock poisoned"))?;
        orders
            .iter()
            .find(|o| o.order_id == order_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn insert_order(&self, order: &LoanOrder) -> Result<(), StorageError> {
        let mut orders = self
            .inner
            .write()
            .map_err(|_| StorageError::backend("order store lock poisoned"))?;
        if orders.iter().any(|o| o.order_id == order.order_id) {
            return Err(StorageError::conflict(format!(
                "order {} already exists",
                order.order_id
            )));
        }
        orders.push(order.clone());
        Ok(())
    }

    async fn delete_order(&self, user_id: UserId, order_id: OrderId) -> Result<(), StorageError> {
        let mut orders = self
            .inner
            .write()
            .map_err(|_| StorageError::backend("order store lock poisoned"))?;
        let before = orders.len();
        orders.retain(|o| !(o.user_id == user_id && o.order_id == order_id));
        if orders.len() == before {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn update_status(
        &self,
        status: OrderStatus,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<(), StorageError> {
        let mut orders = self
            .inner
            .write()
            .map_err(|_| StorageError::backend("order store lock poisoned"))?;
        let order = orders
            .iter_mut()
            .find(|o| o.user_id == user_id && o.order_id == order_id)
            .ok_or(StorageError::NotFound)?;
        order.status = status;
        order.time_update = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn order(user: i64, tariff: i64) -> LoanOrder {
        let now = Utc::now();
        LoanOrder {
            order_id: OrderId::random(),
            user_id: UserId::new(user),
            tariff_id: TariffId::new(tariff),
            credit_rating: 0.42,
            status: OrderStatus::InProgress,
            time_insert: now,
            time_update: now,
        }
    }

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let store = InMemoryOrderStore::new();
        let o = order(1, 5);
        store.insert_order(&o).await.unwrap();
        assert_eq!(store.get_order(o.order_id).await.unwrap(), o);
    }

    #[tokio::test]
    async fn duplicate_order_id_conflicts() {
        let store = InMemoryOrderStore::new();
        let o = order(1, 5);
        store.insert_order(&o).await.unwrap();
        let err = store.insert_order(&o).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));
    }

    #[tokio::test]
    async fn list_by_user_preserves_insertion_order() {
        let store = InMemoryOrderStore::new();
        let first = order(1, 5);
        let second = order(1, 6);
        let other_user = order(2, 5);
        store.insert_order(&first).await.unwrap();
        store.insert_order(&other_user).await.unwrap();
        store.insert_order(&second).await.unwrap();

        let listed = store.list_by_user(UserId::new(1)).await.unwrap();
        assert_eq!(listed, vec![first, second]);
    }

    #[tokio::test]
    async fn delete_requires_both_keys() {
        let store = InMemoryOrderStore::new();
        let o = order(1, 5);
        store.insert_order(&o).await.unwrap();

        let err = store
            .delete_order(UserId::new(2), o.order_id)
            .await
            .unwrap_err();
        assert_eq!(err, StorageError::NotFound);
        assert!(store.order_exists(o.order_id).await.unwrap());

        store.delete_order(UserId::new(1), o.order_id).await.unwrap();
        assert!(!store.order_exists(o.order_id).await.unwrap());
    }

    #[tokio::test]
    async fn update_status_refreshes_time_update() {
        let store = InMemoryOrderStore::new();
        let o = order(1, 5);
        store.insert_order(&o).await.unwrap();

        store
            .update_status(OrderStatus::Refused, o.user_id, o.order_id)
            .await
            .unwrap();

        let stored = store.get_order(o.order_id).await.unwrap();
        assert_eq!(stored.status, OrderStatus::Refused);
        assert!(stored.time_update >= stored.time_insert);
        assert_eq!(stored.time_insert, o.time_insert);
    }

    #[tokio::test]
    async fn list_by_status_spans_users() {
        let store = InMemoryOrderStore::new();
        let pending = order(1, 5);
        let mut refused = order(2, 5);
        refused.status = OrderStatus::Refused;
        store.insert_order(&pending).await.unwrap();
        store.insert_order(&refused).await.unwrap();

        let listed = store.list_by_status(OrderStatus::InProgress).await.unwrap();
        assert_eq!(listed, vec![pending]);
        let listed = store.list_by_status(OrderStatus::Refused).await.unwrap();
        assert_eq!(listed, vec![refused]);
    }

    #[tokio::test]
    async fn seeded_catalog_answers_existence() {
        let store = InMemoryTariffStore::seeded(vec![Tariff {
            id: TariffId::new(5),
            name: "consumer".to_string(),
            interest_rate: 12.5,
            term_months: 24,
        }]);

        assert!(store.tariff_exists(TariffId::new(5)).await.unwrap());
        assert!(!store.tariff_exists(TariffId::new(9)).await.unwrap());
        assert_eq!(store.list_tariffs().await.unwrap().len(), 1);
    }
}
