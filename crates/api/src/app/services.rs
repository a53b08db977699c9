//! Order service orchestration and store wiring.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::OwnedMutexGuard;

use creditline_core::{
    CreditError, CreditResult, LoanOrder, OrderId, Tariff, TariffId, UserId,
};
use creditline_lending::AdmissionEngine;
use creditline_storage::{
    InMemoryOrderStore, InMemoryTariffStore, OrderStore, PgOrderStore, PgTariffStore, StorageError,
    TariffStore,
};

type LockMap = HashMap<(UserId, TariffId), Arc<tokio::sync::Mutex<()>>>;

/// Serializes the admission read-check-write sequence per (user, tariff).
///
/// The reference behavior had no guard here, leaving a window where two
/// concurrent requests for the same pair could both pass the duplicate
/// checks. One async mutex per key closes that window within a replica; the
/// partial unique index in the schema backstops it across replicas.
///
/// Keys are client-supplied, so entries must not outlive their use: the
/// returned [`AdmissionGuard`] evicts its entry on drop once no other
/// request is waiting on the same key, keeping the map bounded by the number
/// of in-flight admissions.
#[derive(Default)]
struct AdmissionLocks {
    inner: Arc<Mutex<LockMap>>,
}

impl AdmissionLocks {
    async fn acquire(&self, user_id: UserId, tariff_id: TariffId) -> AdmissionGuard {
        let key = (user_id, tariff_id);
        let lock = {
            let mut locks = self.inner.lock().unwrap();
            locks.entry(key).or_default().clone()
        };
        AdmissionGuard {
            key,
            locks: self.inner.clone(),
            _held: lock.lock_owned().await,
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

/// Holds the per-key mutex for one admission sequence.
struct AdmissionGuard {
    key: (UserId, TariffId),
    locks: Arc<Mutex<LockMap>>,
    _held: OwnedMutexGuard<()>,
}

impl Drop for AdmissionGuard {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap();
        if let Some(lock) = locks.get(&self.key) {
            // Two owners left means only the map and this guard hold the
            // entry; a waiter would hold a third clone.
            if Arc::strong_count(lock) <= 2 {
                locks.remove(&self.key);
            }
        }
    }
}

fn storage_failure(err: StorageError) -> CreditError {
    CreditError::storage(err.to_string())
}

/// The order service: tariff lookup, admission, persistence, status and
/// delete operations. Domain failures surface as [`CreditError`] and are
/// never retried.
pub struct CreditService {
    tariffs: Arc<dyn TariffStore>,
    orders: Arc<dyn OrderStore>,
    engine: AdmissionEngine,
    admissions: AdmissionLocks,
}

impl CreditService {
    pub fn new(
        tariffs: Arc<dyn TariffStore>,
        orders: Arc<dyn OrderStore>,
        engine: AdmissionEngine,
    ) -> Self {
        Self {
            tariffs,
            orders,
            engine,
            admissions: AdmissionLocks::default(),
        }
    }

    /// Pass-through to the tariff catalog.
    pub async fn get_tariffs(&self) -> CreditResult<Vec<Tariff>> {
        self.tariffs.list_tariffs().await.map_err(storage_failure)
    }

    /// Pass-through to the order store.
    pub async fn get_user_orders(&self, user_id: UserId) -> CreditResult<Vec<LoanOrder>> {
        self.orders
            .list_by_user(user_id)
            .await
            .map_err(storage_failure)
    }

    /// Admit and persist a new order for `(user_id, tariff_id)`.
    ///
    /// Admission failures from the engine propagate unchanged.
    pub async fn create_order(
        &self,
        user_id: UserId,
        tariff_id: TariffId,
    ) -> CreditResult<LoanOrder> {
        if !self
            .tariffs
            .tariff_exists(tariff_id)
            .await
            .map_err(storage_failure)?
        {
            return Err(CreditError::TariffNotFound);
        }

        // Hold the per-key lock across read, check and write so a concurrent
        // request for the same pair cannot slip past the duplicate checks.
        let _guard = self.admissions.acquire(user_id, tariff_id).await;

        let existing = self
            .orders
            .list_by_user(user_id)
            .await
            .map_err(storage_failure)?;
        let order = self.engine.admit(user_id, tariff_id, Utc::now(), &existing)?;
        self.orders
            .insert_order(&order)
            .await
            .map_err(storage_failure)?;

        tracing::info!(
            order_id = %order.order_id,
            user_id = %user_id,
            tariff_id = %tariff_id,
            "loan order created"
        );
        Ok(order)
    }

    /// Fetch an order for status inspection.
    ///
    /// Single store read; an absent record is a domain failure even when a
    /// concurrent delete removed it mid-request.
    pub async fn get_order_status(&self, order_id: OrderId) -> CreditResult<LoanOrder> {
        self.orders.get_order(order_id).await.map_err(|e| match e {
            StorageError::NotFound => CreditError::OrderNotFound,
            other => storage_failure(other),
        })
    }

    /// Delete the order owned by `user_id` with id `order_id`.
    ///
    /// Single conditional delete; no matching (user, order) pair is a domain
    /// failure, not a storage fault.
    pub async fn delete_order(&self, user_id: UserId, order_id: OrderId) -> CreditResult<()> {
        self.orders
            .delete_order(user_id, order_id)
            .await
            .map_err(|e| match e {
                StorageError::NotFound => CreditError::OrderNotDeletable,
                other => storage_failure(other),
            })?;

        tracing::info!(order_id = %order_id, user_id = %user_id, "loan order deleted");
        Ok(())
    }
}

/// Build the service from environment configuration.
///
/// With `DATABASE_URL` set, stores are Postgres-backed; otherwise in-memory
/// stores with a small seeded tariff catalog are used (dev/test).
pub async fn build_services() -> CreditService {
    match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = sqlx::PgPool::connect(&database_url)
                .await
                .expect("failed to connect to Postgres");
            CreditService::new(
                Arc::new(PgTariffStore::new(pool.clone())),
                Arc::new(PgOrderStore::new(pool)),
                AdmissionEngine::with_defaults(),
            )
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using in-memory stores with a seeded catalog");
            CreditService::new(
                Arc::new(InMemoryTariffStore::seeded(dev_tariffs())),
                Arc::new(InMemoryOrderStore::new()),
                AdmissionEngine::with_defaults(),
            )
        }
    }
}

fn dev_tariffs() -> Vec<Tariff> {
    vec![
        Tariff {
            id: TariffId::new(1),
            name: "consumer".to_string(),
            interest_rate: 14.9,
            term_months: 12,
        },
        Tariff {
            id: TariffId::new(2),
            name: "mortgage".to_string(),
            interest_rate: 7.3,
            term_months: 240,
        },
        Tariff {
            id: TariffId::new(3),
            name: "car".to_string(),
            interest_rate: 11.1,
            term_months: 60,
        },
    ]
}
