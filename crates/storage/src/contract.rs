//! Storage contract consumed by the service layer.

use async_trait::async_trait;

use creditline_core::{LoanOrder, OrderId, OrderStatus, Tariff, TariffId, UserId};

use crate::error::StorageError;

/// Read access to the tariff catalog.
///
/// Tariffs are owned by a catalog external to this service; this contract
/// only lists and checks existence.
#[async_trait]
pub trait TariffStore: Send + Sync {
    async fn list_tariffs(&self) -> Result<Vec<Tariff>, StorageError>;

    async fn tariff_exists(&self, tariff_id: TariffId) -> Result<bool, StorageError>;
}

/// Persistence for loan orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// All orders belonging to a user, in insertion order.
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<LoanOrder>, StorageError>;

    /// All orders currently in the given status.
    async fn list_by_status(&self, status: OrderStatus) -> Result<Vec<LoanOrder>, StorageError>;

    async fn order_exists(&self, order_id: OrderId) -> Result<bool, StorageError>;

    async fn order_exists_for_user(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<bool, StorageError>;

    /// Fetch one order; `NotFound` if absent.
    async fn get_order(&self, order_id: OrderId) -> Result<LoanOrder, StorageError>;

    /// Insert a new record; `Conflict` if the order id is already present.
    /// The admission engine mints fresh ids, so a collision is not a normal
    /// path.
    async fn insert_order(&self, order: &LoanOrder) -> Result<(), StorageError>;

    /// Remove exactly one record matching both keys; `NotFound` if none does.
    async fn delete_order(&self, user_id: UserId, order_id: OrderId) -> Result<(), StorageError>;

    /// Set the status and refresh `time_update` to the current time.
    ///
    /// Used by the external decision process, not by the HTTP surface.
    async fn update_status(
        &self,
        status: OrderStatus,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<(), StorageError>;
}
