//! `creditline-storage` — storage access for tariffs and loan orders.
//!
//! Defines the storage contract consumed by the service layer and two
//! implementations: an in-memory store for dev/tests and a Postgres store
//! (sqlx). No business logic lives here; the stores persist and retrieve
//! records and report faults through [`StorageError`].

pub mod contract;
pub mod error;
pub mod in_memory;
pub mod postgres;

pub use contract::{OrderStore, TariffStore};
pub use error::StorageError;
pub use in_memory::{InMemoryOrderStore, InMemoryTariffStore};
pub use postgres::{PgOrderStore, PgTariffStore};
