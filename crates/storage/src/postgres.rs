//! Postgres-backed stores (sqlx).
//!
//! Every query is parameterized; the `loan_order` schema lives in
//! `migrations/`. Status is stored as a short string and converted to the
//! closed [`OrderStatus`] enumeration on read, so invalid states never reach
//! the admission logic.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use creditline_core::{LoanOrder, OrderId, OrderStatus, Tariff, TariffId, UserId};

use crate::contract::{OrderStore, TariffStore};
use crate::error::StorageError;

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StorageError {
    match &err {
        sqlx::Error::RowNotFound => StorageError::NotFound,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            StorageError::conflict(format!("{operation}: unique constraint violated"))
        }
        _ => {
            tracing::error!(operation, error = %err, "storage backend failure");
            StorageError::backend(format!("{operation} failed"))
        }
    }
}

fn order_from_row(row: &PgRow) -> Result<LoanOrder, StorageError> {
    let status_str: String = row
        .try_get("status")
        .map_err(|e| StorageError::backend(format!("status column: {e}")))?;
    let status = OrderStatus::from_str(&status_str)
        .map_err(|e| StorageError::backend(e.to_string()))?;

    let order_id: uuid::Uuid = row
        .try_get("order_id")
        .map_err(|e| StorageError::backend(format!("order_id column: {e}")))?;
    let user_id: i64 = row
        .try_get("user_id")
        .map_err(|e| StorageError::backend(format!("user_id column: {e}")))?;
    let tariff_id: i64 = row
        .try_get("tariff_id")
        .map_err(|e| StorageError::backend(format!("tariff_id column: {e}")))?;
    let credit_rating: f64 = row
        .try_get("credit_rating")
        .map_err(|e| StorageError::backend(format!("credit_rating column: {e}")))?;
    let time_insert: DateTime<Utc> = row
        .try_get("time_insert")
        .map_err(|e| StorageError::backend(format!("time_insert column: {e}")))?;
    let time_update: DateTime<Utc> = row
        .try_get("time_update")
        .map_err(|e| StorageError::backend(format!("time_update column: {e}")))?;

    Ok(LoanOrder {
        order_id: OrderId::from_uuid(order_id),
        user_id: UserId::new(user_id),
        tariff_id: TariffId::new(tariff_id),
        credit_rating,
        status,
        time_insert,
        time_update,
    })
}

fn tariff_from_row(row: &PgRow) -> Result<Tariff, StorageError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| StorageError::backend(format!("id column: {e}")))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| StorageError::backend(format!("name column: {e}")))?;
    let interest_rate: f64 = row
        .try_get("interest_rate")
        .map_err(|e| StorageError::backend(format!("interest_rate column: {e}")))?;
    let term_months: i32 = row
        .try_get("term_months")
        .map_err(|e| StorageError::backend(format!("term_months column: {e}")))?;

    Ok(Tariff {
        id: TariffId::new(id),
        name,
        interest_rate,
        term_months: term_months as u32,
    })
}

/// Postgres tariff catalog.
pub struct PgTariffStore {
    pool: Arc<PgPool>,
}

impl PgTariffStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl TariffStore for PgTariffStore {
    async fn list_tariffs(&self) -> Result<Vec<Tariff>, StorageError> {
        let rows = sqlx::query("SELECT id, name, interest_rate, term_months FROM tariff ORDER BY id")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_tariffs", e))?;

        rows.iter().map(tariff_from_row).collect()
    }

    async fn tariff_exists(&self, tariff_id: TariffId) -> Result<bool, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM tariff WHERE id = $1")
            .bind(tariff_id.value())
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("tariff_exists", e))?;

        let total: i64 = row
            .try_get("total")
            .map_err(|e| StorageError::backend(format!("count column: {e}")))?;
        Ok(total > 0)
    }
}

/// Postgres loan-order store.
pub struct PgOrderStore {
    pool: Arc<PgPool>,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn count_is_positive(row: &PgRow) -> Result<bool, StorageError> {
    let total: i64 = row
        .try_get("total")
        .map_err(|e| StorageError::backend(format!("count column: {e}")))?;
    Ok(total > 0)
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<LoanOrder>, StorageError> {
        let rows = sqlx::query(
            "SELECT order_id, user_id, tariff_id, credit_rating, status, time_insert, time_update \
             FROM loan_order WHERE user_id = $1 ORDER BY time_insert",
        )
        .bind(user_id.value())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_by_user", e))?;

        rows.iter().map(order_from_row).collect()
    }

    async fn list_by_status(&self, status: OrderStatus) -> Result<Vec<LoanOrder>, StorageError> {
        let rows = sqlx::query(
            "SELECT order_id, user_id, tariff_id, credit_rating, status, time_insert, time_update \
             FROM loan_order WHERE status = $1 ORDER BY time_insert",
        )
        .bind(status.as_str())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_by_status", e))?;

        rows.iter().map(order_from_row).collect()
    }

    async fn order_exists(&self, order_id: OrderId) -> Result<bool, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM loan_order WHERE order_id = $1")
            .bind(*order_id.as_uuid())
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("order_exists", e))?;
        count_is_positive(&row)
    }

    async fn order_exists_for_user(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<bool, StorageError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total FROM loan_order WHERE user_id = $1 AND order_id = $2",
        )
        .bind(user_id.value())
        .bind(*order_id.as_uuid())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("order_exists_for_user", e))?;
        count_is_positive(&row)
    }

    async fn get_order(&self, order_id: OrderId) -> Result<LoanOrder, StorageError> {
        let row = sqlx::query(
            "SELECT order_id, user_id, tariff_id, credit_rating, status, time_insert, time_update \
             FROM loan_order WHERE order_id = $1",
        )
        .bind(*order_id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_order", e))?
        .ok_or(StorageError::NotFound)?;

        order_from_row(&row)
    }

    async fn insert_order(&self, order: &LoanOrder) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO loan_order \
             (order_id, user_id, tariff_id, credit_rating, status, time_insert, time_update) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(*order.order_id.as_uuid())
        .bind(order.user_id.value())
        .bind(order.tariff_id.value())
        .bind(order.credit_rating)
        .bind(order.status.as_str())
        .bind(order.time_insert)
        .bind(order.time_update)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_order", e))?;

        Ok(())
    }

    async fn delete_order(&self, user_id: UserId, order_id: OrderId) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM loan_order WHERE user_id = $1 AND order_id = $2")
            .bind(user_id.value())
            .bind(*order_id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_order", e))?;

        if result.rows_affected() == 0 {
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
        let result = sqlx::query(
            "UPDATE loan_order SET status = $1, time_update = NOW() \
             WHERE user_id = $2 AND order_id = $3",
        )
        .bind(status.as_str())
        .bind(user_id.value())
        .bind(*order_id.as_uuid())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_status", e))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
