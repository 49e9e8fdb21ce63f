//! Order Repository
//!
//! Orders embed their line items, so create/delete are single-document
//! operations; there is no separate line-item table to keep consistent.

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderDetail, OrderStatus};
use crate::utils::time::now_millis;

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all orders with their tables fetched, newest first
    pub async fn find_all_detailed(&self) -> RepoResult<Vec<OrderDetail>> {
        let orders: Vec<OrderDetail> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC FETCH `table`")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Order>> {
        let order: Option<Order> = self.base.db().select(id.clone()).await?;
        Ok(order)
    }

    /// Find order by id with the table fetched
    pub async fn find_detailed(&self, id: &RecordId) -> RepoResult<Option<OrderDetail>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE id = $id FETCH `table`")
            .bind(("id", id.clone()))
            .await?;
        let orders: Vec<OrderDetail> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Create a new order together with its embedded line items
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Confirmation write: status and payment method only
    ///
    /// Quantities and totals are deliberately untouchable here.
    pub async fn set_paid(&self, id: &RecordId, payment_method: String) -> RepoResult<Order> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET status = $status, payment_method = $payment_method, \
                 updated_at = $now RETURN AFTER",
            )
            .bind(("id", id.clone()))
            .bind(("status", OrderStatus::Paid))
            .bind(("payment_method", payment_method))
            .bind(("now", now_millis()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Hard delete; true when a record was removed
    pub async fn delete(&self, id: &RecordId) -> RepoResult<bool> {
        let deleted: Option<Order> = self.base.db().delete(id.clone()).await?;
        Ok(deleted.is_some())
    }
}
