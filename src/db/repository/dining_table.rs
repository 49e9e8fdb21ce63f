//! Dining Table Repository
//!
//! Status changes come in two flavours: [`DiningTableRepository::set_status`]
//! is the unconditional write the registry contract exposes, and
//! [`DiningTableRepository::try_set_status`] is the conditional update the
//! lifecycles use so that concurrent allocations leave exactly one winner.

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{DiningTable, TableStatus};
use crate::utils::time::now_millis;

const TABLE: &str = "dining_table";

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all tables ordered by table number
    pub async fn find_all(&self) -> RepoResult<Vec<DiningTable>> {
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query("SELECT * FROM dining_table ORDER BY table_no")
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Find table by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<DiningTable>> {
        let table: Option<DiningTable> = self.base.db().select(id.clone()).await?;
        Ok(table)
    }

    /// Find table by its human-facing number
    pub async fn find_by_no(&self, table_no: i32) -> RepoResult<Option<DiningTable>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM dining_table WHERE table_no = $table_no LIMIT 1")
            .bind(("table_no", table_no))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        Ok(tables.into_iter().next())
    }

    /// Create a new dining table
    pub async fn create(&self, table: DiningTable) -> RepoResult<DiningTable> {
        let created: Option<DiningTable> = self.base.db().create(TABLE).content(table).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create dining table".to_string()))
    }

    /// Unconditional status write; no conflict checking here
    pub async fn set_status(&self, id: &RecordId, status: TableStatus) -> RepoResult<DiningTable> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $table_id SET status = $status, updated_at = $now RETURN AFTER")
            .bind(("table_id", id.clone()))
            .bind(("status", status))
            .bind(("now", now_millis()))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        tables
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))
    }

    /// Conditional status transition
    ///
    /// Writes `to` only while the current status is one of `from`, in a
    /// single statement. Returns `None` when the table was missing or its
    /// status had already moved on; the caller decides which of the two it
    /// was. Exactly one of two racing callers can observe a `Some`.
    pub async fn try_set_status(
        &self,
        id: &RecordId,
        from: &[TableStatus],
        to: TableStatus,
    ) -> RepoResult<Option<DiningTable>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $table_id SET status = $to, updated_at = $now \
                 WHERE status IN $from RETURN AFTER",
            )
            .bind(("table_id", id.clone()))
            .bind(("to", to))
            .bind(("from", from.to_vec()))
            .bind(("now", now_millis()))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        Ok(tables.into_iter().next())
    }

    /// Apply scalar fields of a partial update
    pub async fn update(&self, table: &DiningTable) -> RepoResult<DiningTable> {
        let id = table
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Dining table has no ID".to_string()))?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $table_id SET table_no = $table_no, status = $status, \
                 updated_at = $now RETURN AFTER",
            )
            .bind(("table_id", id.clone()))
            .bind(("table_no", table.table_no))
            .bind(("status", table.status))
            .bind(("now", now_millis()))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        tables
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))
    }

    /// Hard delete; true when a record was removed
    pub async fn delete(&self, id: &RecordId) -> RepoResult<bool> {
        let deleted: Option<DiningTable> = self.base.db().delete(id.clone()).await?;
        Ok(deleted.is_some())
    }
}
