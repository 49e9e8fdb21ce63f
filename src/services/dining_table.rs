//! Table Registry
//!
//! Owns table identity and the occupancy flag. The registry itself never
//! does conflict checking: `set_status` is an unconditional write and the
//! lifecycles are responsible for calling it (or the conditional variant
//! on the repository) correctly.

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use crate::db::models::{DiningTable, DiningTableCreate, DiningTableUpdate, TableStatus};
use crate::db::repository::DiningTableRepository;
use crate::utils::time::now_millis;
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct TableService {
    repo: DiningTableRepository,
}

impl TableService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            repo: DiningTableRepository::new(db),
        }
    }

    /// Register a new table; it starts `available`
    pub async fn create(&self, data: DiningTableCreate) -> AppResult<DiningTable> {
        if data.table_no <= 0 {
            return Err(AppError::validation(
                "table number must be greater than 0",
            ));
        }
        if self.repo.find_by_no(data.table_no).await?.is_some() {
            return Err(AppError::conflict(format!(
                "table {} already exists",
                data.table_no
            )));
        }

        let now = now_millis();
        let table = DiningTable {
            id: None,
            table_no: data.table_no,
            status: TableStatus::Available,
            created_at: now,
            updated_at: now,
        };
        Ok(self.repo.create(table).await?)
    }

    pub async fn find_all(&self) -> AppResult<Vec<DiningTable>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn find_by_id(&self, id: &RecordId) -> AppResult<DiningTable> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("table not found"))
    }

    /// Unconditional status write for the lifecycles; no conflict checking
    pub async fn set_status(&self, id: &RecordId, status: TableStatus) -> AppResult<DiningTable> {
        Ok(self.repo.set_status(id, status).await?)
    }

    /// Partial update: only a positive table number / present status apply
    pub async fn update(&self, id: &RecordId, data: DiningTableUpdate) -> AppResult<DiningTable> {
        let mut table = self.find_by_id(id).await?;

        if let Some(table_no) = data.table_no
            && table_no > 0
            && table_no != table.table_no
        {
            if self.repo.find_by_no(table_no).await?.is_some() {
                return Err(AppError::conflict(format!(
                    "table {} already exists",
                    table_no
                )));
            }
            table.table_no = table_no;
        }
        if let Some(status) = data.status {
            table.status = status;
        }

        Ok(self.repo.update(&table).await?)
    }

    /// Remove a table
    ///
    /// Deliberately does not check for reservations or orders still
    /// referencing it; callers own that decision (see DESIGN.md).
    pub async fn delete(&self, id: &RecordId) -> AppResult<()> {
        if !self.repo.delete(id).await? {
            return Err(AppError::not_found("table not found"));
        }
        Ok(())
    }
}
