//! Database Module
//!
//! Embedded SurrealDB storage. The on-disk engine is RocksDB; tests run
//! against the in-memory engine. Uniqueness rules that the services rely
//! on (table numbers, one invoice per reservation) are enforced here as
//! storage-layer indexes, not re-checked by every caller.

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "cafe";
const DATABASE: &str = "cafe";

/// Database service - owns the embedded SurrealDB handle
///
/// Cloned freely; `Surreal<Db>` is a cheap shared handle. There is no
/// ambient global connection: every repository receives its handle from
/// here through the constructors.
#[derive(Clone, Debug)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the on-disk database under `dir`
    pub async fn open(dir: &Path) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(dir)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        let service = Self { db };
        service.finish_setup().await?;
        tracing::info!("Database opened at {}", dir.display());
        Ok(service)
    }

    /// Open a fresh in-memory database (tests)
    pub async fn open_in_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        let service = Self { db };
        service.finish_setup().await?;
        Ok(service)
    }

    async fn finish_setup(&self) -> Result<(), AppError> {
        self.db
            .use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;
        self.define_schema().await
    }

    /// Apply schema constraints
    ///
    /// - `dining_table.table_no` is unique
    /// - `invoice.reservation` is unique: closes the query-then-insert race
    ///   in idempotent invoice creation
    /// - `invoice.number` uniqueness is a storage constraint only; the
    ///   generator performs no dedup of its own
    async fn define_schema(&self) -> Result<(), AppError> {
        self.db
            .query(
                "
                DEFINE INDEX IF NOT EXISTS uniq_table_no
                    ON TABLE dining_table FIELDS table_no UNIQUE;
                DEFINE INDEX IF NOT EXISTS uniq_invoice_reservation
                    ON TABLE invoice FIELDS reservation UNIQUE;
                DEFINE INDEX IF NOT EXISTS uniq_invoice_number
                    ON TABLE invoice FIELDS number UNIQUE;
                DEFINE INDEX IF NOT EXISTS idx_reservation_lookup
                    ON TABLE reservation FIELDS `table`, reserved_at;
                ",
            )
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
        Ok(())
    }
}
