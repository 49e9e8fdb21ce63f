//! Repository Module
//!
//! One repository per entity over the shared SurrealDB handle. Repositories
//! perform single-entity reads and writes only; multi-entity sequences and
//! their compensation live in the services.

pub mod dining_table;
pub mod invoice;
pub mod menu_item;
pub mod order;
pub mod reservation;

// Re-exports
pub use dining_table::DiningTableRepository;
pub use invoice::InvoiceRepository;
pub use menu_item::MenuItemRepository;
pub use order::OrderRepository;
pub use reservation::ReservationRepository;

use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        // Unique-index violations surface as "already contains"; callers
        // handling idempotent creation match on Duplicate.
        let msg = err.to_string();
        if msg.contains("already contains") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// Allocate the next value of a named monotonic sequence
    pub async fn next_sequence(&self, name: &str) -> RepoResult<i64> {
        #[derive(Deserialize)]
        struct Seq {
            value: i64,
        }

        let mut result = self
            .db
            .query("UPSERT type::thing('seq', $name) SET value = (value ?? 0) + 1 RETURN AFTER")
            .bind(("name", name.to_string()))
            .await?;
        let rows: Vec<Seq> = result.take(0)?;
        rows.into_iter()
            .next()
            .map(|s| s.value)
            .ok_or_else(|| RepoError::Database(format!("Sequence '{}' returned no row", name)))
    }
}
