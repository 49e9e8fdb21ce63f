//! Invoice Repository

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Invoice;

const TABLE: &str = "invoice";

#[derive(Clone)]
pub struct InvoiceRepository {
    base: BaseRepository,
}

impl InvoiceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find the invoice referencing a reservation, if any
    pub async fn find_by_reservation(
        &self,
        reservation: &RecordId,
    ) -> RepoResult<Option<Invoice>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM invoice WHERE reservation = $reservation LIMIT 1")
            .bind(("reservation", reservation.clone()))
            .await?;
        let invoices: Vec<Invoice> = result.take(0)?;
        Ok(invoices.into_iter().next())
    }

    /// Create a new invoice
    ///
    /// The unique index on `reservation` turns a lost query-then-insert
    /// race into [`RepoError::Duplicate`]; the generator handles that by
    /// returning the surviving record.
    pub async fn create(&self, invoice: Invoice) -> RepoResult<Invoice> {
        let created: Option<Invoice> = self.base.db().create(TABLE).content(invoice).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create invoice".to_string()))
    }

    /// Remove the invoice(s) referencing a reservation
    pub async fn delete_by_reservation(&self, reservation: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE invoice WHERE reservation = $reservation")
            .bind(("reservation", reservation.clone()))
            .await?;
        Ok(())
    }
}
