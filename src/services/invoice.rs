//! Invoice Generator
//!
//! Derives exactly one invoice per paid reservation. Creation is
//! idempotent: a repeated request returns the existing invoice instead of
//! erroring or duplicating.

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use crate::db::models::{Invoice, Reservation, ReservationStatus};
use crate::db::repository::{InvoiceRepository, RepoError};
use crate::utils::time::{date_stamp, now_millis};
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct InvoiceService {
    repo: InvoiceRepository,
}

impl InvoiceService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            repo: InvoiceRepository::new(db),
        }
    }

    /// Create the invoice for a reservation, or return the existing one
    ///
    /// Two callers racing past the existence check are resolved by the
    /// unique index on `invoice.reservation`: the loser fetches the
    /// winner's record. Invoice-number uniqueness across delete+recreate
    /// cycles stays a storage-layer constraint.
    pub async fn create_invoice(&self, reservation: &Reservation) -> AppResult<Invoice> {
        let reservation_id = reservation
            .id
            .clone()
            .ok_or_else(|| AppError::internal("reservation has no ID"))?;

        if let Some(existing) = self.repo.find_by_reservation(&reservation_id).await? {
            return Ok(existing);
        }

        let now = now_millis();
        let payment_status = if reservation.status == ReservationStatus::Paid {
            "Paid"
        } else {
            "Unpaid"
        };
        let invoice = Invoice {
            id: None,
            reservation: reservation_id.clone(),
            number: invoice_number(now, reservation.number),
            amount_paid: reservation.table_fee,
            payment_status: payment_status.to_string(),
            created_at: now,
            updated_at: now,
        };

        match self.repo.create(invoice).await {
            Ok(created) => Ok(created),
            Err(RepoError::Duplicate(_)) => {
                // Lost the race; the surviving invoice is the answer
                self.repo
                    .find_by_reservation(&reservation_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::database("invoice vanished after duplicate insert")
                    })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch the invoice for a reservation, if one exists
    pub async fn find_by_reservation(
        &self,
        reservation: &RecordId,
    ) -> AppResult<Option<Invoice>> {
        Ok(self.repo.find_by_reservation(reservation).await?)
    }

    /// Remove the invoice tied to a reservation (reservation deletion)
    pub async fn remove_for_reservation(&self, reservation: &RecordId) -> AppResult<()> {
        Ok(self.repo.delete_by_reservation(reservation).await?)
    }
}

/// `INV-YYYYMMDD-<sequence zero-padded to 3 digits>`
fn invoice_number(now: i64, sequence: i64) -> String {
    format!("INV-{}-{:03}", date_stamp(now), sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-03-05 17:35:00 UTC
    const SAMPLE: i64 = 1_709_660_100_000;

    #[test]
    fn number_is_zero_padded() {
        assert_eq!(invoice_number(SAMPLE, 7), "INV-20240305-007");
        assert_eq!(invoice_number(SAMPLE, 42), "INV-20240305-042");
    }

    #[test]
    fn number_grows_past_three_digits() {
        assert_eq!(invoice_number(SAMPLE, 1234), "INV-20240305-1234");
    }
}
