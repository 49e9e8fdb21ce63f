//! Reservation Lifecycle
//!
//! A reservation claims a table through the conditional
//! `available -> booked` transition, so two concurrent requests for the
//! same slot leave exactly one winner. Every read-check-write sequence
//! here runs under the per-table lock, and any step that fails after the
//! claim reverts the table before surfacing the error.

use std::sync::Arc;

use rust_decimal::Decimal;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use validator::Validate;

use super::booking::TableLocks;
use super::invoice::InvoiceService;
use super::mailer::InvoiceMailer;
use crate::db::models::{
    Invoice, Reservation, ReservationCreate, ReservationDetail, ReservationStatus,
    ReservationUpdate, TableStatus,
};
use crate::db::repository::{DiningTableRepository, ReservationRepository};
use crate::utils::time::now_millis;
use crate::utils::{AppError, AppResult};

/// What happened to the invoice email during a confirmation
///
/// Mail failure never rolls back the confirmation; it is reported here so
/// the caller can tell the guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceDelivery {
    Sent,
    Failed,
    NoAddress,
}

/// Outcome of a successful confirmation
#[derive(Debug, Clone)]
pub struct ConfirmedReservation {
    pub reservation: Reservation,
    pub invoice: Invoice,
    pub delivery: InvoiceDelivery,
}

#[derive(Clone)]
pub struct ReservationService {
    repo: ReservationRepository,
    tables: DiningTableRepository,
    invoices: InvoiceService,
    locks: TableLocks,
    mailer: Arc<dyn InvoiceMailer>,
    reservation_fee: Decimal,
}

impl ReservationService {
    pub fn new(
        db: Surreal<Db>,
        locks: TableLocks,
        mailer: Arc<dyn InvoiceMailer>,
        reservation_fee: Decimal,
    ) -> Self {
        Self {
            repo: ReservationRepository::new(db.clone()),
            tables: DiningTableRepository::new(db.clone()),
            invoices: InvoiceService::new(db),
            locks,
            mailer,
            reservation_fee,
        }
    }

    pub async fn find_all(&self) -> AppResult<Vec<ReservationDetail>> {
        Ok(self.repo.find_all_detailed().await?)
    }

    pub async fn find_by_id(&self, id: &RecordId) -> AppResult<ReservationDetail> {
        self.repo
            .find_detailed(id)
            .await?
            .ok_or_else(|| AppError::not_found("reservation not found"))
    }

    /// Book a table for a future slot
    ///
    /// The table is claimed first; if persisting the reservation then
    /// fails, the claim is reverted before the error escapes.
    pub async fn create(&self, data: ReservationCreate) -> AppResult<Reservation> {
        data.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        let now = now_millis();
        if data.reserved_at <= now {
            return Err(AppError::validation(
                "reservation time must be in the future",
            ));
        }

        let _guard = self.locks.acquire(&data.table).await;

        let claimed = self
            .tables
            .try_set_status(&data.table, &[TableStatus::Available], TableStatus::Booked)
            .await?;
        if claimed.is_none() {
            return Err(match self.tables.find_by_id(&data.table).await? {
                Some(table) => AppError::conflict(format!(
                    "table {} is not available",
                    table.table_no
                )),
                None => AppError::not_found("table not found"),
            });
        }

        let result = async {
            let number = self.repo.next_number().await?;
            let reservation = Reservation {
                id: None,
                number,
                name: data.name,
                phone: data.phone,
                email: data.email,
                table: data.table.clone(),
                reserved_at: data.reserved_at,
                table_fee: self.reservation_fee,
                status: ReservationStatus::Pending,
                created_at: now,
                updated_at: now,
            };
            self.repo.create(reservation).await
        }
        .await;

        match result {
            Ok(created) => {
                tracing::info!(
                    reservation = %created.number,
                    table = %created.table,
                    "Reservation created"
                );
                Ok(created)
            }
            Err(e) => {
                self.release_table(&data.table).await;
                Err(e.into())
            }
        }
    }

    /// Confirm payment: move to `paid` and derive the invoice
    ///
    /// Safe to repeat; a second confirmation finds the reservation already
    /// paid and returns the existing invoice. The table stays booked until
    /// the reservation completes or is cancelled.
    pub async fn confirm(&self, id: &RecordId) -> AppResult<ConfirmedReservation> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("reservation not found"))?;
        if !existing.status.can_become(ReservationStatus::Paid) {
            return Err(AppError::conflict(format!(
                "a {} reservation cannot be confirmed",
                existing.status
            )));
        }

        let reservation = self.repo.set_status(id, ReservationStatus::Paid).await?;
        let invoice = self.invoices.create_invoice(&reservation).await?;

        let delivery = match reservation.email.as_deref() {
            Some(address) if !address.is_empty() => {
                match self.mailer.send_invoice(address, &invoice).await {
                    Ok(()) => InvoiceDelivery::Sent,
                    Err(e) => {
                        tracing::warn!(
                            reservation = %reservation.number,
                            error = %e,
                            "Invoice email failed, confirmation stands"
                        );
                        InvoiceDelivery::Failed
                    }
                }
            }
            _ => InvoiceDelivery::NoAddress,
        };

        Ok(ConfirmedReservation {
            reservation,
            invoice,
            delivery,
        })
    }

    /// Partial update: only present fields apply
    ///
    /// Status may only move forward; a table change claims the new table
    /// and releases the old one under both tables' locks. Entering a
    /// terminal status releases the table.
    pub async fn update(&self, id: &RecordId, data: ReservationUpdate) -> AppResult<Reservation> {
        let mut existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("reservation not found"))?;

        if let Some(next) = data.status
            && !existing.status.can_become(next)
        {
            return Err(AppError::conflict(format!(
                "reservation cannot move from {} to {}",
                existing.status, next
            )));
        }

        let new_table = data
            .table
            .clone()
            .filter(|table| *table != existing.table);
        if new_table.is_some() && existing.status.is_terminal() {
            return Err(AppError::conflict(format!(
                "a {} reservation cannot change table",
                existing.status
            )));
        }

        let prior_status = existing.status;
        match new_table {
            Some(new_table) => {
                let old_table = existing.table.clone();
                let _guards = self.locks.acquire_pair(&old_table, &new_table).await;

                let claimed = self
                    .tables
                    .try_set_status(&new_table, &[TableStatus::Available], TableStatus::Booked)
                    .await?;
                if claimed.is_none() {
                    return Err(match self.tables.find_by_id(&new_table).await? {
                        Some(table) => AppError::conflict(format!(
                            "table {} is not available",
                            table.table_no
                        )),
                        None => AppError::not_found("table not found"),
                    });
                }

                apply_fields(&mut existing, &data);
                existing.table = new_table.clone();
                match self.repo.update(&existing).await {
                    Ok(updated) => {
                        self.release_table(&old_table).await;
                        self.release_on_exit(&updated, prior_status).await;
                        Ok(updated)
                    }
                    Err(e) => {
                        self.release_table(&new_table).await;
                        Err(e.into())
                    }
                }
            }
            None => {
                let _guard = self.locks.acquire(&existing.table).await;
                apply_fields(&mut existing, &data);
                let updated = self.repo.update(&existing).await?;
                self.release_on_exit(&updated, prior_status).await;
                Ok(updated)
            }
        }
    }

    /// Remove a reservation, its invoice, and its claim on the table
    pub async fn delete(&self, id: &RecordId) -> AppResult<()> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("reservation not found"))?;
        let _guard = self.locks.acquire(&existing.table).await;

        self.invoices.remove_for_reservation(id).await?;
        if !self.repo.delete(id).await? {
            return Err(AppError::not_found("reservation not found"));
        }
        if !existing.status.releases_table() {
            self.release_table(&existing.table).await;
        }
        tracing::info!(reservation = %existing.number, "Reservation deleted");
        Ok(())
    }

    /// Free the table when the reservation just entered a terminal status
    async fn release_on_exit(&self, updated: &Reservation, prior: ReservationStatus) {
        if updated.status.releases_table() && !prior.releases_table() {
            self.release_table(&updated.table).await;
        }
    }

    /// Drop a reservation's claim, best effort
    ///
    /// Conditional on the table still being `booked`: a walk-in seated
    /// outside the buffer holds `in_use` and must keep it.
    async fn release_table(&self, table: &RecordId) {
        if let Err(e) = self
            .tables
            .try_set_status(table, &[TableStatus::Booked], TableStatus::Available)
            .await
        {
            tracing::error!(
                table = %table,
                error = %e,
                "Failed to release table"
            );
        }
    }
}

fn apply_fields(reservation: &mut Reservation, data: &ReservationUpdate) {
    if let Some(name) = &data.name {
        reservation.name = name.clone();
    }
    if let Some(phone) = &data.phone {
        reservation.phone = phone.clone();
    }
    if let Some(email) = &data.email {
        reservation.email = Some(email.clone());
    }
    if let Some(reserved_at) = data.reserved_at {
        reservation.reserved_at = reserved_at;
    }
    if let Some(status) = data.status {
        reservation.status = status;
    }
}
