//! Booking Conflict Checker
//!
//! The central business rule of the engine, deliberately asymmetric:
//!
//! - a *reservation* intent is checked against the table's status flag
//!   (via the conditional `Available -> Booked` transition in the
//!   repository; no interval math);
//! - a *walk-in order* intent is checked against a 30-minute buffer in
//!   front of the table's earliest upcoming reservation.
//!
//! Both checks run under a per-table lock so the surrounding
//! read-check-write sequences cannot interleave.

use std::sync::Arc;

use dashmap::DashMap;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::db::repository::ReservationRepository;
use crate::utils::time::format_hhmm;
use crate::utils::{AppError, AppResult};

/// Walk-ins are rejected within this many minutes of an upcoming reservation
pub const RESERVATION_NOTICE_MIN: i64 = 30;

const MILLIS_PER_MIN: i64 = 60_000;

/// Per-table mutual exclusion
///
/// Every table-status read-modify-write sequence must hold the lock of the
/// table(s) it touches for its whole duration, compensation included.
#[derive(Clone, Default)]
pub struct TableLocks {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl TableLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock a single table
    pub async fn acquire(&self, table: &RecordId) -> OwnedMutexGuard<()> {
        self.handle(table).lock_owned().await
    }

    /// Lock two tables in deterministic key order to avoid deadlock
    pub async fn acquire_pair(
        &self,
        a: &RecordId,
        b: &RecordId,
    ) -> (OwnedMutexGuard<()>, OwnedMutexGuard<()>) {
        let (first, second) = if a.to_string() <= b.to_string() {
            (a, b)
        } else {
            (b, a)
        };
        let first_guard = self.handle(first).lock_owned().await;
        let second_guard = self.handle(second).lock_owned().await;
        (first_guard, second_guard)
    }

    fn handle(&self, table: &RecordId) -> Arc<Mutex<()>> {
        self.locks
            .entry(table.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }
}

/// True when a walk-in at `now` would crowd out a reservation at `reserved_at`
///
/// The cutoff is `reserved_at - 30min`, inclusive: an attempt exactly at
/// the cutoff is rejected.
pub fn within_notice_window(reserved_at: i64, now: i64) -> bool {
    now >= reserved_at - RESERVATION_NOTICE_MIN * MILLIS_PER_MIN
}

/// Booking conflict checks shared by the lifecycles
#[derive(Clone)]
pub struct BookingService {
    reservations: ReservationRepository,
}

impl BookingService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            reservations: ReservationRepository::new(db),
        }
    }

    /// Reject a walk-in order when an upcoming reservation is imminent
    ///
    /// The rejection names the blocking reservation's time so staff can
    /// relay it to the guest.
    pub async fn ensure_walk_in_allowed(&self, table: &RecordId, now: i64) -> AppResult<()> {
        if let Some(upcoming) = self.reservations.earliest_upcoming(table, now).await?
            && within_notice_window(upcoming.reserved_at, now)
        {
            return Err(AppError::conflict(format!(
                "table is reserved at {}, dine-in is not possible right now",
                format_hhmm(upcoming.reserved_at)
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: i64 = MILLIS_PER_MIN;

    #[test]
    fn attempt_before_the_window_passes() {
        let reserved_at = 100 * MIN;
        assert!(!within_notice_window(reserved_at, reserved_at - 31 * MIN));
        assert!(!within_notice_window(reserved_at, reserved_at - 45 * MIN));
    }

    #[test]
    fn attempt_inside_the_window_is_blocked() {
        let reserved_at = 100 * MIN;
        assert!(within_notice_window(reserved_at, reserved_at - 29 * MIN));
        assert!(within_notice_window(reserved_at, reserved_at - MIN));
    }

    #[test]
    fn cutoff_is_inclusive() {
        let reserved_at = 100 * MIN;
        assert!(within_notice_window(reserved_at, reserved_at - 30 * MIN));
    }
}
