//! Reservation Repository

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Reservation, ReservationDetail, ReservationStatus};
use crate::utils::time::now_millis;

const TABLE: &str = "reservation";

#[derive(Clone)]
pub struct ReservationRepository {
    base: BaseRepository,
}

impl ReservationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Allocate the next reservation sequence number
    pub async fn next_number(&self) -> RepoResult<i64> {
        self.base.next_sequence("reservation").await
    }

    /// Find all reservations with their tables fetched, newest slot first
    pub async fn find_all_detailed(&self) -> RepoResult<Vec<ReservationDetail>> {
        let reservations: Vec<ReservationDetail> = self
            .base
            .db()
            .query("SELECT * FROM reservation ORDER BY reserved_at DESC FETCH `table`")
            .await?
            .take(0)?;
        Ok(reservations)
    }

    /// Find reservation by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Reservation>> {
        let reservation: Option<Reservation> = self.base.db().select(id.clone()).await?;
        Ok(reservation)
    }

    /// Find reservation by id with the table fetched
    pub async fn find_detailed(&self, id: &RecordId) -> RepoResult<Option<ReservationDetail>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM reservation WHERE id = $id FETCH `table`")
            .bind(("id", id.clone()))
            .await?;
        let reservations: Vec<ReservationDetail> = result.take(0)?;
        Ok(reservations.into_iter().next())
    }

    /// Earliest reservation on a table strictly after `now`
    ///
    /// Only live reservations count; cancelled or completed ones must not
    /// block a walk-in.
    pub async fn earliest_upcoming(
        &self,
        table: &RecordId,
        now: i64,
    ) -> RepoResult<Option<Reservation>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM reservation \
                 WHERE `table` = $table_id AND reserved_at > $now AND status IN $statuses \
                 ORDER BY reserved_at ASC LIMIT 1",
            )
            .bind(("table_id", table.clone()))
            .bind(("now", now))
            .bind((
                "statuses",
                vec![ReservationStatus::Pending, ReservationStatus::Paid],
            ))
            .await?;
        let reservations: Vec<Reservation> = result.take(0)?;
        Ok(reservations.into_iter().next())
    }

    /// Create a new reservation
    pub async fn create(&self, reservation: Reservation) -> RepoResult<Reservation> {
        let created: Option<Reservation> =
            self.base.db().create(TABLE).content(reservation).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create reservation".to_string()))
    }

    /// Status-only write, used by the confirm flow
    pub async fn set_status(
        &self,
        id: &RecordId,
        status: ReservationStatus,
    ) -> RepoResult<Reservation> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET status = $status, updated_at = $now RETURN AFTER")
            .bind(("id", id.clone()))
            .bind(("status", status))
            .bind(("now", now_millis()))
            .await?;
        let reservations: Vec<Reservation> = result.take(0)?;
        reservations
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Reservation {} not found", id)))
    }

    /// Write back every mutable field of a reservation
    pub async fn update(&self, reservation: &Reservation) -> RepoResult<Reservation> {
        let id = reservation
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Reservation has no ID".to_string()))?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET name = $name, phone = $phone, email = $email, \
                 `table` = $table_id, reserved_at = $reserved_at, table_fee = $table_fee, \
                 status = $status, updated_at = $now RETURN AFTER",
            )
            .bind(("id", id.clone()))
            .bind(("name", reservation.name.clone()))
            .bind(("phone", reservation.phone.clone()))
            .bind(("email", reservation.email.clone()))
            .bind(("table_id", reservation.table.clone()))
            .bind(("reserved_at", reservation.reserved_at))
            .bind(("table_fee", reservation.table_fee))
            .bind(("status", reservation.status))
            .bind(("now", now_millis()))
            .await?;
        let reservations: Vec<Reservation> = result.take(0)?;
        reservations
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Reservation {} not found", id)))
    }

    /// Hard delete; true when a record was removed
    pub async fn delete(&self, id: &RecordId) -> RepoResult<bool> {
        let deleted: Option<Reservation> = self.base.db().delete(id.clone()).await?;
        Ok(deleted.is_some())
    }
}
