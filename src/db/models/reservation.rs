//! Reservation Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::dining_table::DiningTable;

/// Reservation lifecycle status
///
/// `Pending -> Paid -> Completed`, with `Cancelled` reachable from the two
/// live states. Completed and Cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Paid,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReservationStatus::Completed | ReservationStatus::Cancelled)
    }

    /// Releases the table when entered
    pub fn releases_table(&self) -> bool {
        self.is_terminal()
    }

    /// Whether `next` is a legal forward transition (same status is a no-op)
    pub fn can_become(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Paid) | (Pending, Cancelled) | (Paid, Completed) | (Paid, Cancelled)
        ) || *self == next
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Paid => "paid",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reservation entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Monotonic sequence number, feeds the invoice number
    pub number: i64,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub table: RecordId,
    /// Reserved instant, Unix millis
    pub reserved_at: i64,
    pub table_fee: Decimal,
    pub status: ReservationStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Reservation with the referenced table fetched
#[derive(Debug, Clone, Deserialize)]
pub struct ReservationDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub number: i64,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub table: DiningTable,
    pub reserved_at: i64,
    pub table_fee: Decimal,
    pub status: ReservationStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReservationCreate {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub phone: String,
    #[validate(email)]
    #[serde(default)]
    pub email: Option<String>,
    pub table: RecordId,
    /// Reserved instant, Unix millis
    pub reserved_at: i64,
}

/// Update reservation payload, partial semantics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReservationStatus>,
}

#[cfg(test)]
mod tests {
    use super::ReservationStatus::*;

    #[test]
    fn forward_transitions() {
        assert!(Pending.can_become(Paid));
        assert!(Pending.can_become(Cancelled));
        assert!(Paid.can_become(Completed));
        assert!(Paid.can_become(Cancelled));
    }

    #[test]
    fn terminal_states_reject_everything() {
        for next in [Pending, Paid, Completed] {
            assert!(!Cancelled.can_become(next));
        }
        for next in [Pending, Paid, Cancelled] {
            assert!(!Completed.can_become(next));
        }
    }

    #[test]
    fn no_backward_transitions() {
        assert!(!Paid.can_become(Pending));
        assert!(!Pending.can_become(Completed));
    }
}
