//! Invoice Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Invoice derived from a reservation
///
/// At most one invoice exists per reservation; the `reservation` field
/// carries a unique index and creation is idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub reservation: RecordId,
    /// `INV-YYYYMMDD-<reservation number, zero-padded to 3>`
    pub number: String,
    pub amount_paid: Decimal,
    /// "Paid" or "Unpaid"
    pub payment_status: String,
    pub created_at: i64,
    pub updated_at: i64,
}
