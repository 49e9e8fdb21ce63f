//! Order Model
//!
//! Line items are embedded in the order document so that an order and its
//! items commit as a single write.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::dining_table::DiningTable;

/// Walk-in order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Unpaid,
    Paid,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Unpaid => "unpaid",
            OrderStatus::Paid => "paid",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One menu item within an order
///
/// Name and unit price are snapshots taken at order creation; the subtotal
/// never changes even if the menu is edited later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub menu: RecordId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i64,
    pub subtotal: Decimal,
}

/// Walk-in order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub table: RecordId,
    pub customer: String,
    pub items: Vec<OrderLineItem>,
    /// Sum of line subtotals, fixed at creation
    pub total: Decimal,
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_method: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order with the referenced table fetched
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub table: DiningTable,
    pub customer: String,
    pub items: Vec<OrderLineItem>,
    pub total: Decimal,
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_method: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Requested line item: a menu reference and a quantity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub menu: RecordId,
    pub quantity: i64,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    pub table: RecordId,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub customer: String,
    pub items: Vec<OrderItemInput>,
}
