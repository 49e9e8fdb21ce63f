//! Receipt rendering
//!
//! The document renderer is an external collaborator. The default
//! implementation writes a plain-text receipt keyed by order id;
//! regenerating for the same order overwrites the previous file, so the
//! artifact is idempotent by filename.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::db::models::OrderDetail;
use crate::utils::time::format_receipt_stamp;
use crate::utils::{AppError, AppResult};

#[async_trait]
pub trait ReceiptRenderer: Send + Sync {
    /// Render a durable receipt for a finalized order, returning its path
    async fn generate(&self, order: &OrderDetail) -> AppResult<PathBuf>;
}

/// Plain-text receipt writer
pub struct TextReceiptRenderer {
    dir: PathBuf,
    store_name: String,
    store_address: String,
}

impl TextReceiptRenderer {
    pub fn new(
        dir: PathBuf,
        store_name: impl Into<String>,
        store_address: impl Into<String>,
    ) -> Self {
        Self {
            dir,
            store_name: store_name.into(),
            store_address: store_address.into(),
        }
    }
}

const RULE: &str = "-------------------------------------------------";

#[async_trait]
impl ReceiptRenderer for TextReceiptRenderer {
    async fn generate(&self, order: &OrderDetail) -> AppResult<PathBuf> {
        let order_id = order
            .id
            .as_ref()
            .ok_or_else(|| AppError::internal("order has no ID"))?;

        let mut out = String::new();
        out.push_str(&format!("{:^49}\n", self.store_name));
        if !self.store_address.is_empty() {
            out.push_str(&format!("{:^49}\n", self.store_address));
        }
        out.push_str(RULE);
        out.push('\n');
        out.push_str(&format!("Order    : {}\n", order_id.key()));
        out.push_str(&format!(
            "Date     : {}\n",
            format_receipt_stamp(order.created_at)
        ));
        out.push_str(&format!("Table    : {}\n", order.table.table_no));
        out.push_str(&format!("Customer : {}\n", order.customer));
        out.push_str(RULE);
        out.push('\n');
        out.push_str(&format!(
            "{:<24}{:>4} {:>9} {:>10}\n",
            "Item", "Qty", "Price", "Subtotal"
        ));
        for item in &order.items {
            out.push_str(&format!(
                "{:<24}{:>4} {:>9} {:>10}\n",
                item.name, item.quantity, item.unit_price, item.subtotal
            ));
        }
        out.push_str(RULE);
        out.push('\n');
        out.push_str(&format!("TOTAL: {}\n", order.total));
        out.push_str("Thank you for visiting\n");

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::internal(format!("Failed to create receipt dir: {e}")))?;
        let path = self.dir.join(format!("receipt_{}.txt", order_id.key()));
        tokio::fs::write(&path, out)
            .await
            .map_err(|e| AppError::internal(format!("Failed to write receipt: {e}")))?;

        tracing::info!(path = %path.display(), "Receipt generated");
        Ok(path)
    }
}
