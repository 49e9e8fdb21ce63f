//! Order Lifecycle
//!
//! A walk-in order is admitted by the booking checker's time-buffer rule,
//! not by the table's status flag, so a `booked` table can still seat a
//! walk-in when the reservation is far enough away. Menu items are
//! resolved and priced before the table is touched; the order document
//! embeds the priced line items and commits in one write.

use std::path::PathBuf;
use std::sync::Arc;

use rust_decimal::Decimal;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use validator::Validate;

use super::booking::{BookingService, TableLocks};
use super::receipt::ReceiptRenderer;
use crate::db::models::{
    Order, OrderCreate, OrderDetail, OrderLineItem, OrderStatus, TableStatus,
};
use crate::db::repository::{DiningTableRepository, MenuItemRepository, OrderRepository};
use crate::utils::time::now_millis;
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct OrderService {
    repo: OrderRepository,
    tables: DiningTableRepository,
    menu: MenuItemRepository,
    booking: BookingService,
    locks: TableLocks,
    receipts: Arc<dyn ReceiptRenderer>,
}

impl OrderService {
    pub fn new(
        db: Surreal<Db>,
        locks: TableLocks,
        receipts: Arc<dyn ReceiptRenderer>,
    ) -> Self {
        Self {
            repo: OrderRepository::new(db.clone()),
            tables: DiningTableRepository::new(db.clone()),
            menu: MenuItemRepository::new(db.clone()),
            booking: BookingService::new(db),
            locks,
            receipts,
        }
    }

    pub async fn find_all(&self) -> AppResult<Vec<OrderDetail>> {
        Ok(self.repo.find_all_detailed().await?)
    }

    pub async fn find_by_id(&self, id: &RecordId) -> AppResult<OrderDetail> {
        self.repo
            .find_detailed(id)
            .await?
            .ok_or_else(|| AppError::not_found("order not found"))
    }

    /// Seat a walk-in and open their order
    ///
    /// Sequence under the table lock: reject if the table is already in
    /// use, reject if a reservation is imminent, then move the table to
    /// `in_use` and persist the order. A persist failure puts the table's
    /// previous status back.
    pub async fn create(&self, data: OrderCreate) -> AppResult<Order> {
        data.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        if data.items.is_empty() {
            return Err(AppError::validation("order needs at least one item"));
        }

        // Price every line before touching the table; a missing menu item
        // must not leave a claim behind.
        let mut items = Vec::with_capacity(data.items.len());
        let mut total = Decimal::ZERO;
        for input in &data.items {
            if input.quantity <= 0 {
                return Err(AppError::validation(
                    "item quantity must be greater than 0",
                ));
            }
            let menu_item = self
                .menu
                .find_by_id(&input.menu)
                .await?
                .ok_or_else(|| AppError::not_found("menu item not found"))?;
            let subtotal = menu_item.price * Decimal::from(input.quantity);
            total += subtotal;
            items.push(OrderLineItem {
                menu: input.menu.clone(),
                name: menu_item.name,
                unit_price: menu_item.price,
                quantity: input.quantity,
                subtotal,
            });
        }

        let _guard = self.locks.acquire(&data.table).await;

        let table = self
            .tables
            .find_by_id(&data.table)
            .await?
            .ok_or_else(|| AppError::not_found("table not found"))?;
        if table.status == TableStatus::InUse {
            return Err(AppError::conflict(format!(
                "table {} is already in use",
                table.table_no
            )));
        }

        let now = now_millis();
        self.booking.ensure_walk_in_allowed(&data.table, now).await?;

        let prior_status = table.status;
        let claimed = self
            .tables
            .try_set_status(
                &data.table,
                &[TableStatus::Available, TableStatus::Booked],
                TableStatus::InUse,
            )
            .await?;
        if claimed.is_none() {
            return Err(AppError::conflict(format!(
                "table {} is already in use",
                table.table_no
            )));
        }

        let order = Order {
            id: None,
            table: data.table.clone(),
            customer: data.customer,
            items,
            total,
            status: OrderStatus::Unpaid,
            payment_method: None,
            created_at: now,
            updated_at: now,
        };
        match self.repo.create(order).await {
            Ok(created) => {
                tracing::info!(
                    table = table.table_no,
                    total = %created.total,
                    "Order opened"
                );
                Ok(created)
            }
            Err(e) => {
                self.revert_table(&data.table, prior_status).await;
                Err(e.into())
            }
        }
    }

    /// Record payment for an order
    ///
    /// Touches status and payment method only; quantities and totals are
    /// fixed at creation. The table stays `in_use` until staff clears it
    /// through the registry.
    pub async fn confirm(&self, id: &RecordId, payment_method: String) -> AppResult<Order> {
        if payment_method.trim().is_empty() {
            return Err(AppError::validation("payment method is required"));
        }
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("order not found"))?;
        if existing.status == OrderStatus::Paid {
            return Err(AppError::conflict("order is already paid"));
        }
        Ok(self.repo.set_paid(id, payment_method).await?)
    }

    /// Render the durable receipt for an order, returning its path
    pub async fn render_receipt(&self, id: &RecordId) -> AppResult<PathBuf> {
        let order = self.find_by_id(id).await?;
        self.receipts.generate(&order).await
    }

    /// Remove an order and free its table
    ///
    /// The table is released only while still `in_use`; a table already
    /// rebooked by a reservation keeps its `booked` status.
    pub async fn delete(&self, id: &RecordId) -> AppResult<()> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("order not found"))?;
        let _guard = self.locks.acquire(&existing.table).await;

        if !self.repo.delete(id).await? {
            return Err(AppError::not_found("order not found"));
        }
        self.tables
            .try_set_status(
                &existing.table,
                &[TableStatus::InUse],
                TableStatus::Available,
            )
            .await?;
        Ok(())
    }

    /// Best-effort status revert; failure is logged, not surfaced
    async fn revert_table(&self, table: &RecordId, status: TableStatus) {
        if let Err(e) = self.tables.set_status(table, status).await {
            tracing::error!(
                table = %table,
                status = %status,
                error = %e,
                "Failed to revert table status"
            );
        }
    }
}
