//! Cafe Server - table allocation and booking-conflict engine
//!
//! Core of a café management system: physical tables, time-bound
//! reservations, walk-in dine-in orders, and the financial artifacts
//! (invoices, receipts) derived from them. The engine guarantees that a
//! table is never double-booked between a scheduled reservation and a
//! walk-in order, and that monetary totals are snapshotted at creation
//! time and never silently recomputed.
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/          # configuration, application state
//! ├── db/            # embedded SurrealDB: models + repositories
//! ├── services/      # table registry, booking checks, lifecycles,
//! │                  # invoice generator, receipt/mailer collaborators
//! └── utils/         # error taxonomy, logging, time helpers
//! ```
//!
//! HTTP routing, authentication, upload handling, email transport and PDF
//! layout are out of scope here; the mailer and receipt renderer are
//! reached through the traits in [`services`].

pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export public types
pub use crate::core::{AppState, Config};
pub use db::models::{
    DiningTable, Invoice, MenuItem, Order, OrderLineItem, OrderStatus, Reservation,
    ReservationStatus, TableStatus,
};
pub use services::{
    BookingService, ConfirmedReservation, InvoiceDelivery, InvoiceMailer, InvoiceService,
    MenuService, OrderService, ReceiptRenderer, ReservationService, TableService,
};
pub use utils::{AppError, AppResult};

// Re-export logger bootstrap
pub use utils::logger::{init_logger, init_logger_with_file};
