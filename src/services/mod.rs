//! Service Layer
//!
//! One service per concern. The lifecycles (`reservation`, `order`)
//! orchestrate multi-entity sequences under per-table locks; the registry
//! and catalog are straightforward CRUD; the collaborator traits keep
//! email transport and document layout outside the engine.

pub mod booking;
pub mod dining_table;
pub mod invoice;
pub mod mailer;
pub mod menu;
pub mod order;
pub mod receipt;
pub mod reservation;

// Re-exports
pub use booking::{BookingService, TableLocks, RESERVATION_NOTICE_MIN};
pub use dining_table::TableService;
pub use invoice::InvoiceService;
pub use mailer::{InvoiceMailer, LogMailer};
pub use menu::MenuService;
pub use order::OrderService;
pub use receipt::{ReceiptRenderer, TextReceiptRenderer};
pub use reservation::{ConfirmedReservation, InvoiceDelivery, ReservationService};
