//! Database Models

// Location
pub mod dining_table;

// Catalog
pub mod menu_item;

// Bookings
pub mod order;
pub mod reservation;

// Finance
pub mod invoice;

// Re-exports
pub use dining_table::{DiningTable, DiningTableCreate, DiningTableUpdate, TableStatus};
pub use invoice::Invoice;
pub use menu_item::{MenuItem, MenuItemCreate, MenuItemUpdate};
pub use order::{Order, OrderCreate, OrderDetail, OrderItemInput, OrderLineItem, OrderStatus};
pub use reservation::{
    Reservation, ReservationCreate, ReservationDetail, ReservationStatus, ReservationUpdate,
};
