//! Application State
//!
//! Wires the database, the per-table locks and every service together.
//! Services share one `Surreal<Db>` handle and one `TableLocks` instance;
//! cloning the state clones cheap handles, never the data.

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::config::Config;
use crate::db::DbService;
use crate::services::{
    BookingService, InvoiceService, LogMailer, MenuService, OrderService, ReservationService,
    TableLocks, TableService, TextReceiptRenderer,
};
use crate::utils::AppResult;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub tables: TableService,
    pub booking: BookingService,
    pub reservations: ReservationService,
    pub orders: OrderService,
    pub invoices: InvoiceService,
    pub menu: MenuService,
}

impl AppState {
    /// Initialize the application with on-disk storage
    pub async fn initialize(config: Config) -> AppResult<Self> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| crate::utils::AppError::internal(format!("Work dir setup failed: {e}")))?;
        let db_service = DbService::open(&config.database_dir()).await?;
        Ok(Self::assemble(config, db_service.db))
    }

    /// Initialize with a fresh in-memory database (tests)
    pub async fn initialize_in_memory(config: Config) -> AppResult<Self> {
        let db_service = DbService::open_in_memory().await?;
        Ok(Self::assemble(config, db_service.db))
    }

    fn assemble(config: Config, db: Surreal<Db>) -> Self {
        let locks = TableLocks::new();
        let mailer = Arc::new(LogMailer);
        let receipts = Arc::new(TextReceiptRenderer::new(
            config.receipts_dir(),
            config.store_name.clone(),
            config.store_address.clone(),
        ));

        Self {
            tables: TableService::new(db.clone()),
            booking: BookingService::new(db.clone()),
            reservations: ReservationService::new(
                db.clone(),
                locks.clone(),
                mailer,
                config.reservation_fee,
            ),
            orders: OrderService::new(db.clone(), locks, receipts),
            invoices: InvoiceService::new(db.clone()),
            menu: MenuService::new(db.clone()),
            config,
            db,
        }
    }
}
