//! End-to-end booking-flow scenarios against the in-memory engine

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use surrealdb::RecordId;

use cafe_server::db::models::{
    DiningTableCreate, MenuItemCreate, MenuItemUpdate, OrderCreate, OrderItemInput,
    ReservationCreate, ReservationStatus, ReservationUpdate, TableStatus,
};
use cafe_server::db::DbService;
use cafe_server::services::{InvoiceMailer, TableLocks};
use cafe_server::utils::time::{format_hhmm, now_millis};
use cafe_server::{
    AppError, AppResult, AppState, Config, Invoice, InvoiceDelivery, ReservationService,
    TableService,
};

const MIN: i64 = 60_000;

async fn state() -> AppState {
    let config = Config::with_overrides("/tmp/cafe-server-test", Decimal::from(25));
    AppState::initialize_in_memory(config)
        .await
        .expect("in-memory state")
}

async fn make_table(state: &AppState, table_no: i32) -> RecordId {
    let table = state
        .tables
        .create(DiningTableCreate { table_no })
        .await
        .expect("create table");
    table.id.expect("table id")
}

async fn make_menu_item(state: &AppState, name: &str, price: i64) -> RecordId {
    let item = state
        .menu
        .create(MenuItemCreate {
            name: name.to_string(),
            tagline: String::new(),
            image_url: String::new(),
            price: Decimal::from(price),
        })
        .await
        .expect("create menu item");
    item.id.expect("menu id")
}

fn reservation_for(table: &RecordId, reserved_at: i64) -> ReservationCreate {
    ReservationCreate {
        name: "Alice".to_string(),
        phone: "0812345678".to_string(),
        email: None,
        table: table.clone(),
        reserved_at,
    }
}

fn order_for(table: &RecordId, menu: &RecordId, quantity: i64) -> OrderCreate {
    OrderCreate {
        table: table.clone(),
        customer: "Walk-in".to_string(),
        items: vec![OrderItemInput {
            menu: menu.clone(),
            quantity,
        }],
    }
}

#[tokio::test]
async fn concurrent_reservations_leave_one_winner() {
    let state = state().await;
    let table = make_table(&state, 1).await;
    let reserved_at = now_millis() + 120 * MIN;

    let a = {
        let state = state.clone();
        let table = table.clone();
        tokio::spawn(async move { state.reservations.create(reservation_for(&table, reserved_at)).await })
    };
    let b = {
        let state = state.clone();
        let table = table.clone();
        tokio::spawn(async move { state.reservations.create(reservation_for(&table, reserved_at)).await })
    };

    let results = [a.await.expect("join"), b.await.expect("join")];
    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one reservation must win the table");
    let loser = results
        .iter()
        .find(|r| r.is_err())
        .and_then(|r| r.as_ref().err())
        .expect("one loser");
    assert!(matches!(loser, AppError::Conflict(_)));

    let after = state.tables.find_by_id(&table).await.expect("table");
    assert_eq!(after.status, TableStatus::Booked);
}

#[tokio::test]
async fn reservation_requires_available_table() {
    let state = state().await;
    let table = make_table(&state, 2).await;
    let reserved_at = now_millis() + 120 * MIN;

    state
        .reservations
        .create(reservation_for(&table, reserved_at))
        .await
        .expect("first reservation");

    let second = state
        .reservations
        .create(reservation_for(&table, reserved_at + 60 * MIN))
        .await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    let missing: RecordId = ("dining_table", "nope").into();
    let absent = state
        .reservations
        .create(reservation_for(&missing, reserved_at))
        .await;
    assert!(matches!(absent, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn walk_in_inside_the_buffer_is_rejected_with_the_blocking_time() {
    let state = state().await;
    let table = make_table(&state, 5).await;
    let menu = make_menu_item(&state, "Latte", 30).await;
    let reserved_at = now_millis() + 25 * MIN;

    state
        .reservations
        .create(reservation_for(&table, reserved_at))
        .await
        .expect("reservation");

    let rejected = state.orders.create(order_for(&table, &menu, 1)).await;
    match rejected {
        Err(AppError::Conflict(msg)) => {
            assert!(
                msg.contains(&format_hhmm(reserved_at)),
                "rejection must name the blocking time, got: {msg}"
            );
        }
        other => panic!("expected Conflict, got {other:?}"),
    }

    // Nothing changed on the table
    let after = state.tables.find_by_id(&table).await.expect("table");
    assert_eq!(after.status, TableStatus::Booked);
}

#[tokio::test]
async fn walk_in_outside_the_buffer_is_seated() {
    let state = state().await;
    let table = make_table(&state, 6).await;
    let menu = make_menu_item(&state, "Espresso", 18).await;
    let reserved_at = now_millis() + 90 * MIN;

    state
        .reservations
        .create(reservation_for(&table, reserved_at))
        .await
        .expect("reservation");

    let order = state
        .orders
        .create(order_for(&table, &menu, 2))
        .await
        .expect("walk-in outside the buffer");
    assert_eq!(order.total, Decimal::from(36));

    let after = state.tables.find_by_id(&table).await.expect("table");
    assert_eq!(after.status, TableStatus::InUse);
}

#[tokio::test]
async fn order_total_is_a_snapshot() {
    let state = state().await;
    let table = make_table(&state, 3).await;
    let menu = make_menu_item(&state, "Croissant", 10).await;

    let order = state
        .orders
        .create(order_for(&table, &menu, 3))
        .await
        .expect("order");
    assert_eq!(order.total, Decimal::from(30));

    state
        .menu
        .update(
            &menu,
            MenuItemUpdate {
                price: Some(Decimal::from(99)),
                ..Default::default()
            },
        )
        .await
        .expect("price edit");

    let fetched = state
        .orders
        .find_by_id(&order.id.clone().expect("order id"))
        .await
        .expect("fetch order");
    assert_eq!(fetched.total, Decimal::from(30));
    assert_eq!(fetched.items[0].unit_price, Decimal::from(10));
}

#[tokio::test]
async fn order_with_unknown_menu_item_leaves_the_table_untouched() {
    let state = state().await;
    let table = make_table(&state, 4).await;
    let missing: RecordId = ("menu_item", "ghost").into();

    let result = state.orders.create(order_for(&table, &missing, 1)).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let after = state.tables.find_by_id(&table).await.expect("table");
    assert_eq!(after.status, TableStatus::Available);
}

#[tokio::test]
async fn confirming_an_order_keeps_the_table_in_use() {
    let state = state().await;
    let table = make_table(&state, 7).await;
    let menu = make_menu_item(&state, "Tea", 12).await;

    let order = state
        .orders
        .create(order_for(&table, &menu, 1))
        .await
        .expect("order");
    let order_id = order.id.expect("order id");

    let paid = state
        .orders
        .confirm(&order_id, "cash".to_string())
        .await
        .expect("confirm");
    assert_eq!(paid.payment_method.as_deref(), Some("cash"));

    let again = state.orders.confirm(&order_id, "card".to_string()).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    let after = state.tables.find_by_id(&table).await.expect("table");
    assert_eq!(after.status, TableStatus::InUse);
}

#[tokio::test]
async fn confirming_a_reservation_is_idempotent_on_the_invoice() {
    let state = state().await;
    let table = make_table(&state, 8).await;
    let reservation = state
        .reservations
        .create(reservation_for(&table, now_millis() + 120 * MIN))
        .await
        .expect("reservation");
    let id = reservation.id.expect("reservation id");

    let first = state.reservations.confirm(&id).await.expect("confirm");
    assert_eq!(first.reservation.status, ReservationStatus::Paid);
    assert_eq!(first.invoice.payment_status, "Paid");
    assert_eq!(first.delivery, InvoiceDelivery::NoAddress);

    let second = state.reservations.confirm(&id).await.expect("re-confirm");
    assert_eq!(first.invoice.id, second.invoice.id);
    assert_eq!(first.invoice.number, second.invoice.number);
}

#[tokio::test]
async fn deleting_a_reservation_releases_the_table_and_the_invoice() {
    let state = state().await;
    let table = make_table(&state, 9).await;
    let reservation = state
        .reservations
        .create(reservation_for(&table, now_millis() + 120 * MIN))
        .await
        .expect("reservation");
    let id = reservation.id.expect("reservation id");

    state.reservations.confirm(&id).await.expect("confirm");
    assert!(state
        .invoices
        .find_by_reservation(&id)
        .await
        .expect("lookup")
        .is_some());

    state.reservations.delete(&id).await.expect("delete");

    let after = state.tables.find_by_id(&table).await.expect("table");
    assert_eq!(after.status, TableStatus::Available);
    assert!(state
        .invoices
        .find_by_reservation(&id)
        .await
        .expect("lookup")
        .is_none());

    let again = state.reservations.delete(&id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn cancelling_a_reservation_releases_the_table() {
    let state = state().await;
    let table = make_table(&state, 10).await;
    let reservation = state
        .reservations
        .create(reservation_for(&table, now_millis() + 120 * MIN))
        .await
        .expect("reservation");
    let id = reservation.id.expect("reservation id");

    let cancelled = state
        .reservations
        .update(
            &id,
            ReservationUpdate {
                status: Some(ReservationStatus::Cancelled),
                ..Default::default()
            },
        )
        .await
        .expect("cancel");
    assert_eq!(cancelled.status, ReservationStatus::Cancelled);

    let after = state.tables.find_by_id(&table).await.expect("table");
    assert_eq!(after.status, TableStatus::Available);

    // Terminal states reject further movement
    let revive = state
        .reservations
        .update(
            &id,
            ReservationUpdate {
                status: Some(ReservationStatus::Paid),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(revive, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn moving_a_reservation_swaps_the_table_claims() {
    let state = state().await;
    let table_a = make_table(&state, 11).await;
    let table_b = make_table(&state, 12).await;
    let reservation = state
        .reservations
        .create(reservation_for(&table_a, now_millis() + 120 * MIN))
        .await
        .expect("reservation");
    let id = reservation.id.expect("reservation id");

    let moved = state
        .reservations
        .update(
            &id,
            ReservationUpdate {
                table: Some(table_b.clone()),
                ..Default::default()
            },
        )
        .await
        .expect("move");
    assert_eq!(moved.table, table_b);

    let a = state.tables.find_by_id(&table_a).await.expect("table a");
    let b = state.tables.find_by_id(&table_b).await.expect("table b");
    assert_eq!(a.status, TableStatus::Available);
    assert_eq!(b.status, TableStatus::Booked);
}

#[tokio::test]
async fn ending_a_reservation_keeps_a_seated_walk_in() {
    let state = state().await;
    let menu = make_menu_item(&state, "Flat White", 20).await;

    // Cancel: the walk-in seated outside the buffer keeps the table
    let table = make_table(&state, 14).await;
    let reservation = state
        .reservations
        .create(reservation_for(&table, now_millis() + 120 * MIN))
        .await
        .expect("reservation");
    state
        .orders
        .create(order_for(&table, &menu, 1))
        .await
        .expect("walk-in outside the buffer");
    state
        .reservations
        .update(
            &reservation.id.expect("reservation id"),
            ReservationUpdate {
                status: Some(ReservationStatus::Cancelled),
                ..Default::default()
            },
        )
        .await
        .expect("cancel");
    let after = state.tables.find_by_id(&table).await.expect("table");
    assert_eq!(after.status, TableStatus::InUse);

    // Delete: same rule
    let table = make_table(&state, 15).await;
    let reservation = state
        .reservations
        .create(reservation_for(&table, now_millis() + 120 * MIN))
        .await
        .expect("reservation");
    state
        .orders
        .create(order_for(&table, &menu, 1))
        .await
        .expect("walk-in outside the buffer");
    state
        .reservations
        .delete(&reservation.id.expect("reservation id"))
        .await
        .expect("delete");
    let after = state.tables.find_by_id(&table).await.expect("table");
    assert_eq!(after.status, TableStatus::InUse);
}

#[tokio::test]
async fn detailed_reads_embed_the_referenced_table() {
    let state = state().await;
    let table = make_table(&state, 16).await;
    let reservation = state
        .reservations
        .create(reservation_for(&table, now_millis() + 120 * MIN))
        .await
        .expect("reservation");

    let detail = state
        .reservations
        .find_by_id(&reservation.id.expect("reservation id"))
        .await
        .expect("detailed read");
    assert_eq!(detail.table.table_no, 16);
    assert_eq!(detail.table.status, TableStatus::Booked);

    let all = state.reservations.find_all().await.expect("list");
    assert!(all.iter().any(|r| r.table.table_no == 16));
}

#[tokio::test]
async fn table_registry_rejects_bad_numbers_and_duplicates() {
    let state = state().await;

    let zero = state.tables.create(DiningTableCreate { table_no: 0 }).await;
    assert!(matches!(zero, Err(AppError::Validation(_))));

    make_table(&state, 20).await;
    let dup = state.tables.create(DiningTableCreate { table_no: 20 }).await;
    assert!(matches!(dup, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn receipt_is_written_under_the_work_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::with_overrides(
        dir.path().to_string_lossy().to_string(),
        Decimal::from(25),
    );
    let state = AppState::initialize_in_memory(config)
        .await
        .expect("state");

    let table = make_table(&state, 13).await;
    let menu = make_menu_item(&state, "Mocha", 28).await;
    let order = state
        .orders
        .create(order_for(&table, &menu, 2))
        .await
        .expect("order");
    let order_id = order.id.expect("order id");

    let path = state
        .orders
        .render_receipt(&order_id)
        .await
        .expect("receipt");
    let content = std::fs::read_to_string(&path).expect("read receipt");
    assert!(content.contains("Mocha"));
    assert!(content.contains("TOTAL: 56"));
    assert!(content.contains("Walk-in"));
}

struct FailingMailer;

#[async_trait]
impl InvoiceMailer for FailingMailer {
    async fn send_invoice(&self, _to: &str, _invoice: &Invoice) -> AppResult<()> {
        Err(AppError::internal("smtp down"))
    }
}

#[tokio::test]
async fn mail_failure_degrades_the_outcome_without_rollback() {
    let db = DbService::open_in_memory().await.expect("db").db;
    let tables = TableService::new(db.clone());
    let reservations = ReservationService::new(
        db,
        TableLocks::new(),
        Arc::new(FailingMailer),
        Decimal::from(25),
    );

    let table = tables
        .create(DiningTableCreate { table_no: 30 })
        .await
        .expect("table")
        .id
        .expect("table id");
    let reservation = reservations
        .create(ReservationCreate {
            name: "Bob".to_string(),
            phone: "0800000000".to_string(),
            email: Some("bob@example.com".to_string()),
            table,
            reserved_at: now_millis() + 120 * MIN,
        })
        .await
        .expect("reservation");

    let outcome = reservations
        .confirm(&reservation.id.expect("reservation id"))
        .await
        .expect("confirmation survives mail failure");
    assert_eq!(outcome.delivery, InvoiceDelivery::Failed);
    assert_eq!(outcome.reservation.status, ReservationStatus::Paid);
    assert_eq!(outcome.invoice.amount_paid, Decimal::from(25));
}
