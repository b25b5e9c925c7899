//! Integration tests for the controller's state transitions, driven
//! through the scripted mock driver.

use std::sync::Arc;
use tokio::sync::Notify;

use posprint_desktop::controller::{ControllerAction, PrinterController};
use posprint_desktop::printer::{DeviceDescriptor, MockPrinter, PrintOptions};
use posprint_desktop::state::{AppState, NoticeKind};

fn device(name: &str, address: &str) -> DeviceDescriptor {
    DeviceDescriptor {
        name: Some(name.to_string()),
        address: address.to_string(),
    }
}

fn controller_on(state: Arc<AppState>, mock: MockPrinter) -> (PrinterController, Arc<MockPrinter>) {
    let driver = Arc::new(mock);
    let controller = PrinterController::new(driver.clone(), state);
    (controller, driver)
}

fn controller_with(mock: MockPrinter) -> (PrinterController, Arc<MockPrinter>, Arc<AppState>) {
    let state = AppState::new();
    let (controller, driver) = controller_on(state.clone(), mock);
    (controller, driver, state)
}

#[tokio::test]
async fn initialize_success_sets_flag_and_notice() {
    let (controller, _driver, state) = controller_with(MockPrinter::new());

    controller.handle(ControllerAction::Initialize).await;

    assert!(state.is_initialized());
    let notice = state.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Info);
    assert_eq!(notice.title, "Bluetooth initialized");
}

#[tokio::test]
async fn initialize_failure_leaves_flag_clear() {
    let (controller, _driver, state) = controller_with(MockPrinter::new().with_init_failure());

    controller.handle(ControllerAction::Initialize).await;

    assert!(!state.is_initialized());
    assert_eq!(state.notice().unwrap().kind, NoticeKind::Error);
}

#[tokio::test]
async fn scan_replaces_devices_and_clears_searching() {
    let mock = MockPrinter::new().with_devices(vec![
        device("Printer A", "AA:BB"),
        device("null", "CC:DD"),
    ]);
    let (controller, _driver, state) = controller_with(mock);

    controller.handle(ControllerAction::Scan).await;

    assert!(!state.is_searching());
    assert_eq!(state.devices().len(), 2);
    assert_eq!(state.named_devices().len(), 1);
}

#[tokio::test]
async fn scan_failure_clears_searching_and_notices() {
    let (controller, _driver, state) = controller_with(MockPrinter::new().with_scan_failure());

    controller.handle(ControllerAction::Scan).await;

    assert!(!state.is_searching());
    let notice = state.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.body, "Failed to fetch device list.");
}

#[tokio::test]
async fn empty_scan_keeps_previous_devices_and_clears_searching() {
    let state = AppState::new();
    let (seeded, _driver) = controller_on(
        state.clone(),
        MockPrinter::new().with_devices(vec![device("Printer A", "AA:BB")]),
    );
    seeded.handle(ControllerAction::Scan).await;
    assert_eq!(state.devices().len(), 1);

    let (empty, _driver) = controller_on(state.clone(), MockPrinter::new());
    empty.handle(ControllerAction::Scan).await;

    assert!(!state.is_searching());
    assert_eq!(state.devices().len(), 1);
    let notice = state.notice().unwrap();
    assert_eq!(notice.title, "No devices found");
}

#[tokio::test]
async fn searching_is_set_before_the_driver_call_returns() {
    let gate = Arc::new(Notify::new());
    let (controller, driver, state) =
        controller_with(MockPrinter::new().with_scan_gate(gate.clone()));

    let task = tokio::spawn(async move {
        controller.handle(ControllerAction::Scan).await;
    });

    while !driver.scan_entered() {
        tokio::task::yield_now().await;
    }
    assert!(state.is_searching());
    assert!(state.is_busy());

    gate.notify_one();
    task.await.unwrap();

    assert!(!state.is_searching());
    assert!(!state.is_busy());
}

#[tokio::test]
async fn connect_success_sets_connected_address() {
    let (controller, driver, state) = controller_with(MockPrinter::new());

    controller
        .handle(ControllerAction::Connect {
            address: "AA:BB".into(),
        })
        .await;

    assert_eq!(state.connected().as_deref(), Some("AA:BB"));
    assert_eq!(driver.log().connects, vec!["AA:BB".to_string()]);
    assert_eq!(
        state.notice().unwrap().body,
        "Printer connected to: AA:BB"
    );
}

#[tokio::test]
async fn connect_failure_leaves_address_unchanged() {
    let state = AppState::new();
    let (good, _driver) = controller_on(state.clone(), MockPrinter::new());
    good.handle(ControllerAction::Connect {
        address: "AA:BB".into(),
    })
    .await;

    let (bad, _driver) = controller_on(state.clone(), MockPrinter::new().with_connect_failure());
    bad.handle(ControllerAction::Connect {
        address: "CC:DD".into(),
    })
    .await;

    assert_eq!(state.connected().as_deref(), Some("AA:BB"));
    assert_eq!(state.notice().unwrap().body, "Failed to connect to printer.");
}

#[tokio::test]
async fn print_without_connection_emits_guard_and_skips_driver() {
    let (controller, driver, state) = controller_with(MockPrinter::new());

    controller.handle(ControllerAction::Print).await;

    let notice = state.notice().unwrap();
    assert_eq!(notice.title, "No printer connected");
    assert_eq!(notice.body, "Please connect to a printer first.");
    assert!(driver.log().prints.is_empty());
}

#[tokio::test]
async fn print_sends_fixed_options_and_fresh_document() {
    let (controller, driver, state) = controller_with(MockPrinter::new());

    controller
        .handle(ControllerAction::Connect {
            address: "AA:BB".into(),
        })
        .await;
    controller.handle(ControllerAction::Print).await;

    let log = driver.log();
    assert_eq!(log.prints.len(), 1);
    let (document, options) = &log.prints[0];
    assert_eq!(*options, PrintOptions::default());
    assert!(document.starts_with("<Printout>"));
    assert!(document.contains("Receipt #12345"));
    assert!(document.contains("<Cut />"));
    assert_eq!(state.notice().unwrap().body, "Printed successfully.");
}

#[tokio::test]
async fn print_failure_keeps_connection_and_notices() {
    let (controller, _driver, state) = controller_with(MockPrinter::new().with_print_failure());

    controller
        .handle(ControllerAction::Connect {
            address: "AA:BB".into(),
        })
        .await;
    controller.handle(ControllerAction::Print).await;

    assert_eq!(state.connected().as_deref(), Some("AA:BB"));
    assert_eq!(state.notice().unwrap().body, "Failed to print.");
}

#[tokio::test]
async fn connected_is_only_set_by_successful_connect() {
    let mock = MockPrinter::new().with_devices(vec![device("Printer A", "AA:BB")]);
    let (controller, _driver, state) = controller_with(mock);

    controller.handle(ControllerAction::Initialize).await;
    controller.handle(ControllerAction::Scan).await;
    controller.handle(ControllerAction::Print).await;
    assert!(state.connected().is_none());

    controller
        .handle(ControllerAction::Connect {
            address: "AA:BB".into(),
        })
        .await;
    assert_eq!(state.connected().as_deref(), Some("AA:BB"));
}
