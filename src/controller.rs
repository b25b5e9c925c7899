// Copyright 2026 PosPrint Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Printer controller.
//!
//! Owns the four driver operations and all state transitions. Actions
//! arrive over an mpsc channel and are handled one at a time by a single
//! task, so no two driver calls are ever in flight concurrently. Every
//! driver failure is caught here, logged, and converted into a single
//! user-facing notice.

use chrono::Local;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::printer::{PrintOptions, PrinterDriver};
use crate::receipt::demo_receipt;
use crate::state::{AppState, Notice};

/// Actions the presentation layer can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerAction {
    /// Bring up the Bluetooth stack.
    Initialize,

    /// Discover nearby printer devices.
    Scan,

    /// Connect to a discovered device.
    Connect {
        /// Device address from the most recent scan result.
        address: String,
    },

    /// Send the demo receipt to the connected printer.
    Print,
}

/// Drives the printer through the [`PrinterDriver`] boundary and mutates
/// the shared [`AppState`].
pub struct PrinterController {
    driver: Arc<dyn PrinterDriver>,
    state: Arc<AppState>,
}

impl PrinterController {
    pub fn new(driver: Arc<dyn PrinterDriver>, state: Arc<AppState>) -> Self {
        Self { driver, state }
    }

    /// Handle a single action to completion.
    pub async fn handle(&self, action: ControllerAction) {
        debug!("Handling action: {:?}", action);
        self.state.set_busy(true);
        match action {
            ControllerAction::Initialize => self.initialize().await,
            ControllerAction::Scan => self.scan().await,
            ControllerAction::Connect { address } => self.connect(address).await,
            ControllerAction::Print => self.print().await,
        }
        self.state.set_busy(false);
    }

    async fn initialize(&self) {
        match self.driver.initialize().await {
            Ok(()) => {
                self.state.set_initialized(true);
                info!("Bluetooth initialized");
                self.state.set_notice(Notice::info(
                    "Bluetooth initialized",
                    "You can now search for devices.",
                ));
            }
            Err(e) => {
                error!("Error initializing printer: {}", e);
                self.state.set_notice(Notice::error(
                    "Error",
                    "Failed to initialize Bluetooth, activate bluetooth on your device to continue.",
                ));
            }
        }
    }

    async fn scan(&self) {
        self.state.set_searching(true);
        let result = self.driver.list_devices().await;
        // The searching flag is cleared on every branch, including the
        // empty result.
        self.state.set_searching(false);

        match result {
            Ok(devices) if devices.is_empty() => {
                info!("Scan returned no devices");
                self.state.set_notice(Notice::info(
                    "No devices found",
                    "Please ensure your printer is on and discoverable.",
                ));
            }
            Ok(devices) => {
                info!("Scan returned {} device(s)", devices.len());
                self.state.set_devices(devices);
            }
            Err(e) => {
                error!("Error fetching devices: {}", e);
                self.state
                    .set_notice(Notice::error("Error", "Failed to fetch device list."));
            }
        }
    }

    async fn connect(&self, address: String) {
        match self.driver.connect(&address).await {
            Ok(()) => {
                info!("Printer connected: {}", address);
                self.state.set_notice(Notice::info(
                    "Connected",
                    format!("Printer connected to: {address}"),
                ));
                self.state.set_connected(address);
            }
            Err(e) => {
                error!("Error connecting to printer: {}", e);
                self.state
                    .set_notice(Notice::error("Error", "Failed to connect to printer."));
            }
        }
    }

    async fn print(&self) {
        let Some(address) = self.state.connected() else {
            warn!("Print requested without a connected printer");
            self.state.set_notice(Notice::error(
                "No printer connected",
                "Please connect to a printer first.",
            ));
            return;
        };

        let document = demo_receipt(Local::now()).render();
        let options = PrintOptions::default();
        debug!("Printing {} bytes to {}", document.len(), address);

        match self.driver.print(&document, &options).await {
            Ok(()) => {
                info!("Print completed");
                self.state
                    .set_notice(Notice::info("Print status", "Printed successfully."));
            }
            Err(e) => {
                error!("Error printing: {}", e);
                self.state
                    .set_notice(Notice::error("Print status", "Failed to print."));
            }
        }
    }
}
