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

//! Scripted printer driver for tests and hardware-free demo runs.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::info;

use super::driver::{DeviceDescriptor, PrintOptions, PrinterDriver, PrinterError};

/// Record of the calls a [`MockPrinter`] has served.
#[derive(Debug, Clone, Default)]
pub struct MockLog {
    pub inits: usize,
    pub scans: usize,
    pub connects: Vec<String>,
    pub prints: Vec<(String, PrintOptions)>,
}

/// In-memory printer driver with scripted results.
pub struct MockPrinter {
    devices: Vec<DeviceDescriptor>,
    fail_init: bool,
    fail_scan: bool,
    fail_connect: bool,
    fail_print: bool,
    scan_gate: Option<Arc<Notify>>,
    scan_entered: AtomicBool,
    log: Mutex<MockLog>,
}

impl MockPrinter {
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
            fail_init: false,
            fail_scan: false,
            fail_connect: false,
            fail_print: false,
            scan_gate: None,
            scan_entered: AtomicBool::new(false),
            log: Mutex::new(MockLog::default()),
        }
    }

    /// A mock populated with a couple of plausible printers, used by the
    /// `--mock` demo mode.
    pub fn demo() -> Self {
        Self::new().with_devices(vec![
            DeviceDescriptor {
                name: Some("POS-5890K".into()),
                address: "66:22:7C:91:04:A1".into(),
            },
            DeviceDescriptor {
                name: Some("null".into()),
                address: "10:52:1C:68:D3:0B".into(),
            },
            DeviceDescriptor {
                name: Some("MTP-II".into()),
                address: "02:3B:57:8E:21:F4".into(),
            },
        ])
    }

    pub fn with_devices(mut self, devices: Vec<DeviceDescriptor>) -> Self {
        self.devices = devices;
        self
    }

    pub fn with_init_failure(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub fn with_scan_failure(mut self) -> Self {
        self.fail_scan = true;
        self
    }

    pub fn with_connect_failure(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    pub fn with_print_failure(mut self) -> Self {
        self.fail_print = true;
        self
    }

    /// Make `list_devices` block until the gate is notified, so callers can
    /// observe in-flight state.
    pub fn with_scan_gate(mut self, gate: Arc<Notify>) -> Self {
        self.scan_gate = Some(gate);
        self
    }

    /// Whether a `list_devices` call has reached the driver.
    pub fn scan_entered(&self) -> bool {
        self.scan_entered.load(Ordering::SeqCst)
    }

    pub fn log(&self) -> MockLog {
        self.log.lock().clone()
    }
}

impl Default for MockPrinter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PrinterDriver for MockPrinter {
    async fn initialize(&self) -> Result<(), PrinterError> {
        self.log.lock().inits += 1;
        if self.fail_init {
            return Err(PrinterError::Unavailable("scripted failure".into()));
        }
        Ok(())
    }

    async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, PrinterError> {
        self.log.lock().scans += 1;
        self.scan_entered.store(true, Ordering::SeqCst);
        if let Some(gate) = &self.scan_gate {
            gate.notified().await;
        }
        if self.fail_scan {
            return Err(PrinterError::ScanFailed("scripted failure".into()));
        }
        Ok(self.devices.clone())
    }

    async fn connect(&self, address: &str) -> Result<(), PrinterError> {
        self.log.lock().connects.push(address.to_string());
        if self.fail_connect {
            return Err(PrinterError::ConnectFailed("scripted failure".into()));
        }
        Ok(())
    }

    async fn print(&self, document: &str, options: &PrintOptions) -> Result<(), PrinterError> {
        if self.fail_print {
            return Err(PrinterError::PrintFailed("scripted failure".into()));
        }
        info!("Mock print: {} bytes", document.len());
        self.log
            .lock()
            .prints
            .push((document.to_string(), options.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_calls() {
        let mock = MockPrinter::new().with_devices(vec![DeviceDescriptor {
            name: Some("Printer A".into()),
            address: "AA:BB".into(),
        }]);

        mock.initialize().await.unwrap();
        let devices = mock.list_devices().await.unwrap();
        mock.connect("AA:BB").await.unwrap();
        mock.print("<Printout></Printout>", &PrintOptions::default())
            .await
            .unwrap();

        assert_eq!(devices.len(), 1);
        let log = mock.log();
        assert_eq!(log.inits, 1);
        assert_eq!(log.scans, 1);
        assert_eq!(log.connects, vec!["AA:BB".to_string()]);
        assert_eq!(log.prints.len(), 1);
    }

    #[tokio::test]
    async fn scripted_failures_surface() {
        let mock = MockPrinter::new().with_connect_failure();
        let err = mock.connect("AA:BB").await.unwrap_err();
        assert!(matches!(err, PrinterError::ConnectFailed(_)));
    }
}
