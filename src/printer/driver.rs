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

//! Printer driver abstraction.
//!
//! The [`PrinterDriver`] trait is the boundary between the application and
//! whatever actually talks to the printer. The shipped implementations are
//! [`crate::printer::BlePrinter`] (BlueZ) and [`crate::printer::MockPrinter`]
//! (scripted, for tests and `--mock` runs).

use async_trait::async_trait;
use thiserror::Error;

/// Driver error type.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrinterError {
    /// The Bluetooth stack could not be brought up (adapter missing,
    /// Bluetooth disabled, daemon unreachable).
    #[error("bluetooth unavailable: {0}")]
    Unavailable(String),

    /// Device discovery failed.
    #[error("scan failed: {0}")]
    ScanFailed(String),

    /// Connecting to the selected device failed.
    #[error("connect failed: {0}")]
    ConnectFailed(String),

    /// A print was requested with no printer connected.
    #[error("no printer connected")]
    NotConnected,

    /// Transmitting the document failed.
    #[error("print failed: {0}")]
    PrintFailed(String),
}

/// A discovered Bluetooth device, as reported by a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Advertised display name, if the device exposes one.
    pub name: Option<String>,

    /// Opaque device identifier (a MAC address on BlueZ).
    pub address: String,
}

/// Formatting options handed to the driver with every print request.
///
/// This application always sends the same fixed values; see
/// [`PrintOptions::default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    pub beep: bool,
    pub cut: bool,
    pub tailing_line: bool,
    pub encoding: String,
    pub codepage: u8,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            beep: true,
            cut: true,
            tailing_line: true,
            encoding: "UTF-8".to_string(),
            codepage: 0,
        }
    }
}

/// Asynchronous printer capability.
///
/// Every operation is independently fallible; callers are expected to wrap
/// each call in their own recovery boundary.
#[async_trait]
pub trait PrinterDriver: Send + Sync {
    /// Bring up the Bluetooth stack.
    async fn initialize(&self) -> Result<(), PrinterError>;

    /// Discover nearby devices and return them in discovery order.
    async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, PrinterError>;

    /// Connect to the device with the given address.
    async fn connect(&self, address: &str) -> Result<(), PrinterError>;

    /// Transmit a rendered receipt document to the connected printer.
    async fn print(&self, document: &str, options: &PrintOptions) -> Result<(), PrinterError>;
}
