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

//! BlueZ-backed printer driver.
//!
//! Acts as a BLE central: discovers nearby devices, connects to the chosen
//! printer, and writes the rendered receipt to its serial-print
//! characteristic. The markup itself is interpreted by the printer
//! firmware, not here.

use async_trait::async_trait;
use bluer::gatt::remote::Characteristic;
use bluer::{Adapter, AdapterEvent, Address, Device, Session};
use futures::{pin_mut, StreamExt};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::driver::{DeviceDescriptor, PrintOptions, PrinterDriver, PrinterError};
use crate::config::PrinterConfig;

/// BlueZ session and adapter, created by `initialize`.
struct Stack {
    _session: Session,
    adapter: Adapter,
}

/// GATT handle of the connected printer.
struct ConnectedPrinter {
    address: Address,
    write_char: Characteristic,
}

/// BLE central driver for serial receipt printers.
pub struct BlePrinter {
    scan_window: Duration,
    config: PrinterConfig,
    stack: Mutex<Option<Stack>>,
    connected: Mutex<Option<ConnectedPrinter>>,
}

impl BlePrinter {
    pub fn new(scan_window: Duration, config: PrinterConfig) -> Self {
        Self {
            scan_window,
            config,
            stack: Mutex::new(None),
            connected: Mutex::new(None),
        }
    }

    /// Locate the printer's writable characteristic, preferring the
    /// configured service/characteristic pair and falling back to the
    /// first writable one the device exposes.
    async fn find_write_characteristic(
        &self,
        device: &Device,
    ) -> Result<Characteristic, PrinterError> {
        let mut fallback = None;

        for service in device
            .services()
            .await
            .map_err(|e| PrinterError::ConnectFailed(e.to_string()))?
        {
            let service_uuid = service
                .uuid()
                .await
                .map_err(|e| PrinterError::ConnectFailed(e.to_string()))?;

            for characteristic in service
                .characteristics()
                .await
                .map_err(|e| PrinterError::ConnectFailed(e.to_string()))?
            {
                let flags = characteristic
                    .flags()
                    .await
                    .map_err(|e| PrinterError::ConnectFailed(e.to_string()))?;
                if !(flags.write || flags.write_without_response) {
                    continue;
                }

                let char_uuid = characteristic
                    .uuid()
                    .await
                    .map_err(|e| PrinterError::ConnectFailed(e.to_string()))?;
                if service_uuid == self.config.service_uuid
                    && char_uuid == self.config.characteristic_uuid
                {
                    debug!("Found printer characteristic {}", char_uuid);
                    return Ok(characteristic);
                }

                if fallback.is_none() {
                    fallback = Some(characteristic);
                }
            }
        }

        match fallback {
            Some(characteristic) => {
                warn!(
                    "Printer characteristic {} not found, using first writable one",
                    self.config.characteristic_uuid
                );
                Ok(characteristic)
            }
            None => Err(PrinterError::ConnectFailed(
                "device exposes no writable characteristic".into(),
            )),
        }
    }
}

#[async_trait]
impl PrinterDriver for BlePrinter {
    async fn initialize(&self) -> Result<(), PrinterError> {
        // Create BlueZ session
        let session = Session::new()
            .await
            .map_err(|e| PrinterError::Unavailable(e.to_string()))?;

        // Get the default adapter
        let adapter = session
            .default_adapter()
            .await
            .map_err(|e| PrinterError::Unavailable(e.to_string()))?;
        info!("Using Bluetooth adapter: {}", adapter.name());

        // Ensure adapter is powered on
        if !adapter
            .is_powered()
            .await
            .map_err(|e| PrinterError::Unavailable(e.to_string()))?
        {
            info!("Powering on Bluetooth adapter...");
            adapter
                .set_powered(true)
                .await
                .map_err(|e| PrinterError::Unavailable(e.to_string()))?;
        }

        *self.stack.lock().await = Some(Stack {
            _session: session,
            adapter,
        });
        info!("Bluetooth initialized");
        Ok(())
    }

    async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, PrinterError> {
        let stack = self.stack.lock().await;
        let stack = stack
            .as_ref()
            .ok_or_else(|| PrinterError::Unavailable("bluetooth not initialized".into()))?;

        info!("Scanning for devices ({:?} window)...", self.scan_window);
        let discover = stack
            .adapter
            .discover_devices()
            .await
            .map_err(|e| PrinterError::ScanFailed(e.to_string()))?;
        pin_mut!(discover);

        let window = sleep(self.scan_window);
        tokio::pin!(window);

        let mut addresses: Vec<Address> = Vec::new();
        loop {
            tokio::select! {
                _ = &mut window => break,
                event = discover.next() => match event {
                    Some(AdapterEvent::DeviceAdded(address)) => {
                        if !addresses.contains(&address) {
                            addresses.push(address);
                        }
                    }
                    Some(_) => {}
                    None => break,
                }
            }
        }

        let mut devices = Vec::new();
        for address in addresses {
            let device = stack
                .adapter
                .device(address)
                .map_err(|e| PrinterError::ScanFailed(e.to_string()))?;
            let name = device.name().await.ok().flatten();
            debug!(
                "Discovered {} ({})",
                name.as_deref().unwrap_or("<unnamed>"),
                address
            );
            devices.push(DeviceDescriptor {
                name,
                address: address.to_string(),
            });
        }

        info!("Scan finished: {} device(s)", devices.len());
        Ok(devices)
    }

    async fn connect(&self, address: &str) -> Result<(), PrinterError> {
        let stack = self.stack.lock().await;
        let stack = stack
            .as_ref()
            .ok_or_else(|| PrinterError::Unavailable("bluetooth not initialized".into()))?;

        let parsed: Address = address
            .parse()
            .map_err(|_| PrinterError::ConnectFailed(format!("invalid device address: {address}")))?;

        let device = stack
            .adapter
            .device(parsed)
            .map_err(|e| PrinterError::ConnectFailed(e.to_string()))?;

        if !device
            .is_connected()
            .await
            .map_err(|e| PrinterError::ConnectFailed(e.to_string()))?
        {
            device
                .connect()
                .await
                .map_err(|e| PrinterError::ConnectFailed(e.to_string()))?;
        }
        info!("Connected to {}", parsed);

        let write_char = self.find_write_characteristic(&device).await?;
        *self.connected.lock().await = Some(ConnectedPrinter {
            address: parsed,
            write_char,
        });
        Ok(())
    }

    async fn print(&self, document: &str, options: &PrintOptions) -> Result<(), PrinterError> {
        let connected = self.connected.lock().await;
        let printer = connected.as_ref().ok_or(PrinterError::NotConnected)?;

        if !options.encoding.eq_ignore_ascii_case("utf-8") {
            warn!(
                "Unsupported encoding {:?}, sending UTF-8 bytes",
                options.encoding
            );
        }

        let payload = document.as_bytes();
        debug!(
            "Writing {} bytes to {} in chunks of {}",
            payload.len(),
            printer.address,
            self.config.chunk_len
        );
        for chunk in payload.chunks(self.config.chunk_len.max(1)) {
            printer
                .write_char
                .write(chunk)
                .await
                .map_err(|e| PrinterError::PrintFailed(e.to_string()))?;
        }

        info!("Receipt sent to {}", printer.address);
        Ok(())
    }
}
