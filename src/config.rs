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

//! Configuration module.
//!
//! Handles loading and saving application settings.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// De-facto BLE serial printer service.
pub const DEFAULT_SERVICE_UUID: Uuid = Uuid::from_u128(0x000018f0_0000_1000_8000_00805f9b34fb);

/// Writable characteristic carrying print data.
pub const DEFAULT_WRITE_UUID: Uuid = Uuid::from_u128(0x00002af1_0000_1000_8000_00805f9b34fb);

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory for the log file.
    #[serde(skip)]
    pub data_dir: PathBuf,

    /// Bluetooth settings.
    pub bluetooth: BluetoothConfig,

    /// Printer transport settings.
    pub printer: PrinterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BluetoothConfig {
    /// Device discovery window in seconds.
    pub scan_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterConfig {
    /// GATT service to look for on the printer.
    pub service_uuid: Uuid,

    /// Writable characteristic carrying print data.
    pub characteristic_uuid: Uuid,

    /// Maximum bytes per GATT write.
    pub chunk_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("posprint"),
            bluetooth: BluetoothConfig { scan_secs: 5 },
            printer: PrinterConfig {
                service_uuid: DEFAULT_SERVICE_UUID,
                characteristic_uuid: DEFAULT_WRITE_UUID,
                chunk_len: 180,
            },
        }
    }
}

impl Config {
    /// Load configuration from the user config directory, creating it
    /// with defaults on first run.
    pub fn load() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("posprint");

        std::fs::create_dir_all(&config_dir)?;

        let mut config = Self::load_path(&config_dir.join("config.toml"))?;

        // Set data directory
        config.data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("posprint");
        std::fs::create_dir_all(&config.data_dir)?;

        Ok(config)
    }

    /// Read a config file, writing the defaults if it does not exist.
    pub fn load_path(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            let config = Self::default();
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(path, content)?;
            Ok(config)
        }
    }
}
