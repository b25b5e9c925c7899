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

//! Application state management.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::printer::DeviceDescriptor;

/// Android printer libraries report a missing name as the literal string
/// "null"; such entries get no connect affordance.
const NO_NAME_SENTINEL: &str = "null";

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A one-shot user-facing notice, shown as a modal by the UI and
/// dismissed by the next key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub body: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Shared application state.
///
/// Written by the controller task; the UI only reads it, except for
/// guard notices produced at the interaction boundary.
#[derive(Debug)]
pub struct AppState {
    /// Whether the Bluetooth stack has been initialized.
    initialized: RwLock<bool>,

    /// True between scan start and scan completion.
    searching: RwLock<bool>,

    /// True while a controller operation is in flight.
    busy: RwLock<bool>,

    /// Devices returned by the most recent non-empty scan.
    devices: RwLock<Vec<DeviceDescriptor>>,

    /// Address of the connected printer, if any.
    connected: RwLock<Option<String>>,

    /// Pending notice, if any.
    notice: RwLock<Option<Notice>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            initialized: RwLock::new(false),
            searching: RwLock::new(false),
            busy: RwLock::new(false),
            devices: RwLock::new(Vec::new()),
            connected: RwLock::new(None),
            notice: RwLock::new(None),
        }
    }
}

impl AppState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_initialized(&self, initialized: bool) {
        *self.initialized.write() = initialized;
    }

    pub fn is_initialized(&self) -> bool {
        *self.initialized.read()
    }

    pub fn set_searching(&self, searching: bool) {
        *self.searching.write() = searching;
    }

    pub fn is_searching(&self) -> bool {
        *self.searching.read()
    }

    pub fn set_busy(&self, busy: bool) {
        *self.busy.write() = busy;
    }

    pub fn is_busy(&self) -> bool {
        *self.busy.read()
    }

    pub fn set_devices(&self, devices: Vec<DeviceDescriptor>) {
        *self.devices.write() = devices;
    }

    pub fn devices(&self) -> Vec<DeviceDescriptor> {
        self.devices.read().clone()
    }

    /// Devices eligible for a connect affordance: those with a real name.
    pub fn named_devices(&self) -> Vec<DeviceDescriptor> {
        self.devices
            .read()
            .iter()
            .filter(|d| d.name.as_deref().is_some_and(|n| n != NO_NAME_SENTINEL))
            .cloned()
            .collect()
    }

    pub fn set_connected(&self, address: String) {
        *self.connected.write() = Some(address);
    }

    pub fn connected(&self) -> Option<String> {
        self.connected.read().clone()
    }

    pub fn set_notice(&self, notice: Notice) {
        *self.notice.write() = Some(notice);
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice.read().clone()
    }

    pub fn clear_notice(&self) {
        *self.notice.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_devices_skips_sentinel_and_unnamed() {
        let state = AppState::default();
        state.set_devices(vec![
            DeviceDescriptor {
                name: Some("Printer A".into()),
                address: "AA:BB".into(),
            },
            DeviceDescriptor {
                name: Some("null".into()),
                address: "CC:DD".into(),
            },
            DeviceDescriptor {
                name: None,
                address: "EE:FF".into(),
            },
        ]);

        let named = state.named_devices();
        assert_eq!(named.len(), 1);
        assert_eq!(named[0].address, "AA:BB");
    }
}
