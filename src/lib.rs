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

//! PosPrint Desktop
//!
//! A small terminal application that discovers Bluetooth LE receipt
//! printers, connects to one, and sends it a demo receipt.

pub mod config;
pub mod controller;
pub mod printer;
pub mod receipt;
pub mod state;
pub mod ui;

pub use controller::{ControllerAction, PrinterController};
pub use state::{AppState, Notice, NoticeKind};
