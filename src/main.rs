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

//! PosPrint Desktop Application

use anyhow::Result;
use clap::Parser;
use std::fs::File;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use posprint_desktop::config::Config;
use posprint_desktop::controller::{ControllerAction, PrinterController};
use posprint_desktop::printer::{BlePrinter, MockPrinter, PrinterDriver};
use posprint_desktop::state::AppState;
use posprint_desktop::ui;

/// Bluetooth LE receipt printer demo.
#[derive(Debug, Parser)]
#[command(name = "posprint-desktop", version, about)]
struct Args {
    /// Run against a scripted in-memory printer instead of BlueZ.
    #[arg(long)]
    mock: bool,

    /// Override the configured device discovery window.
    #[arg(long)]
    scan_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::load()?;

    // The UI owns the terminal, so logs go to a file under the data dir.
    let log_file = File::create(config.data_dir.join("posprint.log"))?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(log_file))
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("posprint_desktop=info".parse()?),
        )
        .init();

    info!(
        "Starting PosPrint Desktop v{}...",
        env!("CARGO_PKG_VERSION")
    );

    let scan_secs = args.scan_secs.unwrap_or(config.bluetooth.scan_secs);
    let driver: Arc<dyn PrinterDriver> = if args.mock {
        info!("Using mock printer driver");
        Arc::new(MockPrinter::demo())
    } else {
        Arc::new(BlePrinter::new(
            Duration::from_secs(scan_secs),
            config.printer.clone(),
        ))
    };

    // Create application state
    let state = AppState::new();

    // Controller task: drains actions one at a time, so no two driver
    // calls are ever in flight concurrently.
    let (action_tx, mut action_rx) = mpsc::channel::<ControllerAction>(16);
    let controller = PrinterController::new(driver, state.clone());
    tokio::spawn(async move {
        while let Some(action) = action_rx.recv().await {
            controller.handle(action).await;
        }
    });

    ui::run(state, action_tx).await?;

    info!("PosPrint Desktop stopped");
    Ok(())
}
