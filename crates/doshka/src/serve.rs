// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `doshka serve` command implementation.
//!
//! Wires the SQLite listing store, the Telegram gateway, and the dialogue
//! controller together, starts the retention sweeper, and runs the
//! sequential event loop until a shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use doshka_config::model::DoshkaConfig;
use doshka_core::{DoshkaError, ListingStore};
use doshka_dialog::DialogController;
use doshka_storage::SqliteListingStore;
use doshka_telegram::TelegramGateway;
use tracing::{debug, error, info, warn};

use crate::shutdown;

/// How often the retention sweeper runs. The first sweep happens at
/// startup so a backlog from downtime is cleared immediately.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Runs the `doshka serve` command.
pub async fn run_serve(config: DoshkaConfig) -> Result<(), DoshkaError> {
    init_tracing(&config.bot.log_level);

    info!("starting doshka serve");

    // Initialize storage (runs migrations).
    let store = Arc::new(SqliteListingStore::open(&config.storage).await?);

    // Initialize the Telegram gateway and start long polling.
    let mut gateway = TelegramGateway::new(&config.telegram).map_err(|e| {
        error!(error = %e, "failed to initialize Telegram gateway");
        eprintln!(
            "error: Telegram bot token required. Set telegram.bot_token in \
             doshka.toml or the DOSHKA_TELEGRAM_BOT_TOKEN environment variable."
        );
        e
    })?;
    gateway.connect();
    let gateway = Arc::new(gateway);

    // Install signal handler.
    let cancel = shutdown::install_signal_handler();

    // Spawn the retention sweeper. SQLite has no TTL index; expiry is this
    // task's job, on an interval far shorter than the retention window.
    {
        let sweep_store = store.clone();
        let retention = config.board.retention();
        let sweep_cancel = cancel.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        match sweep_store.purge_expired(retention).await {
                            Ok(0) => debug!("retention sweep removed nothing"),
                            Ok(removed) => {
                                info!(removed, "retention sweep removed expired listings");
                            }
                            Err(e) => {
                                warn!(error = %e, "retention sweep failed (non-fatal)");
                            }
                        }
                    }
                    _ = sweep_cancel.cancelled() => {
                        info!("retention sweeper shutting down");
                        break;
                    }
                }
            }
        });
        info!(
            retention_days = config.board.retention_days,
            "retention sweeper started"
        );
    }

    // Build the dialogue controller and run the event loop. Events are
    // handled to completion one at a time, which gives per-conversation
    // ordering without any further locking.
    let mut controller = DialogController::new(store.clone(), gateway.clone(), &config);
    info!(bot_name = config.bot.name.as_str(), "dialogue controller running");

    loop {
        tokio::select! {
            event = gateway.next_event() => {
                match event {
                    Ok(event) => controller.handle_event(event).await,
                    Err(e) => {
                        error!(error = %e, "gateway receive error");
                        break;
                    }
                }
            }
            _ = cancel.cancelled() => {
                info!("shutdown signal received, stopping event loop");
                break;
            }
        }
    }

    // Flush storage.
    store.close().await?;

    info!("doshka serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber from the configured log level,
/// letting `RUST_LOG` override when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives = [
            "doshka",
            "doshka_config",
            "doshka_core",
            "doshka_storage",
            "doshka_telegram",
            "doshka_dialog",
        ]
        .map(|krate| format!("{krate}={log_level}"))
        .join(",");
        EnvFilter::new(format!("{directives},warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
