//! Reference host for the Reservoir resource economy.
//!
//! This binary plays the part of a chat front end: it reads one command
//! per line from stdin, turns `turn <speaker>` lines into turn-trigger
//! events, dispatches everything else to the economy, and prints both
//! command results and the notifications the economy raises.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `reservoir.yaml` (or `RESERVOIR_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Open the JSON state file
//! 4. Build the economy with a channel-backed notifier
//! 5. Register the turn callback
//! 6. Run the command loop until `quit` or end of input

mod commands;
mod error;
mod notifier;
mod session;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use reservoir_core::{Notification, ReservoirConfig, ResourceEconomy};
use reservoir_db::JsonFileStore;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::commands::Command;
use crate::error::HostError;
use crate::notifier::{ChannelNotifier, format_notification};
use crate::session::Session;

/// Environment variable naming the configuration file.
const CONFIG_PATH_ENV: &str = "RESERVOIR_CONFIG";

/// Configuration file used when `RESERVOIR_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "reservoir.yaml";

/// Application entry point for the host.
///
/// # Errors
///
/// Returns an error if configuration, the state file, or stdin fails.
#[tokio::main]
async fn main() -> Result<(), HostError> {
    // 1. Load configuration.
    let (config, config_path, found) = load_config()?;

    // 2. Initialize structured logging. Logs go to stderr so command
    //    output on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("reservoir-host starting");
    if found {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        notifications = config.settings.enable_notifications,
        production_mode = ?config.settings.production_mode,
        base_yield = config.settings.base_yield_per_turn,
        state_path = %config.storage.path.display(),
        "Settings resolved"
    );

    // 3. Open the state file.
    let store = JsonFileStore::open(&config.storage.path)?;

    // 4-5. Economy, notifier, and turn callback.
    let (notifier, mut notifications) = ChannelNotifier::channel();
    let economy = Rc::new(RefCell::new(ResourceEconomy::new(
        store,
        notifier,
        config.settings,
    )));
    let mut session = Session::new(economy);

    // 6. Command loop.
    println!("reservoir ready; type `help` for commands");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match commands::parse(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => {
                if let Some(reply) = session.execute(command) {
                    println!("{reply}");
                }
            }
            Err(err) => {
                warn!(input = %line, error = %err, "Unparseable command");
                println!("error: {err}");
            }
        }
        print_notifications(&mut notifications);
    }

    if let Some(id) = session.economy().borrow().character() {
        info!(character = %id, "Last bound character");
    }
    info!("reservoir-host stopped");
    Ok(())
}

/// Print every queued notification.
fn print_notifications(rx: &mut UnboundedReceiver<Notification>) {
    while let Ok(notification) = rx.try_recv() {
        println!("{}", format_notification(&notification, &chrono::Local::now()));
    }
}

/// Load configuration from `RESERVOIR_CONFIG` or `reservoir.yaml`.
///
/// A missing file is not an error: the defaults are used, still honouring
/// environment overrides. Returns the config, the path consulted, and
/// whether the file existed.
fn load_config() -> Result<(ReservoirConfig, PathBuf, bool), HostError> {
    let config_path = std::env::var(CONFIG_PATH_ENV)
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if config_path.exists() {
        let config = ReservoirConfig::from_file(&config_path)?;
        Ok((config, config_path, true))
    } else {
        Ok((ReservoirConfig::parse("")?, config_path, false))
    }
}
