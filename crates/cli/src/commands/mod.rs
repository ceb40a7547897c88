//! CLI command implementations.
//!
//! Commands act on a [`Shopper`] opened over a file-backed store and return
//! the JSON document to print. The cart panel opens immediately after an add
//! since there is no panel to animate.

pub mod cart;
pub mod catalog;
pub mod compare;
pub mod wishlist;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use marche_core::ShopperId;
use marche_storefront::persist::{FileStore, PersistError};
use marche_storefront::shopper::{Shopper, ShopperSettings};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("quantity must be at least 1")]
    ZeroQuantity,

    #[error("{0}")]
    Refused(String),
}

/// Open a shopper's stores under `data_dir`.
///
/// # Errors
///
/// Returns `CliError::Persist` if the data directory cannot be created.
pub fn open_shopper(data_dir: &Path, id: ShopperId) -> Result<Shopper, CliError> {
    let store = FileStore::open(data_dir)?;
    tracing::debug!(data_dir = %data_dir.display(), shopper_id = %id, "Opening shopper");
    Ok(Shopper::open(id, Arc::new(store), cli_settings()))
}

/// Shopper settings for one-shot commands.
#[must_use]
pub fn cli_settings() -> ShopperSettings {
    ShopperSettings {
        cart_reveal_delay: Duration::ZERO,
        ..ShopperSettings::default()
    }
}

/// Serialize a command result.
fn to_output(value: &impl Serialize) -> Result<Value, CliError> {
    Ok(serde_json::to_value(value)?)
}

/// Log the notifications a command raised.
fn log_notifications(shopper: &Shopper) {
    for notification in shopper.notifications().items() {
        tracing::info!(kind = ?notification.kind, "{}: {}", notification.title, notification.message);
    }
}

/// Print a command result as pretty JSON on stdout.
///
/// # Errors
///
/// Returns `CliError::Output` if the value cannot be encoded.
#[allow(clippy::print_stdout)]
pub fn emit(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
