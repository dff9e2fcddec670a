//! JSON file logging.
//!
//! The server's stdio is owned by the LSP transport, so log records go to a
//! file under the interlis-ls data directory instead.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::JsonFields;
use tracing_subscriber::prelude::*;

use crate::config;

/// Installs the global subscriber writing JSON records to the interlis-ls
/// log file. Returns the resolved path for the startup log line.
pub fn init() -> anyhow::Result<PathBuf> {
    let log_path = config::log_path();
    let log_file = open_log_file(&log_path)?;

    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(log_file)
        .fmt_fields(JsonFields::default());

    // Use RUST_LOG if set, otherwise default to INFO
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .init();

    Ok(log_path)
}

fn open_log_file(path: &Path) -> anyhow::Result<File> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).with_context(|| {
            format!(
                "failed to create interlis-ls data directory {}",
                dir.display()
            )
        })?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open interlis-ls log file {}", path.display()))
}
