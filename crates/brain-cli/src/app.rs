use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use brain_core::{EntityKind, FileBlobStore, Store};

use crate::cli::Cli;
use crate::config::{default_config_path, default_data_dir, BrainConfig, DEFAULT_LOG_FILTER};

pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("BRAIN_CONFIG") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// `--data-dir` / `BRAIN_DATA_DIR`, then the config file, then the XDG default.
pub fn resolve_data_dir(cli: &Cli, config: &BrainConfig) -> anyhow::Result<PathBuf> {
    if let Some(dir) = cli.data_dir.as_deref() {
        return Ok(PathBuf::from(dir));
    }
    if let Some(dir) = config.storage.data_dir.as_deref() {
        return Ok(PathBuf::from(dir));
    }
    default_data_dir()
}

/// Log to stderr, filtered by `BRAIN_LOG` or the configured filter.
pub fn init_logging(config: &BrainConfig) {
    let filter = EnvFilter::try_from_env("BRAIN_LOG")
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Open the file-backed store and run its startup sequence.
pub async fn open_store(cli: &Cli, config: &BrainConfig) -> anyhow::Result<Store> {
    let dir = resolve_data_dir(cli, config)?;
    let blob = FileBlobStore::open(&dir)?;
    let store = Store::new(Arc::new(blob));
    store
        .init()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open store in {}: {}", dir.display(), e))?;
    tracing::debug!(dir = %dir.display(), "store opened");
    Ok(store)
}

pub fn parse_kind(raw: &str) -> anyhow::Result<EntityKind> {
    raw.parse().map_err(|_| {
        let known = EntityKind::ALL
            .iter()
            .map(|kind| kind.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        anyhow::anyhow!("Unknown record kind \"{}\" (expected one of: {})", raw, known)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_data_dir_flag_wins_over_config() {
        let cli = Cli::try_parse_from(["brain", "--data-dir", "/tmp/flag", "init"]).unwrap();
        let mut config = BrainConfig::default();
        config.storage.data_dir = Some("/tmp/config".to_string());
        assert_eq!(resolve_data_dir(&cli, &config).unwrap(), PathBuf::from("/tmp/flag"));
    }

    #[test]
    fn test_parse_kind_lists_choices_on_error() {
        assert_eq!(parse_kind("task").unwrap(), EntityKind::Task);
        let message = parse_kind("gadgets").unwrap_err().to_string();
        assert!(message.contains("finance_categories"));
    }
}
