use anyhow::{Context, Result};
use std::path::PathBuf;
use tether::{Tether, build_from_config};
use veritas_common::observability::{LogConfig, LogFormat, init_logging};
use veritas_config::{VeritasConfig, VeritasConfigLoader, default_config_paths};
mod tether;

/// Explicit config file; when unset the default locations are tried.
const CONFIG_ENV: &str = "VERITAS_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    // 1) Load config (env wins)
    let cfg = load_config()?;

    // 2) Logging goes to a file; the terminal belongs to the TUI.
    let log_path = init_logging(log_config(&cfg)?)?;
    tracing::info!(
        log = %log_path.display(),
        model = %cfg.llm.model,
        "veritas.start"
    );

    let mut tether = Tether::new();
    build_from_config(&mut tether, &cfg)?;

    let outcome = tether.run().await;
    tracing::info!(ok = outcome.is_ok(), "veritas.stop");
    outcome
}

fn load_config() -> Result<VeritasConfig> {
    let loader = VeritasConfigLoader::new();
    let loader = match std::env::var_os(CONFIG_ENV) {
        Some(path) => loader.with_file(PathBuf::from(path)),
        None => match default_config_paths().into_iter().find(|p| p.exists()) {
            Some(path) => loader.with_file(path),
            None => loader,
        },
    };
    loader.load().context("failed to load configuration")
}

fn log_config(cfg: &VeritasConfig) -> Result<LogConfig> {
    let format = cfg
        .logging
        .format
        .parse::<LogFormat>()
        .map_err(anyhow::Error::msg)
        .context("invalid logging.format")?;

    Ok(LogConfig {
        app_name: "veritas",
        log_dir: cfg.logging.dir.as_ref().map(PathBuf::from),
        emit_stderr: false,
        format,
        default_filter: cfg.logging.filter.clone(),
    })
}
