//! ExeOS keeper: drives one connect loop and one liveness loop per account
//! until Ctrl+C.
//!
//! Startup reads the line files (tokens, proxies, identifier candidates),
//! asks which identifier to report under, then launches every account
//! concurrently. There are no command-line flags; tuning lives in
//! `config.toml`.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use exeos_keeper::account::Account;
use exeos_keeper::config::{AppConfig, CONFIG_PATH};
use exeos_keeper::creds;
use exeos_keeper::eventlog::{EventKind, EventLog};
use exeos_keeper::runner::Runner;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Failures surface through the console and the event log only; the
    // process always exits cleanly.
    if let Err(e) = run().await {
        error!("keeper failed: {e:#}");
    }
}

async fn run() -> Result<()> {
    let config_path = Path::new(CONFIG_PATH);
    let config = AppConfig::load_or_default(config_path)?;
    if config_path.exists() {
        info!("Loaded config from {}", config_path.display());
    } else {
        info!("No {} found, using defaults", config_path.display());
    }

    let log = Arc::new(EventLog::open(&config.files.event_log)?);

    let accounts = load_accounts(&config, &log)?;
    if accounts.is_empty() {
        log.record(
            EventKind::Error,
            "",
            &format!(
                "No accounts loaded. Please check {} and the identifier selection",
                config.files.tokens
            ),
        );
        log.flush()?;
        return Ok(());
    }

    log.record(
        EventKind::Info,
        "",
        &format!(
            "Starting keeper with {} account(s) using identifier: {}",
            accounts.len(),
            accounts[0].identifier()
        ),
    );

    let runner = Runner::launch(accounts, log.clone(), &config.timing);
    info!(
        "{} account(s) running (connect every {}s, liveness every {}s). Press Ctrl+C to stop.",
        runner.account_count(),
        config.timing.connect_interval().as_secs(),
        config.timing.liveness_interval().as_secs(),
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("Shutdown signal received");

    runner.shutdown().await;
    log.flush()?;
    info!("Event log written to {}", log.path().display());

    Ok(())
}

/// Build one account per token: identifier chosen interactively once and
/// shared, proxies assigned round-robin by token position. Missing tokens or
/// a failed identifier selection yield an empty list after logging.
fn load_accounts(config: &AppConfig, log: &EventLog) -> Result<Vec<Account>> {
    let tokens = creds::read_lines(&config.files.tokens);
    if tokens.is_empty() {
        log.record(
            EventKind::Error,
            "",
            &format!("No tokens found in {}", config.files.tokens),
        );
        return Ok(Vec::new());
    }

    let proxies = creds::load_proxies(&config.files.proxies);
    info!("Loaded {} token(s), {} proxy(ies)", tokens.len(), proxies.len());

    let candidates = creds::read_lines(&config.files.identifiers);
    let identifier = match creds::select_identifier(&candidates) {
        Some(id) => id,
        None => {
            log.record(EventKind::Error, "", "No valid identifier selected");
            return Ok(Vec::new());
        }
    };

    let mut accounts = Vec::with_capacity(tokens.len());
    for (index, token) in tokens.into_iter().enumerate() {
        let proxy = creds::assign_proxy(&proxies, index);
        let account = Account::new(token, identifier.clone(), proxy, &config.http)?;
        let note = match account.proxy() {
            Some(p) => format!(" (Proxy: {})", p.masked_url()),
            None => String::new(),
        };
        log.record(
            EventKind::Info,
            "",
            &format!("Starting Account {}{note}", index + 1),
        );
        accounts.push(account);
    }

    Ok(accounts)
}
