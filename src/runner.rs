use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::account::Account;
use crate::config::TimingConfig;
use crate::display;
use crate::eventlog::{EventKind, EventLog};

/// Liveness pings per sequence.
pub const LIVENESS_PINGS: u32 = 4;

struct AccountTasks {
    connect: JoinHandle<()>,
    liveness: JoinHandle<()>,
}

/// Owns the per-account timer tasks and the token that stops them.
///
/// Every account gets two independent tasks: a connect loop that runs the
/// connect sequence immediately and then once per period, and a liveness loop
/// whose first sequence fires one period after startup. The loops share
/// nothing across accounts except the event log.
pub struct Runner {
    shutdown: CancellationToken,
    tasks: Vec<AccountTasks>,
}

impl Runner {
    /// Spawn the timer tasks for every account. Accounts start immediately
    /// and concurrently; nothing is serialized across accounts.
    pub fn launch(accounts: Vec<Account>, log: Arc<EventLog>, timing: &TimingConfig) -> Self {
        let shutdown = CancellationToken::new();
        let mut tasks = Vec::with_capacity(accounts.len());

        for account in accounts {
            let account = Arc::new(account);

            let connect = tokio::spawn(connect_loop(
                account.clone(),
                log.clone(),
                timing.connect_interval(),
                shutdown.child_token(),
            ));
            let liveness = tokio::spawn(liveness_loop(
                account,
                log.clone(),
                timing.liveness_interval(),
                timing.liveness_delay(),
                shutdown.child_token(),
            ));

            tasks.push(AccountTasks { connect, liveness });
        }

        Self { shutdown, tasks }
    }

    /// Number of accounts being driven.
    pub fn account_count(&self) -> usize {
        self.tasks.len()
    }

    /// Cancel every task and wait for all of them to wind down.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        let handles: Vec<JoinHandle<()>> = self
            .tasks
            .into_iter()
            .flat_map(|pair| [pair.connect, pair.liveness])
            .collect();
        for result in futures_util::future::join_all(handles).await {
            if let Err(e) = result {
                warn!("account task ended abnormally: {e}");
            }
        }
    }
}

/// Connect-sequence driver: first tick fires immediately, then once per
/// `period`. A slow sequence delays the next tick rather than stacking up.
async fn connect_loop(
    account: Arc<Account>,
    log: Arc<EventLog>,
    period: Duration,
    shutdown: CancellationToken,
) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = connect_sequence(&account, &log) => {}
                }
            }
        }
    }
    debug!("connect loop stopped for {}", account.label());
}

/// Liveness-sequence driver: the first sequence fires one full `period`
/// after startup, matching a freshly armed repeating timer.
async fn liveness_loop(
    account: Arc<Account>,
    log: Arc<EventLog>,
    period: Duration,
    delay: Duration,
    shutdown: CancellationToken,
) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = liveness_sequence(&account, &log, delay) => {}
                }
            }
        }
    }
    debug!("liveness loop stopped for {}", account.label());
}

/// One connect cycle: resolve the egress IP, then connect, stats-check and
/// info-refresh in order. A missing IP skips all three calls; the failed
/// fetch has already produced the cycle's single error event. The stats
/// display repaints either way.
pub async fn connect_sequence(account: &Account, log: &EventLog) {
    match account.public_ip(log).await {
        Some(ip) => {
            account.connect(&ip, log).await;
            account.check_stats(log).await;
            account.refresh_account_info(log).await;
        }
        None => warn!("{}: no public IP, skipping connect cycle", account.label()),
    }
    display::render(account);
}

/// One liveness cycle: a fixed burst of pings spaced by `delay`.
pub async fn liveness_sequence(account: &Account, log: &EventLog, delay: Duration) {
    log.record(
        EventKind::Info,
        &account.label(),
        &format!("Running liveness sequence for: {}", account.identifier()),
    );
    for ping in 0..LIVENESS_PINGS {
        if ping > 0 {
            time::sleep(delay).await;
        }
        account.check_liveness(log).await;
    }
}
