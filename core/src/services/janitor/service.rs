//! Janitor service for periodic removal of expired entries
//!
//! Each pass calls [`Sweep::sweep`] on every registered target in order. A
//! sweep holds one store's lock at a time, so request handling is never
//! stopped across stores.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use warden_shared::JanitorConfig;

use crate::store::Sweep;

/// Sweeps a fixed set of stores
pub struct Janitor {
    targets: Vec<Arc<dyn Sweep>>,
    config: JanitorConfig,
}

impl Janitor {
    pub fn new(targets: Vec<Arc<dyn Sweep>>, config: JanitorConfig) -> Self {
        Self { targets, config }
    }

    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// Names of the swept targets, in sweep order
    pub fn target_names(&self) -> Vec<&'static str> {
        self.targets.iter().map(|target| target.name()).collect()
    }

    /// Run a single pass at `now`
    pub async fn run_once(&self, now: DateTime<Utc>) -> JanitorReport {
        let mut report = JanitorReport {
            ran_at: now,
            removed: Vec::with_capacity(self.targets.len()),
        };

        for target in &self.targets {
            let removed = target.sweep(now).await;
            if removed > 0 {
                debug!(store = target.name(), removed, "Swept expired entries");
            }
            report.removed.push((target.name(), removed));
        }

        report
    }

    /// Start the janitor as a background task
    ///
    /// Returns `None` when the janitor is disabled in configuration.
    pub fn start(self: Arc<Self>) -> Option<JanitorHandle> {
        if !self.config.enabled {
            warn!("Janitor is disabled; expired entries are only removed on read");
            return None;
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let period = Duration::from_secs(self.config.interval_seconds.max(1));

        let handle = tokio::spawn(async move {
            info!(
                interval_seconds = self.config.interval_seconds,
                stores = self.targets.len(),
                "Janitor started"
            );

            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let report = self.run_once(Utc::now()).await;
                        if report.total() > 0 {
                            info!(removed = report.total(), "Janitor pass completed");
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            info!("Janitor shutting down");
                            break;
                        }
                    }
                }
            }
        });

        Some(JanitorHandle {
            shutdown_tx,
            handle,
        })
    }
}

/// Handle to a running janitor task
pub struct JanitorHandle {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl JanitorHandle {
    /// Signal the task to stop and wait for it to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.handle.await {
            error!(error = %e, "Janitor task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Outcome of one janitor pass
#[derive(Debug, Clone)]
pub struct JanitorReport {
    pub ran_at: DateTime<Utc>,
    /// Entries removed per store, in sweep order
    pub removed: Vec<(&'static str, usize)>,
}

impl JanitorReport {
    /// Total entries removed across all stores
    pub fn total(&self) -> usize {
        self.removed.iter().map(|(_, count)| count).sum()
    }

    /// Entries removed from the named store
    pub fn removed_from(&self, name: &str) -> usize {
        self.removed
            .iter()
            .filter(|(store, _)| *store == name)
            .map(|(_, count)| count)
            .sum()
    }
}
