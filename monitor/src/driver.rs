//! Periodic driver — the two background loops of the engine.
//!
//! The sweep loop runs one sweep to completion, then sleeps the configured
//! interval; duration and interval are uncoupled, so a slow sweep delays but
//! never skips or overlaps the next one. The liveness loop pings the store
//! on its own interval and terminates the process on failure: a persistent
//! store outage is fatal by design, with no backoff.

use std::sync::Arc;

use tokio::task::JoinHandle;

use chainwatch_store::TransactionStore;

use crate::config::MonitorConfig;
use crate::shutdown::ShutdownController;
use crate::sweep::Sweeper;

/// Owns the engine's background tasks.
pub struct Monitor {
    sweeper: Arc<Sweeper>,
    store: Arc<dyn TransactionStore>,
    config: MonitorConfig,
    /// Handles for spawned loops (joined during shutdown).
    task_handles: Vec<JoinHandle<()>>,
}

impl Monitor {
    pub fn new(
        sweeper: Arc<Sweeper>,
        store: Arc<dyn TransactionStore>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            sweeper,
            store,
            config,
            task_handles: Vec::new(),
        }
    }

    /// Spawn the sweep and liveness loops. Call once.
    pub fn start(&mut self, shutdown: &ShutdownController) {
        // ── Sweep loop ──────────────────────────────────────────────────
        let sweeper = Arc::clone(&self.sweeper);
        let sweep_interval = self.config.sweep_interval;
        let mut shutdown_rx_sweep = shutdown.subscribe();

        let sweep_handle = tokio::spawn(async move {
            loop {
                match sweeper.run().await {
                    Ok(summary) => {
                        tracing::info!(
                            candidates = summary.candidates,
                            pending = summary.pending,
                            confirmed = summary.confirmed,
                            failed = summary.failed,
                            abandoned = summary.abandoned,
                            errored = summary.errored,
                            skipped = summary.skipped,
                            "sweep complete"
                        );
                    }
                    Err(e) => {
                        tracing::error!("sweep failed to read candidates: {e}");
                    }
                }

                // Sleep starts after the sweep completes; only the sleep is
                // shutdown-interruptible, never an in-flight sweep.
                tokio::select! {
                    biased;
                    _ = shutdown_rx_sweep.triggered() => {
                        tracing::info!("sweep loop shutting down");
                        break;
                    }
                    _ = tokio::time::sleep(sweep_interval) => {}
                }
            }
        });
        self.task_handles.push(sweep_handle);

        // ── Store liveness loop ─────────────────────────────────────────
        let store = Arc::clone(&self.store);
        let liveness_interval = self.config.liveness_interval;
        let mut shutdown_rx_liveness = shutdown.subscribe();

        let liveness_handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(liveness_interval);
            // The immediate first tick doubles as a startup probe.
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx_liveness.triggered() => {
                        tracing::info!("liveness loop shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        if let Err(e) = store.ping().await {
                            tracing::error!("store liveness probe failed, exiting: {e}");
                            std::process::exit(1);
                        }
                    }
                }
            }
        });
        self.task_handles.push(liveness_handle);
    }

    /// Wait for both loops to exit after shutdown was triggered.
    pub async fn join(self) {
        for handle in self.task_handles {
            let _ = handle.await;
        }
    }
}
