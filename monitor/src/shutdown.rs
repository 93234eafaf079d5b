//! Cooperative shutdown for the daemon's long-running tasks.
//!
//! A single [`ShutdownController`] hands out [`ShutdownSignal`]s; each loop
//! selects on its signal alongside its own work. The trigger can come from
//! an OS signal or from code (tests trigger it directly).

use tokio::sync::broadcast;

/// The owning side: triggers shutdown and hands out signals.
pub struct ShutdownController {
    tx: broadcast::Sender<()>,
}

/// One task's view of the shutdown state.
pub struct ShutdownSignal {
    rx: broadcast::Receiver<()>,
}

impl ShutdownSignal {
    /// Resolves once shutdown has been triggered. Cancel-safe, so it can sit
    /// in a `select!` arm across loop iterations.
    pub async fn triggered(&mut self) {
        // A closed channel means the controller is gone, which is shutdown too.
        let _ = self.rx.recv().await;
    }
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Hand out a signal for one task. Subscribe before triggering.
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Trigger shutdown. Idempotent; every outstanding signal resolves.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Block until the process receives SIGINT or SIGTERM, then trigger.
    pub async fn wait_for_signal(&self) {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut interrupt =
                signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
            let mut terminate =
                signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
            let name = tokio::select! {
                _ = interrupt.recv() => "SIGINT",
                _ = terminate.recv() => "SIGTERM",
            };
            tracing::info!(signal = name, "shutdown requested");
        }

        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown requested");
        }

        self.trigger();
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::time::timeout;

    #[tokio::test]
    async fn signal_stays_pending_until_triggered() {
        let controller = ShutdownController::new();
        let mut signal = controller.subscribe();

        let premature = timeout(Duration::from_millis(20), signal.triggered()).await;
        assert!(premature.is_err(), "signal fired before any trigger");

        controller.trigger();
        timeout(Duration::from_secs(1), signal.triggered())
            .await
            .expect("signal must resolve after trigger");
    }

    #[tokio::test]
    async fn one_trigger_releases_every_subscriber() {
        let controller = ShutdownController::new();
        let mut first = controller.subscribe();
        let mut second = controller.subscribe();

        controller.trigger();

        timeout(Duration::from_secs(1), first.triggered())
            .await
            .expect("first subscriber must resolve");
        timeout(Duration::from_secs(1), second.triggered())
            .await
            .expect("second subscriber must resolve");
    }

    #[tokio::test]
    async fn dropping_the_controller_counts_as_shutdown() {
        let controller = ShutdownController::new();
        let mut signal = controller.subscribe();

        drop(controller);

        timeout(Duration::from_secs(1), signal.triggered())
            .await
            .expect("orphaned signals must not hang forever");
    }
}
