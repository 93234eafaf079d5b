//! Concurrent poll sweep.
//!
//! One sweep snapshots the monitored-and-unreviewed candidate set, runs one
//! pass per record through a semaphore-bounded task pool, and returns only
//! after every pass has completed. Per-record failures are logged and
//! confined to the record; the only error a sweep itself can return is a
//! failed candidate snapshot.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;

use chainwatch_store::TransactionStore;

use crate::checker::{is_client_not_found, PassOutcome, TransactionChecker};
use crate::error::MonitorError;
use crate::metrics::MonitorMetrics;

/// Pass-outcome tally for one completed sweep. Observational only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub candidates: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub failed: usize,
    pub abandoned: usize,
    pub errored: usize,
    /// Passes aborted before persisting (registry miss, store write failure).
    pub skipped: usize,
}

/// Runs sweeps over the candidate set with a fixed worker bound.
pub struct Sweeper {
    checker: Arc<TransactionChecker>,
    store: Arc<dyn TransactionStore>,
    metrics: Arc<MonitorMetrics>,
    /// Worker-slot pool; permits cap concurrent passes across one sweep.
    pool: Arc<Semaphore>,
}

impl Sweeper {
    pub fn new(
        checker: Arc<TransactionChecker>,
        store: Arc<dyn TransactionStore>,
        metrics: Arc<MonitorMetrics>,
        workers: usize,
    ) -> Self {
        Self {
            checker,
            store,
            metrics,
            pool: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Run one sweep to completion.
    ///
    /// Blocks until every dispatched pass has finished. An empty candidate
    /// set completes immediately.
    pub async fn run(&self) -> Result<SweepSummary, MonitorError> {
        let started = Instant::now();
        let candidates = self.store.monitored().await?;

        let mut summary = SweepSummary {
            candidates: candidates.len(),
            ..SweepSummary::default()
        };
        self.metrics.candidates.set(candidates.len() as i64);

        let mut handles = Vec::with_capacity(candidates.len());
        for record in candidates {
            let checker = Arc::clone(&self.checker);
            let pool = Arc::clone(&self.pool);
            handles.push(tokio::spawn(async move {
                // The pool semaphore is never closed, so acquire cannot fail.
                let _permit = pool.acquire_owned().await.expect("worker pool closed");
                let result = checker.check(&record).await;
                (record, result)
            }));
        }

        for handle in handles {
            let (record, result) = handle.await.expect("sweep worker panicked");
            self.metrics.passes_total.inc();
            match result {
                Ok(PassOutcome::Pending) => summary.pending += 1,
                Ok(PassOutcome::ConfirmedSuccess) => {
                    self.metrics.passes_confirmed.inc();
                    summary.confirmed += 1;
                }
                Ok(PassOutcome::ConfirmedFailure) => {
                    self.metrics.passes_failed.inc();
                    summary.failed += 1;
                }
                Ok(PassOutcome::Abandoned) => {
                    self.metrics.passes_abandoned.inc();
                    summary.abandoned += 1;
                }
                Ok(PassOutcome::Errored) => {
                    self.metrics.passes_errored.inc();
                    summary.errored += 1;
                }
                Err(e) if is_client_not_found(&e) => {
                    summary.skipped += 1;
                    tracing::warn!(
                        txid = %record.id,
                        chain = %record.chain,
                        "no client configured for chain, pass skipped"
                    );
                }
                Err(e) => {
                    summary.skipped += 1;
                    tracing::error!(
                        txid = %record.id,
                        chain = %record.chain,
                        "monitoring pass failed: {e}"
                    );
                }
            }
        }

        self.metrics.sweeps_total.inc();
        self.metrics
            .sweep_duration_ms
            .observe(started.elapsed().as_secs_f64() * 1000.0);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    use chainwatch_eth::{ChainClient, ChainRegistry};
    use chainwatch_nullables::{NullChainClient, NullStore, TxScript};
    use chainwatch_types::{ChainName, TxId, TxRecord};

    use crate::policy::AbandonmentPolicy;

    fn sweeper(
        store: Arc<NullStore>,
        chain: Arc<NullChainClient>,
        workers: usize,
        threshold: Option<i64>,
    ) -> Sweeper {
        let mut clients: HashMap<ChainName, Arc<dyn ChainClient>> = HashMap::new();
        clients.insert(ChainName::new("eth"), chain);
        let registry = Arc::new(ChainRegistry::new(clients));
        let checker = Arc::new(TransactionChecker::new(
            store.clone(),
            registry,
            AbandonmentPolicy::fixed(threshold),
        ));
        Sweeper::new(checker, store, Arc::new(MonitorMetrics::new()), workers)
    }

    async fn seed(store: &NullStore, id: &str, script: Option<(&NullChainClient, TxScript)>) {
        let record = TxRecord::new(TxId::new(id), ChainName::new("eth"));
        store.create(&record).await.unwrap();
        if let Some((chain, script)) = script {
            chain.script(TxId::new(id), script);
        }
    }

    #[tokio::test]
    async fn empty_candidate_set_completes_immediately() {
        let store = Arc::new(NullStore::new());
        let chain = Arc::new(NullChainClient::new());
        let sweeper = sweeper(store, chain, 4, Some(5));

        let summary = sweeper.run().await.unwrap();
        assert_eq!(summary, SweepSummary::default());
    }

    #[tokio::test]
    async fn every_candidate_advances_exactly_once() {
        let store = Arc::new(NullStore::new());
        let chain = Arc::new(NullChainClient::new());
        for i in 0..20 {
            seed(&store, &format!("0x{i}"), Some((&chain, TxScript::Pending))).await;
        }
        let sweeper = sweeper(store.clone(), chain, 4, Some(100));

        let summary = sweeper.run().await.unwrap();
        assert_eq!(summary.candidates, 20);
        assert_eq!(summary.pending, 20);

        for i in 0..20 {
            let record = store.get(&TxId::new(format!("0x{i}"))).await.unwrap();
            assert_eq!(record.checks, 1, "record 0x{i} must be advanced exactly once");
        }
    }

    #[tokio::test]
    async fn pool_bounds_concurrent_passes() {
        let store = Arc::new(NullStore::new());
        let chain = Arc::new(NullChainClient::new());
        chain.set_delay(Duration::from_millis(20));
        for i in 0..12 {
            seed(&store, &format!("0x{i}"), Some((&chain, TxScript::Pending))).await;
        }
        let sweeper = sweeper(store, chain.clone(), 3, Some(100));

        sweeper.run().await.unwrap();
        let observed = chain.max_in_flight();
        assert!(
            observed <= 3,
            "expected at most 3 concurrent passes, observed {observed}"
        );
    }

    #[tokio::test]
    async fn mixed_outcomes_are_tallied() {
        let store = Arc::new(NullStore::new());
        let chain = Arc::new(NullChainClient::new());
        seed(&store, "0x1", Some((&chain, TxScript::Mined { status: 1 }))).await;
        seed(&store, "0x2", Some((&chain, TxScript::Mined { status: 0 }))).await;
        seed(&store, "0x3", Some((&chain, TxScript::Pending))).await;
        seed(
            &store,
            "0x4",
            Some((&chain, TxScript::QueryError("boom".to_string()))),
        )
        .await;
        let sweeper = sweeper(store, chain, 4, Some(5));

        let summary = sweeper.run().await.unwrap();
        assert_eq!(summary.candidates, 4);
        assert_eq!(summary.confirmed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.errored, 1);
        assert_eq!(summary.skipped, 0);
    }

    #[tokio::test]
    async fn unknown_chain_is_skipped_not_fatal() {
        let store = Arc::new(NullStore::new());
        let chain = Arc::new(NullChainClient::new());
        seed(&store, "0x1", Some((&chain, TxScript::Pending))).await;
        let stray = TxRecord::new(TxId::new("0x2"), ChainName::new("unknown"));
        store.create(&stray).await.unwrap();
        let sweeper = sweeper(store.clone(), chain, 4, Some(5));

        let summary = sweeper.run().await.unwrap();
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.pending, 1);

        // The skipped record is untouched and will be retried next sweep.
        let stored = store.get(&TxId::new("0x2")).await.unwrap();
        assert_eq!(stored.checks, 0);
        assert!(stored.monitoring);
    }

    #[tokio::test]
    async fn snapshot_failure_is_the_only_sweep_error() {
        let store = Arc::new(NullStore::new());
        let chain = Arc::new(NullChainClient::new());
        store.set_find_failure(true);
        let sweeper = sweeper(store, chain, 4, Some(5));

        let err = sweeper.run().await.unwrap_err();
        assert!(matches!(err, MonitorError::Store(_)));
    }

    #[tokio::test]
    async fn finished_records_are_not_reswept() {
        let store = Arc::new(NullStore::new());
        let chain = Arc::new(NullChainClient::new());
        seed(&store, "0x1", Some((&chain, TxScript::Mined { status: 1 }))).await;
        let sweeper = sweeper(store.clone(), chain, 4, Some(5));

        sweeper.run().await.unwrap();
        let summary = sweeper.run().await.unwrap();
        assert_eq!(summary.candidates, 0);

        let stored = store.get(&TxId::new("0x1")).await.unwrap();
        assert_eq!(stored.checks, 1, "checks must not move once monitoring ends");
    }
}
