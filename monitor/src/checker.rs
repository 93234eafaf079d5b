//! Single-record monitoring pass.
//!
//! One [`TransactionChecker::check`] call advances one record by exactly one
//! state-machine step: increment the counter, ask the chain, resolve the
//! abandonment policy, persist the derived flags.

use std::sync::Arc;

use chainwatch_eth::{ChainError, ChainRegistry};
use chainwatch_store::TransactionStore;
use chainwatch_types::TxRecord;

use crate::error::MonitorError;
use crate::policy::AbandonmentPolicy;
use crate::state::TxState;

/// Outcome of one persisted pass, for logging and metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassOutcome {
    /// Still in the mempool; record stays in the working set.
    Pending,
    /// Receipt with a positive status persisted.
    ConfirmedSuccess,
    /// Receipt with status zero persisted.
    ConfirmedFailure,
    /// A chain query or receipt fetch failed; failure text persisted.
    Errored,
    /// Checks budget exhausted; abandonment fields persisted.
    Abandoned,
}

/// Applies the state machine to one record at a time.
///
/// Stateless across calls; all persistence goes through the injected store,
/// all chain access through the injected registry. Shared by every sweep
/// worker.
pub struct TransactionChecker {
    store: Arc<dyn TransactionStore>,
    registry: Arc<ChainRegistry>,
    policy: AbandonmentPolicy,
}

impl TransactionChecker {
    pub fn new(
        store: Arc<dyn TransactionStore>,
        registry: Arc<ChainRegistry>,
        policy: AbandonmentPolicy,
    ) -> Self {
        Self {
            store,
            registry,
            policy,
        }
    }

    /// Run one pass over `record`.
    ///
    /// A registry miss aborts the pass before anything is persisted: the
    /// in-memory increment is discarded and the configuration fault is
    /// returned to the caller, to be retried on the next sweep. Chain I/O
    /// failures are not errors here; they persist as the `Errored` state
    /// and report their outcome normally.
    pub async fn check(&self, record: &TxRecord) -> Result<PassOutcome, MonitorError> {
        let checks = record.checks + 1;

        let client = self.registry.resolve(&record.chain)?;

        let observed = match client.transaction_by_hash(&record.id).await {
            Err(e) => TxState::Errored(e.to_string()),
            Ok(tx) if tx.pending => TxState::Pending,
            Ok(_) => match client.transaction_receipt(&record.id).await {
                Err(e) => TxState::Errored(e.to_string()),
                Ok(receipt) if receipt.status > 0 => TxState::ConfirmedSuccess,
                Ok(_) => TxState::ConfirmedFailure,
            },
        };

        let final_state = self.policy.resolve(observed, checks);
        let update = final_state.to_update(checks);
        self.store.update_status(&record.id, &update).await?;

        let outcome = match final_state {
            TxState::Pending => PassOutcome::Pending,
            TxState::ConfirmedSuccess => PassOutcome::ConfirmedSuccess,
            TxState::ConfirmedFailure => PassOutcome::ConfirmedFailure,
            TxState::Errored(_) => PassOutcome::Errored,
            TxState::Abandoned => PassOutcome::Abandoned,
            // The transition function never resolves back to Created.
            TxState::Created => PassOutcome::Pending,
        };

        tracing::debug!(
            txid = %record.id,
            chain = %record.chain,
            checks,
            outcome = ?outcome,
            "monitoring pass persisted"
        );
        Ok(outcome)
    }
}

// Registry misses stay distinguishable from chain I/O so the sweep can log
// them as configuration faults.
pub(crate) fn is_client_not_found(err: &MonitorError) -> bool {
    matches!(err, MonitorError::Chain(ChainError::ClientNotFound))
}
