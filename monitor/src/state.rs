//! Transaction lifecycle state machine.
//!
//! Each monitoring pass resolves to one [`TxState`] variant; the persisted
//! boolean flags are derived from the variant at write time. Keeping the
//! variant as the single source of truth makes illegal flag combinations
//! (e.g. `success && pending`) unrepresentable.

use chainwatch_types::StatusUpdate;

/// Error text persisted when a receipt comes back with status zero.
pub const FAILURE_ERROR: &str = "failure";

/// Error text persisted when a record exhausts its checks budget.
pub const ABANDONED_ERROR: &str = "exceeded checks threshold";

/// Lifecycle state of a monitored transaction.
///
/// `Created` and `Pending` keep the record in the sweep working set; every
/// other variant takes it out. `Errored` is terminal only until an external
/// actor re-flags the record for monitoring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxState {
    /// Recorded but never examined against the chain.
    Created,
    /// Seen in the mempool, not yet mined.
    Pending,
    /// Mined with a successful receipt.
    ConfirmedSuccess,
    /// Mined with a reverted receipt.
    ConfirmedFailure,
    /// A chain query or receipt fetch failed.
    Errored(String),
    /// Checks budget exhausted before a terminal chain state was seen.
    Abandoned,
}

impl TxState {
    /// Whether the sweep should keep picking the record up.
    pub fn is_monitored(&self) -> bool {
        matches!(self, TxState::Created | TxState::Pending)
    }

    /// Derive the persisted status flags for this state, carrying the pass's
    /// incremented checks counter.
    pub fn to_update(&self, checks: i64) -> StatusUpdate {
        let (monitoring, pending, success, error) = match self {
            TxState::Created => (true, false, false, String::new()),
            TxState::Pending => (true, true, false, String::new()),
            TxState::ConfirmedSuccess => (false, false, true, String::new()),
            TxState::ConfirmedFailure => (false, false, false, FAILURE_ERROR.to_string()),
            TxState::Errored(msg) => (false, false, false, msg.clone()),
            TxState::Abandoned => (false, false, false, ABANDONED_ERROR.to_string()),
        };
        StatusUpdate {
            monitoring,
            pending,
            success,
            checks,
            error,
        }
    }
}
