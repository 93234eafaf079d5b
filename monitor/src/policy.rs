//! Retry / abandonment policy.
//!
//! Applied immediately before every persisted write of a pass: once a
//! record's checks counter exceeds the threshold, whatever state the pass
//! observed is overridden to `Abandoned`. The threshold is read fresh on
//! every evaluation, so it stays a live configuration knob.

use crate::state::TxState;

/// Environment variable holding the abandonment threshold.
pub const CHECKS_THRESHOLD_VAR: &str = "CHECKS_THRESHOLD";

/// Source of the abandonment threshold.
///
/// `None` disables abandonment for that evaluation.
pub trait ThresholdSource: Send + Sync {
    fn threshold(&self) -> Option<i64>;
}

/// Reads `CHECKS_THRESHOLD` from the environment on every call.
///
/// A missing or unparseable value disables abandonment for that evaluation
/// only; it is never fatal.
pub struct EnvThreshold;

impl ThresholdSource for EnvThreshold {
    fn threshold(&self) -> Option<i64> {
        match std::env::var(CHECKS_THRESHOLD_VAR) {
            Ok(raw) => match raw.trim().parse::<i64>() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(
                        value = %raw,
                        "CHECKS_THRESHOLD is not an integer, abandonment disabled: {e}"
                    );
                    None
                }
            },
            Err(_) => {
                tracing::debug!("CHECKS_THRESHOLD not set, abandonment disabled");
                None
            }
        }
    }
}

/// Fixed threshold for tests and embedded use.
pub struct FixedThreshold(pub Option<i64>);

impl ThresholdSource for FixedThreshold {
    fn threshold(&self) -> Option<i64> {
        self.0
    }
}

/// Decides whether a pass's outcome stands or is overridden to `Abandoned`.
pub struct AbandonmentPolicy {
    source: Box<dyn ThresholdSource>,
}

impl AbandonmentPolicy {
    pub fn new(source: Box<dyn ThresholdSource>) -> Self {
        Self { source }
    }

    /// Policy reading the live `CHECKS_THRESHOLD` environment knob.
    pub fn from_env() -> Self {
        Self::new(Box::new(EnvThreshold))
    }

    /// Policy with a fixed threshold, `None` disabling abandonment.
    pub fn fixed(threshold: Option<i64>) -> Self {
        Self::new(Box::new(FixedThreshold(threshold)))
    }

    /// Final state for a pass that incremented the counter to `checks` and
    /// observed `state`. Strictly-greater comparison: a record is abandoned
    /// on the pass after the one that lands exactly on the threshold.
    pub fn resolve(&self, state: TxState, checks: i64) -> TxState {
        match self.source.threshold() {
            Some(threshold) if checks > threshold => TxState::Abandoned,
            _ => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_state() -> impl Strategy<Value = TxState> {
        prop_oneof![
            Just(TxState::Created),
            Just(TxState::Pending),
            Just(TxState::ConfirmedSuccess),
            Just(TxState::ConfirmedFailure),
            ".*".prop_map(TxState::Errored),
            Just(TxState::Abandoned),
        ]
    }

    #[test]
    fn under_threshold_keeps_observed_state() {
        let policy = AbandonmentPolicy::fixed(Some(5));
        assert_eq!(
            policy.resolve(TxState::Pending, 5),
            TxState::Pending,
            "checks equal to the threshold must not abandon"
        );
        assert_eq!(
            policy.resolve(TxState::ConfirmedSuccess, 1),
            TxState::ConfirmedSuccess
        );
    }

    #[test]
    fn over_threshold_abandons_even_success() {
        let policy = AbandonmentPolicy::fixed(Some(5));
        assert_eq!(policy.resolve(TxState::ConfirmedSuccess, 6), TxState::Abandoned);
        assert_eq!(policy.resolve(TxState::Pending, 6), TxState::Abandoned);
        assert_eq!(
            policy.resolve(TxState::Errored("boom".to_string()), 100),
            TxState::Abandoned
        );
    }

    #[test]
    fn missing_threshold_disables_abandonment() {
        let policy = AbandonmentPolicy::fixed(None);
        assert_eq!(
            policy.resolve(TxState::Pending, i64::MAX),
            TxState::Pending
        );
    }

    proptest! {
        /// Abandonment depends only on the counter, never on the observed
        /// state: above the threshold every state maps to Abandoned, at or
        /// below it every state passes through untouched.
        #[test]
        fn abandonment_ignores_observed_state(
            state in any_state(),
            threshold in 0i64..1000,
            checks in 0i64..2000,
        ) {
            let policy = AbandonmentPolicy::fixed(Some(threshold));
            let resolved = policy.resolve(state.clone(), checks);
            if checks > threshold {
                prop_assert_eq!(resolved, TxState::Abandoned);
            } else {
                prop_assert_eq!(resolved, state);
            }
        }

        /// With no threshold configured the policy is the identity.
        #[test]
        fn disabled_policy_is_identity(state in any_state(), checks in 0i64..2000) {
            let policy = AbandonmentPolicy::fixed(None);
            prop_assert_eq!(policy.resolve(state.clone(), checks), state);
        }
    }
}
