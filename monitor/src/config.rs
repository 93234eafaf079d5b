//! Engine tuning knobs.

use std::time::Duration;

/// Configuration for the monitoring engine.
///
/// The sweep interval comes from the `CHECKS_TIMER` setting; the rest have
/// spelled-out defaults suitable for production. The abandonment threshold
/// is deliberately absent: it is a live knob read by the policy on every
/// evaluation, never captured at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Sleep between the end of one sweep and the start of the next.
    pub sweep_interval: Duration,

    /// Worker-slot count bounding concurrent passes within a sweep.
    pub workers: usize,

    /// Interval between store liveness probes.
    pub liveness_interval: Duration,
}

impl MonitorConfig {
    /// Config sweeping every `sweep_secs` seconds with default tuning.
    pub fn with_sweep_secs(sweep_secs: u64) -> Self {
        Self {
            sweep_interval: Duration::from_secs(sweep_secs),
            ..Self::default()
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(30),
            workers: 10,
            liveness_interval: Duration::from_secs(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_spelled_out() {
        let config = MonitorConfig::default();
        assert_eq!(config.sweep_interval, Duration::from_secs(30));
        assert_eq!(config.workers, 10);
        assert_eq!(config.liveness_interval, Duration::from_secs(10));
    }

    #[test]
    fn with_sweep_secs_overrides_only_the_interval() {
        let config = MonitorConfig::with_sweep_secs(5);
        assert_eq!(config.sweep_interval, Duration::from_secs(5));
        assert_eq!(config.workers, MonitorConfig::default().workers);
    }
}
