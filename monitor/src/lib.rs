//! Transaction monitoring engine — the core of chainwatch.
//!
//! The engine advances every monitored transaction record through its
//! lifecycle:
//! - Per-record state machine with persisted flags derived from an explicit
//!   tagged state
//! - Retry/abandonment policy driven by the live `CHECKS_THRESHOLD` knob
//! - Concurrent poll sweep over a bounded worker pool
//! - Periodic driver running sweeps and store liveness probes

pub mod checker;
pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod policy;
pub mod shutdown;
pub mod state;
pub mod sweep;

pub use checker::{PassOutcome, TransactionChecker};
pub use config::MonitorConfig;
pub use driver::Monitor;
pub use error::MonitorError;
pub use logging::{init_logging, LogFormat};
pub use metrics::MonitorMetrics;
pub use policy::{AbandonmentPolicy, EnvThreshold, FixedThreshold, ThresholdSource};
pub use shutdown::{ShutdownController, ShutdownSignal};
pub use state::{TxState, ABANDONED_ERROR, FAILURE_ERROR};
pub use sweep::{SweepSummary, Sweeper};
