//! Record filtering and pagination shapes accepted by the store.

use serde::Deserialize;

use crate::record::TxRecord;

/// Field-equality filter over transaction records.
///
/// Each set field must match exactly; unset fields match anything. An empty
/// filter therefore matches every record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TxFilter {
    pub id: Option<String>,
    pub chain: Option<String>,
    pub monitoring: Option<bool>,
    pub pending: Option<bool>,
    pub checks: Option<i64>,
    pub success: Option<bool>,
    pub reviewed: Option<bool>,
    pub error: Option<String>,
}

impl TxFilter {
    /// Filter selecting the sweep working set: records still monitored and
    /// not yet operator-reviewed.
    pub fn monitored() -> Self {
        Self {
            monitoring: Some(true),
            reviewed: Some(false),
            ..Self::default()
        }
    }

    /// Whether `record` satisfies every set field.
    pub fn matches(&self, record: &TxRecord) -> bool {
        fn ok<T: PartialEq>(want: &Option<T>, got: &T) -> bool {
            match want {
                Some(w) => w == got,
                None => true,
            }
        }

        ok(&self.id, &record.id.as_str().to_string())
            && ok(&self.chain, &record.chain.as_str().to_string())
            && ok(&self.monitoring, &record.monitoring)
            && ok(&self.pending, &record.pending)
            && ok(&self.checks, &record.checks)
            && ok(&self.success, &record.success)
            && ok(&self.reviewed, &record.reviewed)
            && ok(&self.error, &record.error)
    }
}

/// Limit/offset pair computed from page-numbered query parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u64,
}

impl Page {
    pub fn new(limit: u32, offset: u64) -> Self {
        Self { limit, offset }
    }
}
