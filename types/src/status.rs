//! Status write-back applied after a monitoring pass.

use crate::record::TxRecord;

/// The status fields a monitoring pass may rewrite on a record.
///
/// Identity fields and caller metadata are deliberately absent: a status
/// write can never change which transaction a record describes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusUpdate {
    pub monitoring: bool,
    pub pending: bool,
    pub success: bool,
    pub checks: i64,
    pub error: String,
}

impl StatusUpdate {
    /// Copy the status fields onto `record`, leaving identity, metadata and
    /// the reviewed flag untouched.
    pub fn apply_to(&self, record: &mut TxRecord) {
        record.monitoring = self.monitoring;
        record.pending = self.pending;
        record.success = self.success;
        record.checks = self.checks;
        record.error = self.error.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{ChainName, TxId};

    #[test]
    fn apply_rewrites_only_status_fields() {
        let mut record = TxRecord::new(TxId::new("0xaa"), ChainName::new("mainnet"));
        record.metadata.insert("k".into(), "v".into());
        record.reviewed = true;

        let update = StatusUpdate {
            monitoring: false,
            pending: false,
            success: true,
            checks: 4,
            error: String::new(),
        };
        update.apply_to(&mut record);

        assert!(!record.monitoring);
        assert!(record.success);
        assert_eq!(record.checks, 4);
        assert_eq!(record.id, TxId::new("0xaa"));
        assert_eq!(record.chain, ChainName::new("mainnet"));
        assert_eq!(record.metadata.get("k").map(String::as_str), Some("v"));
        assert!(record.reviewed);
    }

    #[test]
    fn apply_overwrites_stale_error() {
        let mut record = TxRecord::default();
        record.error = "connection refused".to_string();

        let update = StatusUpdate {
            monitoring: true,
            pending: true,
            success: false,
            checks: 2,
            error: String::new(),
        };
        update.apply_to(&mut record);
        assert_eq!(record.error, "");
    }
}
