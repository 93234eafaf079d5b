//! The monitored transaction record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::{ChainName, TxId};

/// One monitored transaction as stored and served over the API.
///
/// Missing fields on ingest decode to their defaults, so a caller may submit
/// only the hash and chain name and rely on the monitor to fill in the rest.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TxRecord {
    /// Chain-native transaction hash. Unique key for the record.
    pub id: TxId,
    /// Name of the chain the transaction was submitted to.
    pub chain: ChainName,
    /// Caller-supplied string metadata, passed through untouched.
    pub metadata: BTreeMap<String, String>,
    /// Whether the sweep loop still picks this record up.
    pub monitoring: bool,
    /// Whether the transaction was seen but not yet included in a block.
    pub pending: bool,
    /// Number of monitoring passes that have run against this record.
    pub checks: i64,
    /// Whether the transaction confirmed with a successful receipt.
    pub success: bool,
    /// Whether an operator has acknowledged this record.
    pub reviewed: bool,
    /// Terminal error description, empty while none applies.
    pub error: String,
}

impl TxRecord {
    /// New record for a transaction the monitor has not examined yet.
    pub fn new(id: TxId, chain: ChainName) -> Self {
        Self {
            id,
            chain,
            monitoring: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_field_names_are_stable() {
        let mut record = TxRecord::new(TxId::new("0xabc"), ChainName::new("mainnet"));
        record.metadata.insert("from".to_string(), "wallet-7".to_string());
        record.checks = 3;

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], "0xabc");
        assert_eq!(value["chain"], "mainnet");
        assert_eq!(value["metadata"]["from"], "wallet-7");
        assert_eq!(value["monitoring"], true);
        assert_eq!(value["pending"], false);
        assert_eq!(value["checks"], 3);
        assert_eq!(value["success"], false);
        assert_eq!(value["reviewed"], false);
        assert_eq!(value["error"], "");
    }

    #[test]
    fn partial_body_decodes_with_defaults() {
        let record: TxRecord =
            serde_json::from_str(r#"{"id":"0x1","chain":"gnosis"}"#).unwrap();
        assert_eq!(record.id, TxId::new("0x1"));
        assert_eq!(record.chain, ChainName::new("gnosis"));
        assert!(record.metadata.is_empty());
        assert!(!record.monitoring);
        assert_eq!(record.checks, 0);
        assert_eq!(record.error, "");
    }

    #[test]
    fn new_record_starts_monitored() {
        let record = TxRecord::new(TxId::new("0x2"), ChainName::new("mainnet"));
        assert!(record.monitoring);
        assert!(!record.pending);
        assert!(!record.success);
        assert!(!record.reviewed);
        assert_eq!(record.checks, 0);
    }

    #[test]
    fn round_trip_preserves_metadata_order() {
        let mut record = TxRecord::new(TxId::new("0x3"), ChainName::new("mainnet"));
        record.metadata.insert("b".into(), "2".into());
        record.metadata.insert("a".into(), "1".into());

        let json = serde_json::to_string(&record).unwrap();
        let back: TxRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
