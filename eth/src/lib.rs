//! Chain access for the chainwatch transaction monitor.
//!
//! One [`ChainClient`] per configured chain, resolved by logical name through
//! the [`ChainRegistry`]. The production implementation speaks Ethereum
//! JSON-RPC over HTTP; tests substitute scripted doubles behind the same
//! trait.

pub mod client;
pub mod error;
pub mod registry;

pub use client::EthRpcClient;
pub use error::ChainError;
pub use registry::{parse_endpoints, ChainRegistry};

use chainwatch_types::TxId;

/// What the chain reports about a transaction looked up by hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainTx {
    /// True while the transaction sits in the mempool without a block.
    pub pending: bool,
}

/// Execution receipt of a mined transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    /// Execution status quantity. Greater than zero means success.
    pub status: u64,
}

/// Query handle for one configured chain.
#[async_trait::async_trait]
pub trait ChainClient: Send + Sync {
    /// Fetch the transaction by hash along with its mempool flag.
    async fn transaction_by_hash(&self, id: &TxId) -> Result<ChainTx, ChainError>;

    /// Fetch the execution receipt of a mined transaction.
    async fn transaction_receipt(&self, id: &TxId) -> Result<TxReceipt, ChainError>;

    /// Reachability probe used by the health endpoint.
    async fn chain_id(&self) -> Result<String, ChainError>;
}

impl std::fmt::Debug for dyn ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn ChainClient")
    }
}
