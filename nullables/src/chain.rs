//! Nullable chain client — scripted per-transaction behavior for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chainwatch_eth::{ChainClient, ChainError, ChainTx, TxReceipt};
use chainwatch_types::TxId;

/// What the scripted client reports for one transaction hash.
#[derive(Clone, Debug)]
pub enum TxScript {
    /// Transaction sits in the mempool.
    Pending,
    /// Transaction mined with the given receipt status.
    Mined { status: u64 },
    /// Transaction lookup fails with this message.
    QueryError(String),
    /// Lookup succeeds (mined) but the receipt fetch fails with this message.
    ReceiptError(String),
}

/// Chain client double driven by a per-hash script.
///
/// Unscripted hashes report a not-found error, the same shape a node returns
/// for a hash it has never seen. The client also tracks how many lookups ran
/// concurrently, so tests can assert pool bounds.
pub struct NullChainClient {
    scripts: Mutex<HashMap<TxId, TxScript>>,
    chain_id: String,
    healthy: AtomicBool,
    delay: Mutex<Duration>,
    in_flight: AtomicU64,
    max_in_flight: AtomicU64,
}

impl NullChainClient {
    pub fn new() -> Self {
        Self::with_chain_id("0x1")
    }

    pub fn with_chain_id(chain_id: impl Into<String>) -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            chain_id: chain_id.into(),
            healthy: AtomicBool::new(true),
            delay: Mutex::new(Duration::ZERO),
            in_flight: AtomicU64::new(0),
            max_in_flight: AtomicU64::new(0),
        }
    }

    /// Script the behavior for one transaction hash.
    pub fn script(&self, id: TxId, script: TxScript) {
        self.scripts.lock().unwrap().insert(id, script);
    }

    /// Make `chain_id` succeed or fail, for health-probe tests.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Hold every lookup open for `delay`, forcing overlap under load.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    /// Highest number of lookups that were in flight at once.
    pub fn max_in_flight(&self) -> u64 {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    fn script_for(&self, id: &TxId) -> Option<TxScript> {
        self.scripts.lock().unwrap().get(id).cloned()
    }
}

impl Default for NullChainClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ChainClient for NullChainClient {
    async fn transaction_by_hash(&self, id: &TxId) -> Result<ChainTx, ChainError> {
        self.enter();
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let result = match self.script_for(id) {
            Some(TxScript::Pending) => Ok(ChainTx { pending: true }),
            Some(TxScript::Mined { .. }) | Some(TxScript::ReceiptError(_)) => {
                Ok(ChainTx { pending: false })
            }
            Some(TxScript::QueryError(msg)) => Err(ChainError::Rpc(msg)),
            None => Err(ChainError::NotFound(format!("transaction {id}"))),
        };
        self.exit();
        result
    }

    async fn transaction_receipt(&self, id: &TxId) -> Result<TxReceipt, ChainError> {
        match self.script_for(id) {
            Some(TxScript::Mined { status }) => Ok(TxReceipt { status }),
            Some(TxScript::ReceiptError(msg)) => Err(ChainError::Rpc(msg)),
            Some(TxScript::QueryError(msg)) => Err(ChainError::Rpc(msg)),
            Some(TxScript::Pending) | None => {
                Err(ChainError::NotFound(format!("receipt for {id}")))
            }
        }
    }

    async fn chain_id(&self) -> Result<String, ChainError> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(self.chain_id.clone())
        } else {
            Err(ChainError::Transport("connection refused".to_string()))
        }
    }
}
