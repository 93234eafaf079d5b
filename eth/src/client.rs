//! Ethereum JSON-RPC client over HTTP.
//!
//! Plain JSON-RPC 2.0 with reqwest: one POST per call, a fixed deadline on
//! every request so a stalled endpoint cannot hold a monitoring pass open
//! indefinitely.

use serde::Deserialize;
use serde_json::json;

use chainwatch_types::TxId;

use crate::error::ChainError;
use crate::{ChainClient, ChainTx, TxReceipt};

/// Deadline applied to every RPC call.
const RPC_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// JSON-RPC 2.0 response envelope, reduced to the fields the monitor reads.
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

/// Upstream error object; only the message survives into [`ChainError`].
#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    message: String,
}

/// Transaction object as returned by `eth_getTransactionByHash`.
#[derive(Debug, Deserialize)]
struct RpcTransaction {
    /// Null or absent while the transaction is still in the mempool.
    #[serde(rename = "blockNumber")]
    block_number: Option<String>,
}

/// Receipt object as returned by `eth_getTransactionReceipt`.
#[derive(Debug, Deserialize)]
struct RpcReceipt {
    /// 0x-hex execution status quantity.
    status: String,
}

/// JSON-RPC client for a single Ethereum-compatible endpoint.
pub struct EthRpcClient {
    /// Endpoint URL the client POSTs to.
    endpoint: String,
    /// Reusable HTTP client.
    client: reqwest::Client,
}

impl EthRpcClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// One JSON-RPC call. `Ok(None)` means the node answered with a null
    /// result; callers decide whether that is an error.
    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<Option<T>, ChainError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .timeout(RPC_TIMEOUT)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": method,
                "params": params,
            }))
            .send()
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ChainError::Transport(format!(
                "HTTP {} from {}",
                resp.status(),
                self.endpoint
            )));
        }

        let body: RpcResponse<T> = resp
            .json()
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;

        if let Some(err) = body.error {
            return Err(ChainError::Rpc(err.message));
        }
        Ok(body.result)
    }
}

#[async_trait::async_trait]
impl ChainClient for EthRpcClient {
    async fn transaction_by_hash(&self, id: &TxId) -> Result<ChainTx, ChainError> {
        let tx: Option<RpcTransaction> = self
            .call("eth_getTransactionByHash", json!([id.as_str()]))
            .await?;
        match tx {
            Some(tx) => Ok(ChainTx {
                pending: tx.block_number.is_none(),
            }),
            None => Err(ChainError::NotFound(format!("transaction {id}"))),
        }
    }

    async fn transaction_receipt(&self, id: &TxId) -> Result<TxReceipt, ChainError> {
        let receipt: Option<RpcReceipt> = self
            .call("eth_getTransactionReceipt", json!([id.as_str()]))
            .await?;
        match receipt {
            Some(receipt) => Ok(TxReceipt {
                status: parse_quantity(&receipt.status)?,
            }),
            None => Err(ChainError::NotFound(format!("receipt for {id}"))),
        }
    }

    async fn chain_id(&self) -> Result<String, ChainError> {
        let id: Option<String> = self.call("eth_chainId", json!([])).await?;
        id.ok_or_else(|| ChainError::NotFound("chain id".to_string()))
    }
}

/// Parse a 0x-prefixed hex quantity as Ethereum nodes encode them.
fn parse_quantity(s: &str) -> Result<u64, ChainError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(digits, 16).map_err(|e| ChainError::InvalidQuantity(format!("{s}: {e}")))
}
