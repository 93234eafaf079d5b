use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    /// No client is configured under the requested chain name.
    #[error("blockchain client not found")]
    ClientNotFound,

    /// The node returned `null` where a result was required.
    #[error("not found: {0}")]
    NotFound(String),

    /// The node answered with a JSON-RPC error object.
    #[error("rpc error: {0}")]
    Rpc(String),

    /// The HTTP exchange itself failed (connect, timeout, decode, non-2xx).
    #[error("transport error: {0}")]
    Transport(String),

    /// A quantity field did not parse as 0x-hex.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// The `ETH_ENDPOINTS` value could not be parsed.
    #[error("ETH_ENDPOINTS must be in the form of '<name>=<endpoint>'")]
    MalformedEndpoints,
}
