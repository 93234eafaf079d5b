use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("store error: {0}")]
    Store(#[from] chainwatch_store::StoreError),

    #[error("chain error: {0}")]
    Chain(#[from] chainwatch_eth::ChainError),

    #[error("config error: {0}")]
    Config(String),
}
