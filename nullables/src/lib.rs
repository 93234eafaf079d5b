//! Nullable infrastructure for deterministic testing.
//!
//! The monitor's external dependencies (storage, chain access) sit behind
//! traits. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod chain;
pub mod store;

pub use chain::{NullChainClient, TxScript};
pub use store::NullStore;
