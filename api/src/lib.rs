//! HTTP surface for the chainwatch transaction monitor.
//!
//! Thin plumbing over the store and chain registry: transaction intake,
//! review acknowledgment, filtered listing, health and metrics endpoints.
//! All engine semantics live in `chainwatch-monitor`; handlers only
//! marshal requests into store and registry calls.

pub mod error;
pub mod handlers;
pub mod pagination;
pub mod server;

pub use error::ApiError;
pub use handlers::ApiState;
pub use pagination::{PageParams, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use server::{router, ApiServer};
