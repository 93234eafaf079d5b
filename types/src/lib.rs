//! Fundamental types for the chainwatch transaction monitor.
//!
//! This crate defines the shapes shared across every other crate in the
//! workspace: the transaction record itself, the newtypes identifying it, and
//! the filter/update/pagination shapes the store layer accepts.

pub mod filter;
pub mod id;
pub mod record;
pub mod status;

pub use filter::{Page, TxFilter};
pub use id::{ChainName, TxId};
pub use record::TxRecord;
pub use status::StatusUpdate;
