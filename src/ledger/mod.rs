//! Ledger module containing the chart of accounts, transaction building and the journal

pub mod account;
pub mod core;
pub mod transaction;

pub use account::*;
pub use core::*;
pub use transaction::*;
