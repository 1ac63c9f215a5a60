//! # Ledger Simulator
//!
//! Synthesizes a multi-year double-entry general ledger for a small Swiss bookstore and derives
//! its financial statements.
//!
//! ## Features
//!
//! - **Chart of accounts**: immutable registry of accounts, suppliers, clients, analytical codes
//!   and currencies
//! - **Posting generators**: supplier and client invoices, payroll, operating charges and
//!   exchange quotes, each emitting balanced transactions
//! - **Journal aggregation**: per-account, per-year debit and credit sums
//! - **VAT settlement**: quarterly netting of input and output VAT accounts
//! - **Financial reporting**: profit-and-loss and balance sheet with a retained-result row
//! - **Tabular export**: named tables with typed columns, ready for a spreadsheet writer
//!
//! ## Quick Start
//!
//! ```rust
//! use ledger_simulator::{RandomSource, Simulation, SimulationConfig};
//!
//! let mut config = SimulationConfig::for_years(2021, 2021);
//! config.supplier_invoices.invoices_per_year = 3;
//! config.client_invoices.invoices_per_year = 3;
//!
//! let simulation = Simulation::new(config).unwrap();
//! let output = simulation.run(&mut RandomSource::seeded(7)).unwrap();
//! assert!(output.journal.is_balanced());
//!
//! let dataset = simulation.dataset(&output);
//! assert!(dataset.get("EtatDeResultat").is_some());
//! ```

pub mod config;
pub mod export;
pub mod generators;
pub mod ledger;
pub mod simulation;
pub mod statements;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use export::*;
pub use ledger::*;
pub use simulation::*;
pub use statements::*;
pub use tax::vat::*;
pub use traits::*;
pub use types::*;
pub use utils::value_source::*;

// Re-export transaction patterns for convenience
pub use ledger::transaction::patterns;
