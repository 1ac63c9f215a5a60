//! Traits for injectable randomness and tabular export

use bigdecimal::BigDecimal;

use crate::config::AmountRange;
use crate::export::{Cell, Column};

/// Source of the values the posting generators draw from
///
/// The engine never touches global random state: every generator receives a value source
/// explicitly, so a seeded source (or a scripted one) replays the exact same ledger.
pub trait ValueSource {
    /// Amount drawn uniformly from `range` (inclusive) at cent precision
    fn amount(&mut self, range: &AmountRange) -> BigDecimal;

    /// Integer drawn uniformly from `low..=high`
    fn integer(&mut self, low: i64, high: i64) -> i64;

    /// Returns true with the given probability
    fn chance(&mut self, probability: f64) -> bool;

    /// Index into a collection of `len` elements
    fn index(&mut self, len: usize) -> usize;
}

/// Records that can be laid out as rows of an exported table
pub trait Tabular {
    /// Column schema, in row order
    fn columns() -> Vec<Column>;

    /// Cells of this record, matching [`Tabular::columns`]
    fn cells(&self) -> Vec<Cell>;
}
