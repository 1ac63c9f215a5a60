//! Posting generators: turn business events into business documents and balanced transactions
//!
//! Every generator borrows the chart of accounts and its parameter section, draws its values from
//! an injected [`ValueSource`], and validates each transaction before handing it back.

pub mod client;
pub mod exchange;
pub mod operating;
pub mod payroll;
pub mod supplier;

pub use client::ClientInvoiceGenerator;
pub use exchange::ExchangeQuoteGenerator;
pub use operating::OperatingChargeGenerator;
pub use payroll::PayrollGenerator;
pub use supplier::SupplierInvoiceGenerator;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::traits::ValueSource;
use crate::types::*;
use crate::utils::validation::{add_days, date, days_in_year, last_day_of_month};

/// A business document together with the transaction it posts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generated<D> {
    pub document: D,
    pub transaction: Transaction,
}

/// Document number counter shared by supplier and client invoices across all years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSequence {
    next: u32,
}

impl DocumentSequence {
    pub fn starting_at(first: u32) -> Self {
        Self { next: first }
    }

    /// Hand out the current number and advance
    pub fn next_number(&mut self) -> u32 {
        let number = self.next;
        self.next += 1;
        number
    }

    pub fn peek(&self) -> u32 {
        self.next
    }
}

impl Default for DocumentSequence {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

/// Element at the index drawn from `source`
pub fn pick<'a, T>(items: &'a [T], source: &mut dyn ValueSource, what: &str) -> LedgerResult<&'a T> {
    let index = source.index(items.len());
    items.get(index).ok_or_else(|| {
        LedgerError::Validation(format!(
            "Drawn {} index {} outside 0..{}",
            what,
            index,
            items.len()
        ))
    })
}

/// Random day of a year, or of one month of it
pub fn random_date(
    source: &mut dyn ValueSource,
    year: i32,
    month: Option<u32>,
) -> LedgerResult<NaiveDate> {
    let (start, span) = match month {
        Some(month) => {
            let start = date(year, month, 1)?;
            (start, (last_day_of_month(year, month)? - start).num_days())
        }
        None => (date(year, 1, 1)?, days_in_year(year)? - 1),
    };
    let offset = source.integer(0, span);
    if !(0..=span).contains(&offset) {
        return Err(LedgerError::Validation(format!(
            "Day offset {} outside 0..={} for {}",
            offset, span, start
        )));
    }
    add_days(start, offset)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::AmountRange;
    use crate::utils::{RandomSource, ScriptedSource};
    use bigdecimal::BigDecimal;

    /// Value source answering every draw outside the requested bounds
    pub(crate) struct OutOfRange;

    impl ValueSource for OutOfRange {
        fn amount(&mut self, range: &AmountRange) -> BigDecimal {
            &range.max + BigDecimal::from(1)
        }

        fn integer(&mut self, _low: i64, _high: i64) -> i64 {
            -1
        }

        fn chance(&mut self, _probability: f64) -> bool {
            false
        }

        fn index(&mut self, len: usize) -> usize {
            len
        }
    }

    #[test]
    fn test_pick_rejects_out_of_range_index() {
        let items = ["a", "b"];
        let mut scripted = ScriptedSource::new().with_indices([1]);
        assert_eq!(pick(&items, &mut scripted, "item").unwrap(), &"b");
        assert!(matches!(
            pick(&items, &mut OutOfRange, "item"),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_document_sequence() {
        let mut sequence = DocumentSequence::default();
        assert_eq!(sequence.next_number(), 1);
        assert_eq!(sequence.next_number(), 2);
        assert_eq!(sequence.peek(), 3);
    }

    #[test]
    fn test_random_date_stays_in_period() {
        let mut source = RandomSource::seeded(3);
        for _ in 0..200 {
            let day = random_date(&mut source, 2024, Some(2)).unwrap();
            assert!(day >= date(2024, 2, 1).unwrap() && day <= date(2024, 2, 29).unwrap());
        }

        let mut scripted = ScriptedSource::new().with_integers([364, 365]);
        assert_eq!(
            random_date(&mut scripted, 2021, None).unwrap(),
            date(2021, 12, 31).unwrap()
        );
        assert!(matches!(
            random_date(&mut scripted, 2021, None),
            Err(LedgerError::Validation(_))
        ));
    }
}
