//! Validation utilities

use bigdecimal::BigDecimal;
use chrono::{Duration, NaiveDate};

use crate::ledger::Journal;
use crate::types::*;

/// Round an amount to cents
pub fn round_cents(amount: &BigDecimal) -> BigDecimal {
    amount.round(2)
}

/// Build a calendar date, rejecting impossible ones
pub fn date(year: i32, month: u32, day: u32) -> LedgerResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        LedgerError::Validation(format!(
            "Invalid calendar date {}-{:02}-{:02}",
            year, month, day
        ))
    })
}

/// Last day of a month
pub fn last_day_of_month(year: i32, month: u32) -> LedgerResult<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_of_next = date(next_year, next_month, 1)?;
    first_of_next
        .pred_opt()
        .ok_or_else(|| LedgerError::Validation(format!("No day before {}", first_of_next)))
}

/// Shift a date by a number of days
pub fn add_days(start: NaiveDate, days: i64) -> LedgerResult<NaiveDate> {
    start
        .checked_add_signed(Duration::days(days))
        .ok_or_else(|| LedgerError::Validation(format!("{} + {} days overflows", start, days)))
}

/// Number of days in a calendar year
pub fn days_in_year(year: i32) -> LedgerResult<i64> {
    let first = date(year, 1, 1)?;
    let last = date(year, 12, 31)?;
    Ok((last - first).num_days() + 1)
}

/// Validate that a document reference is usable as a journal key
pub fn validate_reference(reference: &str) -> LedgerResult<()> {
    if reference.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Document reference cannot be empty".to_string(),
        ));
    }

    if !reference
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(LedgerError::Validation(format!(
            "Document reference '{}' can only contain alphanumeric characters, dashes, and underscores",
            reference
        )));
    }

    Ok(())
}

/// Check that the journal's legs balance per document reference and overall
pub fn validate_journal(journal: &Journal) -> LedgerResult<()> {
    let mut per_document: std::collections::BTreeMap<&str, (BigDecimal, BigDecimal)> =
        std::collections::BTreeMap::new();

    for posting in journal.postings() {
        let reference = posting.document_ref.as_deref().unwrap_or_default();
        let sums = per_document
            .entry(reference)
            .or_insert_with(|| (BigDecimal::from(0), BigDecimal::from(0)));
        match posting.entry_type {
            EntryType::Debit => sums.0 += &posting.amount,
            EntryType::Credit => sums.1 += &posting.amount,
        }
    }

    for (reference, (debits, credits)) in per_document {
        if debits != credits {
            return Err(LedgerError::UnbalancedTransaction {
                reference: reference.to_string(),
                debits,
                credits,
            });
        }
    }

    Ok(())
}
