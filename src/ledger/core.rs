//! Journal storage and per-account aggregation

use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::*;

/// Append-only collection of journal legs, in generation order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    postings: Vec<Posting>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every leg of a validated transaction
    pub fn record(&mut self, transaction: Transaction) {
        self.postings.extend(transaction.postings);
    }

    pub fn record_all(&mut self, transactions: impl IntoIterator<Item = Transaction>) {
        for transaction in transactions {
            self.record(transaction);
        }
    }

    /// Append another journal's legs after this one's
    pub fn append(&mut self, other: Journal) {
        self.postings.extend(other.postings);
    }

    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Legs dated within `start..=end`
    pub fn postings_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Iterator<Item = &Posting> {
        self.postings
            .iter()
            .filter(move |posting| posting.date >= start && posting.date <= end)
    }

    /// Legs carrying a given document reference
    pub fn postings_for(&self, reference: &str) -> impl Iterator<Item = &Posting> + '_ {
        let reference = reference.to_string();
        self.postings
            .iter()
            .filter(move |posting| posting.document_ref.as_deref() == Some(reference.as_str()))
    }

    /// Debit and credit sums of an account over one calendar year.
    ///
    /// Debit legs count when their debit account matches, credit legs when their credit
    /// account matches. An account without postings yields `(0, 0)`.
    pub fn aggregate(&self, account_id: AccountId, year: i32) -> (BigDecimal, BigDecimal) {
        sum_legs(
            self.postings.iter().filter(|posting| posting.year() == year),
            account_id,
        )
    }

    /// Same as [`Journal::aggregate`] over an inclusive date range
    pub fn aggregate_between(
        &self,
        account_id: AccountId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> (BigDecimal, BigDecimal) {
        sum_legs(self.postings_between(start, end), account_id)
    }

    pub fn balance(&self, account_id: AccountId, year: i32) -> AccountBalance {
        let (debit_sum, credit_sum) = self.aggregate(account_id, year);
        AccountBalance {
            account_id,
            year,
            debit_sum,
            credit_sum,
        }
    }

    pub fn total_debits(&self) -> BigDecimal {
        self.postings.iter().filter_map(Posting::debit_amount).sum()
    }

    pub fn total_credits(&self) -> BigDecimal {
        self.postings.iter().filter_map(Posting::credit_amount).sum()
    }

    /// Trial-balance check over the whole journal
    pub fn is_balanced(&self) -> bool {
        self.total_debits() == self.total_credits()
    }

    /// Calendar years touched by at least one leg
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.postings.iter().map(|posting| posting.date.year()).collect();
        years.sort_unstable();
        years.dedup();
        years
    }
}

fn sum_legs<'a>(
    postings: impl Iterator<Item = &'a Posting>,
    account_id: AccountId,
) -> (BigDecimal, BigDecimal) {
    let mut debit_sum = BigDecimal::from(0);
    let mut credit_sum = BigDecimal::from(0);

    for posting in postings {
        match posting.entry_type {
            EntryType::Debit if posting.debit_account == account_id => {
                debit_sum += &posting.amount;
            }
            EntryType::Credit if posting.credit_account == account_id => {
                credit_sum += &posting.amount;
            }
            _ => {}
        }
    }

    (debit_sum, credit_sum)
}

/// Pre-computed (account, year) sums for a whole journal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodBalances {
    sums: BTreeMap<(AccountId, i32), (BigDecimal, BigDecimal)>,
}

impl PeriodBalances {
    pub fn from_journal(journal: &Journal) -> Self {
        let mut sums: BTreeMap<(AccountId, i32), (BigDecimal, BigDecimal)> = BTreeMap::new();

        for posting in journal.postings() {
            let key = (posting.posted_account(), posting.year());
            let entry = sums
                .entry(key)
                .or_insert_with(|| (BigDecimal::from(0), BigDecimal::from(0)));
            match posting.entry_type {
                EntryType::Debit => entry.0 += &posting.amount,
                EntryType::Credit => entry.1 += &posting.amount,
            }
        }

        Self { sums }
    }

    /// Balance of an account for a year; zero when nothing was posted
    pub fn get(&self, account_id: AccountId, year: i32) -> AccountBalance {
        match self.sums.get(&(account_id, year)) {
            Some((debit_sum, credit_sum)) => AccountBalance {
                account_id,
                year,
                debit_sum: debit_sum.clone(),
                credit_sum: credit_sum.clone(),
            },
            None => AccountBalance::zero(account_id, year),
        }
    }
}
