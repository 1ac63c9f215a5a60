//! Swiss VAT calculation and quarterly settlement

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ledger::{codes, ChartOfAccounts, Journal, TransactionBuilder};
use crate::types::*;
use crate::utils::validation::{add_days, date, last_day_of_month, round_cents};

/// VAT rate in percent (e.g. 7.7)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatRate {
    pub percent: BigDecimal,
}

/// VAT breakdown of one amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatCalculation {
    /// Amount before VAT
    pub base_amount: BigDecimal,
    /// VAT, rounded to cents
    pub vat_amount: BigDecimal,
    /// Amount including VAT
    pub total_amount: BigDecimal,
}

impl VatRate {
    pub fn new(percent: BigDecimal) -> Self {
        Self { percent }
    }

    /// VAT on top of a VAT-exclusive base
    pub fn exclusive(&self, base_amount: BigDecimal) -> VatCalculation {
        let vat_amount = round_cents(&(&base_amount * &self.percent / BigDecimal::from(100)));
        let total_amount = &base_amount + &vat_amount;

        VatCalculation {
            base_amount,
            vat_amount,
            total_amount,
        }
    }

    /// VAT contained in a VAT-inclusive total (reverse calculation)
    pub fn inclusive(&self, total_amount: BigDecimal) -> VatCalculation {
        let divisor = BigDecimal::from(100) + &self.percent;
        let vat_amount = round_cents(&(&total_amount * &self.percent / divisor));
        let base_amount = &total_amount - &vat_amount;

        VatCalculation {
            base_amount,
            vat_amount,
            total_amount,
        }
    }
}

/// Net balance (debit − credit) of each tax account over one fiscal quarter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatBucket {
    pub year: i32,
    pub quarter: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub balances: BTreeMap<AccountId, BigDecimal>,
}

impl VatBucket {
    /// Balance of one tax account; zero when the account saw no activity
    pub fn balance(&self, account_id: AccountId) -> BigDecimal {
        self.balances
            .get(&account_id)
            .cloned()
            .unwrap_or_else(|| BigDecimal::from(0))
    }

    /// True when no tax account moved during the quarter
    pub fn is_empty(&self) -> bool {
        self.balances.values().all(|balance| *balance == BigDecimal::from(0))
    }
}

/// Outcome of settling one quarter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatSettlement {
    pub bucket: VatBucket,
    /// Output VAT minus input VAT; negative means a refund is due
    pub net_due: BigDecimal,
    /// Settlement and regularization legs, absent when nothing had to be posted
    pub transaction: Option<Transaction>,
}

impl VatSettlement {
    /// Net movement the settlement transaction puts on an account (debit − credit)
    pub fn effect_on(&self, account_id: AccountId) -> BigDecimal {
        let mut effect = BigDecimal::from(0);
        if let Some(transaction) = &self.transaction {
            for posting in &transaction.postings {
                match posting.entry_type {
                    EntryType::Debit if posting.debit_account == account_id => {
                        effect += &posting.amount
                    }
                    EntryType::Credit if posting.credit_account == account_id => {
                        effect -= &posting.amount
                    }
                    _ => {}
                }
            }
        }
        effect
    }
}

/// Quarterly VAT settlement against a frozen journal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VatSettlementCalculator {
    /// Input (recoverable) VAT sub-accounts
    input_accounts: Vec<AccountId>,
    /// Output VAT account, read on its credit side
    output_account: AccountId,
    /// Input account credited when the quarter ends in a refund
    refund_account: AccountId,
    bank_account: AccountId,
    /// Days between quarter end and settlement date
    settlement_lag_days: i64,
}

impl Default for VatSettlementCalculator {
    fn default() -> Self {
        Self::standard()
    }
}

impl VatSettlementCalculator {
    /// Calculator wired to the bookstore's VAT accounts
    pub fn standard() -> Self {
        Self {
            input_accounts: vec![
                codes::VAT_RECOVERABLE,
                codes::VAT_ADJUSTMENTS,
                codes::VAT_REDUCED_RATE,
            ],
            output_account: codes::VAT_DUE,
            refund_account: codes::VAT_RECOVERABLE,
            bank_account: codes::BANK,
            settlement_lag_days: 30,
        }
    }

    /// Calculator wired to the tax accounts registered in `chart`: asset tax accounts are the
    /// input sub-accounts, the single liability tax account is output VAT.
    pub fn for_chart(chart: &ChartOfAccounts) -> LedgerResult<Self> {
        let input_accounts: Vec<AccountId> = chart
            .tax_accounts()
            .filter(|account| account.category == AccountCategory::Asset)
            .map(|account| account.id)
            .collect();
        let outputs: Vec<AccountId> = chart
            .tax_accounts()
            .filter(|account| account.category == AccountCategory::Liability)
            .map(|account| account.id)
            .collect();

        let refund_account = *input_accounts.first().ok_or_else(|| {
            LedgerError::Configuration("Chart has no input VAT account".to_string())
        })?;
        let output_account = match outputs.as_slice() {
            [output] => *output,
            _ => {
                return Err(LedgerError::Configuration(format!(
                    "Chart needs exactly one output VAT account, found {}",
                    outputs.len()
                )))
            }
        };
        chart.lookup(codes::BANK)?;

        Ok(Self {
            input_accounts,
            output_account,
            refund_account,
            ..Self::standard()
        })
    }

    /// Every account the calculator nets to zero
    pub fn tax_accounts(&self) -> Vec<AccountId> {
        let mut accounts = self.input_accounts.clone();
        accounts.push(self.output_account);
        accounts
    }

    /// First and last day of a quarter (1..=4)
    pub fn quarter_bounds(year: i32, quarter: u32) -> LedgerResult<(NaiveDate, NaiveDate)> {
        if !(1..=4).contains(&quarter) {
            return Err(LedgerError::Validation(format!(
                "Quarter must be within 1..=4, got {}",
                quarter
            )));
        }
        let first_month = (quarter - 1) * 3 + 1;
        Ok((
            date(year, first_month, 1)?,
            last_day_of_month(year, first_month + 2)?,
        ))
    }

    /// Bucket the tax accounts' net balances over one quarter
    pub fn bucket(&self, journal: &Journal, year: i32, quarter: u32) -> LedgerResult<VatBucket> {
        let (start, end) = Self::quarter_bounds(year, quarter)?;

        let balances = self
            .tax_accounts()
            .into_iter()
            .map(|account_id| {
                let (debit_sum, credit_sum) = journal.aggregate_between(account_id, start, end);
                (account_id, debit_sum - credit_sum)
            })
            .collect();

        Ok(VatBucket {
            year,
            quarter,
            start,
            end,
            balances,
        })
    }

    /// Settle one quarter: pay or reclaim the net due, then clear every tax account
    pub fn settle_quarter(
        &self,
        journal: &Journal,
        chart: &ChartOfAccounts,
        year: i32,
        quarter: u32,
    ) -> LedgerResult<VatSettlement> {
        let bucket = self.bucket(journal, year, quarter)?;
        let zero = BigDecimal::from(0);

        let output_vat = -bucket.balance(self.output_account);
        let input_vat: BigDecimal = self
            .input_accounts
            .iter()
            .map(|account_id| bucket.balance(*account_id))
            .sum();
        let net_due = &output_vat - &input_vat;

        tracing::debug!(year, quarter, %output_vat, %input_vat, %net_due, "VAT quarter");

        let settlement_date = add_days(bucket.end, self.settlement_lag_days)?;
        let reference = format!("TVA-{}-Q{}", year, quarter);
        let mut builder = TransactionBuilder::new(
            reference.clone(),
            format!("Décompte TVA {} T{}", year, quarter),
        );

        // Remaining balance per account once the settlement entry is applied
        let mut residuals: BTreeMap<AccountId, BigDecimal> = bucket.balances.clone();

        if net_due > zero {
            builder = builder.entry(
                settlement_date,
                self.output_account,
                self.bank_account,
                net_due.clone(),
                format!("Paiement TVA {} T{}", year, quarter),
            );
            *residuals
                .entry(self.output_account)
                .or_insert_with(|| BigDecimal::from(0)) += &net_due;
        } else if net_due < zero {
            let refund = net_due.abs();
            builder = builder.entry(
                settlement_date,
                self.bank_account,
                self.refund_account,
                refund.clone(),
                format!("Remboursement TVA {} T{}", year, quarter),
            );
            *residuals
                .entry(self.refund_account)
                .or_insert_with(|| BigDecimal::from(0)) -= &refund;
        }

        for (account_id, residual) in residuals {
            let label = format!("Régularisation TVA {} {} T{}", account_id, year, quarter);
            if residual > zero {
                builder = builder.entry(
                    settlement_date,
                    self.bank_account,
                    account_id,
                    residual,
                    label,
                );
            } else if residual < zero {
                builder = builder.entry(
                    settlement_date,
                    account_id,
                    self.bank_account,
                    residual.abs(),
                    label,
                );
            }
        }

        let transaction = if builder.is_empty() {
            None
        } else {
            Some(builder.build(chart)?)
        };

        Ok(VatSettlement {
            bucket,
            net_due,
            transaction,
        })
    }

    /// Settle the four quarters of a fiscal year
    pub fn settle_year(
        &self,
        journal: &Journal,
        chart: &ChartOfAccounts,
        year: i32,
    ) -> LedgerResult<Vec<VatSettlement>> {
        (1..=4)
            .map(|quarter| self.settle_quarter(journal, chart, year, quarter))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn journal_with(entries: &[(AccountId, AccountId, &str)], day: NaiveDate) -> Journal {
        let chart = ChartOfAccounts::bookstore().unwrap();
        let mut journal = Journal::new();
        for (i, (debit, credit, amount)) in entries.iter().enumerate() {
            journal.record(
                TransactionBuilder::new(format!("T{}", i), "test")
                    .entry(day, *debit, *credit, dec(amount), "test")
                    .build(&chart)
                    .unwrap(),
            );
        }
        journal
    }

    fn assert_cleared(settlement: &VatSettlement, calculator: &VatSettlementCalculator) {
        for account_id in calculator.tax_accounts() {
            let total = settlement.bucket.balance(account_id) + settlement.effect_on(account_id);
            assert_eq!(total, BigDecimal::from(0), "account {} not cleared", account_id);
        }
    }

    #[test]
    fn test_exclusive_and_inclusive_vat() {
        let rate = VatRate::new(dec("7.7"));

        let sale = rate.inclusive(BigDecimal::from(1077));
        assert_eq!(sale.vat_amount, dec("77.00"));
        assert_eq!(sale.base_amount, dec("1000.00"));

        let purchase = rate.exclusive(BigDecimal::from(1000));
        assert_eq!(purchase.vat_amount, dec("77"));
        assert_eq!(purchase.total_amount, dec("1077"));

        let rounded = VatRate::new(dec("8.1")).exclusive(dec("1234.56"));
        assert_eq!(rounded.vat_amount, dec("100.00"));
    }

    #[test]
    fn test_calculator_follows_chart_tax_accounts() {
        let chart = ChartOfAccounts::bookstore().unwrap();
        let calculator = VatSettlementCalculator::for_chart(&chart).unwrap();
        assert_eq!(calculator, VatSettlementCalculator::standard());

        let without_output: Vec<Account> = chart
            .accounts()
            .filter(|account| account.id != codes::VAT_DUE)
            .cloned()
            .collect();
        let reduced = ChartOfAccounts::new(without_output).unwrap();
        assert!(matches!(
            VatSettlementCalculator::for_chart(&reduced),
            Err(LedgerError::Configuration(_))
        ));
    }

    #[test]
    fn test_quarter_bounds() {
        let (start, end) = VatSettlementCalculator::quarter_bounds(2024, 1).unwrap();
        assert_eq!(start, date(2024, 1, 1).unwrap());
        assert_eq!(end, date(2024, 3, 31).unwrap());
        let (_, end) = VatSettlementCalculator::quarter_bounds(2024, 4).unwrap();
        assert_eq!(end, date(2024, 12, 31).unwrap());
        assert!(VatSettlementCalculator::quarter_bounds(2024, 5).is_err());
    }

    #[test]
    fn test_net_due_is_paid_and_accounts_cleared() {
        let chart = ChartOfAccounts::bookstore().unwrap();
        let calculator = VatSettlementCalculator::standard();
        let journal = journal_with(
            &[
                (codes::RECEIVABLES, codes::VAT_DUE, "500"),
                (codes::VAT_RECOVERABLE, codes::PAYABLES, "200"),
            ],
            date(2021, 2, 10).unwrap(),
        );

        let settlement = calculator.settle_quarter(&journal, &chart, 2021, 1).unwrap();
        assert_eq!(settlement.net_due, BigDecimal::from(300));

        let transaction = settlement.transaction.as_ref().unwrap();
        assert!(transaction.is_balanced());
        assert_eq!(transaction.reference, "TVA-2021-Q1");
        assert_eq!(transaction.postings[0].amount, BigDecimal::from(300));
        assert_eq!(transaction.postings[0].debit_account, codes::VAT_DUE);
        assert_eq!(transaction.postings[0].date, date(2021, 4, 30).unwrap());
        assert_eq!(settlement.effect_on(codes::BANK), BigDecimal::from(-300));
        assert_cleared(&settlement, &calculator);
    }

    #[test]
    fn test_refund_when_input_exceeds_output() {
        let chart = ChartOfAccounts::bookstore().unwrap();
        let calculator = VatSettlementCalculator::standard();
        let journal = journal_with(
            &[
                (codes::RECEIVABLES, codes::VAT_DUE, "100"),
                (codes::VAT_ADJUSTMENTS, codes::PAYABLES, "250"),
            ],
            date(2022, 11, 3).unwrap(),
        );

        let settlement = calculator.settle_quarter(&journal, &chart, 2022, 4).unwrap();
        assert_eq!(settlement.net_due, BigDecimal::from(-150));
        assert_eq!(settlement.effect_on(codes::BANK), BigDecimal::from(150));
        let transaction = settlement.transaction.as_ref().unwrap();
        assert_eq!(transaction.postings[0].date, date(2023, 1, 30).unwrap());
        assert_cleared(&settlement, &calculator);
    }

    #[test]
    fn test_zero_net_still_regularizes_sub_accounts() {
        let chart = ChartOfAccounts::bookstore().unwrap();
        let calculator = VatSettlementCalculator::standard();
        let journal = journal_with(
            &[
                (codes::RECEIVABLES, codes::VAT_DUE, "80"),
                (codes::VAT_REDUCED_RATE, codes::PAYABLES, "80"),
            ],
            date(2023, 7, 14).unwrap(),
        );

        let settlement = calculator.settle_quarter(&journal, &chart, 2023, 3).unwrap();
        assert_eq!(settlement.net_due, BigDecimal::from(0));
        let transaction = settlement.transaction.as_ref().unwrap();
        assert_eq!(transaction.postings.len(), 4);
        assert_eq!(settlement.effect_on(codes::BANK), BigDecimal::from(0));
        assert_cleared(&settlement, &calculator);
    }

    #[test]
    fn test_empty_quarter_posts_nothing() {
        let chart = ChartOfAccounts::bookstore().unwrap();
        let calculator = VatSettlementCalculator::standard();
        let journal = journal_with(
            &[(codes::RECEIVABLES, codes::VAT_DUE, "80")],
            date(2023, 7, 14).unwrap(),
        );

        let settlements = calculator.settle_year(&journal, &chart, 2023).unwrap();
        assert_eq!(settlements.len(), 4);
        assert!(settlements[0].bucket.is_empty());
        assert!(settlements[0].transaction.is_none());
        assert!(settlements[2].transaction.is_some());
    }
}
