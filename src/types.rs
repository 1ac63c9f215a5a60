//! Core types and data structures for the ledger engine

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Numeric account code from the chart of accounts (e.g. `1010` for the bank account)
pub type AccountId = u32;

/// Account categories following the Swiss SME chart layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccountCategory {
    /// Assets - what the business owns (cash, receivables, recoverable VAT, equipment)
    Asset,
    /// Liabilities - what the business owes, including capital and the retained result
    Liability,
    /// Revenue - sales and extraordinary income
    Revenue,
    /// Expenses - purchases, salaries, operating charges, taxes
    Expense,
}

impl AccountCategory {
    /// Returns the normal balance side for this category
    /// Assets and Expenses normally have debit balances
    /// Liabilities and Revenue normally have credit balances
    pub fn normal_balance(&self) -> EntryType {
        match self {
            AccountCategory::Asset | AccountCategory::Expense => EntryType::Debit,
            AccountCategory::Liability | AccountCategory::Revenue => EntryType::Credit,
        }
    }

    /// Balance read on the category's normal side
    pub fn natural_balance(&self, debit_sum: &BigDecimal, credit_sum: &BigDecimal) -> BigDecimal {
        match self.normal_balance() {
            EntryType::Debit => debit_sum - credit_sum,
            EntryType::Credit => credit_sum - debit_sum,
        }
    }

    /// Whether accounts of this category appear on the profit-and-loss statement
    pub fn is_income_statement(&self) -> bool {
        matches!(self, AccountCategory::Revenue | AccountCategory::Expense)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccountCategory::Asset => "Actif",
            AccountCategory::Liability => "Passif",
            AccountCategory::Revenue => "Produit",
            AccountCategory::Expense => "Charge",
        }
    }
}

/// Whether an account aggregates ordinary activity or is one of the VAT sub-accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountKind {
    Aggregating,
    Tax,
}

impl AccountKind {
    pub fn label(&self) -> &'static str {
        match self {
            AccountKind::Aggregating => "Centralisateur",
            AccountKind::Tax => "TVA",
        }
    }
}

/// Types of legs in double-entry bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    /// Debit leg - counted on the debit account's debit total
    Debit,
    /// Credit leg - counted on the credit account's credit total
    Credit,
}

/// Chart of accounts entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Numeric account code
    pub id: AccountId,
    /// Human-readable account name
    pub name: String,
    /// Category driving sign conventions in the statements
    pub category: AccountCategory,
    /// Sub-classification (e.g. "Actif circulant")
    pub sub_class: String,
    /// Detail classification (e.g. "Banque")
    pub detail: String,
    /// Aggregating or tax-specific account
    pub kind: AccountKind,
}

impl Account {
    /// Create a new account
    pub fn new(
        id: AccountId,
        name: impl Into<String>,
        category: AccountCategory,
        sub_class: impl Into<String>,
        detail: impl Into<String>,
        kind: AccountKind,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            sub_class: sub_class.into(),
            detail: detail.into(),
            kind,
        }
    }
}

/// A single journal leg.
///
/// Each posting names both the debit and the credit account of the movement, but carries one
/// amount on one side only: a `Debit` leg counts towards `debit_account`, a `Credit` leg towards
/// `credit_account`. The other account is kept as the contra account of the line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub date: NaiveDate,
    pub debit_account: AccountId,
    pub credit_account: AccountId,
    pub entry_type: EntryType,
    pub amount: BigDecimal,
    pub label: String,
    pub analytical_code: Option<String>,
    pub document_ref: Option<String>,
}

impl Posting {
    /// Create a debit leg
    pub fn debit(
        date: NaiveDate,
        debit_account: AccountId,
        credit_account: AccountId,
        amount: BigDecimal,
        label: impl Into<String>,
    ) -> Self {
        Self {
            date,
            debit_account,
            credit_account,
            entry_type: EntryType::Debit,
            amount,
            label: label.into(),
            analytical_code: None,
            document_ref: None,
        }
    }

    /// Create a credit leg
    pub fn credit(
        date: NaiveDate,
        debit_account: AccountId,
        credit_account: AccountId,
        amount: BigDecimal,
        label: impl Into<String>,
    ) -> Self {
        Self {
            entry_type: EntryType::Credit,
            ..Self::debit(date, debit_account, credit_account, amount, label)
        }
    }

    pub fn debit_amount(&self) -> Option<&BigDecimal> {
        match self.entry_type {
            EntryType::Debit => Some(&self.amount),
            EntryType::Credit => None,
        }
    }

    pub fn credit_amount(&self) -> Option<&BigDecimal> {
        match self.entry_type {
            EntryType::Credit => Some(&self.amount),
            EntryType::Debit => None,
        }
    }

    /// The account whose total this leg moves
    pub fn posted_account(&self) -> AccountId {
        match self.entry_type {
            EntryType::Debit => self.debit_account,
            EntryType::Credit => self.credit_account,
        }
    }

    /// Fiscal year of the posting (calendar year of its date)
    pub fn year(&self) -> i32 {
        chrono::Datelike::year(&self.date)
    }
}

/// A logical business transaction: the set of legs emitted for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Document reference shared by every leg (e.g. `YOOZ20210001`, `SAL-2021-03`)
    pub reference: String,
    /// Description of the transaction
    pub description: String,
    /// Legs that make up this transaction
    pub postings: Vec<Posting>,
}

impl Transaction {
    /// Create an empty transaction
    pub fn new(reference: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            description: description.into(),
            postings: Vec::new(),
        }
    }

    /// Add a leg to the transaction
    pub fn add_posting(&mut self, posting: Posting) {
        self.postings.push(posting);
    }

    /// Calculate total debits
    pub fn total_debits(&self) -> BigDecimal {
        self.postings.iter().filter_map(Posting::debit_amount).sum()
    }

    /// Calculate total credits
    pub fn total_credits(&self) -> BigDecimal {
        self.postings.iter().filter_map(Posting::credit_amount).sum()
    }

    /// Check if the transaction is balanced (debits = credits)
    pub fn is_balanced(&self) -> bool {
        self.total_debits() == self.total_credits()
    }

    /// Structural validation that does not need the chart of accounts
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.postings.len() < 2 {
            return Err(LedgerError::InvalidTransaction(format!(
                "Transaction {} must have at least two legs for double-entry bookkeeping",
                self.reference
            )));
        }

        for posting in &self.postings {
            if posting.amount <= BigDecimal::from(0) {
                return Err(LedgerError::InvalidTransaction(format!(
                    "Leg amounts must be positive ({}: {})",
                    posting.label, posting.amount
                )));
            }
        }

        if !self.is_balanced() {
            return Err(LedgerError::UnbalancedTransaction {
                reference: self.reference.clone(),
                debits: self.total_debits(),
                credits: self.total_credits(),
            });
        }

        Ok(())
    }
}

/// Debit and credit sums of one account over one fiscal year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub account_id: AccountId,
    pub year: i32,
    pub debit_sum: BigDecimal,
    pub credit_sum: BigDecimal,
}

impl AccountBalance {
    pub fn zero(account_id: AccountId, year: i32) -> Self {
        Self {
            account_id,
            year,
            debit_sum: BigDecimal::from(0),
            credit_sum: BigDecimal::from(0),
        }
    }

    /// Debit minus credit
    pub fn net(&self) -> BigDecimal {
        &self.debit_sum - &self.credit_sum
    }

    /// Balance read on the category's normal side
    pub fn balance_for(&self, category: AccountCategory) -> BigDecimal {
        category.natural_balance(&self.debit_sum, &self.credit_sum)
    }
}

/// Supplier master record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: u32,
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub country: String,
    /// Currency the supplier invoices in
    pub invoice_currency: String,
}

/// Client master record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: u32,
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub country: String,
}

/// Analytical code used to tag revenue legs by sales channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticalCode {
    pub code: String,
    pub label: String,
    pub category: AccountCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub name: String,
}

/// Settlement status of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Settled,
    Open,
}

impl InvoiceStatus {
    /// Status code used in the exported invoice lists
    pub fn code(&self) -> &'static str {
        match self {
            InvoiceStatus::Settled => "ERLED",
            InvoiceStatus::Open => "OFFEN",
        }
    }
}

/// Document type code for invoices
pub const INVOICE_DOCUMENT_TYPE: &str = "F";

/// Purchase invoice received from a supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierInvoice {
    pub document_number: u32,
    pub supplier_id: u32,
    pub invoice_date: NaiveDate,
    pub invoice_number: String,
    pub payment_date: Option<NaiveDate>,
    /// Amount including VAT
    pub amount: BigDecimal,
    pub currency: String,
    pub status: InvoiceStatus,
    pub reference: String,
}

/// Sales invoice issued to a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientInvoice {
    pub document_number: u32,
    pub client_id: u32,
    pub invoice_date: NaiveDate,
    pub invoice_number: String,
    pub payment_date: Option<NaiveDate>,
    /// Amount including VAT
    pub amount: BigDecimal,
    pub currency: String,
    pub status: InvoiceStatus,
    pub reference: String,
}

/// Monthly payroll summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRun {
    pub reference: String,
    pub date: NaiveDate,
    pub gross: BigDecimal,
    pub social_charges: BigDecimal,
    /// Gross plus social charges, paid out of the bank account
    pub total_paid: BigDecimal,
    pub meal_expense: Option<BigDecimal>,
}

/// Foreign currency quote against CHF
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeQuote {
    pub currency_code: String,
    pub date: NaiveDate,
    pub rate: BigDecimal,
    pub source: String,
}

/// Errors that can occur in the ledger engine
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),
    #[error("Invalid account reference in '{label}': debit {debit}, credit {credit}")]
    InvalidAccountReference {
        debit: AccountId,
        credit: AccountId,
        label: String,
    },
    #[error("Transaction {reference} is not balanced: debits = {debits}, credits = {credits}")]
    UnbalancedTransaction {
        reference: String,
        debits: BigDecimal,
        credits: BigDecimal,
    },
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
    }

    #[test]
    fn test_leg_amounts_are_one_sided() {
        let debit = Posting::debit(day(), 4000, 2000, BigDecimal::from(100), "Achat");
        let credit = Posting::credit(day(), 4000, 2000, BigDecimal::from(100), "Achat");

        assert_eq!(debit.debit_amount(), Some(&BigDecimal::from(100)));
        assert_eq!(debit.credit_amount(), None);
        assert_eq!(debit.posted_account(), 4000);
        assert_eq!(credit.debit_amount(), None);
        assert_eq!(credit.posted_account(), 2000);
        assert_eq!(credit.year(), 2024);
    }

    #[test]
    fn test_multi_leg_transaction_balances_in_aggregate() {
        let mut txn = Transaction::new("SAL-2024-05", "Salaires mai");
        txn.add_posting(Posting::debit(day(), 5200, 2270, BigDecimal::from(60), "AVS"));
        txn.add_posting(Posting::debit(day(), 5200, 2299, BigDecimal::from(1000), "Brut"));
        txn.add_posting(Posting::credit(day(), 2299, 1010, BigDecimal::from(1060), "Paiement"));

        assert!(txn.is_balanced());
        assert!(txn.validate().is_ok());
    }

    #[test]
    fn test_unbalanced_transaction_is_rejected() {
        let mut txn = Transaction::new("X-1", "Unbalanced");
        txn.add_posting(Posting::debit(day(), 4000, 2000, BigDecimal::from(100), "Achat"));
        txn.add_posting(Posting::credit(day(), 4000, 2000, BigDecimal::from(90), "Achat"));

        match txn.validate() {
            Err(LedgerError::UnbalancedTransaction { debits, credits, .. }) => {
                assert_eq!(debits, BigDecimal::from(100));
                assert_eq!(credits, BigDecimal::from(90));
            }
            other => panic!("expected unbalanced transaction error, got {:?}", other),
        }
    }

    #[test]
    fn test_natural_balance_by_category() {
        let debit = BigDecimal::from(300);
        let credit = BigDecimal::from(500);

        assert_eq!(
            AccountCategory::Asset.natural_balance(&debit, &credit),
            BigDecimal::from(-200)
        );
        assert_eq!(
            AccountCategory::Liability.natural_balance(&debit, &credit),
            BigDecimal::from(200)
        );
        assert!(AccountCategory::Revenue.is_income_statement());
        assert!(!AccountCategory::Asset.is_income_statement());
    }
}
