//! Transaction building and validation against the chart of accounts

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::ledger::ChartOfAccounts;
use crate::types::*;
use crate::utils::validation::validate_reference;

/// Transaction builder for assembling the legs of one business document
#[derive(Debug)]
pub struct TransactionBuilder {
    transaction: Transaction,
    analytical_code: Option<String>,
}

impl TransactionBuilder {
    /// Create a new transaction builder; `reference` is stamped on every leg
    pub fn new(reference: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            transaction: Transaction::new(reference, description),
            analytical_code: None,
        }
    }

    /// Analytical code stamped on the legs added after this call
    pub fn analytical_code(mut self, code: impl Into<String>) -> Self {
        self.analytical_code = Some(code.into());
        self
    }

    /// Add a single debit leg
    pub fn debit_leg(
        self,
        date: NaiveDate,
        debit_account: AccountId,
        credit_account: AccountId,
        amount: BigDecimal,
        label: impl Into<String>,
    ) -> Self {
        self.leg(Posting::debit(
            date,
            debit_account,
            credit_account,
            amount,
            label,
        ))
    }

    /// Add a single credit leg
    pub fn credit_leg(
        self,
        date: NaiveDate,
        debit_account: AccountId,
        credit_account: AccountId,
        amount: BigDecimal,
        label: impl Into<String>,
    ) -> Self {
        self.leg(Posting::credit(
            date,
            debit_account,
            credit_account,
            amount,
            label,
        ))
    }

    /// Add a balanced two-leg entry: a debit leg and a credit leg over the same account pair
    pub fn entry(
        self,
        date: NaiveDate,
        debit_account: AccountId,
        credit_account: AccountId,
        amount: BigDecimal,
        label: impl Into<String>,
    ) -> Self {
        let label = label.into();
        self.debit_leg(
            date,
            debit_account,
            credit_account,
            amount.clone(),
            label.clone(),
        )
        .credit_leg(date, debit_account, credit_account, amount, label)
    }

    fn leg(mut self, mut posting: Posting) -> Self {
        posting.analytical_code = self.analytical_code.clone();
        posting.document_ref = Some(self.transaction.reference.clone());
        self.transaction.add_posting(posting);
        self
    }

    /// Number of legs added so far
    pub fn len(&self) -> usize {
        self.transaction.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transaction.postings.is_empty()
    }

    /// Build the transaction, checking the document reference, account references and balance
    pub fn build(self, chart: &ChartOfAccounts) -> LedgerResult<Transaction> {
        validate_reference(&self.transaction.reference)?;
        validate_references(&self.transaction, chart)?;
        self.transaction.validate()?;
        Ok(self.transaction)
    }
}

/// Verify that every leg resolves both accounts and any analytical code in the registry
pub fn validate_references(transaction: &Transaction, chart: &ChartOfAccounts) -> LedgerResult<()> {
    for posting in &transaction.postings {
        if !chart.contains(posting.debit_account) || !chart.contains(posting.credit_account) {
            tracing::error!(
                reference = %transaction.reference,
                debit = posting.debit_account,
                credit = posting.credit_account,
                "invalid account reference"
            );
            return Err(LedgerError::InvalidAccountReference {
                debit: posting.debit_account,
                credit: posting.credit_account,
                label: posting.label.clone(),
            });
        }

        if let Some(code) = &posting.analytical_code {
            if chart.analytical_code(code).is_none() {
                return Err(LedgerError::InvalidTransaction(format!(
                    "Unknown analytical code '{}' in {}",
                    code, transaction.reference
                )));
            }
        }
    }

    Ok(())
}

/// Common transaction patterns
pub mod patterns {
    use super::*;

    /// A simple operating charge: debit the expense, credit the paying account
    pub fn operating_charge(
        chart: &ChartOfAccounts,
        reference: impl Into<String>,
        date: NaiveDate,
        expense_account: AccountId,
        paying_account: AccountId,
        amount: BigDecimal,
        label: impl Into<String>,
    ) -> LedgerResult<Transaction> {
        let label = label.into();
        TransactionBuilder::new(reference, label.clone())
            .entry(date, expense_account, paying_account, amount, label)
            .build(chart)
    }

    /// Income received on a bank or cash account
    pub fn income_receipt(
        chart: &ChartOfAccounts,
        reference: impl Into<String>,
        date: NaiveDate,
        receiving_account: AccountId,
        income_account: AccountId,
        amount: BigDecimal,
        label: impl Into<String>,
    ) -> LedgerResult<Transaction> {
        let label = label.into();
        TransactionBuilder::new(reference, label.clone())
            .entry(date, receiving_account, income_account, amount, label)
            .build(chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::codes;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 8, 12).unwrap()
    }

    #[test]
    fn test_entry_emits_a_balanced_leg_pair() {
        let chart = ChartOfAccounts::bookstore().unwrap();
        let txn = TransactionBuilder::new("RENT-2022-08", "Loyer")
            .entry(day(), codes::RENT, codes::BANK, BigDecimal::from(2500), "Loyer mois 8")
            .build(&chart)
            .unwrap();

        assert_eq!(txn.postings.len(), 2);
        assert_eq!(txn.postings[0].entry_type, EntryType::Debit);
        assert_eq!(txn.postings[1].entry_type, EntryType::Credit);
        assert_eq!(txn.postings[1].posted_account(), codes::BANK);
        assert!(txn
            .postings
            .iter()
            .all(|p| p.document_ref.as_deref() == Some("RENT-2022-08")));
    }

    #[test]
    fn test_unknown_account_fails_fast() {
        let chart = ChartOfAccounts::bookstore().unwrap();
        let result = TransactionBuilder::new("X", "Bad account")
            .entry(day(), 4999, codes::BANK, BigDecimal::from(10), "Inconnu")
            .build(&chart);

        match result {
            Err(LedgerError::InvalidAccountReference { debit, credit, .. }) => {
                assert_eq!(debit, 4999);
                assert_eq!(credit, codes::BANK);
            }
            other => panic!("expected invalid account reference, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_reference_is_rejected() {
        let chart = ChartOfAccounts::bookstore().unwrap();

        for reference in ["", "TVA 2021 Q1", "CLI#1"] {
            let result = TransactionBuilder::new(reference, "Loyer")
                .entry(day(), codes::RENT, codes::BANK, BigDecimal::from(2500), "Loyer")
                .build(&chart);
            assert!(matches!(result, Err(LedgerError::Validation(_))), "{:?}", reference);
        }
    }

    #[test]
    fn test_unbalanced_builder_is_rejected() {
        let chart = ChartOfAccounts::bookstore().unwrap();
        let result = TransactionBuilder::new("SAL-X", "Missing payment")
            .debit_leg(day(), codes::BASE_SALARIES, codes::SALARIES_PAYABLE, BigDecimal::from(100), "Brut")
            .credit_leg(day(), codes::SALARIES_PAYABLE, codes::BANK, BigDecimal::from(90), "Paiement")
            .build(&chart);

        assert!(matches!(
            result,
            Err(LedgerError::UnbalancedTransaction { .. })
        ));
    }

    #[test]
    fn test_analytical_code_is_checked() {
        let chart = ChartOfAccounts::bookstore().unwrap();

        let tagged = TransactionBuilder::new("CLI1", "Vente")
            .analytical_code("A001")
            .entry(day(), codes::RECEIVABLES, codes::SERVICE_SALES, BigDecimal::from(10), "Vente")
            .build(&chart)
            .unwrap();
        assert_eq!(tagged.postings[0].analytical_code.as_deref(), Some("A001"));

        let unknown = TransactionBuilder::new("CLI2", "Vente")
            .analytical_code("B777")
            .entry(day(), codes::RECEIVABLES, codes::SERVICE_SALES, BigDecimal::from(10), "Vente")
            .build(&chart);
        assert!(matches!(unknown, Err(LedgerError::InvalidTransaction(_))));
    }

    #[test]
    fn test_patterns() {
        let chart = ChartOfAccounts::bookstore().unwrap();
        let charge = patterns::operating_charge(
            &chart,
            "ADMIN-2022-08",
            day(),
            codes::ADMIN_FEES,
            codes::BANK,
            BigDecimal::from(75),
            "Frais administratifs mois 8",
        )
        .unwrap();
        assert!(charge.is_balanced());

        let receipt = patterns::income_receipt(
            &chart,
            "COV-2021-001",
            day(),
            codes::BANK,
            codes::EXTRAORDINARY_INCOME,
            BigDecimal::from(12000),
            "Subvention COVID-19",
        )
        .unwrap();
        assert_eq!(receipt.postings[1].posted_account(), codes::EXTRAORDINARY_INCOME);
    }
}
