//! Miscellaneous operating charges: monthly, quarterly, annual and extraordinary items

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::config::{AmountRange, ExtraordinaryItem, ExtraordinaryKind, OperatingParams};
use crate::generators::random_date;
use crate::ledger::{codes, patterns, ChartOfAccounts};
use crate::traits::ValueSource;
use crate::types::*;
use crate::utils::validation::date;

pub struct OperatingChargeGenerator<'a> {
    chart: &'a ChartOfAccounts,
    params: &'a OperatingParams,
}

impl<'a> OperatingChargeGenerator<'a> {
    pub fn new(chart: &'a ChartOfAccounts, params: &'a OperatingParams) -> Self {
        Self { chart, params }
    }

    /// Every operating charge of a fiscal year
    pub fn generate_year(
        &self,
        year: i32,
        source: &mut dyn ValueSource,
    ) -> LedgerResult<Vec<Transaction>> {
        let mut transactions = Vec::new();

        for month in 1..=12 {
            transactions.extend(self.monthly(year, month, source)?);
        }
        for quarter in 1..=4 {
            transactions.extend(self.quarterly(year, quarter, source)?);
        }
        transactions.extend(self.annual(year, source)?);
        transactions.extend(self.extraordinary(year, source)?);

        Ok(transactions)
    }

    /// Rent, cleaning, admin fees and telecom, all on one random day of the month
    pub fn monthly(
        &self,
        year: i32,
        month: u32,
        source: &mut dyn ValueSource,
    ) -> LedgerResult<Vec<Transaction>> {
        let params = self.params;
        let day = random_date(source, year, Some(month))?;
        let mut transactions = Vec::new();

        transactions.push(self.charge(
            format!("RENT-{}-{:02}", year, month),
            day,
            codes::RENT,
            codes::BANK,
            &params.rent,
            format!("Loyer mois {}", month),
            source,
        )?);

        if source.chance(params.cleaning_probability) {
            transactions.push(self.charge(
                format!("CLEAN-{}-{:02}", year, month),
                day,
                codes::CLEANING,
                codes::CASH,
                &params.cleaning,
                format!("Nettoyage mois {}", month),
                source,
            )?);
        }

        transactions.push(self.charge(
            format!("ADMIN-{}-{:02}", year, month),
            day,
            codes::ADMIN_FEES,
            codes::BANK,
            &params.admin_fees,
            format!("Frais administratifs mois {}", month),
            source,
        )?);

        transactions.push(self.charge(
            format!("INET-{}-{:02}", year, month),
            day,
            codes::TELECOM,
            codes::BANK,
            &params.telecom,
            format!("Téléphone et internet mois {}", month),
            source,
        )?);

        Ok(transactions)
    }

    /// Advertising, client gifts and amortization, dated the first day of the quarter's last month
    pub fn quarterly(
        &self,
        year: i32,
        quarter: u32,
        source: &mut dyn ValueSource,
    ) -> LedgerResult<Vec<Transaction>> {
        let params = self.params;
        let day = date(year, quarter * 3, 1)?;
        let mut transactions = Vec::new();

        transactions.push(self.charge(
            format!("AD-{}-Q{}", year, quarter),
            day,
            codes::ADVERTISING,
            codes::BANK,
            &params.advertising,
            format!("Publicité Q{}", quarter),
            source,
        )?);

        if source.chance(params.client_gift_probability) {
            transactions.push(self.charge(
                format!("GIFT-{}-Q{}", year, quarter),
                day,
                codes::CLIENT_GIFTS,
                codes::CASH,
                &params.client_gift,
                format!("Cadeaux clients Q{}", quarter),
                source,
            )?);
        }

        transactions.push(self.charge(
            format!("AMORT-{}-Q{}", year, quarter),
            day,
            codes::AMORTIZATION,
            codes::STORE_EQUIPMENT,
            &params.amortization,
            format!("Amortissement Q{}", quarter),
            source,
        )?);

        Ok(transactions)
    }

    /// Bank fees, direct taxes and other charges
    pub fn annual(&self, year: i32, source: &mut dyn ValueSource) -> LedgerResult<Vec<Transaction>> {
        let params = self.params;
        let mut transactions = Vec::new();

        let fee_count = source.integer(params.bank_fee_count.min, params.bank_fee_count.max);
        for i in 0..fee_count {
            let day = random_date(source, year, None)?;
            transactions.push(self.charge(
                format!("FEE-{}-{:02}", year, i),
                day,
                codes::FINANCIAL_CHARGES,
                codes::BANK,
                &params.bank_fee,
                "Frais bancaires",
                source,
            )?);
        }

        transactions.push(self.charge(
            format!("TAX-{}", year),
            date(year, 12, 31)?,
            codes::DIRECT_TAXES,
            codes::BANK,
            &params.direct_tax,
            format!("Impôts directs {}", year),
            source,
        )?);

        for i in 0..params.other_charge_count {
            let day = random_date(source, year, None)?;
            transactions.push(self.charge(
                format!("OTH-{}-{:02}", year, i),
                day,
                codes::OTHER_CHARGES,
                codes::BANK,
                &params.other_charge,
                "Autres charges",
                source,
            )?);
        }

        Ok(transactions)
    }

    /// Year-conditional items; references are numbered per prefix within the year
    pub fn extraordinary(
        &self,
        year: i32,
        source: &mut dyn ValueSource,
    ) -> LedgerResult<Vec<Transaction>> {
        let mut transactions = Vec::new();
        let mut counters: std::collections::BTreeMap<&str, u32> = std::collections::BTreeMap::new();

        for item in self.params.extraordinary.iter().filter(|item| item.years.contains(&year)) {
            for _ in 0..item.occurrences {
                let counter = counters.entry(item.reference_prefix.as_str()).or_insert(0);
                *counter += 1;
                let reference = format!("{}-{}-{:03}", item.reference_prefix, year, counter);
                transactions.push(self.extraordinary_item(item, year, reference, source)?);
            }
        }

        Ok(transactions)
    }

    fn extraordinary_item(
        &self,
        item: &ExtraordinaryItem,
        year: i32,
        reference: String,
        source: &mut dyn ValueSource,
    ) -> LedgerResult<Transaction> {
        let day = match item.date {
            Some(fixed) => date(year, fixed.month, fixed.day)?,
            None => random_date(source, year, None)?,
        };
        let amount = source.amount(&item.amount);

        match item.kind {
            ExtraordinaryKind::Income => patterns::income_receipt(
                self.chart,
                reference,
                day,
                codes::BANK,
                codes::EXTRAORDINARY_INCOME,
                amount,
                item.label.clone(),
            ),
            ExtraordinaryKind::Expense => patterns::operating_charge(
                self.chart,
                reference,
                day,
                codes::EXTRAORDINARY_CHARGES,
                codes::CASH,
                amount,
                item.label.clone(),
            ),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn charge(
        &self,
        reference: String,
        day: NaiveDate,
        expense_account: AccountId,
        paying_account: AccountId,
        range: &AmountRange,
        label: impl Into<String>,
        source: &mut dyn ValueSource,
    ) -> LedgerResult<Transaction> {
        let amount: BigDecimal = source.amount(range);
        patterns::operating_charge(
            self.chart,
            reference,
            day,
            expense_account,
            paying_account,
            amount,
            label,
        )
    }
}
