//! Simulation configuration
//!
//! Every section has a `Default` reproducing the bookstore scenario, so a JSON document only
//! needs to name what it overrides.

use bigdecimal::{BigDecimal, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::tax::vat::VatRate;
use crate::types::*;
use crate::utils::validation::{date, validate_reference};

/// Inclusive money range, sampled at cent precision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountRange {
    pub min: BigDecimal,
    pub max: BigDecimal,
}

impl AmountRange {
    pub fn new(min: BigDecimal, max: BigDecimal) -> Self {
        Self { min, max }
    }

    /// Range between two whole amounts
    pub fn units(min: i64, max: i64) -> Self {
        Self::new(BigDecimal::from(min), BigDecimal::from(max))
    }

    /// Bounds expressed in cents
    pub fn cent_bounds(&self) -> (i64, i64) {
        (to_cents(&self.min), to_cents(&self.max))
    }

    pub fn contains(&self, amount: &BigDecimal) -> bool {
        *amount >= self.min && *amount <= self.max
    }

    /// Both bounds must be strictly positive: every drawn amount becomes a posted leg
    fn validate(&self, name: &str) -> LedgerResult<()> {
        if self.min <= BigDecimal::from(0) || self.min > self.max {
            return Err(LedgerError::Configuration(format!(
                "{} range is invalid: {}..{}",
                name, self.min, self.max
            )));
        }
        Ok(())
    }
}

fn to_cents(amount: &BigDecimal) -> i64 {
    (amount * BigDecimal::from(100))
        .round(0)
        .to_i64()
        .unwrap_or(i64::MAX)
}

/// Inclusive integer range (payment lags, pay days, counts)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i64,
    pub max: i64,
}

impl IntRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    fn validate(&self, name: &str) -> LedgerResult<()> {
        if self.min < 0 || self.min > self.max {
            return Err(LedgerError::Configuration(format!(
                "{} range is invalid: {}..{}",
                name, self.min, self.max
            )));
        }
        Ok(())
    }
}

fn validate_probability(name: &str, probability: f64) -> LedgerResult<()> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(LedgerError::Configuration(format!(
            "{} probability must be within [0, 1], got {}",
            name, probability
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplierInvoiceParams {
    pub invoices_per_year: u32,
    /// Goods amount before VAT
    pub amount: AmountRange,
    pub settlement_probability: f64,
    pub payment_lag_days: IntRange,
    pub transport_fee_probability: f64,
    pub transport_fee: AmountRange,
}

impl Default for SupplierInvoiceParams {
    fn default() -> Self {
        Self {
            invoices_per_year: 50,
            amount: AmountRange::units(500, 5000),
            settlement_probability: 0.9,
            payment_lag_days: IntRange::new(10, 30),
            transport_fee_probability: 0.2,
            transport_fee: AmountRange::units(50, 200),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientInvoiceParams {
    pub invoices_per_year: u32,
    /// Amount including VAT
    pub amount: AmountRange,
    /// Year-specific amount ranges replacing `amount`
    pub amount_overrides: BTreeMap<i32, AmountRange>,
    pub settlement_probability: f64,
    pub payment_lag_days: IntRange,
    /// Probability that a sale goes through the store channel rather than online
    pub store_channel_probability: f64,
}

impl ClientInvoiceParams {
    pub fn amount_for(&self, year: i32) -> &AmountRange {
        self.amount_overrides.get(&year).unwrap_or(&self.amount)
    }
}

impl Default for ClientInvoiceParams {
    fn default() -> Self {
        let mut amount_overrides = BTreeMap::new();
        amount_overrides.insert(2021, AmountRange::units(200, 2000));
        amount_overrides.insert(2022, AmountRange::units(200, 2000));

        Self {
            invoices_per_year: 60,
            amount: AmountRange::units(500, 5000),
            amount_overrides,
            settlement_probability: 0.85,
            payment_lag_days: IntRange::new(5, 20),
            store_channel_probability: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollParams {
    pub headcount: u32,
    /// Monthly gross salary per employee
    pub salary: AmountRange,
    pub pay_day: IntRange,
    pub meal_probability: f64,
    pub meal_expense: AmountRange,
}

impl Default for PayrollParams {
    fn default() -> Self {
        Self {
            headcount: 5,
            salary: AmountRange::units(3000, 5000),
            pay_day: IntRange::new(25, 28),
            meal_probability: 0.3,
            meal_expense: AmountRange::units(50, 150),
        }
    }
}

/// Side of an extraordinary item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtraordinaryKind {
    /// Income received on the bank account
    Income,
    /// Expense paid from the cash account
    Expense,
}

/// Fixed calendar day within a year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

/// One-off items booked only in specific years (subsidies, sanitary expenses)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraordinaryItem {
    pub label: String,
    pub reference_prefix: String,
    pub kind: ExtraordinaryKind,
    pub years: Vec<i32>,
    pub occurrences: u32,
    /// Fixed date; a random date of the year when absent
    pub date: Option<MonthDay>,
    pub amount: AmountRange,
}

impl ExtraordinaryItem {
    fn validate(&self) -> LedgerResult<()> {
        validate_reference(&self.reference_prefix)
            .map_err(|err| LedgerError::Configuration(format!("{}: {}", self.label, err)))?;
        self.amount.validate(&self.label)?;

        if let Some(fixed) = self.date {
            for year in &self.years {
                date(*year, fixed.month, fixed.day).map_err(|err| {
                    LedgerError::Configuration(format!("{}: {}", self.label, err))
                })?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingParams {
    pub rent: AmountRange,
    pub cleaning_probability: f64,
    pub cleaning: AmountRange,
    pub admin_fees: AmountRange,
    pub telecom: AmountRange,
    pub advertising: AmountRange,
    pub client_gift_probability: f64,
    pub client_gift: AmountRange,
    pub amortization: AmountRange,
    pub bank_fee_count: IntRange,
    pub bank_fee: AmountRange,
    pub direct_tax: AmountRange,
    pub other_charge_count: u32,
    pub other_charge: AmountRange,
    pub extraordinary: Vec<ExtraordinaryItem>,
}

impl Default for OperatingParams {
    fn default() -> Self {
        Self {
            rent: AmountRange::units(2000, 3000),
            cleaning_probability: 0.5,
            cleaning: AmountRange::units(100, 300),
            admin_fees: AmountRange::units(50, 200),
            telecom: AmountRange::units(80, 120),
            advertising: AmountRange::units(500, 1500),
            client_gift_probability: 0.6,
            client_gift: AmountRange::units(50, 200),
            amortization: AmountRange::units(300, 600),
            bank_fee_count: IntRange::new(12, 15),
            bank_fee: AmountRange::units(20, 100),
            direct_tax: AmountRange::units(5000, 10000),
            other_charge_count: 20,
            other_charge: AmountRange::units(50, 300),
            extraordinary: vec![
                ExtraordinaryItem {
                    label: "Subvention COVID-19".to_string(),
                    reference_prefix: "COV".to_string(),
                    kind: ExtraordinaryKind::Income,
                    years: vec![2021],
                    occurrences: 1,
                    date: Some(MonthDay { month: 3, day: 15 }),
                    amount: AmountRange::units(10000, 20000),
                },
                ExtraordinaryItem {
                    label: "Masques et désinfectants".to_string(),
                    reference_prefix: "COV".to_string(),
                    kind: ExtraordinaryKind::Expense,
                    years: vec![2021, 2022],
                    occurrences: 3,
                    date: None,
                    amount: AmountRange::units(100, 500),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeQuoteParams {
    pub currencies: Vec<String>,
    pub rate: AmountRange,
    pub source: String,
}

impl Default for ExchangeQuoteParams {
    fn default() -> Self {
        Self {
            currencies: vec!["EUR".to_string(), "USD".to_string()],
            rate: AmountRange::new(
                BigDecimal::from_str("0.85").unwrap_or_default(),
                BigDecimal::from_str("1.15").unwrap_or_default(),
            ),
            source: "Table de monnaies Abacus".to_string(),
        }
    }
}

/// Top-level simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub start_year: i32,
    pub end_year: i32,
    /// VAT rate in percent, per fiscal year
    pub vat_rates: BTreeMap<i32, BigDecimal>,
    /// Seed for the default random source; entropy-seeded when absent
    pub seed: Option<u64>,
    pub supplier_invoices: SupplierInvoiceParams,
    pub client_invoices: ClientInvoiceParams,
    pub payroll: PayrollParams,
    pub operating: OperatingParams,
    pub exchange_quotes: ExchangeQuoteParams,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let mut vat_rates = BTreeMap::new();
        for (year, rate) in [
            (2021, "7.7"),
            (2022, "7.7"),
            (2023, "7.7"),
            (2024, "8.1"),
            (2025, "8.1"),
        ] {
            vat_rates.insert(year, BigDecimal::from_str(rate).unwrap_or_default());
        }

        Self {
            start_year: 2021,
            end_year: 2025,
            vat_rates,
            seed: None,
            supplier_invoices: SupplierInvoiceParams::default(),
            client_invoices: ClientInvoiceParams::default(),
            payroll: PayrollParams::default(),
            operating: OperatingParams::default(),
            exchange_quotes: ExchangeQuoteParams::default(),
        }
    }
}

impl SimulationConfig {
    /// Default configuration restricted to a different year span
    pub fn for_years(start_year: i32, end_year: i32) -> Self {
        Self {
            start_year,
            end_year,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> LedgerResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| LedgerError::Configuration(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Fiscal years covered by the simulation
    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start_year..=self.end_year
    }

    /// VAT rate applicable to a fiscal year
    pub fn vat_rate(&self, year: i32) -> LedgerResult<VatRate> {
        self.vat_rates
            .get(&year)
            .cloned()
            .map(VatRate::new)
            .ok_or_else(|| {
                LedgerError::Configuration(format!("No VAT rate configured for {}", year))
            })
    }

    /// Check year span, VAT coverage, ranges and probabilities
    pub fn validate(&self) -> LedgerResult<()> {
        if self.start_year > self.end_year {
            return Err(LedgerError::Configuration(format!(
                "start_year {} is after end_year {}",
                self.start_year, self.end_year
            )));
        }

        for year in self.years() {
            let rate = self.vat_rate(year)?;
            if rate.percent < BigDecimal::from(0) {
                return Err(LedgerError::Configuration(format!(
                    "VAT rate for {} cannot be negative",
                    year
                )));
            }
        }

        let supplier = &self.supplier_invoices;
        supplier.amount.validate("supplier_invoices.amount")?;
        supplier.transport_fee.validate("supplier_invoices.transport_fee")?;
        supplier
            .payment_lag_days
            .validate("supplier_invoices.payment_lag_days")?;
        validate_probability("supplier settlement", supplier.settlement_probability)?;
        validate_probability("transport fee", supplier.transport_fee_probability)?;

        let client = &self.client_invoices;
        client.amount.validate("client_invoices.amount")?;
        for range in client.amount_overrides.values() {
            range.validate("client_invoices.amount_overrides")?;
        }
        client
            .payment_lag_days
            .validate("client_invoices.payment_lag_days")?;
        validate_probability("client settlement", client.settlement_probability)?;
        validate_probability("store channel", client.store_channel_probability)?;

        let payroll = &self.payroll;
        if payroll.headcount == 0 {
            return Err(LedgerError::Configuration(
                "payroll.headcount must be at least 1".to_string(),
            ));
        }
        payroll.salary.validate("payroll.salary")?;
        payroll.meal_expense.validate("payroll.meal_expense")?;
        validate_probability("meal expense", payroll.meal_probability)?;
        if payroll.pay_day.min < 1 || payroll.pay_day.max > 28 {
            return Err(LedgerError::Configuration(
                "payroll.pay_day must stay within days 1..=28".to_string(),
            ));
        }
        payroll.pay_day.validate("payroll.pay_day")?;

        let operating = &self.operating;
        for (name, range) in [
            ("operating.rent", &operating.rent),
            ("operating.cleaning", &operating.cleaning),
            ("operating.admin_fees", &operating.admin_fees),
            ("operating.telecom", &operating.telecom),
            ("operating.advertising", &operating.advertising),
            ("operating.client_gift", &operating.client_gift),
            ("operating.amortization", &operating.amortization),
            ("operating.bank_fee", &operating.bank_fee),
            ("operating.direct_tax", &operating.direct_tax),
            ("operating.other_charge", &operating.other_charge),
        ] {
            range.validate(name)?;
        }
        operating.bank_fee_count.validate("operating.bank_fee_count")?;
        validate_probability("cleaning", operating.cleaning_probability)?;
        validate_probability("client gift", operating.client_gift_probability)?;
        for item in &operating.extraordinary {
            item.validate()?;
        }

        self.exchange_quotes.rate.validate("exchange_quotes.rate")?;

        Ok(())
    }
}
