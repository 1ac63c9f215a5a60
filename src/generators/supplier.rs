//! Supplier invoices: goods purchases with recoverable VAT

use bigdecimal::BigDecimal;

use crate::config::SupplierInvoiceParams;
use crate::generators::{pick, random_date, DocumentSequence, Generated};
use crate::ledger::{codes, ChartOfAccounts, TransactionBuilder};
use crate::tax::vat::VatRate;
use crate::traits::ValueSource;
use crate::types::*;
use crate::utils::validation::add_days;

/// Input VAT sub-accounts a purchase may be booked on
const INPUT_VAT_ACCOUNTS: [AccountId; 3] = [
    codes::VAT_RECOVERABLE,
    codes::VAT_ADJUSTMENTS,
    codes::VAT_REDUCED_RATE,
];

pub struct SupplierInvoiceGenerator<'a> {
    chart: &'a ChartOfAccounts,
    params: &'a SupplierInvoiceParams,
}

impl<'a> SupplierInvoiceGenerator<'a> {
    pub fn new(chart: &'a ChartOfAccounts, params: &'a SupplierInvoiceParams) -> Self {
        Self { chart, params }
    }

    /// Generate one purchase invoice with its expense, VAT, payment and transport legs
    pub fn generate(
        &self,
        year: i32,
        rate: &VatRate,
        sequence: &mut DocumentSequence,
        source: &mut dyn ValueSource,
    ) -> LedgerResult<Generated<SupplierInvoice>> {
        let suppliers = self.chart.suppliers();
        if suppliers.is_empty() {
            return Err(LedgerError::Configuration(
                "No suppliers registered".to_string(),
            ));
        }
        let supplier = pick(suppliers, source, "supplier")?;

        let document_number = sequence.next_number();
        let invoice_number = format!("F-{}-{:04}", year, document_number);
        let reference = format!("YOOZ{}{:04}", year, document_number);

        let invoice_date = random_date(source, year, None)?;
        let lag = source.integer(
            self.params.payment_lag_days.min,
            self.params.payment_lag_days.max,
        );
        let payment_date = add_days(invoice_date, lag)?;
        let goods = source.amount(&self.params.amount);
        let vat = rate.exclusive(goods);
        let status = if source.chance(self.params.settlement_probability) {
            InvoiceStatus::Settled
        } else {
            InvoiceStatus::Open
        };
        let vat_account = *pick(&INPUT_VAT_ACCOUNTS, source, "input VAT account")?;

        let mut builder = TransactionBuilder::new(
            reference.clone(),
            format!("Facture {} - {}", invoice_number, supplier.name),
        )
        .entry(
            invoice_date,
            codes::BOOK_PURCHASES,
            codes::PAYABLES,
            vat.base_amount.clone(),
            format!("Facture {} - {}", invoice_number, supplier.name),
        );

        if vat.vat_amount > BigDecimal::from(0) {
            builder = builder.entry(
                invoice_date,
                vat_account,
                codes::PAYABLES,
                vat.vat_amount.clone(),
                format!("TVA sur facture {}", invoice_number),
            );
        }

        if status == InvoiceStatus::Settled {
            builder = builder.entry(
                payment_date,
                codes::PAYABLES,
                codes::BANK,
                vat.total_amount.clone(),
                format!("Paiement facture {}", invoice_number),
            );
        }

        if source.chance(self.params.transport_fee_probability) {
            let fee = source.amount(&self.params.transport_fee);
            builder = builder.entry(
                invoice_date,
                codes::TRANSPORT_COSTS,
                codes::PAYABLES,
                fee.clone(),
                format!("Frais de transport facture {}", invoice_number),
            );
            if status == InvoiceStatus::Settled {
                builder = builder.entry(
                    payment_date,
                    codes::PAYABLES,
                    codes::BANK,
                    fee,
                    format!("Paiement frais de transport {}", invoice_number),
                );
            }
        }

        let transaction = builder.build(self.chart)?;

        Ok(Generated {
            document: SupplierInvoice {
                document_number,
                supplier_id: supplier.id,
                invoice_date,
                invoice_number,
                payment_date: (status == InvoiceStatus::Settled).then_some(payment_date),
                amount: vat.total_amount,
                currency: supplier.invoice_currency.clone(),
                status,
                reference,
            },
            transaction,
        })
    }

    /// All purchase invoices of a year
    pub fn generate_year(
        &self,
        year: i32,
        rate: &VatRate,
        sequence: &mut DocumentSequence,
        source: &mut dyn ValueSource,
    ) -> LedgerResult<Vec<Generated<SupplierInvoice>>> {
        (0..self.params.invoices_per_year)
            .map(|_| self.generate(year, rate, sequence, source))
            .collect()
    }
}
