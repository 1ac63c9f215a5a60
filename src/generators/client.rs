//! Client invoices: VAT-inclusive sales split between net revenue and output VAT

use bigdecimal::BigDecimal;

use crate::config::ClientInvoiceParams;
use crate::generators::{pick, random_date, DocumentSequence, Generated};
use crate::ledger::{codes, ChartOfAccounts, TransactionBuilder};
use crate::tax::vat::VatRate;
use crate::traits::ValueSource;
use crate::types::*;
use crate::utils::validation::add_days;

/// Sales invoices are always issued in Swiss francs
pub const SALES_CURRENCY: &str = "CHF";

const STORE_CHANNEL: (AccountId, &str) = (codes::SERVICE_SALES, "A001");
const ONLINE_CHANNEL: (AccountId, &str) = (codes::ONLINE_SALES, "A002");

pub struct ClientInvoiceGenerator<'a> {
    chart: &'a ChartOfAccounts,
    params: &'a ClientInvoiceParams,
}

impl<'a> ClientInvoiceGenerator<'a> {
    pub fn new(chart: &'a ChartOfAccounts, params: &'a ClientInvoiceParams) -> Self {
        Self { chart, params }
    }

    pub fn generate(
        &self,
        year: i32,
        rate: &VatRate,
        sequence: &mut DocumentSequence,
        source: &mut dyn ValueSource,
    ) -> LedgerResult<Generated<ClientInvoice>> {
        let clients = self.chart.clients();
        if clients.is_empty() {
            return Err(LedgerError::Configuration("No clients registered".to_string()));
        }
        let client = pick(clients, source, "client")?;

        let document_number = sequence.next_number();
        let invoice_number = format!("C-{}-{:04}", year, document_number);
        let reference = format!("CLI{}{:04}", year, document_number);

        let invoice_date = random_date(source, year, None)?;
        let lag = source.integer(
            self.params.payment_lag_days.min,
            self.params.payment_lag_days.max,
        );
        let payment_date = add_days(invoice_date, lag)?;
        let total = source.amount(self.params.amount_for(year));
        let vat = rate.inclusive(total);
        let status = if source.chance(self.params.settlement_probability) {
            InvoiceStatus::Settled
        } else {
            InvoiceStatus::Open
        };
        let (revenue_account, channel) = if source.chance(self.params.store_channel_probability) {
            STORE_CHANNEL
        } else {
            ONLINE_CHANNEL
        };

        let mut builder = TransactionBuilder::new(
            reference.clone(),
            format!("Facture {} - {}", invoice_number, client.name),
        )
        .analytical_code(channel)
        .entry(
            invoice_date,
            codes::RECEIVABLES,
            revenue_account,
            vat.base_amount.clone(),
            format!("Facture {} - {}", invoice_number, client.name),
        );

        if vat.vat_amount > BigDecimal::from(0) {
            builder = builder.entry(
                invoice_date,
                codes::RECEIVABLES,
                codes::VAT_DUE,
                vat.vat_amount.clone(),
                format!("TVA sur facture {}", invoice_number),
            );
        }

        if status == InvoiceStatus::Settled {
            builder = builder.entry(
                payment_date,
                codes::BANK,
                codes::RECEIVABLES,
                vat.total_amount.clone(),
                format!("Encaissement facture {}", invoice_number),
            );
        }

        let transaction = builder.build(self.chart)?;

        Ok(Generated {
            document: ClientInvoice {
                document_number,
                client_id: client.id,
                invoice_date,
                invoice_number,
                payment_date: (status == InvoiceStatus::Settled).then_some(payment_date),
                amount: vat.total_amount,
                currency: SALES_CURRENCY.to_string(),
                status,
                reference,
            },
            transaction,
        })
    }

    pub fn generate_year(
        &self,
        year: i32,
        rate: &VatRate,
        sequence: &mut DocumentSequence,
        source: &mut dyn ValueSource,
    ) -> LedgerResult<Vec<Generated<ClientInvoice>>> {
        (0..self.params.invoices_per_year)
            .map(|_| self.generate(year, rate, sequence, source))
            .collect()
    }
}
