//! Two-stage simulation pipeline.
//!
//! Stage one generates every non-settlement posting for all years into a journal, which is then
//! frozen. Stage two settles VAT per year and quarter against that frozen journal. The settlement
//! postings are appended last, so no quarter is ever settled against its own settlement.

use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::export::{Dataset, Table};
use crate::generators::{
    ClientInvoiceGenerator, DocumentSequence, ExchangeQuoteGenerator, OperatingChargeGenerator,
    PayrollGenerator, SupplierInvoiceGenerator,
};
use crate::ledger::{ChartOfAccounts, Journal};
use crate::statements::{StatementBuilder, Statements};
use crate::tax::vat::{VatSettlement, VatSettlementCalculator};
use crate::traits::ValueSource;
use crate::types::*;
use crate::utils::RandomSource;

/// Everything a simulation run produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    /// Stage-one postings followed by VAT settlements
    pub journal: Journal,
    pub supplier_invoices: Vec<SupplierInvoice>,
    pub client_invoices: Vec<ClientInvoice>,
    pub payroll_runs: Vec<PayrollRun>,
    pub vat_settlements: Vec<VatSettlement>,
    pub exchange_quotes: Vec<ExchangeQuote>,
}

/// Journal and documents of stage one, before settlement
#[derive(Debug, Default)]
struct Stage {
    journal: Journal,
    supplier_invoices: Vec<SupplierInvoice>,
    client_invoices: Vec<ClientInvoice>,
    payroll_runs: Vec<PayrollRun>,
}

pub struct Simulation {
    config: SimulationConfig,
    chart: ChartOfAccounts,
    vat: VatSettlementCalculator,
}

impl Simulation {
    /// Simulation of the bookstore chart with a validated configuration
    pub fn new(config: SimulationConfig) -> LedgerResult<Self> {
        Self::with_chart(config, ChartOfAccounts::bookstore()?)
    }

    /// Simulation over a custom chart; VAT settlement uses the chart's tax accounts
    pub fn with_chart(config: SimulationConfig, chart: ChartOfAccounts) -> LedgerResult<Self> {
        config.validate()?;
        let vat = VatSettlementCalculator::for_chart(&chart)?;
        Ok(Self { config, chart, vat })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }

    /// Run with the configured seed, or an entropy-seeded source when none is set
    pub fn run_seeded(&self) -> LedgerResult<SimulationOutput> {
        let mut source = match self.config.seed {
            Some(seed) => RandomSource::seeded(seed),
            None => RandomSource::from_entropy(),
        };
        self.run(&mut source)
    }

    /// Run both stages, drawing every value from `source`
    pub fn run(&self, source: &mut dyn ValueSource) -> LedgerResult<SimulationOutput> {
        tracing::info!(
            start_year = self.config.start_year,
            end_year = self.config.end_year,
            "generating postings"
        );
        let stage = self.generate(source)?;
        let frozen = stage.journal;

        tracing::info!(postings = frozen.len(), "settling VAT against frozen journal");
        let mut vat_settlements = Vec::new();
        for year in self.config.years() {
            vat_settlements.extend(self.vat.settle_year(&frozen, &self.chart, year)?);
        }

        let mut journal = frozen;
        journal.record_all(
            vat_settlements
                .iter()
                .filter_map(|settlement| settlement.transaction.clone()),
        );

        let quotes = ExchangeQuoteGenerator::new(&self.config.exchange_quotes);
        let mut exchange_quotes = Vec::new();
        for year in self.config.years() {
            exchange_quotes.extend(quotes.generate_year(year, source)?);
        }

        tracing::info!(
            postings = journal.len(),
            settlements = vat_settlements.len(),
            "simulation complete"
        );

        Ok(SimulationOutput {
            journal,
            supplier_invoices: stage.supplier_invoices,
            client_invoices: stage.client_invoices,
            payroll_runs: stage.payroll_runs,
            vat_settlements,
            exchange_quotes,
        })
    }

    fn generate(&self, source: &mut dyn ValueSource) -> LedgerResult<Stage> {
        let config = &self.config;
        let suppliers = SupplierInvoiceGenerator::new(&self.chart, &config.supplier_invoices);
        let clients = ClientInvoiceGenerator::new(&self.chart, &config.client_invoices);
        let payroll = PayrollGenerator::new(&self.chart, &config.payroll);
        let operating = OperatingChargeGenerator::new(&self.chart, &config.operating);

        let mut stage = Stage::default();
        let mut sequence = DocumentSequence::default();

        for year in config.years() {
            let rate = config.vat_rate(year)?;
            let before = stage.journal.len();

            for generated in suppliers.generate_year(year, &rate, &mut sequence, source)? {
                stage.supplier_invoices.push(generated.document);
                stage.journal.record(generated.transaction);
            }
            for generated in clients.generate_year(year, &rate, &mut sequence, source)? {
                stage.client_invoices.push(generated.document);
                stage.journal.record(generated.transaction);
            }
            for generated in payroll.generate_year(year, source)? {
                stage.payroll_runs.push(generated.document);
                stage.journal.record(generated.transaction);
            }
            stage
                .journal
                .record_all(operating.generate_year(year, source)?);

            tracing::info!(
                year,
                vat_rate = %rate.percent,
                postings = stage.journal.len() - before,
                "year generated"
            );
        }

        Ok(stage)
    }

    /// Statements over the configured years
    pub fn statements(&self, journal: &Journal) -> Statements {
        StatementBuilder::new(&self.chart, self.config.start_year, self.config.end_year)
            .build(journal)
    }

    /// Every exported table, in export order
    pub fn dataset(&self, output: &SimulationOutput) -> Dataset {
        let statements = self.statements(&output.journal);
        let balance_sheet = statements.balance_sheet.to_table();
        let accounts: Vec<Account> = self.chart.accounts().cloned().collect();

        let mut dataset = Dataset::default();
        dataset.push(Table::from_records("GrandLivre", output.journal.postings()));
        dataset.push(Table::from_records("PlanComptable", &accounts));
        dataset.push(Table::from_records(
            "CodesAnalytiques",
            self.chart.analytical_codes(),
        ));
        dataset.push(Table::from_records("Fournisseurs", self.chart.suppliers()));
        dataset.push(Table::from_records(
            "FacturesFournisseurs",
            &output.supplier_invoices,
        ));
        dataset.push(Table::from_records("Clients", self.chart.clients()));
        dataset.push(Table::from_records("FacturesClients", &output.client_invoices));
        dataset.push(Table::from_records("Salaires", &output.payroll_runs));
        dataset.push(Table::from_records("Monnaies", self.chart.currencies()));
        dataset.push(Table::from_records(
            "CotationsDevises",
            &output.exchange_quotes,
        ));
        dataset.push(balance_sheet.renamed("BalanceDesComptes"));
        dataset.push(balance_sheet);
        dataset.push(statements.profit_and_loss.to_table());
        dataset
    }
}
