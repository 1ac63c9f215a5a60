//! Integration tests for ledger-simulator

use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;

use ledger_simulator::{
    codes,
    generators::{
        ClientInvoiceGenerator, DocumentSequence, PayrollGenerator, SupplierInvoiceGenerator,
    },
    utils::validate_journal,
    ChartOfAccounts, InvoiceStatus, Journal, RandomSource, Simulation, SimulationConfig,
    StatementBuilder, TransactionBuilder, VatSettlementCalculator,
};

fn small_config(seed: u64) -> SimulationConfig {
    let mut config = SimulationConfig::for_years(2023, 2024);
    config.supplier_invoices.invoices_per_year = 8;
    config.client_invoices.invoices_per_year = 10;
    config.seed = Some(seed);
    config
}

#[test]
fn test_complete_simulation_workflow() {
    let mut config = SimulationConfig::default();
    config.seed = Some(42);
    let simulation = Simulation::new(config).unwrap();
    let output = simulation.run_seeded().unwrap();

    // Documents
    assert_eq!(output.supplier_invoices.len(), 250);
    assert_eq!(output.client_invoices.len(), 300);
    assert_eq!(output.payroll_runs.len(), 60);
    assert_eq!(output.vat_settlements.len(), 20);
    assert_eq!(output.exchange_quotes.len(), 120);

    // Every document balances, and so does the whole journal
    validate_journal(&output.journal).unwrap();
    assert!(output.journal.is_balanced());

    // Every tax account is cleared quarter by quarter
    let calculator = VatSettlementCalculator::standard();
    for settlement in &output.vat_settlements {
        for account_id in calculator.tax_accounts() {
            let cleared = settlement.bucket.balance(account_id) + settlement.effect_on(account_id);
            assert_eq!(
                cleared,
                BigDecimal::from(0),
                "account {} in {} Q{}",
                account_id,
                settlement.bucket.year,
                settlement.bucket.quarter
            );
        }
    }

    // The retained-result row carries the P&L result of each year
    let statements = simulation.statements(&output.journal);
    let retained = statements.balance_sheet.retained_result_row().unwrap();
    assert_eq!(retained.account_id, codes::RETAINED_RESULT);
    for (index, year) in (2021..=2025).enumerate() {
        let row_sum: BigDecimal = statements
            .profit_and_loss
            .rows
            .iter()
            .map(|row| &row.amounts[index])
            .sum();
        assert_eq!(statements.profit_and_loss.net_result(year), Some(&row_sum));
        assert_eq!(retained.amounts[index], row_sum);
    }

    // Revenue is negative, so a profitable year has a negative result
    let sales = statements.profit_and_loss.row(codes::SERVICE_SALES).unwrap();
    assert!(sales.amounts.iter().all(|amount| *amount <= BigDecimal::from(0)));
}

#[test]
fn test_same_seed_same_dataset() {
    let first = Simulation::new(small_config(99)).unwrap();
    let second = Simulation::new(small_config(99)).unwrap();

    let first_output = first.run_seeded().unwrap();
    let second_output = second.run_seeded().unwrap();
    assert_eq!(first_output, second_output);
    assert_eq!(first.dataset(&first_output), second.dataset(&second_output));

    let other = Simulation::new(small_config(100)).unwrap().run_seeded().unwrap();
    assert_ne!(first_output.journal, other.journal);
}

#[test]
fn test_open_invoices_stay_open() {
    let output = Simulation::new(small_config(5)).unwrap().run_seeded().unwrap();

    for invoice in &output.client_invoices {
        let collected = output
            .journal
            .postings_for(&invoice.reference)
            .any(|posting| posting.debit_account == codes::BANK);
        assert_eq!(collected, invoice.status == InvoiceStatus::Settled);
        assert_eq!(invoice.payment_date.is_some(), collected);
    }

    for invoice in &output.supplier_invoices {
        let paid = output
            .journal
            .postings_for(&invoice.reference)
            .any(|posting| posting.credit_account == codes::BANK);
        assert_eq!(paid, invoice.status == InvoiceStatus::Settled);
    }
}

#[test]
fn test_document_numbers_strictly_increase_across_years() {
    let output = Simulation::new(small_config(8)).unwrap().run_seeded().unwrap();

    let mut numbers: Vec<(i32, u32)> = output
        .supplier_invoices
        .iter()
        .map(|invoice| (invoice.invoice_date.year(), invoice.document_number))
        .chain(
            output
                .client_invoices
                .iter()
                .map(|invoice| (invoice.invoice_date.year(), invoice.document_number)),
        )
        .collect();
    numbers.sort_by_key(|(_, number)| *number);

    assert_eq!(numbers.first().map(|(_, n)| *n), Some(1));
    for pair in numbers.windows(2) {
        assert!(pair[0].1 < pair[1].1);
        assert!(pair[0].0 <= pair[1].0);
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 32,
        ..ProptestConfig::default()
    })]

    /// Property: every generated business document balances on its own.
    #[test]
    fn generated_documents_balance(seed in any::<u64>(), year in 2021i32..=2025) {
        let chart = ChartOfAccounts::bookstore().unwrap();
        let config = SimulationConfig::default();
        let rate = config.vat_rate(year).unwrap();
        let mut source = RandomSource::seeded(seed);
        let mut sequence = DocumentSequence::default();

        let suppliers = SupplierInvoiceGenerator::new(&chart, &config.supplier_invoices);
        for _ in 0..5 {
            let generated = suppliers.generate(year, &rate, &mut sequence, &mut source).unwrap();
            prop_assert_eq!(generated.transaction.total_debits(), generated.transaction.total_credits());
        }

        let clients = ClientInvoiceGenerator::new(&chart, &config.client_invoices);
        for _ in 0..5 {
            let generated = clients.generate(year, &rate, &mut sequence, &mut source).unwrap();
            prop_assert_eq!(generated.transaction.total_debits(), generated.transaction.total_credits());
            prop_assert_eq!(
                &generated.document.amount,
                &generated.transaction.postings.iter()
                    .filter(|posting| posting.credit_account != codes::RECEIVABLES)
                    .filter_map(|posting| posting.credit_amount())
                    .sum::<BigDecimal>()
            );
        }

        let payroll = PayrollGenerator::new(&chart, &config.payroll);
        let generated = payroll.generate_month(year, 6, &mut source).unwrap();
        prop_assert!(generated.transaction.is_balanced());
        prop_assert_eq!(
            &generated.document.total_paid,
            &(&generated.document.gross + &generated.document.social_charges)
        );
    }

    /// Property: after settlement every tax account nets to zero for the quarter.
    #[test]
    fn vat_accounts_net_to_zero(
        movements in prop::collection::vec((0usize..4, 1i64..500_000i64), 0..12)
    ) {
        let chart = ChartOfAccounts::bookstore().unwrap();
        let calculator = VatSettlementCalculator::standard();
        let day = NaiveDate::from_ymd_opt(2022, 5, 17).unwrap();
        let mut journal = Journal::new();

        for (i, (target, cents)) in movements.iter().enumerate() {
            let amount = BigDecimal::new((*cents).into(), 2);
            let builder = TransactionBuilder::new(format!("M{}", i), "VAT movement");
            let builder = match target {
                0 => builder.entry(day, codes::RECEIVABLES, codes::VAT_DUE, amount, "Output VAT"),
                1 => builder.entry(day, codes::VAT_RECOVERABLE, codes::PAYABLES, amount, "Input VAT"),
                2 => builder.entry(day, codes::VAT_ADJUSTMENTS, codes::PAYABLES, amount, "Input VAT"),
                _ => builder.entry(day, codes::VAT_REDUCED_RATE, codes::PAYABLES, amount, "Input VAT"),
            };
            journal.record(builder.build(&chart).unwrap());
        }

        let settlement = calculator.settle_quarter(&journal, &chart, 2022, 2).unwrap();
        for account_id in calculator.tax_accounts() {
            prop_assert_eq!(
                settlement.bucket.balance(account_id) + settlement.effect_on(account_id),
                BigDecimal::from(0)
            );
        }
        prop_assert_eq!(settlement.transaction.is_none(), settlement.bucket.is_empty());
        prop_assert_eq!(settlement.effect_on(codes::BANK), -settlement.net_due.clone());
    }

    /// Property: the balance sheet's result row equals each year's P&L result.
    #[test]
    fn retained_row_matches_profit_and_loss(seed in any::<u64>()) {
        let mut config = small_config(seed);
        config.supplier_invoices.invoices_per_year = 3;
        config.client_invoices.invoices_per_year = 3;
        let simulation = Simulation::new(config).unwrap();
        let output = simulation.run_seeded().unwrap();

        let statements = simulation.statements(&output.journal);
        let retained = statements.balance_sheet.retained_result_row().unwrap();
        prop_assert_eq!(&retained.amounts, &statements.profit_and_loss.net_results);
        prop_assert_eq!(statements, simulation.statements(&output.journal));
    }

    /// Property: aggregating an empty journal yields zero for any account and year.
    #[test]
    fn empty_journal_aggregates_to_zero(account_id in any::<u32>(), year in 1900i32..2200) {
        let journal = Journal::new();
        prop_assert_eq!(
            journal.aggregate(account_id, year),
            (BigDecimal::from(0), BigDecimal::from(0))
        );

        let chart = ChartOfAccounts::bookstore().unwrap();
        let statements = StatementBuilder::new(&chart, year, year).build(&journal);
        prop_assert_eq!(&statements.profit_and_loss.net_results, &vec![BigDecimal::from(0)]);
    }
}
