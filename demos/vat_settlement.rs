//! VAT settlement walk-through for a single quarter

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use ledger_simulator::{
    codes, ChartOfAccounts, Journal, TransactionBuilder, VatRate, VatSettlementCalculator,
};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    println!("🧮 Ledger Simulator - VAT Settlement Example\n");

    let chart = ChartOfAccounts::bookstore()?;
    let rate = VatRate::new(BigDecimal::from_str("7.7")?);
    let day = NaiveDate::from_ymd_opt(2021, 2, 15).ok_or("invalid date")?;

    // A VAT-inclusive sale and a VAT-exclusive purchase
    let sale = rate.inclusive(BigDecimal::from(6462));
    let purchase = rate.exclusive(BigDecimal::from_str("2597.40")?);
    println!("  Sale:     total {} = net {} + VAT {}", sale.total_amount, sale.base_amount, sale.vat_amount);
    println!(
        "  Purchase: base {} + VAT {} = total {}\n",
        purchase.base_amount, purchase.vat_amount, purchase.total_amount
    );

    let mut journal = Journal::new();
    journal.record(
        TransactionBuilder::new("CLI20210001", "Vente")
            .analytical_code("A001")
            .entry(day, codes::RECEIVABLES, codes::SERVICE_SALES, sale.base_amount, "Vente")
            .entry(day, codes::RECEIVABLES, codes::VAT_DUE, sale.vat_amount, "TVA sur vente")
            .build(&chart)?,
    );
    journal.record(
        TransactionBuilder::new("YOOZ20210002", "Achat")
            .entry(day, codes::BOOK_PURCHASES, codes::PAYABLES, purchase.base_amount, "Achat")
            .entry(day, codes::VAT_ADJUSTMENTS, codes::PAYABLES, purchase.vat_amount, "TVA sur achat")
            .build(&chart)?,
    );

    let calculator = VatSettlementCalculator::standard();
    let settlement = calculator.settle_quarter(&journal, &chart, 2021, 1)?;

    println!("📊 Quarter {} {}", settlement.bucket.quarter, settlement.bucket.year);
    for (account_id, balance) in &settlement.bucket.balances {
        println!("  {} balance: {}", account_id, balance);
    }
    println!("  Net VAT due: {}\n", settlement.net_due);

    if let Some(transaction) = &settlement.transaction {
        println!("🧾 Settlement {}", transaction.reference);
        for posting in &transaction.postings {
            println!(
                "  {} {:?} {} / {} {} ({})",
                posting.date,
                posting.entry_type,
                posting.debit_account,
                posting.credit_account,
                posting.amount,
                posting.label
            );
        }
    }

    Ok(())
}
