//! Full bookstore simulation: generate five years of postings and print the statements

use ledger_simulator::{codes, RandomSource, Simulation, SimulationConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("📚 Ledger Simulator - Bookstore Example\n");

    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => SimulationConfig::default(),
    };
    let seed = config.seed.unwrap_or(2021);
    let simulation = Simulation::new(config)?;
    let output = simulation.run(&mut RandomSource::seeded(seed))?;

    println!("🧾 Generated documents");
    println!("  Supplier invoices: {}", output.supplier_invoices.len());
    println!("  Client invoices:   {}", output.client_invoices.len());
    println!("  Payroll runs:      {}", output.payroll_runs.len());
    println!("  Journal legs:      {}", output.journal.len());
    println!(
        "  Trial balance:     {}\n",
        if output.journal.is_balanced() { "balanced" } else { "UNBALANCED" }
    );

    let statements = simulation.statements(&output.journal);
    let pnl = &statements.profit_and_loss;

    println!("📈 Profit and loss (negative = profit)");
    for (year, result) in pnl.years.iter().zip(&pnl.net_results) {
        println!("  {}: CHF {}", year, result);
    }
    println!();

    println!("🏦 Bank balance per year");
    if let Some(bank) = statements.balance_sheet.row(codes::BANK) {
        for (year, amount) in statements.balance_sheet.years.iter().zip(&bank.amounts) {
            println!("  {}: CHF {}", year, amount);
        }
    }
    println!();

    let dataset = simulation.dataset(&output);
    println!("📤 Exported tables");
    for table in &dataset.tables {
        println!("  {:<22} {:>6} rows", table.name, table.len());
    }

    Ok(())
}
