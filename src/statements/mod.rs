//! Financial statements derived from a journal: profit-and-loss and balance sheet

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::export::{Cell, Column, ColumnType, Table};
use crate::ledger::{codes, ChartOfAccounts, Journal, PeriodBalances};
use crate::types::*;
use crate::utils::validation::round_cents;

/// Label of the synthetic result row appended to the balance sheet
pub const RETAINED_RESULT_LABEL: &str = "Bénéfice/perte";

/// One account line with one amount per fiscal year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    pub account_id: AccountId,
    pub name: String,
    pub amounts: Vec<BigDecimal>,
    /// Cross-year total, only carried by profit-and-loss rows
    pub total: Option<BigDecimal>,
}

/// Profit-and-loss statement. Expenses are positive and revenue negative, so a positive net
/// result is a loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitAndLoss {
    pub years: Vec<i32>,
    pub rows: Vec<StatementRow>,
    pub net_results: Vec<BigDecimal>,
}

impl ProfitAndLoss {
    /// Net result of a year covered by the statement
    pub fn net_result(&self, year: i32) -> Option<&BigDecimal> {
        let index = self.years.iter().position(|y| *y == year)?;
        self.net_results.get(index)
    }

    pub fn row(&self, account_id: AccountId) -> Option<&StatementRow> {
        self.rows.iter().find(|row| row.account_id == account_id)
    }

    /// `EtatDeResultat` table
    pub fn to_table(&self) -> Table {
        let mut columns = vec![
            Column::new("Compte", ColumnType::Integer),
            Column::new("Intitule", ColumnType::Text),
        ];
        columns.extend(year_columns("MontantExercice", self.years.len()));
        columns.push(Column::new("Solde", ColumnType::Decimal));

        let mut table = Table::new("EtatDeResultat", columns);
        for row in &self.rows {
            let mut cells = row_cells(row);
            cells.push(Cell::optional_decimal(row.total.as_ref()));
            table.rows.push(cells);
        }
        table
    }
}

/// Balance sheet; the retained-result row is always last
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub years: Vec<i32>,
    pub rows: Vec<StatementRow>,
}

impl BalanceSheet {
    pub fn retained_result_row(&self) -> Option<&StatementRow> {
        self.rows.last()
    }

    pub fn row(&self, account_id: AccountId) -> Option<&StatementRow> {
        self.rows.iter().find(|row| row.account_id == account_id)
    }

    /// `Bilan` table
    pub fn to_table(&self) -> Table {
        let mut columns = vec![
            Column::new("Compte", ColumnType::Integer),
            Column::new("Intitule", ColumnType::Text),
        ];
        columns.extend(year_columns("SoldeExercice", self.years.len()));

        let mut table = Table::new("Bilan", columns);
        table.rows.extend(self.rows.iter().map(row_cells));
        table
    }
}

fn year_columns(prefix: &str, count: usize) -> impl Iterator<Item = Column> + '_ {
    (1..=count).map(move |index| Column::new(format!("{}{}", prefix, index), ColumnType::Decimal))
}

fn row_cells(row: &StatementRow) -> Vec<Cell> {
    let mut cells = vec![
        Cell::Integer(i64::from(row.account_id)),
        Cell::text(row.name.clone()),
    ];
    cells.extend(row.amounts.iter().cloned().map(Cell::Decimal));
    cells
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statements {
    pub profit_and_loss: ProfitAndLoss,
    pub balance_sheet: BalanceSheet,
}

/// Builds statements over a span of fiscal years
#[derive(Debug, Clone)]
pub struct StatementBuilder<'a> {
    chart: &'a ChartOfAccounts,
    years: Vec<i32>,
    retained_result_account: AccountId,
}

impl<'a> StatementBuilder<'a> {
    pub fn new(chart: &'a ChartOfAccounts, start_year: i32, end_year: i32) -> Self {
        Self {
            chart,
            years: (start_year..=end_year).collect(),
            retained_result_account: codes::RETAINED_RESULT,
        }
    }

    /// Derive both statements; building twice from the same journal yields the same result
    pub fn build(&self, journal: &Journal) -> Statements {
        let balances = PeriodBalances::from_journal(journal);
        let profit_and_loss = self.profit_and_loss(&balances);
        let balance_sheet = self.balance_sheet(&balances, &profit_and_loss);

        tracing::debug!(
            pnl_rows = profit_and_loss.rows.len(),
            balance_rows = balance_sheet.rows.len(),
            "statements built"
        );

        Statements {
            profit_and_loss,
            balance_sheet,
        }
    }

    fn profit_and_loss(&self, balances: &PeriodBalances) -> ProfitAndLoss {
        let mut rows = Vec::new();

        for account in self
            .chart
            .accounts()
            .filter(|account| account.category.is_income_statement())
        {
            // Debit minus credit: revenue comes out negative, expenses positive
            let amounts: Vec<BigDecimal> = self
                .years
                .iter()
                .map(|year| round_cents(&balances.get(account.id, *year).net()))
                .collect();
            let total = round_cents(&amounts.iter().sum::<BigDecimal>());

            rows.push(StatementRow {
                account_id: account.id,
                name: account.name.clone(),
                amounts,
                total: Some(total),
            });
        }

        let net_results = (0..self.years.len())
            .map(|index| {
                round_cents(&rows.iter().map(|row| &row.amounts[index]).sum::<BigDecimal>())
            })
            .collect();

        ProfitAndLoss {
            years: self.years.clone(),
            rows,
            net_results,
        }
    }

    fn balance_sheet(&self, balances: &PeriodBalances, pnl: &ProfitAndLoss) -> BalanceSheet {
        let mut rows: Vec<StatementRow> = self
            .chart
            .accounts()
            .filter(|account| {
                !account.category.is_income_statement()
                    && account.id != self.retained_result_account
            })
            .map(|account| StatementRow {
                account_id: account.id,
                name: account.name.clone(),
                amounts: self
                    .years
                    .iter()
                    .map(|year| round_cents(&balances.get(account.id, *year).balance_for(account.category)))
                    .collect(),
                total: None,
            })
            .collect();

        rows.push(StatementRow {
            account_id: self.retained_result_account,
            name: RETAINED_RESULT_LABEL.to_string(),
            amounts: pnl.net_results.clone(),
            total: None,
        });

        BalanceSheet {
            years: self.years.clone(),
            rows,
        }
    }
}
