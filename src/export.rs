//! Tabular schema handed to export collaborators
//!
//! The engine only defines table names, column names and column types. Writing the tables to
//! a spreadsheet or CSV file is left to the caller.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::traits::Tabular;
use crate::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Decimal,
    Text,
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// A single table cell; `Empty` stands for a missing value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Integer(i64),
    Decimal(BigDecimal),
    Text(String),
    Date(NaiveDate),
    Empty,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn optional_text(value: Option<&str>) -> Self {
        value.map(Cell::text).unwrap_or(Cell::Empty)
    }

    pub fn optional_decimal(value: Option<&BigDecimal>) -> Self {
        value.cloned().map(Cell::Decimal).unwrap_or(Cell::Empty)
    }

    pub fn optional_date(value: Option<NaiveDate>) -> Self {
        value.map(Cell::Date).unwrap_or(Cell::Empty)
    }
}

/// Named table with a fixed column schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Lay out a slice of records using their [`Tabular`] schema
    pub fn from_records<T: Tabular>(name: impl Into<String>, records: &[T]) -> Self {
        Self {
            name: name.into(),
            columns: T::columns(),
            rows: records.iter().map(T::cells).collect(),
        }
    }

    /// Same table under another name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Ordered collection of the tables produced by a simulation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub tables: Vec<Table>,
}

impl Dataset {
    pub fn push(&mut self, table: Table) {
        self.tables.push(table);
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|table| table.name == name)
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|table| table.name.as_str()).collect()
    }
}

impl Tabular for Posting {
    fn columns() -> Vec<Column> {
        vec![
            Column::new("Date", ColumnType::Date),
            Column::new("CompteDebit", ColumnType::Integer),
            Column::new("CompteCredit", ColumnType::Integer),
            Column::new("MontantDebit", ColumnType::Decimal),
            Column::new("MontantCredit", ColumnType::Decimal),
            Column::new("Libelle", ColumnType::Text),
            Column::new("CodeAnalytique", ColumnType::Text),
            Column::new("RefDocument", ColumnType::Text),
        ]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Date(self.date),
            Cell::Integer(i64::from(self.debit_account)),
            Cell::Integer(i64::from(self.credit_account)),
            Cell::optional_decimal(self.debit_amount()),
            Cell::optional_decimal(self.credit_amount()),
            Cell::text(&self.label),
            Cell::optional_text(self.analytical_code.as_deref()),
            Cell::optional_text(self.document_ref.as_deref()),
        ]
    }
}

impl Tabular for Account {
    fn columns() -> Vec<Column> {
        vec![
            Column::new("Compte", ColumnType::Integer),
            Column::new("Intitule", ColumnType::Text),
            Column::new("Categorie", ColumnType::Text),
            Column::new("SousClasse", ColumnType::Text),
            Column::new("DetailCategorie", ColumnType::Text),
            Column::new("TypeCompte", ColumnType::Text),
        ]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Integer(i64::from(self.id)),
            Cell::text(&self.name),
            Cell::text(self.category.label()),
            Cell::text(&self.sub_class),
            Cell::text(&self.detail),
            Cell::text(self.kind.label()),
        ]
    }
}

impl Tabular for AnalyticalCode {
    fn columns() -> Vec<Column> {
        vec![
            Column::new("Code", ColumnType::Text),
            Column::new("Libelle", ColumnType::Text),
            Column::new("Type", ColumnType::Text),
        ]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.code),
            Cell::text(&self.label),
            Cell::text(self.category.label()),
        ]
    }
}

impl Tabular for Supplier {
    fn columns() -> Vec<Column> {
        vec![
            Column::new("IDFournisseur", ColumnType::Integer),
            Column::new("Nom", ColumnType::Text),
            Column::new("Adresse", ColumnType::Text),
            Column::new("CodePostal", ColumnType::Text),
            Column::new("Pays", ColumnType::Text),
            Column::new("DeviseFacture", ColumnType::Text),
        ]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Integer(i64::from(self.id)),
            Cell::text(&self.name),
            Cell::text(&self.address),
            Cell::text(&self.postal_code),
            Cell::text(&self.country),
            Cell::text(&self.invoice_currency),
        ]
    }
}

impl Tabular for Client {
    fn columns() -> Vec<Column> {
        vec![
            Column::new("IDClient", ColumnType::Integer),
            Column::new("Nom", ColumnType::Text),
            Column::new("Adresse", ColumnType::Text),
            Column::new("CodePostal", ColumnType::Text),
            Column::new("Pays", ColumnType::Text),
        ]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Integer(i64::from(self.id)),
            Cell::text(&self.name),
            Cell::text(&self.address),
            Cell::text(&self.postal_code),
            Cell::text(&self.country),
        ]
    }
}

impl Tabular for Currency {
    fn columns() -> Vec<Column> {
        vec![
            Column::new("Code", ColumnType::Text),
            Column::new("Nom", ColumnType::Text),
        ]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![Cell::text(&self.code), Cell::text(&self.name)]
    }
}

fn invoice_columns(party_column: &str) -> Vec<Column> {
    vec![
        Column::new("NumeroDocument", ColumnType::Integer),
        Column::new(party_column, ColumnType::Integer),
        Column::new("DateFacture", ColumnType::Date),
        Column::new("NumeroFacture", ColumnType::Text),
        Column::new("DatePaiement", ColumnType::Date),
        Column::new("Montant", ColumnType::Decimal),
        Column::new("Monnaie", ColumnType::Text),
        Column::new("StatutFacture", ColumnType::Text),
        Column::new("TypeDocument", ColumnType::Text),
        Column::new("RefDocument", ColumnType::Text),
    ]
}

impl Tabular for SupplierInvoice {
    fn columns() -> Vec<Column> {
        invoice_columns("IDFournisseur")
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Integer(i64::from(self.document_number)),
            Cell::Integer(i64::from(self.supplier_id)),
            Cell::Date(self.invoice_date),
            Cell::text(&self.invoice_number),
            Cell::optional_date(self.payment_date),
            Cell::Decimal(self.amount.clone()),
            Cell::text(&self.currency),
            Cell::text(self.status.code()),
            Cell::text(INVOICE_DOCUMENT_TYPE),
            Cell::text(&self.reference),
        ]
    }
}

impl Tabular for ClientInvoice {
    fn columns() -> Vec<Column> {
        invoice_columns("IDClient")
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Integer(i64::from(self.document_number)),
            Cell::Integer(i64::from(self.client_id)),
            Cell::Date(self.invoice_date),
            Cell::text(&self.invoice_number),
            Cell::optional_date(self.payment_date),
            Cell::Decimal(self.amount.clone()),
            Cell::text(&self.currency),
            Cell::text(self.status.code()),
            Cell::text(INVOICE_DOCUMENT_TYPE),
            Cell::text(&self.reference),
        ]
    }
}

impl Tabular for PayrollRun {
    fn columns() -> Vec<Column> {
        vec![
            Column::new("RefDocument", ColumnType::Text),
            Column::new("Date", ColumnType::Date),
            Column::new("SalaireBrut", ColumnType::Decimal),
            Column::new("ChargesSociales", ColumnType::Decimal),
            Column::new("MontantVerse", ColumnType::Decimal),
            Column::new("FraisRepas", ColumnType::Decimal),
        ]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.reference),
            Cell::Date(self.date),
            Cell::Decimal(self.gross.clone()),
            Cell::Decimal(self.social_charges.clone()),
            Cell::Decimal(self.total_paid.clone()),
            Cell::optional_decimal(self.meal_expense.as_ref()),
        ]
    }
}

impl Tabular for ExchangeQuote {
    fn columns() -> Vec<Column> {
        vec![
            Column::new("CodeMonnaie", ColumnType::Text),
            Column::new("DateCotation", ColumnType::Date),
            Column::new("Taux", ColumnType::Decimal),
            Column::new("Source", ColumnType::Text),
        ]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.currency_code),
            Cell::Date(self.date),
            Cell::Decimal(self.rate.clone()),
            Cell::text(&self.source),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posting_row_matches_schema() {
        let mut posting = Posting::credit(
            NaiveDate::from_ymd_opt(2023, 4, 30).unwrap(),
            2200,
            1010,
            BigDecimal::from(300),
            "Paiement TVA Q1 2023",
        );
        posting.document_ref = Some("TVA-2023-Q1".to_string());

        let table = Table::from_records("GrandLivre", &[posting]);
        assert_eq!(table.columns.len(), table.rows[0].len());

        let debit_idx = table.column_index("MontantDebit").unwrap();
        let credit_idx = table.column_index("MontantCredit").unwrap();
        let analytic_idx = table.column_index("CodeAnalytique").unwrap();
        assert_eq!(table.rows[0][debit_idx], Cell::Empty);
        assert_eq!(
            table.rows[0][credit_idx],
            Cell::Decimal(BigDecimal::from(300))
        );
        assert_eq!(table.rows[0][analytic_idx], Cell::Empty);
    }

    #[test]
    fn test_dataset_lookup_by_name() {
        let mut dataset = Dataset::default();
        let monnaies = Table::from_records(
            "Monnaies",
            &[Currency {
                code: "CHF".to_string(),
                name: "Franc Suisse".to_string(),
            }],
        );
        dataset.push(monnaies.renamed("Devises"));
        dataset.push(monnaies);

        assert_eq!(dataset.table_names(), vec!["Devises", "Monnaies"]);
        assert_eq!(dataset.get("Monnaies").map(Table::len), Some(1));
        assert!(dataset.get("Bilan").is_none());
    }
}
