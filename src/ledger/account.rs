//! Chart of accounts registry and reference data

use std::collections::BTreeMap;

use crate::types::*;

/// Account codes of the standard bookstore chart
pub mod codes {
    use crate::types::AccountId;

    pub const CASH: AccountId = 1000;
    pub const BANK: AccountId = 1010;
    pub const RECEIVABLES: AccountId = 1100;
    pub const VAT_RECOVERABLE: AccountId = 1170;
    pub const VAT_ADJUSTMENTS: AccountId = 1171;
    pub const VAT_REDUCED_RATE: AccountId = 1172;
    pub const INVENTORY: AccountId = 1200;
    pub const STORE_EQUIPMENT: AccountId = 1500;
    pub const PAYABLES: AccountId = 2000;
    pub const VAT_DUE: AccountId = 2200;
    pub const AVS_AI_APG: AccountId = 2270;
    pub const LAA: AccountId = 2271;
    pub const IJM: AccountId = 2272;
    pub const LPP: AccountId = 2273;
    pub const WITHHOLDING_TAX: AccountId = 2279;
    pub const SALARIES_PAYABLE: AccountId = 2299;
    pub const SHARE_CAPITAL: AccountId = 2800;
    pub const RETAINED_RESULT: AccountId = 2979;
    pub const SERVICE_SALES: AccountId = 3400;
    pub const ONLINE_SALES: AccountId = 3410;
    pub const OTHER_SALES: AccountId = 3600;
    pub const BOOK_PURCHASES: AccountId = 4000;
    pub const TRANSPORT_COSTS: AccountId = 4201;
    pub const BASE_SALARIES: AccountId = 5200;
    pub const SOCIAL_CHARGES: AccountId = 5270;
    pub const MEAL_EXPENSES: AccountId = 5283;
    pub const RENT: AccountId = 6000;
    pub const CLEANING: AccountId = 6040;
    pub const ADMIN_FEES: AccountId = 6500;
    pub const TELECOM: AccountId = 6510;
    pub const ADVERTISING: AccountId = 6600;
    pub const CLIENT_GIFTS: AccountId = 6643;
    pub const OTHER_CHARGES: AccountId = 6700;
    pub const AMORTIZATION: AccountId = 6800;
    pub const FINANCIAL_CHARGES: AccountId = 6900;
    pub const EXTRAORDINARY_CHARGES: AccountId = 8200;
    pub const EXTRAORDINARY_INCOME: AccountId = 8510;
    pub const DIRECT_TAXES: AccountId = 8900;
}

/// Immutable registry of accounts, parties, analytical codes and currencies
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOfAccounts {
    accounts: BTreeMap<AccountId, Account>,
    analytical_codes: Vec<AnalyticalCode>,
    suppliers: Vec<Supplier>,
    clients: Vec<Client>,
    currencies: Vec<Currency>,
}

impl ChartOfAccounts {
    /// Create a registry from a list of accounts, rejecting duplicates and blank names
    pub fn new(accounts: Vec<Account>) -> LedgerResult<Self> {
        let mut registry = BTreeMap::new();

        for account in accounts {
            if account.name.trim().is_empty() {
                return Err(LedgerError::Validation(format!(
                    "Account {} has an empty name",
                    account.id
                )));
            }

            if registry.contains_key(&account.id) {
                return Err(LedgerError::Validation(format!(
                    "Account with ID '{}' already exists",
                    account.id
                )));
            }

            registry.insert(account.id, account);
        }

        Ok(Self {
            accounts: registry,
            analytical_codes: Vec::new(),
            suppliers: Vec::new(),
            clients: Vec::new(),
            currencies: Vec::new(),
        })
    }

    pub fn with_analytical_codes(mut self, codes: Vec<AnalyticalCode>) -> Self {
        self.analytical_codes = codes;
        self
    }

    pub fn with_suppliers(mut self, suppliers: Vec<Supplier>) -> Self {
        self.suppliers = suppliers;
        self
    }

    pub fn with_clients(mut self, clients: Vec<Client>) -> Self {
        self.clients = clients;
        self
    }

    pub fn with_currencies(mut self, currencies: Vec<Currency>) -> Self {
        self.currencies = currencies;
        self
    }

    /// Get an account by ID, returning an error if not found
    pub fn lookup(&self, account_id: AccountId) -> LedgerResult<&Account> {
        self.accounts
            .get(&account_id)
            .ok_or(LedgerError::AccountNotFound(account_id))
    }

    pub fn contains(&self, account_id: AccountId) -> bool {
        self.accounts.contains_key(&account_id)
    }

    /// All accounts in code order
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn accounts_in(&self, category: AccountCategory) -> impl Iterator<Item = &Account> {
        self.accounts
            .values()
            .filter(move |account| account.category == category)
    }

    pub fn tax_accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts
            .values()
            .filter(|account| account.kind == AccountKind::Tax)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn analytical_code(&self, code: &str) -> Option<&AnalyticalCode> {
        self.analytical_codes.iter().find(|entry| entry.code == code)
    }

    pub fn analytical_codes(&self) -> &[AnalyticalCode] {
        &self.analytical_codes
    }

    pub fn supplier(&self, id: u32) -> Option<&Supplier> {
        self.suppliers.iter().find(|supplier| supplier.id == id)
    }

    pub fn suppliers(&self) -> &[Supplier] {
        &self.suppliers
    }

    pub fn client(&self, id: u32) -> Option<&Client> {
        self.clients.iter().find(|client| client.id == id)
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    /// The standard chart of a small Swiss bookstore
    pub fn bookstore() -> LedgerResult<Self> {
        use AccountCategory::*;
        use AccountKind::*;

        let rows: [(AccountId, &str, AccountCategory, &str, &str, AccountKind); 38] = [
            (codes::CASH, "Caisse", Asset, "Actif circulant", "Liquidité", Aggregating),
            (codes::BANK, "Compte Banque", Asset, "Actif circulant", "Banque", Aggregating),
            (codes::RECEIVABLES, "Créances clients", Asset, "Actif circulant", "Créances", Aggregating),
            (codes::VAT_RECOVERABLE, "TVA à récupérer", Asset, "Actif circulant", "TVA", Tax),
            (codes::VAT_ADJUSTMENTS, "TVA ajustements", Asset, "Actif circulant", "TVA", Tax),
            (codes::VAT_REDUCED_RATE, "TVA taux réduit", Asset, "Actif circulant", "TVA", Tax),
            (codes::INVENTORY, "Stocks de marchandises", Asset, "Actif circulant", "Stocks", Aggregating),
            (codes::STORE_EQUIPMENT, "Équipements magasin", Asset, "Actif immobilisé", "Immobilisations", Aggregating),
            (codes::PAYABLES, "Dettes fournisseurs", Liability, "Dettes à court terme", "Dettes", Aggregating),
            (codes::VAT_DUE, "TVA due", Liability, "Autres dettes à court terme", "TVA", Tax),
            (codes::AVS_AI_APG, "AVS/AI/APG", Liability, "Autres dettes à court terme", "Charges sociales", Aggregating),
            (codes::LAA, "LAA", Liability, "Autres dettes à court terme", "Charges sociales", Aggregating),
            (codes::IJM, "IJM", Liability, "Autres dettes à court terme", "Charges sociales", Aggregating),
            (codes::LPP, "LPP", Liability, "Autres dettes à court terme", "Charges sociales", Aggregating),
            (codes::WITHHOLDING_TAX, "Impôt à la source", Liability, "Autres dettes à court terme", "Charges sociales", Aggregating),
            (codes::SALARIES_PAYABLE, "Salaires à payer", Liability, "Autres dettes à court terme", "Technique", Aggregating),
            (codes::SHARE_CAPITAL, "Capital social", Liability, "Fonds propres", "Capital", Aggregating),
            (codes::RETAINED_RESULT, "Bénéfice/perte", Liability, "Réserves / bénéfices et pertes", "Résultat", Aggregating),
            (codes::SERVICE_SALES, "Ventes de prestations", Revenue, "Chiffre d'affaire", "Ventes", Aggregating),
            (codes::ONLINE_SALES, "Ventes en ligne", Revenue, "Chiffre d'affaire", "Ventes", Aggregating),
            (codes::OTHER_SALES, "Autres ventes", Revenue, "Chiffre d'affaire", "Ventes", Aggregating),
            (codes::BOOK_PURCHASES, "Achats livres", Expense, "Charges de matériel", "Marchandises", Aggregating),
            (codes::TRANSPORT_COSTS, "Frais de transport", Expense, "Charges de matériel", "Marchandises", Aggregating),
            (codes::BASE_SALARIES, "Salaires de base", Expense, "Charges salariales", "Salaires", Aggregating),
            (codes::SOCIAL_CHARGES, "AVS, AI, APG", Expense, "Charges sociales", "Charges sociales", Aggregating),
            (codes::MEAL_EXPENSES, "Frais de repas", Expense, "Autres charges de personnel", "Personnel", Aggregating),
            (codes::RENT, "Loyers", Expense, "Charges de locaux", "Locaux", Aggregating),
            (codes::CLEANING, "Nettoyage", Expense, "Charges de locaux", "Locaux", Aggregating),
            (codes::ADMIN_FEES, "Frais administratifs", Expense, "Charges d'administration", "Administration", Aggregating),
            (codes::TELECOM, "Téléphone et internet", Expense, "Charges d'administration", "Administration", Aggregating),
            (codes::ADVERTISING, "Publicité", Expense, "Charges de publicité", "Publicité", Aggregating),
            (codes::CLIENT_GIFTS, "Cadeaux clients", Expense, "Charges de publicité", "Publicité", Aggregating),
            (codes::OTHER_CHARGES, "Autres charges", Expense, "Autres charges d'exploitation", "Exploitation", Aggregating),
            (codes::AMORTIZATION, "Amortissements", Expense, "Amortissements", "Amortissements", Aggregating),
            (codes::FINANCIAL_CHARGES, "Charges financières", Expense, "Charges et produits financiers", "Financier", Aggregating),
            (codes::EXTRAORDINARY_CHARGES, "Charges exceptionnelles", Expense, "Résultats extraordinaires", "Exceptionnel", Aggregating),
            (codes::EXTRAORDINARY_INCOME, "Produits exceptionnels", Revenue, "Résultats extraordinaires", "Exceptionnel", Aggregating),
            (codes::DIRECT_TAXES, "Impôts directs", Expense, "Clôture", "Impôts", Aggregating),
        ];

        let accounts: Vec<Account> = rows
            .into_iter()
            .map(|(id, name, category, sub_class, detail, kind)| {
                Account::new(id, name, category, sub_class, detail, kind)
            })
            .collect();

        let chart = Self::new(accounts)?
            .with_analytical_codes(vec![
                analytical("A001", "Ventes magasin"),
                analytical("A002", "Ventes en ligne"),
                analytical("A003", "Événements"),
            ])
            .with_suppliers(vec![
                Supplier {
                    id: 1,
                    name: "Payot Librairie".to_string(),
                    address: "Rue de la Confédération 7".to_string(),
                    postal_code: "1204".to_string(),
                    country: "CH".to_string(),
                    invoice_currency: "CHF".to_string(),
                },
                Supplier {
                    id: 2,
                    name: "Libra Diffusion".to_string(),
                    address: "Avenue de France 12".to_string(),
                    postal_code: "1004".to_string(),
                    country: "CH".to_string(),
                    invoice_currency: "CHF".to_string(),
                },
            ])
            .with_clients(vec![
                Client {
                    id: 1,
                    name: "École de Genève".to_string(),
                    address: "Rue des Écoles 10".to_string(),
                    postal_code: "1205".to_string(),
                    country: "CH".to_string(),
                },
                Client {
                    id: 2,
                    name: "Club de Lecture SA".to_string(),
                    address: "Avenue de la Paix 5".to_string(),
                    postal_code: "1202".to_string(),
                    country: "CH".to_string(),
                },
            ])
            .with_currencies(vec![
                currency("CHF", "Franc Suisse"),
                currency("EUR", "Euro"),
                currency("USD", "Dollar Américain"),
            ]);

        Ok(chart)
    }
}

fn analytical(code: &str, label: &str) -> AnalyticalCode {
    AnalyticalCode {
        code: code.to_string(),
        label: label.to_string(),
        category: AccountCategory::Revenue,
    }
}

fn currency(code: &str, name: &str) -> Currency {
    Currency {
        code: code.to_string(),
        name: name.to_string(),
    }
}
