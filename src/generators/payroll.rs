//! Monthly payroll with social charge components

use bigdecimal::BigDecimal;

use crate::config::PayrollParams;
use crate::generators::Generated;
use crate::ledger::{codes, ChartOfAccounts, TransactionBuilder};
use crate::traits::ValueSource;
use crate::types::*;
use crate::utils::validation::{date, round_cents};

/// Social charge components: liability account, rate in percent, label
pub const SOCIAL_CHARGES: [(AccountId, u32, &str); 5] = [
    (codes::AVS_AI_APG, 6, "AVS/AC/AMAT"),
    (codes::LAA, 2, "LAA"),
    (codes::IJM, 1, "IJM"),
    (codes::LPP, 3, "LPP"),
    (codes::WITHHOLDING_TAX, 3, "IS"),
];

pub struct PayrollGenerator<'a> {
    chart: &'a ChartOfAccounts,
    params: &'a PayrollParams,
}

impl<'a> PayrollGenerator<'a> {
    pub fn new(chart: &'a ChartOfAccounts, params: &'a PayrollParams) -> Self {
        Self { chart, params }
    }

    /// Payroll run of one month.
    ///
    /// Each charge component and the gross salary are debited to salary expense against their
    /// liability; a single bank payment of gross plus charges is credited against salaries
    /// payable. The legs only balance as a whole.
    pub fn generate_month(
        &self,
        year: i32,
        month: u32,
        source: &mut dyn ValueSource,
    ) -> LedgerResult<Generated<PayrollRun>> {
        let day = source.integer(self.params.pay_day.min, self.params.pay_day.max);
        let day = u32::try_from(day)
            .map_err(|_| LedgerError::Validation(format!("Invalid pay day {}", day)))?;
        let pay_date = date(year, month, day)?;
        let gross = source.amount(&self.params.salary) * BigDecimal::from(self.params.headcount);
        let reference = format!("SAL-{}-{:02}", year, month);

        let mut builder =
            TransactionBuilder::new(reference.clone(), format!("Salaires mois {}", month));
        let mut social_charges = BigDecimal::from(0);

        for (liability, percent, name) in SOCIAL_CHARGES {
            let charge = round_cents(&(&gross * BigDecimal::from(percent) / BigDecimal::from(100)));
            social_charges += &charge;
            builder = builder.debit_leg(
                pay_date,
                codes::BASE_SALARIES,
                liability,
                charge,
                format!("Salaire - {} mois {}", name, month),
            );
        }

        builder = builder.debit_leg(
            pay_date,
            codes::BASE_SALARIES,
            codes::SALARIES_PAYABLE,
            gross.clone(),
            format!("Salaire - Salaire à payer mois {}", month),
        );

        let total_paid = &gross + &social_charges;
        builder = builder.credit_leg(
            pay_date,
            codes::SALARIES_PAYABLE,
            codes::BANK,
            total_paid.clone(),
            format!("Paiement salaire mois {}", month),
        );

        let meal_expense = if source.chance(self.params.meal_probability) {
            let meal = source.amount(&self.params.meal_expense);
            builder = builder.entry(
                pay_date,
                codes::MEAL_EXPENSES,
                codes::BANK,
                meal.clone(),
                format!("Frais de repas mois {}", month),
            );
            Some(meal)
        } else {
            None
        };

        let transaction = builder.build(self.chart)?;

        Ok(Generated {
            document: PayrollRun {
                reference,
                date: pay_date,
                gross,
                social_charges,
                total_paid,
                meal_expense,
            },
            transaction,
        })
    }

    /// Twelve monthly runs
    pub fn generate_year(
        &self,
        year: i32,
        source: &mut dyn ValueSource,
    ) -> LedgerResult<Vec<Generated<PayrollRun>>> {
        (1..=12)
            .map(|month| self.generate_month(year, month, source))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::tests::OutOfRange;
    use crate::utils::{RandomSource, ScriptedSource};

    fn cash_effect(transaction: &Transaction) -> BigDecimal {
        transaction
            .postings
            .iter()
            .map(|p| match p.entry_type {
                EntryType::Debit if p.debit_account == codes::BANK => p.amount.clone(),
                EntryType::Credit if p.credit_account == codes::BANK => -p.amount.clone(),
                _ => BigDecimal::from(0),
            })
            .sum()
    }

    #[test]
    fn test_gross_20000_breakdown() {
        let chart = ChartOfAccounts::bookstore().unwrap();
        let params = PayrollParams::default();
        let generator = PayrollGenerator::new(&chart, &params);
        let mut source = ScriptedSource::new().with_amounts([BigDecimal::from(4000)]);

        let generated = generator.generate_month(2021, 3, &mut source).unwrap();
        let run = &generated.document;
        let postings = &generated.transaction.postings;

        assert_eq!(run.reference, "SAL-2021-03");
        assert_eq!(run.date, date(2021, 3, 25).unwrap());
        assert_eq!(run.gross, BigDecimal::from(20000));
        assert_eq!(run.social_charges, BigDecimal::from(3000));
        assert_eq!(run.total_paid, BigDecimal::from(23000));
        assert_eq!(run.meal_expense, None);

        assert_eq!(postings.len(), 7);
        let components: Vec<BigDecimal> = postings[..5].iter().map(|p| p.amount.clone()).collect();
        let expected: Vec<BigDecimal> = [1200u32, 400, 200, 600, 600]
            .iter()
            .map(|amount| BigDecimal::from(*amount))
            .collect();
        assert_eq!(components, expected);
        assert_eq!(postings[5].credit_account, codes::SALARIES_PAYABLE);
        assert_eq!(postings[5].amount, BigDecimal::from(20000));
        assert_eq!(postings[6].entry_type, EntryType::Credit);
        assert_eq!(postings[6].amount, BigDecimal::from(23000));
        assert_eq!(cash_effect(&generated.transaction), BigDecimal::from(-23000));
    }

    #[test]
    fn test_meal_expense_adds_a_balanced_pair() {
        let chart = ChartOfAccounts::bookstore().unwrap();
        let params = PayrollParams::default();
        let generator = PayrollGenerator::new(&chart, &params);
        let mut source = ScriptedSource::new()
            .with_integers([28])
            .with_amounts([BigDecimal::from(3000), BigDecimal::from(90)])
            .with_chances([true]);

        let generated = generator.generate_month(2024, 2, &mut source).unwrap();

        assert_eq!(generated.transaction.postings.len(), 9);
        assert_eq!(generated.document.meal_expense, Some(BigDecimal::from(90)));
        assert_eq!(generated.document.date, date(2024, 2, 28).unwrap());
        assert_eq!(
            cash_effect(&generated.transaction),
            BigDecimal::from(-(15000 + 2250 + 90))
        );
        assert!(generated.transaction.is_balanced());
    }

    #[test]
    fn test_negative_pay_day_is_an_error() {
        let chart = ChartOfAccounts::bookstore().unwrap();
        let params = PayrollParams::default();
        let generator = PayrollGenerator::new(&chart, &params);

        let result = generator.generate_month(2021, 1, &mut OutOfRange);
        match result {
            Err(LedgerError::Validation(msg)) => assert!(msg.contains("-1")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_year_has_twelve_runs() {
        let chart = ChartOfAccounts::bookstore().unwrap();
        let params = PayrollParams::default();
        let generator = PayrollGenerator::new(&chart, &params);
        let mut source = RandomSource::seeded(1);

        let runs = generator.generate_year(2025, &mut source).unwrap();
        assert_eq!(runs.len(), 12);
        for (month, generated) in runs.iter().enumerate() {
            assert_eq!(generated.document.reference, format!("SAL-2025-{:02}", month + 1));
            assert!(generated.transaction.is_balanced());
        }
    }
}
