//! Monthly exchange quotes; reference data only, never posted

use crate::config::ExchangeQuoteParams;
use crate::traits::ValueSource;
use crate::types::*;
use crate::utils::validation::date;

pub struct ExchangeQuoteGenerator<'a> {
    params: &'a ExchangeQuoteParams,
}

impl<'a> ExchangeQuoteGenerator<'a> {
    pub fn new(params: &'a ExchangeQuoteParams) -> Self {
        Self { params }
    }

    /// One quote per configured currency on the first of each month
    pub fn generate_year(
        &self,
        year: i32,
        source: &mut dyn ValueSource,
    ) -> LedgerResult<Vec<ExchangeQuote>> {
        let mut quotes = Vec::with_capacity(12 * self.params.currencies.len());

        for month in 1..=12 {
            let quote_date = date(year, month, 1)?;
            for currency in &self.params.currencies {
                quotes.push(ExchangeQuote {
                    currency_code: currency.clone(),
                    date: quote_date,
                    rate: source.amount(&self.params.rate),
                    source: self.params.source.clone(),
                });
            }
        }

        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::RandomSource;

    #[test]
    fn test_monthly_quotes_per_currency() {
        let params = ExchangeQuoteParams::default();
        let generator = ExchangeQuoteGenerator::new(&params);
        let mut source = RandomSource::seeded(4);

        let quotes = generator.generate_year(2023, &mut source).unwrap();

        assert_eq!(quotes.len(), 24);
        assert_eq!(quotes[0].currency_code, "EUR");
        assert_eq!(quotes[1].currency_code, "USD");
        assert_eq!(quotes[23].date, date(2023, 12, 1).unwrap());
        for quote in &quotes {
            assert!(params.rate.contains(&quote.rate));
            assert_eq!(quote.rate.round(2), quote.rate);
            assert_eq!(quote.source, "Table de monnaies Abacus");
        }
    }
}
