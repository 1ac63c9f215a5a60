//! Value source implementations: a seeded random generator and a scripted replay for tests

use bigdecimal::BigDecimal;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

use crate::config::AmountRange;
use crate::traits::ValueSource;

/// Uniform random values from a seedable generator
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// Reproducible source: the same seed replays the same ledger
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl ValueSource for RandomSource {
    fn amount(&mut self, range: &AmountRange) -> BigDecimal {
        let (low, high) = range.cent_bounds();
        let cents = if low >= high {
            low
        } else {
            self.rng.gen_range(low..=high)
        };
        BigDecimal::new(cents.into(), 2)
    }

    fn integer(&mut self, low: i64, high: i64) -> i64 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen::<f64>() < probability
    }

    fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}

/// Replays pre-recorded values in order.
///
/// When a queue runs dry it falls back to the lowest value of the requested range,
/// `false` for chances and `0` for indices.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    amounts: VecDeque<BigDecimal>,
    integers: VecDeque<i64>,
    chances: VecDeque<bool>,
    indices: VecDeque<usize>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_amounts(mut self, amounts: impl IntoIterator<Item = BigDecimal>) -> Self {
        self.amounts.extend(amounts);
        self
    }

    pub fn with_integers(mut self, integers: impl IntoIterator<Item = i64>) -> Self {
        self.integers.extend(integers);
        self
    }

    pub fn with_chances(mut self, chances: impl IntoIterator<Item = bool>) -> Self {
        self.chances.extend(chances);
        self
    }

    pub fn with_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.indices.extend(indices);
        self
    }
}

impl ValueSource for ScriptedSource {
    fn amount(&mut self, range: &AmountRange) -> BigDecimal {
        self.amounts
            .pop_front()
            .unwrap_or_else(|| range.min.clone())
    }

    fn integer(&mut self, low: i64, _high: i64) -> i64 {
        self.integers.pop_front().unwrap_or(low)
    }

    fn chance(&mut self, _probability: f64) -> bool {
        self.chances.pop_front().unwrap_or(false)
    }

    fn index(&mut self, len: usize) -> usize {
        self.indices
            .pop_front()
            .map(|index| index.min(len.saturating_sub(1)))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_sources_replay() {
        let range = AmountRange::units(500, 5000);
        let mut first = RandomSource::seeded(42);
        let mut second = RandomSource::seeded(42);

        for _ in 0..50 {
            let amount = first.amount(&range);
            assert_eq!(amount, second.amount(&range));
            assert!(range.contains(&amount));
            assert_eq!(first.integer(10, 30), second.integer(10, 30));
            assert_eq!(first.chance(0.5), second.chance(0.5));
        }
    }

    #[test]
    fn test_random_amounts_have_cent_precision() {
        let mut source = RandomSource::seeded(7);
        let amount = source.amount(&AmountRange::units(1, 2));
        assert_eq!(amount.round(2), amount);
        assert_eq!(source.index(1), 0);
        assert!(!source.chance(0.0));
        assert!(source.chance(1.0));
    }

    #[test]
    fn test_scripted_source_falls_back_to_low_values() {
        let mut source = ScriptedSource::new()
            .with_amounts([BigDecimal::from(4000)])
            .with_integers([27])
            .with_chances([true])
            .with_indices([5]);
        let range = AmountRange::units(3000, 5000);

        assert_eq!(source.amount(&range), BigDecimal::from(4000));
        assert_eq!(source.amount(&range), BigDecimal::from(3000));
        assert_eq!(source.integer(25, 28), 27);
        assert_eq!(source.integer(25, 28), 25);
        assert!(source.chance(0.1));
        assert!(!source.chance(0.9));
        assert_eq!(source.index(2), 1);
        assert_eq!(source.index(2), 0);
    }
}
