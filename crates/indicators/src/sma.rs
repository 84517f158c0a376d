use crate::{check_period, checked_sum, mean, Indicator, IndicatorError, DEFAULT_PERIOD};
use rust_decimal::Decimal;

/// Simple Moving Average (SMA).
///
/// Arithmetic mean of the trailing `period` prices. Every observed price is
/// retained; only the last `period` contribute to the mean.
#[derive(Debug, Clone)]
pub struct Sma {
    len: usize,
    prices: Vec<Decimal>,
    /// Sum of the trailing window, maintained incrementally.
    /// `None` while the sum does not fit in a `Decimal`.
    window_sum: Option<Decimal>,
    current: Option<Decimal>,
    history: Vec<Decimal>,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let len = check_period(period)?;
        Ok(Self::empty(len))
    }

    fn empty(len: usize) -> Self {
        Self {
            len,
            prices: Vec::new(),
            window_sum: Some(Decimal::ZERO),
            current: None,
            history: Vec::new(),
        }
    }

    /// Every price fed so far.
    pub fn prices(&self) -> &[Decimal] {
        &self.prices
    }
}

impl Default for Sma {
    fn default() -> Self {
        Self::empty(DEFAULT_PERIOD)
    }
}

impl Indicator for Sma {
    fn name(&self) -> &'static str {
        "SMA"
    }

    fn update(&mut self, price: Decimal) -> Option<Decimal> {
        self.prices.push(price);

        let count = self.prices.len();
        let start = count.saturating_sub(self.len);
        let leaving = count.checked_sub(self.len + 1).map(|i| self.prices[i]);

        self.window_sum = match (self.window_sum, leaving) {
            (Some(sum), Some(old)) => sum.checked_add(price).and_then(|s| s.checked_sub(old)),
            (Some(sum), None) => sum.checked_add(price),
            (None, _) => None,
        }
        .or_else(|| checked_sum(&self.prices[start..]));

        if count < self.len {
            return None;
        }

        let mean = match self.window_sum {
            Some(sum) => sum / Decimal::from(self.len),
            None => mean(&self.prices[start..]),
        };
        self.current = Some(mean);
        self.history.push(mean);
        self.current
    }

    fn value(&self) -> Option<Decimal> {
        self.current
    }

    fn history(&self) -> &[Decimal] {
        &self.history
    }

    fn reset(&mut self) {
        *self = Self::empty(self.len);
    }

    fn period(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sma_basic() {
        let mut sma = Sma::new(3).unwrap();
        assert_eq!(sma.update(dec!(1)), None);
        assert_eq!(sma.update(dec!(2)), None);
        assert_eq!(sma.update(dec!(3)), Some(dec!(2)));
        assert_eq!(sma.update(dec!(4)), Some(dec!(3)));
        assert_eq!(sma.update(dec!(5)), Some(dec!(4)));
        assert_eq!(sma.history(), &[dec!(2), dec!(3), dec!(4)]);
        assert_eq!(sma.value(), Some(dec!(4)));
        assert_eq!(sma.prices().len(), 5);
    }

    #[test]
    fn test_sma_warmup_is_undefined() {
        let mut sma = Sma::new(5).unwrap();
        for price in [dec!(1.1), dec!(1.2), dec!(1.3), dec!(1.4)] {
            assert_eq!(sma.update(price), None);
        }
        assert_eq!(sma.value(), None);
        assert!(sma.history().is_empty());
        assert!(!sma.is_ready());
    }

    #[test]
    fn test_sma_matches_trailing_window_mean() {
        let prices = [
            dec!(1.0850), dec!(1.0862), dec!(1.0841), dec!(1.0875), dec!(1.0890),
            dec!(1.0868), dec!(1.0901), dec!(1.0912), dec!(1.0899), dec!(1.0923),
        ];
        let period = 4;
        let mut sma = Sma::new(period).unwrap();
        for (i, price) in prices.iter().enumerate() {
            let result = sma.update(*price);
            if i + 1 < period {
                assert_eq!(result, None);
                continue;
            }
            let window = &prices[i + 1 - period..=i];
            let expected: Decimal = window.iter().sum::<Decimal>() / Decimal::from(period);
            assert_eq!(result, Some(expected), "bar {i}");
        }
        assert_eq!(sma.history().len(), prices.len() - period + 1);
    }

    #[test]
    fn test_sma_large_prices_do_not_overflow() {
        let big = dec!(50000000000000000000000000000);
        let mut sma = Sma::new(2).unwrap();
        assert_eq!(sma.update(big), None);
        assert_eq!(sma.update(big), Some(big));
        assert!(sma.update(Decimal::ONE).is_some());
        // back within range: exact running sum again
        assert_eq!(sma.update(dec!(3)), Some(dec!(2)));
        assert_eq!(sma.history().len(), 3);

        let mut sma = Sma::new(3).unwrap();
        for _ in 0..4 {
            sma.update(Decimal::MAX);
        }
        assert!(sma.value().unwrap() >= Decimal::MAX - dec!(10));
    }

    #[test]
    fn test_sma_period_one_tracks_price() {
        let mut sma = Sma::new(1).unwrap();
        assert_eq!(sma.update(dec!(7)), Some(dec!(7)));
        assert_eq!(sma.update(dec!(3)), Some(dec!(3)));
    }

    #[test]
    fn test_sma_rejects_zero_period() {
        assert_eq!(Sma::new(0).unwrap_err(), IndicatorError::InvalidPeriod(0));
    }

    #[test]
    fn test_sma_default_period() {
        assert_eq!(Sma::default().period(), DEFAULT_PERIOD);
    }

    #[test]
    fn test_sma_reset() {
        let mut sma = Sma::new(2).unwrap();
        sma.update(dec!(10));
        sma.update(dec!(20));
        sma.reset();
        assert!(!sma.is_ready());
        assert!(sma.history().is_empty());
        assert_eq!(sma.update(dec!(5)), None);
        assert_eq!(sma.update(dec!(15)), Some(dec!(10)));
    }

    #[test]
    fn test_sma_deterministic() {
        let prices = [dec!(3), dec!(1), dec!(4), dec!(1), dec!(5), dec!(9), dec!(2), dec!(6)];
        let mut a = Sma::new(3).unwrap();
        let mut b = Sma::new(3).unwrap();
        for p in prices {
            a.update(p);
            b.update(p);
        }
        assert_eq!(a.history(), b.history());
    }
}
