use crate::{check_period, mean, Indicator, IndicatorError, DEFAULT_PERIOD};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::trace;

/// How the first EMA value is derived from the warm-up window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmaSeed {
    /// Mean of the warm-up window divided by the period once more.
    /// This is the seed fx4sight has always produced, kept as the default.
    #[default]
    MeanOverPeriod,
    /// Plain mean of the warm-up window (the textbook seed).
    Mean,
}

impl EmaSeed {
    fn seed(self, window: &[Decimal]) -> Decimal {
        let mean = mean(window);
        match self {
            EmaSeed::MeanOverPeriod => mean / Decimal::from(window.len()),
            EmaSeed::Mean => mean,
        }
    }
}

impl FromStr for EmaSeed {
    type Err = IndicatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mean_over_period" => Ok(EmaSeed::MeanOverPeriod),
            "mean" => Ok(EmaSeed::Mean),
            other => Err(IndicatorError::InvalidSpec(format!(
                "unknown EMA seed '{other}' (expected mean or mean_over_period)"
            ))),
        }
    }
}

/// Exponential Moving Average (EMA).
#[derive(Debug, Clone)]
pub struct Ema {
    len: usize,
    multiplier: Decimal,
    seed: EmaSeed,
    prices: Vec<Decimal>,
    /// Also the previous value once the next price arrives.
    current: Option<Decimal>,
    history: Vec<Decimal>,
}

impl Ema {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        Self::with_seed(period, EmaSeed::default())
    }

    pub fn with_seed(period: usize, seed: EmaSeed) -> Result<Self, IndicatorError> {
        let len = check_period(period)?;
        Ok(Self::empty(len, seed))
    }

    fn empty(len: usize, seed: EmaSeed) -> Self {
        let multiplier = Decimal::TWO / (Decimal::from(len) + Decimal::ONE);
        Self {
            len,
            multiplier,
            seed,
            prices: Vec::new(),
            current: None,
            history: Vec::new(),
        }
    }

    /// Smoothing factor `2 / (period + 1)`.
    pub fn multiplier(&self) -> Decimal {
        self.multiplier
    }

    pub fn seed(&self) -> EmaSeed {
        self.seed
    }

    pub fn prices(&self) -> &[Decimal] {
        &self.prices
    }
}

impl Default for Ema {
    fn default() -> Self {
        Self::empty(DEFAULT_PERIOD, EmaSeed::default())
    }
}

impl Indicator for Ema {
    fn name(&self) -> &'static str {
        "EMA"
    }

    fn update(&mut self, price: Decimal) -> Option<Decimal> {
        self.prices.push(price);

        let count = self.prices.len();
        if count < self.len {
            return None;
        }

        let ema = match self.current {
            None => {
                let seed = self.seed.seed(&self.prices[count - self.len..]);
                trace!(period = self.len, seed = %seed, "EMA seeded");
                seed
            }
            // convex combination: bounded by price and prev up to rounding
            Some(prev) => (price * self.multiplier)
                .saturating_add(prev * (Decimal::ONE - self.multiplier)),
        };

        self.current = Some(ema);
        self.history.push(ema);
        self.current
    }

    fn value(&self) -> Option<Decimal> {
        self.current
    }

    fn history(&self) -> &[Decimal] {
        &self.history
    }

    fn reset(&mut self) {
        *self = Self::empty(self.len, self.seed);
    }

    fn period(&self) -> usize {
        self.len
    }
}
