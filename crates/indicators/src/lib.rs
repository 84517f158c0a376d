pub mod config;
pub mod ema;
pub mod rsi;
pub mod sma;

use rust_decimal::Decimal;

pub use config::{IndicatorConfig, IndicatorKind};
pub use ema::{Ema, EmaSeed};
pub use rsi::Rsi;
pub use sma::Sma;

/// Period used when none is configured.
pub const DEFAULT_PERIOD: usize = 14;

/// Errors raised while configuring an indicator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndicatorError {
    #[error("Invalid period {0}: period must be a positive integer")]
    InvalidPeriod(i64),
    #[error("Unknown indicator: {0}")]
    UnknownIndicator(String),
    #[error("Invalid indicator spec: {0}")]
    InvalidSpec(String),
}

/// Trait for streaming (incremental) indicators.
/// Feed one price per bar; the indicator maintains internal state.
pub trait Indicator: Send + Sync {
    /// Short display name, e.g. "SMA".
    fn name(&self) -> &'static str;

    /// Process the next price and return the indicator output (if warmed up).
    fn update(&mut self, price: Decimal) -> Option<Decimal>;

    /// The last computed value, without feeding new data.
    fn value(&self) -> Option<Decimal>;

    /// Every value emitted so far, oldest first.
    fn history(&self) -> &[Decimal];

    /// Reset the indicator to its initial state.
    fn reset(&mut self);

    /// The configured lookback period.
    fn period(&self) -> usize;

    /// The number of prices needed before the indicator produces output.
    fn warmup(&self) -> usize {
        self.period()
    }

    /// Whether the indicator has enough data to produce output.
    fn is_ready(&self) -> bool {
        self.value().is_some()
    }
}

/// Sum of `values`, or `None` if it does not fit in a `Decimal`.
pub(crate) fn checked_sum(values: &[Decimal]) -> Option<Decimal> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
}

/// Arithmetic mean of `values`, which must not be empty.
///
/// When the plain sum overflows, averages `value / len` terms instead; a mean
/// within rounding distance of `Decimal::MAX` saturates.
pub fn mean(values: &[Decimal]) -> Decimal {
    let len = Decimal::from(values.len());
    match checked_sum(values) {
        Some(sum) => sum / len,
        None => values
            .iter()
            .fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v / len)),
    }
}

pub(crate) fn check_period(period: usize) -> Result<usize, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidPeriod(0));
    }
    Ok(period)
}
