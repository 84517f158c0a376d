use crate::{check_period, mean, Indicator, IndicatorError, DEFAULT_PERIOD};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, trace};

/// RSI reported when prices have not moved at all over the lookback.
pub const FLAT_RSI: Decimal = dec!(50);

const MAX_RSI: Decimal = dec!(100);

/// Relative Strength Index (RSI).
/// Seeds average gain/loss with a plain mean, then applies Wilder's smoothing.
#[derive(Debug, Clone)]
pub struct Rsi {
    len: usize,
    prices: Vec<Decimal>,
    gains: Vec<Decimal>,
    losses: Vec<Decimal>,
    avg_gain: Option<Decimal>,
    avg_loss: Option<Decimal>,
    current: Option<Decimal>,
    history: Vec<Decimal>,
}

impl Rsi {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let len = check_period(period)?;
        Ok(Self::empty(len))
    }

    fn empty(len: usize) -> Self {
        Self {
            len,
            prices: Vec::new(),
            gains: Vec::new(),
            losses: Vec::new(),
            avg_gain: None,
            avg_loss: None,
            current: None,
            history: Vec::new(),
        }
    }

    pub fn prices(&self) -> &[Decimal] {
        &self.prices
    }

    /// Upward moves between consecutive prices (zero for down or flat bars).
    pub fn gains(&self) -> &[Decimal] {
        &self.gains
    }

    /// Downward moves between consecutive prices, as positive numbers.
    pub fn losses(&self) -> &[Decimal] {
        &self.losses
    }

    pub fn avg_gain(&self) -> Option<Decimal> {
        self.avg_gain
    }

    pub fn avg_loss(&self) -> Option<Decimal> {
        self.avg_loss
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::empty(DEFAULT_PERIOD)
    }
}

/// `100 - 100 / (1 + avg_gain / avg_loss)`, with the zero-loss cases pinned:
/// all gains reads 100, no movement at all reads [`FLAT_RSI`].
fn rsi_from_averages(avg_gain: Decimal, avg_loss: Decimal) -> Decimal {
    if avg_loss.is_zero() {
        return if avg_gain.is_zero() { FLAT_RSI } else { MAX_RSI };
    }
    avg_gain
        .checked_div(avg_loss)
        .and_then(|rs| rs.checked_add(Decimal::ONE))
        .and_then(|denom| MAX_RSI.checked_div(denom))
        .map(|x| MAX_RSI - x)
        // rs too large to represent: the loss side is negligible
        .unwrap_or(MAX_RSI)
}

/// One step of Wilder's smoothing: `(prev * (period - 1) + latest) / period`.
fn wilder(prev: Decimal, latest: Decimal, period: Decimal) -> Decimal {
    prev.checked_mul(period - Decimal::ONE)
        .and_then(|x| x.checked_add(latest))
        .map(|x| x / period)
        // same average, scaled before summing
        .unwrap_or_else(|| (prev - prev / period).saturating_add(latest / period))
}

impl Indicator for Rsi {
    fn name(&self) -> &'static str {
        "RSI"
    }

    fn update(&mut self, price: Decimal) -> Option<Decimal> {
        if let Some(&prev) = self.prices.last() {
            let change = price.saturating_sub(prev);
            self.gains.push(change.max(Decimal::ZERO));
            self.losses.push((-change).max(Decimal::ZERO));
        }
        self.prices.push(price);

        if self.prices.len() <= self.len {
            return None;
        }

        let period = Decimal::from(self.len);
        let (avg_gain, avg_loss) = match (self.avg_gain, self.avg_loss) {
            (Some(prev_ag), Some(prev_al)) => {
                let last = self.gains.len() - 1;
                (
                    wilder(prev_ag, self.gains[last], period),
                    wilder(prev_al, self.losses[last], period),
                )
            }
            _ => {
                // First full lookback: exactly `period` deltas recorded
                let (avg_gain, avg_loss) = (mean(&self.gains), mean(&self.losses));
                trace!(period = self.len, %avg_gain, %avg_loss, "RSI seeded");
                (avg_gain, avg_loss)
            }
        };

        if avg_loss.is_zero() {
            debug!(period = self.len, %avg_gain, "RSI average loss is zero");
        }

        let rsi = rsi_from_averages(avg_gain, avg_loss);
        self.avg_gain = Some(avg_gain);
        self.avg_loss = Some(avg_loss);
        self.current = Some(rsi);
        self.history.push(rsi);
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

    fn warmup(&self) -> usize {
        self.len + 1 // need one extra data point for the first change
    }
}
