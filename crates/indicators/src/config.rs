use crate::{Ema, EmaSeed, Indicator, IndicatorError, Rsi, Sma, DEFAULT_PERIOD};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The indicators this crate can build from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 3] = [IndicatorKind::Sma, IndicatorKind::Ema, IndicatorKind::Rsi];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorKind::Sma => "sma",
            IndicatorKind::Ema => "ema",
            IndicatorKind::Rsi => "rsi",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            IndicatorKind::Sma => "Simple Moving Average over the trailing period",
            IndicatorKind::Ema => "Exponential Moving Average, multiplier 2/(period+1)",
            IndicatorKind::Rsi => "Relative Strength Index with Wilder smoothing (0-100)",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndicatorKind {
    type Err = IndicatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sma" => Ok(IndicatorKind::Sma),
            "ema" => Ok(IndicatorKind::Ema),
            "rsi" => Ok(IndicatorKind::Rsi),
            other => Err(IndicatorError::UnknownIndicator(other.to_string())),
        }
    }
}

fn default_period() -> i64 {
    DEFAULT_PERIOD as i64
}

/// Declarative description of one indicator instance.
///
/// `period` is signed: negative values from config files or the command line
/// surface as [`IndicatorError::InvalidPeriod`] at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub kind: IndicatorKind,
    #[serde(default = "default_period")]
    pub period: i64,
    /// Only meaningful for EMA.
    #[serde(default)]
    pub ema_seed: EmaSeed,
}

impl IndicatorConfig {
    pub fn new(kind: IndicatorKind, period: i64) -> Self {
        Self {
            kind,
            period,
            ema_seed: EmaSeed::default(),
        }
    }

    /// Column label, e.g. `sma_14` or `ema_20_mean`.
    pub fn label(&self) -> String {
        match (self.kind, self.ema_seed) {
            (IndicatorKind::Ema, EmaSeed::Mean) => format!("ema_{}_mean", self.period),
            _ => format!("{}_{}", self.kind, self.period),
        }
    }

    /// Construct the configured indicator. Non-positive periods are rejected.
    pub fn build(&self) -> Result<Box<dyn Indicator>, IndicatorError> {
        let period = usize::try_from(self.period)
            .ok()
            .filter(|p| *p > 0)
            .ok_or(IndicatorError::InvalidPeriod(self.period))?;

        let indicator: Box<dyn Indicator> = match self.kind {
            IndicatorKind::Sma => Box::new(Sma::new(period)?),
            IndicatorKind::Ema => Box::new(Ema::with_seed(period, self.ema_seed)?),
            IndicatorKind::Rsi => Box::new(Rsi::new(period)?),
        };
        Ok(indicator)
    }
}

/// Parses `kind[:period[:seed]]`, e.g. `rsi`, `sma:20`, `ema:10:mean`.
impl FromStr for IndicatorConfig {
    type Err = IndicatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split(':');
        let kind: IndicatorKind = parts.next().unwrap_or_default().parse()?;

        let period = match parts.next() {
            Some(p) => p
                .trim()
                .parse::<i64>()
                .map_err(|e| IndicatorError::InvalidSpec(format!("period '{}' in '{}': {}", p, s, e)))?,
            None => default_period(),
        };

        let ema_seed = match parts.next() {
            Some(seed) if kind == IndicatorKind::Ema => seed.parse()?,
            Some(_) => {
                return Err(IndicatorError::InvalidSpec(format!(
                    "'{}': only ema accepts a seed",
                    s
                )))
            }
            None => EmaSeed::default(),
        };

        if parts.next().is_some() {
            return Err(IndicatorError::InvalidSpec(format!("'{}': too many fields", s)));
        }

        Ok(Self {
            kind,
            period,
            ema_seed,
        })
    }
}
