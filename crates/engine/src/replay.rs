use chrono::{DateTime, Utc};
use fx4sight_core::{Bar, PriceField};
use fx4sight_indicators::{Indicator, IndicatorConfig, IndicatorError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::summary::{compute_summary, IndicatorSummary};

/// Errors raised while replaying bars.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Indicator(#[from] IndicatorError),
    #[error("No indicators configured")]
    NoIndicators,
    #[error("Bar {index} at {current} does not follow previous bar at {previous}")]
    OutOfOrder {
        index: usize,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },
}

/// Configuration for a replay run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplayConfig {
    #[serde(default)]
    pub field: PriceField,
    pub indicators: Vec<IndicatorConfig>,
}

/// Indicator outputs for one bar, in the same order as the result labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayRow {
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
    pub values: Vec<Option<Decimal>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayResult {
    pub instrument: String,
    pub field: PriceField,
    pub labels: Vec<String>,
    pub rows: Vec<ReplayRow>,
    pub summaries: Vec<IndicatorSummary>,
}

impl ReplayResult {
    /// Values of one indicator across all bars, by label.
    pub fn column(&self, label: &str) -> Option<Vec<Option<Decimal>>> {
        let idx = self.labels.iter().position(|l| l == label)?;
        Some(self.rows.iter().map(|row| row.values[idx]).collect())
    }
}

/// Feed bars through freshly built indicators, one price per bar.
///
/// Bars must be in strictly increasing timestamp order.
pub fn run_replay(bars: &[Bar], config: &ReplayConfig) -> Result<ReplayResult, EngineError> {
    if config.indicators.is_empty() {
        return Err(EngineError::NoIndicators);
    }

    let mut indicators: Vec<(String, Box<dyn Indicator>)> = config
        .indicators
        .iter()
        .map(|c| c.build().map(|ind| (c.label(), ind)))
        .collect::<Result<_, _>>()?;

    let instrument = bars.first().map(|b| b.instrument.clone()).unwrap_or_default();

    info!(
        instrument = %instrument,
        bars = bars.len(),
        field = %config.field,
        indicators = indicators.len(),
        "Starting replay"
    );

    let mut rows = Vec::with_capacity(bars.len());
    let mut previous: Option<DateTime<Utc>> = None;

    for (index, bar) in bars.iter().enumerate() {
        if let Some(prev) = previous {
            if bar.timestamp <= prev {
                return Err(EngineError::OutOfOrder {
                    index,
                    previous: prev,
                    current: bar.timestamp,
                });
            }
        }
        previous = Some(bar.timestamp);

        let price = bar.price(config.field);
        let values = indicators
            .iter_mut()
            .map(|(_, indicator)| indicator.update(price))
            .collect();

        rows.push(ReplayRow {
            timestamp: bar.timestamp,
            price,
            values,
        });
    }

    let summaries: Vec<IndicatorSummary> = indicators
        .iter()
        .map(|(label, indicator)| compute_summary(label, indicator.as_ref()))
        .collect();

    for summary in &summaries {
        debug!(label = %summary.label, emitted = summary.emitted, last = ?summary.last, "Indicator finished");
    }
    info!(rows = rows.len(), "Replay complete");

    Ok(ReplayResult {
        instrument,
        field: config.field,
        labels: indicators.into_iter().map(|(label, _)| label).collect(),
        rows,
        summaries,
    })
}
