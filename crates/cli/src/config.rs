use anyhow::{Context, Result};
use fx4sight_core::PriceField;
use fx4sight_indicators::{IndicatorConfig, IndicatorKind, DEFAULT_PERIOD};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application settings read from a TOML file.
///
/// ```toml
/// price_field = "close"
///
/// [[indicators]]
/// kind = "ema"
/// period = 20
/// ema_seed = "mean"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub price_field: PriceField,
    pub indicators: Vec<IndicatorConfig>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Indicators to run: command-line specs win over the config file, which
    /// wins over the built-in SMA/EMA/RSI set.
    pub fn resolve_indicators(&self, cli: Vec<IndicatorConfig>) -> Vec<IndicatorConfig> {
        if !cli.is_empty() {
            cli
        } else if !self.indicators.is_empty() {
            self.indicators.clone()
        } else {
            default_indicators()
        }
    }
}

pub fn default_indicators() -> Vec<IndicatorConfig> {
    IndicatorKind::ALL
        .iter()
        .map(|kind| IndicatorConfig::new(*kind, DEFAULT_PERIOD as i64))
        .collect()
}
