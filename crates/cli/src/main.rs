mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use fx4sight_core::PriceField;
use fx4sight_engine::{run_replay, ReplayConfig};
use fx4sight_indicators::{IndicatorConfig, IndicatorKind, DEFAULT_PERIOD};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "fx4sight")]
#[command(about = "Streaming technical indicators (SMA, EMA, RSI) over bar data")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Log line format written to stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Path to a TOML config file
    #[arg(short, long, env = "FX4SIGHT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a CSV bar file through indicators
    Replay {
        /// Path to CSV data file
        #[arg(short, long)]
        data: PathBuf,

        /// Indicator spec `kind[:period[:seed]]`, repeatable (e.g. -i sma:20 -i rsi)
        #[arg(short, long = "indicator", value_name = "SPEC")]
        indicators: Vec<IndicatorConfig>,

        /// Bar price fed to the indicators (open, high, low, close)
        #[arg(short, long)]
        field: Option<PriceField>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// List available indicators
    Indicators,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for results
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    tracing::info!("Running application");

    let app_config = match &cli.config {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading config");
            AppConfig::load(path)?
        }
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Replay {
            data,
            indicators,
            field,
            format,
        } => {
            let replay_config = ReplayConfig {
                field: field.unwrap_or(app_config.price_field),
                indicators: app_config.resolve_indicators(indicators),
            };
            replay(data, replay_config, format)?;
        }
        Commands::Indicators => {
            println!("Available indicators (spec: kind[:period[:seed]], default period {DEFAULT_PERIOD}):");
            for kind in IndicatorKind::ALL {
                println!("  {:<5} - {}", kind.as_str(), kind.description());
            }
            println!("  EMA seeds: mean_over_period (default), mean");
        }
    }

    Ok(())
}

fn replay(data_path: PathBuf, config: ReplayConfig, format: OutputFormat) -> Result<()> {
    tracing::info!(data = %data_path.display(), "Loading bars");

    let bars = fx4sight_data::load_bars_from_csv(&data_path)?;
    tracing::info!(bars = bars.len(), "Loaded historical data");

    if bars.is_empty() {
        anyhow::bail!("No bars loaded from CSV file");
    }

    let result = run_replay(&bars, &config)?;

    match format {
        OutputFormat::Table => print!("{}", output::render_table(&result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_defaults_to_text() {
        let cli = Cli::try_parse_from(["fx4sight", "indicators"]).unwrap();
        assert_eq!(cli.log_format, LogFormat::Text);
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_log_format_json() {
        let cli = Cli::try_parse_from(["fx4sight", "--log-format", "json", "indicators"]).unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(Cli::try_parse_from(["fx4sight", "--log-format", "xml", "indicators"]).is_err());
    }

    #[test]
    fn test_replay_args() {
        let cli = Cli::try_parse_from([
            "fx4sight",
            "replay",
            "-d",
            "bars.csv",
            "-i",
            "sma:20",
            "-i",
            "ema:10:mean",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Replay { data, indicators, format, field } => {
                assert_eq!(data, PathBuf::from("bars.csv"));
                assert_eq!(indicators.len(), 2);
                assert_eq!(indicators[1].label(), "ema_10_mean");
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(field, None);
            }
            Commands::Indicators => panic!("expected replay"),
        }
    }
}
