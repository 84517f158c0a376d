use fx4sight_engine::ReplayResult;
use rust_decimal::Decimal;

/// Render a value for the table view; warm-up bars show as `-`.
pub fn format_value(value: Option<Decimal>) -> String {
    match value {
        Some(v) => format!("{:.4}", v.round_dp(4)),
        None => "-".to_string(),
    }
}

/// Plain-text table: one row per bar followed by a summary block.
pub fn render_table(result: &ReplayResult) -> String {
    let width = 12;
    let mut out = format!("{:<20} {:>width$}", "timestamp", result.field.to_string());
    for label in &result.labels {
        out.push_str(&format!(" {:>width$}", label));
    }
    out.push('\n');

    for row in &result.rows {
        out.push_str(&format!(
            "{:<20} {:>width$}",
            row.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            row.price.to_string()
        ));
        for value in &row.values {
            out.push_str(&format!(" {:>width$}", format_value(*value)));
        }
        out.push('\n');
    }

    let sep = "=".repeat(60);
    out.push_str(&format!("\n{sep}\n"));
    out.push_str(&format!(
        "  SUMMARY  {} ({} bars)\n",
        result.instrument,
        result.rows.len()
    ));
    out.push_str(&format!("{sep}\n"));
    for s in &result.summaries {
        out.push_str(&format!(
            "  {:<14} last {:>10}  min {:>10}  max {:>10}  emitted {}\n",
            s.label,
            format_value(s.last),
            format_value(s.min),
            format_value(s.max),
            s.emitted
        ));
    }
    out.push_str(&format!("{sep}\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use fx4sight_core::{Bar, PriceField};
    use fx4sight_engine::{run_replay, ReplayConfig};
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(None), "-");
        assert_eq!(format_value(Some(dec!(2))), "2.0000");
        assert_eq!(format_value(Some(dec!(66.666666))), "66.6667");
    }

    #[test]
    fn test_render_table() {
        let bars: Vec<Bar> = [dec!(1), dec!(2), dec!(3)]
            .iter()
            .enumerate()
            .map(|(i, close)| Bar {
                instrument: "EURUSD".to_string(),
                timestamp: DateTime::from_timestamp(1_704_067_200 + i as i64 * 86_400, 0).unwrap(),
                open: *close,
                high: *close,
                low: *close,
                close: *close,
                volume: Decimal::ZERO,
            })
            .collect();
        let config = ReplayConfig {
            field: PriceField::Close,
            indicators: vec!["sma:2".parse().unwrap()],
        };
        let table = render_table(&run_replay(&bars, &config).unwrap());
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].contains("close") && lines[0].contains("sma_2"));
        assert!(lines[1].ends_with('-'));
        assert!(lines[2].ends_with("1.5000"));
        assert!(table.contains("SUMMARY  EURUSD (3 bars)"));
        let sma_line = lines.iter().find(|l| l.trim_start().starts_with("sma_2")).unwrap();
        assert!(sma_line.contains("last     2.5000") && sma_line.ends_with("emitted 2"));
        assert!(table.ends_with(&format!("{}\n", "=".repeat(60))));
    }
}
