use fx4sight_indicators::Indicator;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// End-of-replay statistics for one indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSummary {
    pub label: String,
    pub name: String,
    pub period: usize,
    /// Final value, `None` if the indicator never warmed up.
    pub last: Option<Decimal>,
    /// Number of values emitted after warm-up.
    pub emitted: usize,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
    pub mean: Option<Decimal>,
}

/// Summarize an indicator from its current value and emitted history.
pub fn compute_summary(label: &str, indicator: &dyn Indicator) -> IndicatorSummary {
    let history = indicator.history();

    let min = history.iter().min().copied();
    let max = history.iter().max().copied();
    let mean = (!history.is_empty()).then(|| fx4sight_indicators::mean(history));

    IndicatorSummary {
        label: label.to_string(),
        name: indicator.name().to_string(),
        period: indicator.period(),
        last: indicator.value(),
        emitted: history.len(),
        min,
        max,
        mean,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fx4sight_indicators::Sma;
    use rust_decimal_macros::dec;

    #[test]
    fn test_summary_of_warm_indicator() {
        let mut sma = Sma::new(2).unwrap();
        for price in [dec!(1), dec!(3), dec!(5), dec!(2)] {
            sma.update(price);
        }
        // history: 2, 4, 3.5
        let summary = compute_summary("sma_2", &sma);
        assert_eq!(summary.name, "SMA");
        assert_eq!(summary.period, 2);
        assert_eq!(summary.last, Some(dec!(3.5)));
        assert_eq!(summary.emitted, 3);
        assert_eq!(summary.min, Some(dec!(2)));
        assert_eq!(summary.max, Some(dec!(4)));
        assert_eq!(summary.mean, Some(dec!(9.5) / dec!(3)));
    }

    #[test]
    fn test_summary_mean_of_huge_values() {
        let big = dec!(50000000000000000000000000000);
        let mut sma = Sma::new(1).unwrap();
        for _ in 0..3 {
            sma.update(big);
        }
        let summary = compute_summary("sma_1", &sma);
        assert_eq!(summary.max, Some(big));
        let mean = summary.mean.unwrap();
        assert!((mean - big).abs() <= dec!(10), "{mean}");
    }

    #[test]
    fn test_summary_of_cold_indicator() {
        let mut sma = Sma::new(5).unwrap();
        sma.update(dec!(1));
        let summary = compute_summary("sma_5", &sma);
        assert_eq!(summary.last, None);
        assert_eq!(summary.emitted, 0);
        assert_eq!(summary.mean, None);
        assert_eq!(summary.min, None);
    }
}
