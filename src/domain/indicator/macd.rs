//! MACD (Moving Average Convergence Divergence).
//!
//! MACD line = EMA(fast) - EMA(slow)
//! Signal line = EMA(signal) of the MACD line, seeded with the SMA of the
//! first `signal` MACD values past the slow warmup.
//! Histogram = line - signal
//!
//! Warmup: max(fast, slow) - 1 + signal - 1 bars.

use crate::domain::indicator::{
    calculate_ema, IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_macd(
    bars: &[OhlcvBar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_period,
    };
    if bars.is_empty() || fast == 0 || slow == 0 || signal_period == 0 {
        return IndicatorSeries::empty(indicator_type);
    }

    let ema_fast = ema_raw_values(bars, fast);
    let ema_slow = ema_raw_values(bars, slow);
    let macd_line: Vec<f64> = ema_fast.iter().zip(&ema_slow).map(|(f, s)| f - s).collect();

    let line_start = fast.max(slow) - 1;
    let first_valid = line_start + signal_period - 1;
    let signal_line = signal_values(&macd_line, line_start, signal_period);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| IndicatorPoint {
            date: bar.date,
            valid: i >= first_valid,
            value: IndicatorValue::Macd {
                line: macd_line[i],
                signal: signal_line[i],
                histogram: macd_line[i] - signal_line[i],
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

/// EMA of `line[start..]`, SMA-seeded; 0.0 before the seed.
fn signal_values(line: &[f64], start: usize, period: usize) -> Vec<f64> {
    let mut signal = vec![0.0; line.len()];
    let seed_end = start + period;
    if seed_end > line.len() {
        return signal;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = line[start..seed_end].iter().sum::<f64>() / period as f64;
    signal[seed_end - 1] = ema;
    for i in seed_end..line.len() {
        ema = line[i] * k + ema * (1.0 - k);
        signal[i] = ema;
    }
    signal
}

/// Raw EMA values, 0.0 for warmup bars.
fn ema_raw_values(bars: &[OhlcvBar], period: usize) -> Vec<f64> {
    calculate_ema(bars, period)
        .values
        .iter()
        .map(|p| match p.value {
            IndicatorValue::Simple(v) if p.valid => v,
            _ => 0.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn make_bars(closes: impl IntoIterator<Item = f64>) -> Vec<OhlcvBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .into_iter()
            .enumerate()
            .map(|(i, close)| OhlcvBar {
                symbol: "TEST".into(),
                date: start + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    fn ramp(n: usize) -> Vec<OhlcvBar> {
        make_bars((0..n).map(|i| 100.0 + i as f64))
    }

    fn macd_12_26_9(bars: &[OhlcvBar]) -> IndicatorSeries {
        calculate_macd(bars, 12, 26, 9)
    }

    #[test]
    fn macd_warmup_default() {
        let series = macd_12_26_9(&ramp(40));

        let warmup = 26 - 1 + 9 - 1;
        for i in 0..warmup {
            assert!(!series.values[i].valid, "Index {} should not be valid", i);
        }
        assert!(series.values[warmup].valid);
        assert_eq!(warmup + 1, series.indicator_type.min_bars());
    }

    #[test]
    fn macd_histogram_equals_line_minus_signal() {
        let series = macd_12_26_9(&ramp(40));

        for point in series.values.iter().filter(|p| p.valid) {
            if let IndicatorValue::Macd {
                line,
                signal,
                histogram,
            } = point.value
            {
                assert!((histogram - (line - signal)).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn macd_line_is_ema_fast_minus_ema_slow() {
        let bars = make_bars((1..=10).map(|i| i as f64 * 10.0));
        let series = calculate_macd(&bars, 3, 5, 2);

        let ema_fast = ema_raw_values(&bars, 3);
        let ema_slow = ema_raw_values(&bars, 5);

        for (i, point) in series.values.iter().enumerate().skip(4) {
            if let IndicatorValue::Macd { line, .. } = point.value {
                assert!(
                    (line - (ema_fast[i] - ema_slow[i])).abs() < f64::EPSILON,
                    "MACD line mismatch at index {}",
                    i
                );
            }
        }
    }

    #[test]
    fn macd_signal_seed_is_sma_of_line() {
        let bars = make_bars((1..=10).map(|i| (i * i) as f64));
        let series = calculate_macd(&bars, 3, 5, 2);

        let line = |i: usize| match series.values[i].value {
            IndicatorValue::Macd { line, .. } => line,
            _ => panic!("Expected Macd value"),
        };
        let signal = |i: usize| match series.values[i].value {
            IndicatorValue::Macd { signal, .. } => signal,
            _ => panic!("Expected Macd value"),
        };

        assert!(!series.values[4].valid);
        assert!(series.values[5].valid);
        assert!((signal(5) - (line(4) + line(5)) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn macd_accelerating_series_has_line_above_signal() {
        let bars = make_bars((0..80).map(|i| 100.0 + 0.05 * (i * i) as f64));
        let (line, signal) = macd_12_26_9(&bars).latest_macd().unwrap();
        assert!(line > signal);
    }

    #[test]
    fn macd_short_series_is_insufficient() {
        let series = macd_12_26_9(&ramp(30));
        assert_eq!(series.values.len(), 30);
        assert!(series.latest().is_err());
    }

    #[test]
    fn macd_empty_or_zero_period() {
        let bars = ramp(3);
        assert!(macd_12_26_9(&[]).values.is_empty());
        assert!(calculate_macd(&bars, 0, 26, 9).values.is_empty());
        assert!(calculate_macd(&bars, 12, 0, 9).values.is_empty());
        assert!(calculate_macd(&bars, 12, 26, 0).values.is_empty());
    }
}
