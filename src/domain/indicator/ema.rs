//! Exponential Moving Average over closing prices.
//!
//! k = 2/(n+1), seeded with the SMA of the first n closes, then
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k). The first (n-1) points are warmup.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_ema(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Ema(period);
    if period == 0 {
        return IndicatorSeries::empty(indicator_type);
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut values = Vec::with_capacity(bars.len());
    let mut seed_sum = 0.0;
    let mut ema = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        let point = match (i + 1).cmp(&period) {
            std::cmp::Ordering::Less => {
                seed_sum += bar.close;
                IndicatorPoint::warmup(bar.date)
            }
            std::cmp::Ordering::Equal => {
                ema = (seed_sum + bar.close) / period as f64;
                IndicatorPoint::simple(bar.date, ema)
            }
            std::cmp::Ordering::Greater => {
                ema = bar.close * k + ema * (1.0 - k);
                IndicatorPoint::simple(bar.date, ema)
            }
        };
        values.push(point);
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}
