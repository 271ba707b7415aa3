use chrono::{DateTime, Utc};

use watch_core::{PriceChange, Sample, Trend, Volatility, VolatilityLevel};

/// Arithmetic mean of the window, or None when the history is shorter
/// than the requested period count.
pub fn moving_average(samples: &[Sample], periods: usize) -> Option<f64> {
    if periods == 0 || samples.len() < periods {
        return None;
    }
    let window = &samples[samples.len() - periods..];
    let sum: f64 = window.iter().map(|s| s.price).sum();
    Some(sum / periods as f64)
}

/// The sample whose timestamp is closest to `target` by absolute
/// difference. On an exact tie the earlier sample wins: the scan runs
/// oldest to newest and only a strictly smaller difference replaces the
/// current candidate.
pub fn closest_to(samples: &[Sample], target: DateTime<Utc>) -> Option<&Sample> {
    let mut closest: Option<&Sample> = None;
    let mut min_diff = i64::MAX;

    for sample in samples {
        let diff = (sample.timestamp - target).num_milliseconds().abs();
        if diff < min_diff {
            min_diff = diff;
            closest = Some(sample);
        }
    }

    closest
}

/// Price movement between the sample nearest `now - hours` and the most
/// recent sample. None with fewer than 2 samples.
pub fn percent_change(samples: &[Sample], now: DateTime<Utc>, hours: i64) -> Option<PriceChange> {
    if samples.len() < 2 {
        return None;
    }

    let target = now - chrono::Duration::hours(hours);
    let old = closest_to(samples, target)?;
    let current = samples.last()?;

    let delta = current.price - old.price;
    Some(PriceChange {
        old_price: old.price,
        new_price: current.price,
        delta,
        percent: delta / old.price * 100.0,
        window_label: format!("{}h", hours),
    })
}

/// Classifies the window by the share of strictly-increasing consecutive
/// pairs. Equal neighbours count as neither up nor down. Fewer than 3
/// samples is InsufficientData.
pub fn trend(samples: &[Sample]) -> Trend {
    if samples.len() < 3 {
        return Trend::InsufficientData;
    }

    let mut up_count = 0usize;
    for pair in samples.windows(2) {
        if pair[1].price > pair[0].price {
            up_count += 1;
        }
    }

    let up_ratio = up_count as f64 / (samples.len() - 1) as f64;
    if up_ratio > 0.6 {
        Trend::Bullish
    } else if up_ratio < 0.4 {
        Trend::Bearish
    } else {
        Trend::Sideways
    }
}

/// Population standard deviation and coefficient of variation of the
/// window's prices. None with fewer than 2 samples.
pub fn volatility(samples: &[Sample]) -> Option<Volatility> {
    if samples.len() < 2 {
        return None;
    }

    let prices: Vec<f64> = samples.iter().map(|s| s.price).collect();
    let mean = prices.iter().sum::<f64>() / prices.len() as f64;
    let variance =
        prices.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / prices.len() as f64;
    let std_dev = variance.sqrt();
    let coefficient = std_dev / mean * 100.0;

    Some(Volatility {
        std_dev,
        coefficient_of_variation: coefficient,
        level: VolatilityLevel::from_coefficient(coefficient),
    })
}
