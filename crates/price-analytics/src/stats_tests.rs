#[cfg(test)]
mod tests {
    use super::super::stats::*;
    use chrono::{Duration, Utc};
    use watch_core::{Sample, Trend, VolatilityLevel};

    // One sample per minute, oldest first, ending at `Utc::now()`.
    fn samples(prices: &[f64]) -> Vec<Sample> {
        let start = Utc::now() - Duration::minutes(prices.len() as i64 - 1);
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| Sample::new(*p, start + Duration::minutes(i as i64)))
            .collect()
    }

    #[test]
    fn moving_average_basic() {
        let history = samples(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let result = moving_average(&history, 5).unwrap();
        assert!((result - 3.0).abs() < 1e-9);
    }

    #[test]
    fn moving_average_uses_most_recent_window() {
        let history = samples(&[10.0, 1.0, 2.0, 3.0]);
        let result = moving_average(&history, 3).unwrap();
        assert!((result - 2.0).abs() < 1e-9);
    }

    #[test]
    fn moving_average_insufficient_data() {
        let history = samples(&[1.0, 2.0]);
        assert_eq!(moving_average(&history, 5), None);
        assert_eq!(moving_average(&history, 0), None);
    }

    #[test]
    fn moving_average_constant_prices() {
        let history = samples(&[42.5; 20]);
        assert_eq!(moving_average(&history, 20), Some(42.5));
    }

    #[test]
    fn trend_bullish() {
        assert_eq!(trend(&samples(&[1.0, 2.0, 3.0, 4.0, 5.0])), Trend::Bullish);
    }

    #[test]
    fn trend_bearish() {
        assert_eq!(trend(&samples(&[5.0, 4.0, 3.0, 2.0, 1.0])), Trend::Bearish);
    }

    #[test]
    fn trend_sideways() {
        assert_eq!(trend(&samples(&[1.0, 2.0, 1.0, 2.0, 1.0])), Trend::Sideways);
    }

    #[test]
    fn trend_needs_three_samples() {
        assert_eq!(trend(&samples(&[1.0, 2.0])), Trend::InsufficientData);
        assert_eq!(trend(&[]), Trend::InsufficientData);
    }

    #[test]
    fn trend_equal_neighbours_count_as_neither() {
        // One up move out of four transitions: ratio 0.25 -> bearish.
        assert_eq!(trend(&samples(&[1.0, 1.0, 1.0, 1.0, 2.0])), Trend::Bearish);
        // All flat: ratio 0 -> bearish by the < 0.4 rule.
        assert_eq!(trend(&samples(&[3.0, 3.0, 3.0])), Trend::Bearish);
    }

    #[test]
    fn volatility_of_constant_prices_is_low() {
        let vol = volatility(&samples(&[100.0; 20])).unwrap();
        assert_eq!(vol.std_dev, 0.0);
        assert_eq!(vol.coefficient_of_variation, 0.0);
        assert_eq!(vol.level, VolatilityLevel::Low);
    }

    #[test]
    fn volatility_population_std_dev() {
        // Prices 2 and 4: mean 3, population variance 1, stddev 1.
        let vol = volatility(&samples(&[2.0, 4.0])).unwrap();
        assert!((vol.std_dev - 1.0).abs() < 1e-9);
        assert!((vol.coefficient_of_variation - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(vol.level, VolatilityLevel::Extreme);
    }

    #[test]
    fn volatility_insufficient_data() {
        assert!(volatility(&samples(&[100.0])).is_none());
        assert!(volatility(&[]).is_none());
    }

    #[test]
    fn percent_change_24h_window() {
        let now = Utc::now();
        let history = vec![
            Sample::new(100.0, now - Duration::hours(24)),
            Sample::new(150.0, now),
        ];

        let change = percent_change(&history, now, 24).unwrap();
        assert!((change.percent - 50.0).abs() < 1e-9);
        assert_eq!(change.delta, 50.0);
        assert_eq!(change.window_label, "24h");
    }

    #[test]
    fn percent_change_picks_sample_nearest_target() {
        let now = Utc::now();
        let history = vec![
            Sample::new(80.0, now - Duration::hours(30)),
            Sample::new(100.0, now - Duration::hours(23)),
            Sample::new(120.0, now),
        ];

        // Target now-24h: the 23h-old sample is nearer than the 30h-old one.
        let change = percent_change(&history, now, 24).unwrap();
        assert_eq!(change.old_price, 100.0);
        assert_eq!(change.new_price, 120.0);
    }

    #[test]
    fn percent_change_insufficient_data() {
        let now = Utc::now();
        let history = vec![Sample::new(100.0, now)];
        assert!(percent_change(&history, now, 24).is_none());
    }

    #[test]
    fn closest_to_tie_break_prefers_earlier_sample() {
        let now = Utc::now();
        let target = now - Duration::hours(24);
        // Equidistant: one hour before and one hour after the target.
        let earlier = Sample::new(100.0, target - Duration::hours(1));
        let later = Sample::new(200.0, target + Duration::hours(1));
        let history = vec![earlier.clone(), later];

        let chosen = closest_to(&history, target).unwrap();
        assert_eq!(chosen, &earlier);
    }

    #[test]
    fn closest_to_empty_history() {
        assert!(closest_to(&[], Utc::now()).is_none());
    }
}
