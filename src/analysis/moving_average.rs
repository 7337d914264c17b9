/// Trailing arithmetic mean over `window` values. The first `window - 1`
/// positions have no value, matching a rolling mean without `min_periods`.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    let mut sum: f64 = values[..window].iter().sum();
    out[window - 1] = Some(sum / window as f64);

    for i in window..values.len() {
        sum += values[i] - values[i - window];
        out[i] = Some(sum / window as f64);
    }

    out
}

/// Points for plotting: `(index, mean)` for every defined position.
pub fn defined_points(averages: &[Option<f64>]) -> Vec<[f64; 2]> {
    averages
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| [i as f64, v]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_positions_are_undefined() {
        let values: Vec<f64> = (1..=6).map(f64::from).collect();
        let ma = rolling_mean(&values, 3);

        assert_eq!(ma[..2], [None, None]);
        assert_eq!(ma[2], Some(2.0));
        assert_eq!(ma[5], Some(5.0));
    }

    #[test]
    fn window_longer_than_series_is_all_none() {
        let ma = rolling_mean(&[1.0, 2.0], 100);
        assert!(ma.iter().all(Option::is_none));
        assert!(defined_points(&ma).is_empty());
    }

    #[test]
    fn running_sum_matches_direct_mean() {
        let values: Vec<f64> = (0..500).map(|i| 100.0 + (i as f64 * 0.1).cos()).collect();
        let ma = rolling_mean(&values, 100);
        for i in 99..values.len() {
            let direct = values[i + 1 - 100..=i].iter().sum::<f64>() / 100.0;
            assert!((ma[i].unwrap() - direct).abs() < 1e-9);
        }
    }
}
