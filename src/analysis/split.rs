/// Chronological train/test partition. Both halves borrow from the same series.
#[derive(Debug, Clone, Copy)]
pub struct TrainTestSplit<'a> {
    pub training: &'a [f64],
    pub testing: &'a [f64],
}

impl<'a> TrainTestSplit<'a> {
    /// Index where testing begins.
    pub fn split_index(&self) -> usize {
        self.training.len()
    }
}

/// `floor(len * train_fraction)`, clamped to the series length.
pub fn split_point(len: usize, train_fraction: f64) -> usize {
    let point = (len as f64 * train_fraction).floor();
    if point <= 0.0 {
        0
    } else {
        (point as usize).min(len)
    }
}

/// Contiguous split: no gap, no overlap, no shuffling.
pub fn train_test_split(series: &[f64], train_fraction: f64) -> TrainTestSplit<'_> {
    let (training, testing) = series.split_at(split_point(series.len(), train_fraction));
    TrainTestSplit { training, testing }
}

/// The last `lookback` training points followed by every testing point, so each
/// testing point gets a full window of history.
pub fn evaluation_frame(split: &TrainTestSplit<'_>, lookback: usize) -> Vec<f64> {
    let carry_start = split.training.len().saturating_sub(lookback);
    let mut frame = Vec::with_capacity(split.training.len() - carry_start + split.testing.len());
    frame.extend_from_slice(&split.training[carry_start..]);
    frame.extend_from_slice(split.testing);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_is_contiguous_and_complete() {
        for len in [0usize, 1, 2, 9, 10, 11, 299, 300, 1_234] {
            let series: Vec<f64> = (0..len).map(|i| i as f64).collect();
            let split = train_test_split(&series, 0.7);

            assert_eq!(split.training.len() + split.testing.len(), len);
            assert_eq!(split.split_index(), (len as f64 * 0.7).floor() as usize);
            let rejoined: Vec<f64> = split
                .training
                .iter()
                .chain(split.testing.iter())
                .copied()
                .collect();
            assert_eq!(rejoined, series);
        }
    }

    #[test]
    fn three_hundred_points_split_210_90() {
        let series: Vec<f64> = (1..=300).map(f64::from).collect();
        let split = train_test_split(&series, 0.7);
        assert_eq!(split.training.len(), 210);
        assert_eq!(split.testing.len(), 90);
        assert_eq!(split.testing[0], 211.0);
    }

    #[test]
    fn evaluation_frame_carries_lookback_tail() {
        let series: Vec<f64> = (1..=300).map(f64::from).collect();
        let split = train_test_split(&series, 0.7);
        let frame = evaluation_frame(&split, 100);

        assert_eq!(frame.len(), 190);
        assert_eq!(frame[0], 111.0);
        assert_eq!(frame[99], 210.0);
        assert_eq!(frame[100], 211.0);
    }

    #[test]
    fn short_training_is_carried_whole() {
        let series = [1.0, 2.0, 3.0, 4.0];
        let split = train_test_split(&series, 0.5);
        assert_eq!(evaluation_frame(&split, 100), vec![1.0, 2.0, 3.0, 4.0]);
    }
}
