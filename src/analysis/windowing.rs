/// Overlapping fixed-length windows over a flat sequence, ready for a sequence model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowedSamples {
    pub lookback: usize,
    /// `features[i] == seq[i .. i + lookback]`
    pub features: Vec<Vec<f64>>,
    /// `targets[i] == seq[i + lookback]`
    pub targets: Vec<f64>,
}

impl WindowedSamples {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Model input shape `(count, lookback, 1)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.len(), self.lookback, 1)
    }

    pub fn batch(&self) -> WindowBatch<'_> {
        WindowBatch {
            lookback: self.lookback,
            windows: &self.features,
        }
    }
}

/// Borrowed view handed to a predictor.
#[derive(Debug, Clone, Copy)]
pub struct WindowBatch<'a> {
    pub lookback: usize,
    pub windows: &'a [Vec<f64>],
}

impl WindowBatch<'_> {
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Row-major `(count, lookback, 1)` buffer.
    pub fn flatten(&self) -> Vec<f64> {
        self.windows.iter().flatten().copied().collect()
    }
}

/// Produces `max(len - lookback, 0)` samples. A sequence no longer than the
/// lookback yields an empty set rather than an error.
pub fn build_windows(sequence: &[f64], lookback: usize) -> WindowedSamples {
    if lookback == 0 || sequence.len() <= lookback {
        return WindowedSamples {
            lookback,
            ..Default::default()
        };
    }

    let (features, targets) = sequence
        .windows(lookback + 1)
        .map(|w| (w[..lookback].to_vec(), w[lookback]))
        .unzip();

    WindowedSamples {
        lookback,
        features,
        targets,
    }
}
