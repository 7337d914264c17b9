use argminmax::ArgMinMax;
use statrs::statistics::Statistics;

/// `None` for an empty slice.
pub fn get_min_max(vec: &[f64]) -> Option<(f64, f64)> {
    if vec.is_empty() {
        return None;
    }
    let (min_index, max_index) = vec.argminmax();
    Some((vec[min_index], vec[max_index]))
}

pub fn mean(vec: &[f64]) -> f64 {
    vec.iter().mean()
}

/// Sample standard deviation (n - 1 denominator). NaN for fewer than two values.
pub fn std_dev(vec: &[f64]) -> f64 {
    vec.iter().std_dev()
}

/// Quantile of already sorted data using linear interpolation between closest ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}
