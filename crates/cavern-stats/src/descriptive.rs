/// Descriptive statistics summarizing a dataset.
///
/// Variance uses the sample (`n - 1`) denominator, which is what the classifier
/// fits and what session averages report.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    /// Number of values in the dataset.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// The arithmetic mean (average) of the dataset.
    pub mean: f64,
    /// The sample variance of the dataset, `0.0` for fewer than two values.
    pub variance: f64,
    /// The sample standard deviation of the dataset.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics in a single pass over `values`.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use cavern_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
    /// assert_eq!(stats.count, 8);
    /// assert_eq!(stats.min, 2.0);
    /// assert_eq!(stats.max, 9.0);
    /// assert!((stats.mean - 5.0).abs() < 1e-12);
    /// assert!((stats.variance - 32.0 / 7.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        // Welford's online update
        let mut count = 0_usize;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut mean = 0.0;
        let mut m2 = 0.0;
        for value in values {
            count += 1;
            min = min.min(value);
            max = max.max(value);
            let delta = value - mean;
            mean += delta / as_f64(count);
            m2 += delta * (value - mean);
        }
        if count == 0 {
            return None;
        }
        let variance = sample_variance_from_m2(m2, count);
        Some(Self {
            count,
            min,
            max,
            mean,
            variance,
            std_dev: variance.sqrt(),
        })
    }
}

/// Sample variance (`n - 1` denominator) of `values`.
///
/// Returns `0.0` when fewer than two values are given.
///
/// ```
/// use cavern_stats::descriptive::sample_variance;
///
/// assert_eq!(sample_variance(&[1.0, 3.0]), 2.0);
/// assert_eq!(sample_variance(&[5.0]), 0.0);
/// ```
#[must_use]
pub fn sample_variance(values: &[f64]) -> f64 {
    DescriptiveStats::new(values.iter().copied()).map_or(0.0, |s| s.variance)
}

/// Arithmetic mean of `values`, `0.0` when empty.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    DescriptiveStats::new(values.iter().copied()).map_or(0.0, |s| s.mean)
}

fn sample_variance_from_m2(m2: f64, count: usize) -> f64 {
    if count < 2 { 0.0 } else { m2 / as_f64(count - 1) }
}

#[expect(clippy::cast_precision_loss)]
fn as_f64(n: usize) -> f64 {
    n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        assert!(DescriptiveStats::new(std::iter::empty()).is_none());
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(sample_variance(&[]), 0.0);
    }

    #[test]
    fn test_single_value() {
        let stats = DescriptiveStats::new([3.5]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, 3.5);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_matches_two_pass_formula() {
        let values = [0.12, 0.98, 0.45, 0.33, 0.71, 0.05];
        let n = values.len() as f64;
        let mean_two_pass = values.iter().sum::<f64>() / n;
        let var_two_pass =
            values.iter().map(|v| (v - mean_two_pass).powi(2)).sum::<f64>() / (n - 1.0);

        let stats = DescriptiveStats::new(values).unwrap();
        assert!((stats.mean - mean_two_pass).abs() < 1e-12);
        assert!((stats.variance - var_two_pass).abs() < 1e-12);
    }

    #[test]
    fn test_constant_values_have_zero_variance() {
        let stats = DescriptiveStats::new([0.5; 10]).unwrap();
        assert_eq!(stats.min, 0.5);
        assert_eq!(stats.max, 0.5);
        assert!(stats.variance.abs() < 1e-15);
    }
}
