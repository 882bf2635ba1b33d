/// Descriptive statistics summarizing a dataset.
///
/// Count, extremes and arithmetic mean of a dataset of `f64` values, gathered
/// in a single pass.
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
}

impl DescriptiveStats {
    /// Computes descriptive statistics from values in any order.
    ///
    /// The mean is summed in input order, so it matches [`mean`] bit for bit.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use msdtrack_stats::descriptive::DescriptiveStats;
    /// let values = [5.0, 2.0, 4.0, 1.0, 3.0];
    /// let stats = DescriptiveStats::new(values).unwrap();
    /// assert_eq!(stats.count, 5);
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter();
        let first = values.next()?;
        let (count, min, max, sum) = values.fold(
            (1_usize, first, first, first),
            |(count, min, max, sum), v| (count + 1, min.min(v), max.max(v), sum + v),
        );
        Some(Self {
            count,
            min,
            max,
            mean: sum / count as f64,
        })
    }
}

/// Arithmetic mean of the values, or `None` when there are none.
///
/// Sums in input order so repeated calls over the same values are bit-identical.
///
/// ```
/// # use msdtrack_stats::descriptive::mean;
/// assert_eq!(mean([1.0, 2.0, 6.0]), Some(3.0));
/// assert_eq!(mean(std::iter::empty::<f64>()), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        assert!(DescriptiveStats::new(std::iter::empty()).is_none());
    }

    #[test]
    fn test_single_value() {
        let stats = DescriptiveStats::new([42.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.min, 42.0);
        assert_eq!(stats.max, 42.0);
        assert_eq!(stats.mean, 42.0);
    }

    #[test]
    fn test_mean_matches_free_function() {
        let values = [0.1, 0.7, 0.2, 0.9, 0.3];
        let stats = DescriptiveStats::new(values).unwrap();
        assert_eq!(Some(stats.mean), mean(values));
        assert_eq!(stats.min, 0.1);
        assert_eq!(stats.max, 0.9);
    }

    #[test]
    fn test_mean_preserves_order() {
        assert_eq!(mean([0.5, 0.25, 0.25]), Some(1.0 / 3.0));
    }
}
