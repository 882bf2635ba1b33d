//! Fixed-width binning over a closed interval
//!
//! Splits `[start, end]` into `n` equal-width bins. Every bin is half-open
//! (`[lo, hi)`) except the last one, which also includes `end`, so a value
//! sitting exactly on the upper bound is never dropped.
//!
//! Each bin carries a caller-chosen representative value, used when a bin is
//! reduced to a single point (for example a curve control point).
//!
//! # Examples
//!
//! ```
//! use msdtrack_stats::binning::FixedBins;
//!
//! let mut bins = FixedBins::new(0.0, 100.0, &[0.0, 25.0, 50.0, 75.0, 100.0]);
//! assert!(bins.push(0.0, "first"));
//! assert!(bins.push(19.9, "still first"));
//! assert!(bins.push(20.0, "second"));
//! assert!(bins.push(100.0, "last"));
//! assert!(!bins.push(100.5, "outside"));
//!
//! assert_eq!(bins.bins()[0].items.len(), 2);
//! assert_eq!(bins.bins()[4].representative, 100.0);
//! ```

/// One bin and the items that fell into it.
#[derive(Debug, Clone, PartialEq)]
pub struct BinInfo<T> {
    /// Inclusive lower bound
    pub start: f64,
    /// Upper bound; exclusive except for the last bin
    pub end: f64,
    /// Representative value for this bin
    pub representative: f64,
    pub items: Vec<T>,
}

impl<T> BinInfo<T> {
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Equal-width bins over `[start, end]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedBins<T> {
    start: f64,
    end: f64,
    bins: Vec<BinInfo<T>>,
}

impl<T> FixedBins<T> {
    /// Creates one bin per entry of `representatives`.
    ///
    /// # Panics
    ///
    /// Panics if `representatives` is empty or `end <= start`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(start: f64, end: f64, representatives: &[f64]) -> Self {
        assert!(!representatives.is_empty(), "at least one bin is required");
        assert!(end > start, "bin range must not be empty");

        let width = (end - start) / representatives.len() as f64;
        let bins = representatives
            .iter()
            .enumerate()
            .map(|(i, &representative)| BinInfo {
                start: start + width * i as f64,
                end: start + width * (i + 1) as f64,
                representative,
                items: vec![],
            })
            .collect();
        Self { start, end, bins }
    }

    /// Index of the bin containing `key`, or `None` if it lies outside the range.
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    #[must_use]
    pub fn bin_index(&self, key: f64) -> Option<usize> {
        if !(self.start..=self.end).contains(&key) {
            return None;
        }
        let n = self.bins.len();
        let position = (key - self.start) * n as f64 / (self.end - self.start);
        Some((position.floor() as usize).min(n - 1))
    }

    /// Adds `item` to the bin containing `key`.
    ///
    /// Returns `false` (and drops the item) if `key` is out of range.
    pub fn push(&mut self, key: f64, item: T) -> bool {
        match self.bin_index(key) {
            Some(idx) => {
                self.bins[idx].items.push(item);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn bins(&self) -> &[BinInfo<T>] {
        &self.bins
    }

    #[must_use]
    pub fn into_bins(self) -> Vec<BinInfo<T>> {
        self.bins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quintiles() -> FixedBins<u32> {
        FixedBins::new(0.0, 100.0, &[0.0, 25.0, 50.0, 75.0, 100.0])
    }

    #[test]
    fn test_bin_bounds() {
        let bins = quintiles();
        let bounds = bins
            .bins()
            .iter()
            .map(|b| (b.start, b.end))
            .collect::<Vec<_>>();
        assert_eq!(
            bounds,
            [
                (0.0, 20.0),
                (20.0, 40.0),
                (40.0, 60.0),
                (60.0, 80.0),
                (80.0, 100.0)
            ]
        );
    }

    #[test]
    fn test_boundaries_go_to_upper_bin() {
        let bins = quintiles();
        assert_eq!(bins.bin_index(0.0), Some(0));
        assert_eq!(bins.bin_index(20.0), Some(1));
        assert_eq!(bins.bin_index(39.999), Some(1));
        assert_eq!(bins.bin_index(80.0), Some(4));
    }

    #[test]
    fn test_last_bin_is_inclusive() {
        let bins = quintiles();
        assert_eq!(bins.bin_index(100.0), Some(4));
    }

    #[test]
    fn test_out_of_range() {
        let bins = quintiles();
        assert_eq!(bins.bin_index(-0.1), None);
        assert_eq!(bins.bin_index(100.1), None);
        assert_eq!(bins.bin_index(f64::NAN), None);
    }

    #[test]
    fn test_push_collects_items() {
        let mut bins = quintiles();
        for key in [1.0, 2.0, 55.0, 100.0] {
            assert!(bins.push(key, 1));
        }
        let counts = bins.bins().iter().map(BinInfo::count).collect::<Vec<_>>();
        assert_eq!(counts, [2, 0, 1, 0, 1]);
        assert!(bins.bins()[1].is_empty());
    }
}
