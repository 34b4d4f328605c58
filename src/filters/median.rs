use std::collections::VecDeque;
use super::AxisFilter;

/// Median filter over the last `window_size` samples
#[derive(Debug, Clone)]
pub struct MedianFilter {
    window_size: usize,
    buffer: VecDeque<f64>,
}

impl MedianFilter {
    /// Create a new median filter
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        Self {
            window_size,
            buffer: VecDeque::with_capacity(window_size),
        }
    }

    /// Push a sample, evicting the oldest one when the buffer is full
    pub fn push(&mut self, value: f64) {
        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
    }

    /// Median of the current contents, `None` when empty
    #[must_use]
    pub fn median(&self) -> Option<f64> {
        calculate_median(self.buffer.iter().copied())
    }

    /// Current buffer contents, oldest first
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.buffer.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.window_size
    }
}

/// Median of a sequence; even lengths average the two middle elements
#[must_use]
pub fn calculate_median(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut sorted: Vec<f64> = values.into_iter().collect();
    sorted.sort_by(f64::total_cmp);

    let len = sorted.len();
    if len == 0 {
        None
    } else if len % 2 == 0 {
        Some((sorted[len / 2 - 1] + sorted[len / 2]) / 2.0)
    } else {
        Some(sorted[len / 2])
    }
}

impl AxisFilter for MedianFilter {
    fn apply(&mut self, value: f64) -> f64 {
        self.push(value);
        self.median().unwrap_or(value)
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn name(&self) -> &str {
        "MedianFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_median_filter() {
        let mut filter = MedianFilter::new(3);

        assert_eq!(filter.apply(10.0), 10.0);
        assert_eq!(filter.apply(20.0), 15.0); // median of [10, 20]
        assert_eq!(filter.apply(30.0), 20.0); // median of [10, 20, 30]
    }

    #[test]
    fn test_median_with_outliers() {
        let mut filter = MedianFilter::new(3);

        filter.apply(10.0);
        filter.apply(11.0);
        let value = filter.apply(100.0); // outlier

        assert_eq!(value, 11.0);
    }

    #[test]
    fn test_evicts_oldest_first() {
        let mut filter = MedianFilter::new(8);
        for i in 0..10 {
            filter.push(f64::from(i));
        }
        assert_eq!(filter.len(), 8);
        assert_eq!(filter.values().next(), Some(2.0));
        assert_eq!(filter.median(), Some(5.5));
    }

    #[test]
    fn test_empty_median() {
        let filter = MedianFilter::new(8);
        assert_eq!(filter.median(), None);
        assert!(filter.is_empty());
    }

    #[test]
    fn test_reset_clears_buffer() {
        let mut filter = MedianFilter::new(4);
        filter.apply(1.0);
        filter.apply(2.0);
        filter.reset();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(7.0), 7.0);
    }

    #[test]
    #[should_panic(expected = "Window size must be greater than 0")]
    fn test_zero_window() {
        let _ = MedianFilter::new(0);
    }

    fn textbook_median(values: &[f64]) -> f64 {
        let mut v = values.to_vec();
        v.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let n = v.len();
        if n % 2 == 1 {
            v[n / 2]
        } else {
            (v[n / 2 - 1] + v[n / 2]) / 2.0
        }
    }

    proptest! {
        #[test]
        fn prop_median_matches_textbook(values in prop::collection::vec(-1e6f64..1e6, 1..=8)) {
            let mut filter = MedianFilter::new(8);
            for &v in &values {
                filter.push(v);
            }
            prop_assert_eq!(filter.median(), Some(textbook_median(&values)));
        }

        #[test]
        fn prop_buffer_never_exceeds_capacity(values in prop::collection::vec(-1e3f64..1e3, 0..64)) {
            let mut filter = MedianFilter::new(8);
            for &v in &values {
                filter.push(v);
                prop_assert!(filter.len() <= 8);
            }
            let tail: Vec<f64> = values.iter().rev().take(8).rev().copied().collect();
            let held: Vec<f64> = filter.values().collect();
            prop_assert_eq!(held, tail);
        }
    }
}
