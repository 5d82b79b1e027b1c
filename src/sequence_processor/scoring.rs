/// Cumulative quality sums for one record. `sums[k]` is the total of the first `k` scores.
#[derive(Debug, Clone)]
pub struct PrefixSums {
    sums: Vec<f64>,
}

impl PrefixSums {
    pub fn new(qualities: &[f64]) -> Self {
        let mut sums = Vec::with_capacity(qualities.len() + 1);
        let mut total = 0.0;
        sums.push(total);
        for &q in qualities {
            total += q;
            sums.push(total);
        }
        Self { sums }
    }

    /// Number of scores covered.
    pub fn len(&self) -> usize {
        self.sums.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mean over `[start, end)`. The range must be non-empty and within bounds.
    pub fn mean(&self, start: usize, end: usize) -> f64 {
        debug_assert!(start < end && end <= self.len());
        (self.sums[end] - self.sums[start]) / (end - start) as f64
    }
}

/// Computes the mean quality of the window starting at every base.
#[derive(Debug, Clone, Copy)]
pub struct WindowScorer {
    window_size: usize,
}

impl WindowScorer {
    /// `window_size` is validated by `RunConfig`; zero is never passed here.
    pub fn new(window_size: usize) -> Self {
        debug_assert!(window_size > 0);
        Self { window_size }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Mean of `[start, min(start + window, len))`.
    pub fn window_mean(&self, sums: &PrefixSums, start: usize) -> f64 {
        let end = start.saturating_add(self.window_size).min(sums.len());
        sums.mean(start, end)
    }

    /// One mean per window start in `[0, len)`. Windows near the end shrink to the tail.
    pub fn score(&self, qualities: &[f64]) -> Vec<f64> {
        self.window_scores(qualities).means
    }

    /// Per-start means together with the prefix table they came from.
    pub fn window_scores(&self, qualities: &[f64]) -> WindowScores {
        let sums = PrefixSums::new(qualities);
        let means = (0..sums.len())
            .map(|start| self.window_mean(&sums, start))
            .collect();
        WindowScores {
            sums,
            window_size: self.window_size,
            means,
        }
    }
}

/// Window means of one record, kept with their prefix sums so windows can be re-scored
/// against a shorter record end.
#[derive(Debug, Clone)]
pub struct WindowScores {
    sums: PrefixSums,
    window_size: usize,
    means: Vec<f64>,
}

impl WindowScores {
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    /// Mean of the window starting at `start` when the record ends at `end`.
    pub fn clipped_mean(&self, start: usize, end: usize) -> f64 {
        let stop = start.saturating_add(self.window_size).min(end);
        self.sums.mean(start, stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_means_with_tail() {
        let scorer = WindowScorer::new(2);
        let means = scorer.score(&[10.0, 20.0, 30.0, 40.0]);
        assert_eq!(means, vec![15.0, 25.0, 35.0, 40.0]);
    }

    #[test]
    fn test_window_larger_than_record() {
        let scorer = WindowScorer::new(100);
        let means = scorer.score(&[0.2, 0.4, 0.6]);
        assert_eq!(means.len(), 3);
        assert!((means[0] - 0.4).abs() < 1e-12);
        assert!((means[1] - 0.5).abs() < 1e-12);
        assert!((means[2] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_empty_record_has_no_windows() {
        let scorer = WindowScorer::new(5);
        assert!(scorer.score(&[]).is_empty());
        assert!(PrefixSums::new(&[]).is_empty());
    }

    #[test]
    fn test_clipped_mean_matches_shorter_record() {
        let qualities = [0.2, 0.4, 0.6, 0.8, 1.0];
        let scorer = WindowScorer::new(3);
        let scores = scorer.window_scores(&qualities);
        assert_eq!(scores.means(), scorer.score(&qualities).as_slice());

        let shorter = scorer.score(&qualities[..3]);
        for (start, mean) in shorter.iter().enumerate() {
            assert!((scores.clipped_mean(start, 3) - mean).abs() < 1e-12);
        }
    }

    #[test]
    fn test_prefix_sum_means() {
        let sums = PrefixSums::new(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(sums.len(), 5);
        assert_eq!(sums.mean(0, 5), 3.0);
        assert_eq!(sums.mean(1, 3), 2.5);
        assert_eq!(sums.mean(4, 5), 5.0);
    }
}
