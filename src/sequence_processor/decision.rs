use super::core::Interval;
use super::scoring::WindowScores;
use serde::Serialize;

/// The retained subsequence `[start, end)` of a trimmed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrimRange {
    pub start: usize,
    pub end: usize,
}

impl TrimRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn empty() -> Self {
        Self { start: 0, end: 0 }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Sorted, disjoint, non-adjacent mask intervals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaskSet {
    intervals: Vec<Interval>,
}

impl MaskSet {
    /// Wraps intervals that are already sorted and disjoint, coalescing touching ones.
    pub fn from_sorted(intervals: Vec<Interval>) -> Self {
        let mut set = Self::default();
        for iv in intervals {
            set.push(iv);
        }
        set
    }

    /// Appends an interval that starts at or after every interval already in the set.
    fn push(&mut self, iv: Interval) {
        if iv.is_empty() {
            return;
        }
        match self.intervals.last_mut() {
            Some(last) if iv.start <= last.end => last.end = last.end.max(iv.end),
            _ => self.intervals.push(iv),
        }
    }

    /// Union of two sorted disjoint interval lists.
    pub fn merge(existing: &[Interval], generated: &[Interval]) -> Self {
        let mut set = Self::default();
        let (mut i, mut j) = (0, 0);
        while i < existing.len() || j < generated.len() {
            let take_existing = match (existing.get(i), generated.get(j)) {
                (Some(a), Some(b)) => a.start <= b.start,
                (Some(_), None) => true,
                _ => false,
            };
            if take_existing {
                set.push(existing[i]);
                i += 1;
            } else {
                set.push(generated[j]);
                j += 1;
            }
        }
        set
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn masked_bases(&self) -> usize {
        self.intervals.iter().map(Interval::len).sum()
    }

    pub fn is_masked(&self, pos: usize) -> bool {
        self.intervals
            .binary_search_by(|iv| {
                if iv.end <= pos {
                    std::cmp::Ordering::Less
                } else if iv.start > pos {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }
}

/// Outcome of the quality policy for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Decision {
    Trim(TrimRange),
    Mask(MaskSet),
}

#[derive(Debug, Clone, Copy)]
pub struct DecisionEngine {
    threshold: f64,
}

impl DecisionEngine {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    fn is_reliable(&self, mean: f64) -> bool {
        mean >= self.threshold
    }

    /// Applies mask policy when `annotations` is given and non-empty, trim policy otherwise.
    pub fn decide(&self, scores: &WindowScores, annotations: Option<&[Interval]>) -> Decision {
        match annotations {
            Some(existing) if !existing.is_empty() => {
                Decision::Mask(self.mask(scores.means(), existing))
            }
            _ => Decision::Trim(self.trim(scores)),
        }
    }

    /// Longest run of reliable window starts, with its end pulled back until every window
    /// clipped at the new end still passes. Ties go to the leftmost run.
    ///
    /// The clipped windows are exactly the tail windows of the trimmed record, so trimming
    /// the output again keeps it whole.
    pub fn trim(&self, scores: &WindowScores) -> TrimRange {
        let means = scores.means();
        let mut best = TrimRange::empty();
        let mut i = 0;

        while i < means.len() {
            if !self.is_reliable(means[i]) {
                i += 1;
                continue;
            }
            let start = i;
            while i < means.len() && self.is_reliable(means[i]) {
                i += 1;
            }
            // Settling only shrinks a run.
            if i - start > best.len() {
                let range = self.settle_end(scores, start, i);
                if range.len() > best.len() {
                    best = range;
                }
            }
        }

        best
    }

    fn settle_end(&self, scores: &WindowScores, start: usize, mut end: usize) -> TrimRange {
        while end > start && !self.tail_passes(scores, start, end) {
            end -= 1;
        }
        TrimRange::new(start, end)
    }

    /// Windows starting within `window - 1` of `end` are the only ones `end` clips.
    fn tail_passes(&self, scores: &WindowScores, start: usize, end: usize) -> bool {
        let first = (end + 1).saturating_sub(scores.window_size()).max(start);
        (first..end).all(|i| self.is_reliable(scores.clipped_mean(i, end)))
    }

    /// Positions inside `existing` keep their mask untouched; everything else that fails
    /// the threshold becomes a new mask interval.
    pub fn mask(&self, means: &[f64], existing: &[Interval]) -> MaskSet {
        let mut generated = Vec::new();
        let mut run_start = None;
        let mut cursor = 0;

        for (i, &mean) in means.iter().enumerate() {
            while cursor < existing.len() && existing[cursor].end <= i {
                cursor += 1;
            }
            let covered = existing.get(cursor).is_some_and(|iv| iv.contains(i));
            let failing = !covered && !self.is_reliable(mean);

            match (failing, run_start) {
                (true, None) => run_start = Some(i),
                (false, Some(start)) => {
                    generated.push(Interval::new(start, i));
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            generated.push(Interval::new(start, means.len()));
        }

        MaskSet::merge(existing, &generated)
    }
}
