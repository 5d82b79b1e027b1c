use crate::error::{RecordRejection, RejectionReason};
use crate::sequence_processor::decision::Decision;
use serde::Serialize;

/// Half-open interval `[start, end)` over base positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Interval {
    pub start: usize,
    pub end: usize,
}

impl Interval {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }
}

/// One input read. Never mutated once handed to the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub desc: Option<String>,
    pub bases: Vec<u8>,
    /// Per-base accuracy scores in `[0, 1]`.
    pub qualities: Vec<f64>,
    /// Masks already applied upstream. `None` means the record carries no explicit
    /// annotation and the interpreter falls back to the base encoding.
    pub mask_annotations: Option<Vec<Interval>>,
}

impl Record {
    pub fn new(id: impl Into<String>, bases: Vec<u8>, qualities: Vec<f64>) -> Self {
        Self {
            id: id.into(),
            desc: None,
            bases,
            qualities,
            mask_annotations: None,
        }
    }

    pub fn with_desc(mut self, desc: Option<String>) -> Self {
        self.desc = desc;
        self
    }

    pub fn with_mask_annotations(mut self, annotations: Vec<Interval>) -> Self {
        self.mask_annotations = Some(annotations);
        self
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Checks the per-record invariants. `index` is the record's position in the input
    /// stream and is carried into the rejection.
    pub fn validate(&self, index: u64) -> Result<(), RecordRejection> {
        let reject = |reason| RecordRejection::new(index, &self.id, reason);

        if self.bases.len() != self.qualities.len() {
            return Err(reject(RejectionReason::LengthMismatch {
                bases: self.bases.len(),
                qualities: self.qualities.len(),
            }));
        }

        if let Some(position) = self
            .qualities
            .iter()
            .position(|q| !q.is_finite() || *q < 0.0 || *q > 1.0)
        {
            return Err(reject(RejectionReason::InvalidQuality { position }));
        }

        if let Some(annotations) = &self.mask_annotations {
            check_intervals(annotations, self.bases.len())
                .map_err(|reason| reject(RejectionReason::InvalidMask { reason }))?;
        }

        Ok(())
    }
}

/// Sorted, disjoint, non-empty and inside `[0, len)`.
fn check_intervals(intervals: &[Interval], len: usize) -> Result<(), String> {
    let mut prev_end = 0;
    for (i, iv) in intervals.iter().enumerate() {
        if iv.is_empty() {
            return Err(format!("interval {} [{}, {}) is empty", i, iv.start, iv.end));
        }
        if iv.end > len {
            return Err(format!(
                "interval {} [{}, {}) exceeds record length {}",
                i, iv.start, iv.end, len
            ));
        }
        if i > 0 && iv.start < prev_end {
            return Err(format!(
                "interval {} [{}, {}) overlaps or precedes the previous one",
                i, iv.start, iv.end
            ));
        }
        prev_end = iv.end;
    }
    Ok(())
}

/// A record after its decision has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    pub id: String,
    pub desc: Option<String>,
    pub bases: Vec<u8>,
    pub qualities: Vec<f64>,
    pub decision: Decision,
    /// Length of the record before the decision was applied.
    pub input_len: usize,
    /// Mask mode was requested but the record had no annotations, so trim policy applied.
    pub mask_fallback: bool,
}

impl OutputRecord {
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}
