use super::core::quality::{MASK_BASE, MASK_QUALITY};
use super::core::{Interval, OutputRecord, Record, RecordOutcome, SequenceProcessor};
use super::decision::{Decision, DecisionEngine, MaskSet, TrimRange};
use super::mask::{DefaultInterpreter, MaskInterpreter};
use super::scoring::WindowScorer;
use crate::config::RunConfig;
use std::sync::Arc;

/// Scores, decides and materializes a single record.
#[derive(Clone)]
pub struct QualityProcessor {
    scorer: WindowScorer,
    engine: DecisionEngine,
    mask_mode: bool,
    interpreter: Arc<dyn MaskInterpreter>,
}

impl QualityProcessor {
    /// `config` must already be validated.
    pub fn new(config: &RunConfig) -> Self {
        Self::with_interpreter(config, Arc::new(DefaultInterpreter))
    }

    pub fn with_interpreter(config: &RunConfig, interpreter: Arc<dyn MaskInterpreter>) -> Self {
        Self {
            scorer: WindowScorer::new(config.window_size),
            engine: DecisionEngine::new(config.threshold),
            mask_mode: config.mask_mode,
            interpreter,
        }
    }

    /// Validated records only.
    pub fn process_record(&self, record: Record) -> OutputRecord {
        let scores = self.scorer.window_scores(&record.qualities);

        let annotations = if self.mask_mode {
            Some(self.interpreter.extract(&record))
        } else {
            None
        };
        let mask_fallback = annotations.as_ref().is_some_and(Vec::is_empty);
        let decision = self.engine.decide(&scores, annotations.as_deref());

        materialize(record, decision, annotations.as_deref().unwrap_or_default(), mask_fallback)
    }
}

impl SequenceProcessor for QualityProcessor {
    fn process_sequence(&self, index: u64, record: Record) -> RecordOutcome {
        record.validate(index)?;
        Ok(self.process_record(record))
    }
}

fn materialize(
    record: Record,
    decision: Decision,
    existing: &[Interval],
    mask_fallback: bool,
) -> OutputRecord {
    let input_len = record.len();
    let Record {
        id,
        desc,
        mut bases,
        mut qualities,
        ..
    } = record;

    match &decision {
        Decision::Trim(range) => slice(&mut bases, &mut qualities, range),
        Decision::Mask(set) => substitute(&mut bases, &mut qualities, set, existing),
    }

    OutputRecord {
        id,
        desc,
        bases,
        qualities,
        decision,
        input_len,
        mask_fallback,
    }
}

fn slice(bases: &mut Vec<u8>, qualities: &mut Vec<f64>, range: &TrimRange) {
    bases.truncate(range.end);
    bases.drain(..range.start);
    qualities.truncate(range.end);
    qualities.drain(..range.start);
}

/// Writes sentinels over the newly masked positions. Positions under an `existing`
/// annotation keep their input bases and qualities.
fn substitute(bases: &mut [u8], qualities: &mut [f64], set: &MaskSet, existing: &[Interval]) {
    let mut fill = |start: usize, end: usize| {
        if start < end {
            bases[start..end].fill(MASK_BASE);
            qualities[start..end].fill(MASK_QUALITY);
        }
    };

    let mut kept = existing.iter().peekable();
    for iv in set.intervals() {
        let mut cursor = iv.start;
        while let Some(k) = kept.next_if(|k| k.start < iv.end) {
            fill(cursor, k.start.max(cursor));
            cursor = cursor.max(k.end);
        }
        fill(cursor, iv.end);
    }
}
