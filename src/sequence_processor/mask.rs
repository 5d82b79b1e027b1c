use super::core::{Interval, Record};

/// Extracts pre-existing mask intervals from a record.
///
/// An empty result means the record carries no mask information; the decision engine then
/// falls back to trim policy for that record.
pub trait MaskInterpreter: Send + Sync {
    fn extract(&self, record: &Record) -> Vec<Interval>;
}

/// Uses the record's explicit annotations only.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationInterpreter;

impl MaskInterpreter for AnnotationInterpreter {
    fn extract(&self, record: &Record) -> Vec<Interval> {
        record.mask_annotations.clone().unwrap_or_default()
    }
}

/// Treats maximal runs of lowercase bases as masked, the usual soft-masking convention.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftMaskInterpreter;

impl MaskInterpreter for SoftMaskInterpreter {
    fn extract(&self, record: &Record) -> Vec<Interval> {
        soft_masked_runs(&record.bases)
    }
}

/// Explicit annotations when the record has them, soft-masking otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultInterpreter;

impl MaskInterpreter for DefaultInterpreter {
    fn extract(&self, record: &Record) -> Vec<Interval> {
        match &record.mask_annotations {
            Some(annotations) => annotations.clone(),
            None => SoftMaskInterpreter.extract(record),
        }
    }
}

fn soft_masked_runs(bases: &[u8]) -> Vec<Interval> {
    let mut runs = Vec::new();
    let mut start = None;

    for (i, base) in bases.iter().enumerate() {
        match (base.is_ascii_lowercase(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push(Interval::new(s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(Interval::new(s, bases.len()));
    }

    runs
}
