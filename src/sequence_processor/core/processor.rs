use super::sequence::{OutputRecord, Record};
use crate::error::RecordRejection;

pub type RecordOutcome = Result<OutputRecord, RecordRejection>;

/// Turns one input record into one output record.
///
/// Implementations hold no per-record mutable state, so a clone can run on every worker.
pub trait SequenceProcessor: Send + Sync + Clone + 'static {
    fn process_sequence(&self, index: u64, record: Record) -> RecordOutcome;
}
