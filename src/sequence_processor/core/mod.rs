pub(crate) mod processor;
pub mod quality;
pub(crate) mod sequence;
pub(crate) mod stats;
mod reader;

pub use processor::{RecordOutcome, SequenceProcessor};
pub use reader::{Records, SequenceReader};
pub use sequence::{Interval, OutputRecord, Record};
pub use stats::ProcessingStats;
