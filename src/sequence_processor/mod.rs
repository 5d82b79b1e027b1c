pub mod core;
pub mod decision;
pub mod mask;
pub mod processor;
pub mod readers;
pub mod scoring;
pub mod threading;
pub mod writers;

// Re-export commonly used items
pub use core::{Interval, OutputRecord, ProcessingStats, Record, RecordOutcome, SequenceProcessor};
pub use decision::{Decision, DecisionEngine, MaskSet, TrimRange};
pub use processor::QualityProcessor;
pub use threading::Dispatcher;
