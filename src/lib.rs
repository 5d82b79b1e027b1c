pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod sequence_processor;
mod utils;

// Re-export main API
pub use config::RunConfig;
pub use error::{ConfigError, RecordRejection, RejectionReason};
pub use sequence_processor::{
    Decision, Dispatcher, Interval, MaskSet, OutputRecord, ProcessingStats, QualityProcessor,
    Record, RecordOutcome, TrimRange,
};

use anyhow::Result;

/// Processes `records` with `config` and returns every outcome in input order.
pub fn process_records<I>(
    records: I,
    config: &RunConfig,
) -> Result<(Vec<RecordOutcome>, ProcessingStats)>
where
    I: IntoIterator<Item = Record>,
{
    config.validate()?;
    let processor = QualityProcessor::new(config);
    let mut dispatcher =
        Dispatcher::new(processor, config.worker_count, config.in_flight_window());
    let mut outcomes = Vec::new();
    let stats = dispatcher.run(records.into_iter().map(Ok), |outcome| {
        outcomes.push(outcome.clone());
        Ok(())
    })?;
    Ok((outcomes, stats))
}
