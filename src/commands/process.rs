use crate::config::{RunConfig, Settings};
use crate::error::RecordRejection;
use crate::sequence_processor::core::SequenceReader;
use crate::sequence_processor::readers::FastqReader;
use crate::sequence_processor::writers::FastqWriter;
use crate::sequence_processor::{Dispatcher, ProcessingStats, QualityProcessor};
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Values given on the command line. `None` keeps the settings file value.
#[derive(Debug, Default)]
pub struct ProcessOptions {
    pub output: Option<PathBuf>,
    pub threshold: Option<f64>,
    pub window: Option<usize>,
    pub threads: Option<usize>,
    /// `Some(false)` turns mask mode off even when the settings file enables it.
    pub mask: Option<bool>,
    pub in_flight: Option<usize>,
    pub config: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub quiet: bool,
}

#[derive(Debug, Serialize)]
struct RunReport<'a> {
    input: &'a Path,
    threshold: f64,
    window_size: usize,
    worker_count: usize,
    mask_mode: bool,
    stats: &'a ProcessingStats,
    rejections: &'a [RecordRejection],
}

pub(crate) fn resolve_config(settings: &Settings, options: &ProcessOptions) -> Result<RunConfig> {
    let mut config = settings.to_run_config();
    if let Some(threshold) = options.threshold {
        config.threshold = threshold;
    }
    if let Some(window) = options.window {
        config.window_size = window;
    }
    if let Some(threads) = options.threads {
        config.worker_count = threads;
    }
    if options.in_flight.is_some() {
        config.in_flight = options.in_flight;
    }
    if let Some(mask) = options.mask {
        config.mask_mode = mask;
    }
    config.validate()?;
    Ok(config)
}

pub fn run(input: PathBuf, options: ProcessOptions) -> Result<()> {
    let settings = match &options.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load(),
    };
    let config = resolve_config(&settings, &options).context("Invalid configuration")?;
    info!(
        "Processing {} (threshold {}, window {}, {} thread(s), {} mode)",
        input.display(),
        config.threshold,
        config.window_size,
        config.worker_count,
        if config.mask_mode { "mask" } else { "trim" }
    );

    let reader = FastqReader::new(&input, settings.quality_offset)?;
    let mut writer = FastqWriter::new(options.output.as_deref(), settings.quality_offset)?;
    let progress = ProgressBarBuilder::new("Processing reads")
        .with_template("{spinner:.green} [{elapsed_precise}] {msg} {pos} ({per_sec})")
        .with_tick()
        .hidden(options.quiet)
        .build()?;

    let processor = QualityProcessor::new(&config);
    let mut dispatcher =
        Dispatcher::new(processor, config.worker_count, config.in_flight_window());
    let mut rejections = Vec::new();

    let stats = dispatcher.run(reader.records(), |outcome| {
        progress.inc(1);
        match outcome {
            Ok(record) => writer.write_record(record),
            Err(rejection) => {
                rejections.push(rejection.clone());
                Ok(())
            }
        }
    })?;
    writer.flush()?;
    progress.finish_and_clear();

    if config.mask_mode && stats.processed > 0 && stats.mask_fallbacks == stats.processed {
        warn!("Mask mode requested but no record carried mask information; reads were trimmed");
    }
    info!(
        "Processed {} reads: {} trimmed, {} masked, {} emptied, {} rejected",
        stats.processed, stats.trimmed, stats.masked, stats.emptied, stats.rejected
    );

    if let Some(report_path) = &options.report {
        let report = RunReport {
            input: &input,
            threshold: config.threshold,
            window_size: config.window_size,
            worker_count: config.worker_count,
            mask_mode: config.mask_mode,
            stats: &stats,
            rejections: &rejections,
        };
        write_report(report_path, &report)?;
    }

    Ok(())
}

fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create report {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)?;
    info!("Report written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_command_line_overrides_settings() {
        let settings = Settings {
            window_size: 150,
            threads: 2,
            ..Settings::default()
        };
        let options = ProcessOptions {
            threshold: Some(0.8),
            threads: Some(8),
            mask: Some(true),
            ..ProcessOptions::default()
        };

        let config = resolve_config(&settings, &options).unwrap();
        assert_eq!(config.threshold, 0.8);
        assert_eq!(config.window_size, 150);
        assert_eq!(config.worker_count, 8);
        assert!(config.mask_mode);
    }

    #[test]
    fn test_mask_mode_can_be_turned_off_from_the_command_line() {
        let settings = Settings {
            mask: true,
            ..Settings::default()
        };

        let kept = resolve_config(&settings, &ProcessOptions::default()).unwrap();
        assert!(kept.mask_mode);

        let options = ProcessOptions {
            mask: Some(false),
            ..ProcessOptions::default()
        };
        let config = resolve_config(&settings, &options).unwrap();
        assert!(!config.mask_mode);
    }

    #[test]
    fn test_invalid_override_fails_fast() {
        let options = ProcessOptions {
            window: Some(0),
            ..ProcessOptions::default()
        };
        let err = resolve_config(&Settings::default(), &options).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::InvalidWindowSize(0))
        );
    }
}
