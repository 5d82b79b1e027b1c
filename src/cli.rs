use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Trim or mask low-quality regions of every read in a FASTQ file
    Process {
        /// Input FASTQ (plain or compressed); `-` reads standard input
        input: PathBuf,

        /// Output FASTQ; standard output when omitted
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,

        /// Minimum mean window quality, as base-call accuracy in [0, 1] (default: 0.5)
        #[arg(short = 'q', long = "threshold")]
        threshold: Option<f64>,

        /// Sliding window size in bases (default: 100)
        #[arg(short = 'w', long = "window")]
        window: Option<usize>,

        /// Number of worker threads (default: 1)
        #[arg(short = 't', long = "threads")]
        threads: Option<usize>,

        /// Mask low-quality regions in place and keep existing soft-masks
        #[arg(short = 'M', long = "mask")]
        mask: bool,

        /// Trim even when the settings file enables mask mode
        #[arg(long = "no-mask", conflicts_with = "mask")]
        no_mask: bool,

        /// Maximum records held between dispatch and output (default: 4 per thread)
        #[arg(long = "in-flight")]
        in_flight: Option<usize>,

        /// Settings file to use instead of the per-user one
        #[arg(long = "config")]
        config: Option<PathBuf>,

        /// Write a JSON run report with statistics and rejected records
        #[arg(long = "report")]
        report: Option<PathBuf>,

        /// Do not show a progress spinner
        #[arg(long)]
        quiet: bool,
    },

    /// Write the default settings file to the per-user configuration directory
    InitConfig {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}
