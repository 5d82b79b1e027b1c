use crate::sequence_processor::core::quality::encode_qualities;
use crate::sequence_processor::core::OutputRecord;
use anyhow::{Context, Result};
use bio::io::fastq;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

pub struct FastqWriter {
    writer: fastq::Writer<Box<dyn Write>>,
    quality_offset: u8,
}

impl FastqWriter {
    /// Writes to `path`, or to standard output when no path is given.
    pub fn new(path: Option<&Path>, quality_offset: u8) -> Result<Self> {
        let sink: Box<dyn Write> = match path {
            Some(path) => Box::new(
                File::create(path)
                    .with_context(|| format!("Failed to create output {}", path.display()))?,
            ),
            None => Box::new(io::stdout()),
        };
        Ok(Self::from_writer(sink, quality_offset))
    }

    pub fn from_writer(sink: Box<dyn Write>, quality_offset: u8) -> Self {
        Self {
            writer: fastq::Writer::new(sink),
            quality_offset,
        }
    }

    pub fn write_record(&mut self, record: &OutputRecord) -> Result<()> {
        let qual = encode_qualities(&record.qualities, self.quality_offset);
        self.writer
            .write(&record.id, record.desc.as_deref(), &record.bases, &qual)
            .with_context(|| format!("Failed to write record {}", record.id))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush output")
    }
}
