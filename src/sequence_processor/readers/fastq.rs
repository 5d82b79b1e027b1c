use crate::sequence_processor::core::quality::decode_qualities;
use crate::sequence_processor::core::{Record, SequenceReader};
use anyhow::{Context, Result};
use bio::io::fastq::{self, FastqRead};
use niffler::get_reader;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

pub struct FastqReader {
    reader: fastq::Reader<BufReader<Box<dyn Read>>>,
    record: fastq::Record,
    quality_offset: u8,
    records_read: u64,
}

impl FastqReader {
    /// Opens a plain or compressed FASTQ file. `-` reads standard input.
    pub fn new(path: &Path, quality_offset: u8) -> Result<Self> {
        let stream: Box<dyn Read> = if path == Path::new("-") {
            Box::new(io::stdin())
        } else {
            let file = File::open(path)
                .with_context(|| format!("Failed to open FASTQ file {}", path.display()))?;
            Box::new(file)
        };
        Self::from_reader(stream, quality_offset)
    }

    pub fn from_reader(stream: Box<dyn Read>, quality_offset: u8) -> Result<Self> {
        let (inner_reader, _compression) =
            get_reader(stream).context("Failed to detect input compression")?;
        Ok(Self {
            reader: fastq::Reader::from_bufread(BufReader::with_capacity(
                16 * 1024 * 1024,
                inner_reader,
            )),
            record: fastq::Record::new(),
            quality_offset,
            records_read: 0,
        })
    }

    fn create_record(&self) -> Record {
        Record::new(
            self.record.id(),
            self.record.seq().to_vec(),
            decode_qualities(self.record.qual(), self.quality_offset),
        )
        .with_desc(self.record.desc().map(str::to_string))
    }
}

impl SequenceReader for FastqReader {
    fn read_record(&mut self) -> Result<Option<Record>> {
        self.reader
            .read(&mut self.record)
            .with_context(|| {
                format!("Malformed FASTQ record after {} records", self.records_read)
            })?;
        if self.record.is_empty() {
            return Ok(None);
        }
        self.records_read += 1;
        Ok(Some(self.create_record()))
    }
}
