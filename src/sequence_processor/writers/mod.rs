mod fastq;

pub use fastq::FastqWriter;
