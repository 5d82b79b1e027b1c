use super::sequence::Record;
use anyhow::Result;

/// Source of decoded records, read once in input order.
pub trait SequenceReader {
    /// `Ok(None)` at end of input.
    fn read_record(&mut self) -> Result<Option<Record>>;

    fn records(self) -> Records<Self>
    where
        Self: Sized,
    {
        Records {
            reader: self,
            done: false,
        }
    }
}

/// Iterator over a [`SequenceReader`]. Stops after the first error.
pub struct Records<R> {
    reader: R,
    done: bool,
}

impl<R: SequenceReader> Iterator for Records<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
