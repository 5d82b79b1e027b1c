use super::sequence::OutputRecord;
use crate::sequence_processor::decision::Decision;
use serde::Serialize;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessingStats {
    pub processed: u64,
    pub trimmed: u64,
    pub masked: u64,
    pub emptied: u64,
    pub rejected: u64,
    pub mask_fallbacks: u64,
    pub bases_in: u64,
    pub bases_out: u64,
    pub bases_masked: u64,
}

impl ProcessingStats {
    pub fn record_output(&mut self, output: &OutputRecord) {
        let input_len = output.input_len;
        self.processed += 1;
        if output.mask_fallback {
            self.mask_fallbacks += 1;
        }
        self.bases_in += input_len as u64;
        self.bases_out += output.len() as u64;

        match &output.decision {
            Decision::Trim(range) => {
                if range.len() < input_len {
                    self.trimmed += 1;
                }
                if range.is_empty() && input_len > 0 {
                    self.emptied += 1;
                }
            }
            Decision::Mask(set) => {
                if !set.is_empty() {
                    self.masked += 1;
                }
                self.bases_masked += set.masked_bases() as u64;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence_processor::decision::{MaskSet, TrimRange};
    use crate::sequence_processor::Interval;

    fn output(len: usize, input_len: usize, decision: Decision) -> OutputRecord {
        OutputRecord {
            id: "r".to_string(),
            desc: None,
            bases: vec![b'A'; len],
            qualities: vec![0.9; len],
            decision,
            input_len,
            mask_fallback: false,
        }
    }

    #[test]
    fn test_trim_counts() {
        let mut stats = ProcessingStats::default();
        stats.record_output(&output(6, 10, Decision::Trim(TrimRange::new(2, 8))));
        stats.record_output(&output(0, 4, Decision::Trim(TrimRange::new(0, 0))));
        stats.record_output(&output(5, 5, Decision::Trim(TrimRange::new(0, 5))));

        assert_eq!(stats.processed, 3);
        assert_eq!(stats.trimmed, 2);
        assert_eq!(stats.emptied, 1);
        assert_eq!(stats.bases_in, 19);
        assert_eq!(stats.bases_out, 11);
    }

    #[test]
    fn test_mask_counts() {
        let mut stats = ProcessingStats::default();
        let set = MaskSet::from_sorted(vec![Interval::new(0, 3), Interval::new(5, 7)]);
        stats.record_output(&output(10, 10, Decision::Mask(set)));

        assert_eq!(stats.masked, 1);
        assert_eq!(stats.bases_masked, 5);
        assert_eq!(stats.bases_out, 10);
    }
}
