/// Highest Phred score representable in printable FASTQ.
pub const MAX_PHRED: u8 = 93;

/// Base written at masked positions. Lowercase so masked output stays soft-masked.
pub const MASK_BASE: u8 = b'n';

/// Quality written at masked positions.
pub const MASK_QUALITY: f64 = 0.0;

/// Converts an encoded Phred byte to the probability that the base call is correct.
///
/// A byte below `offset` cannot be a quality and maps to NaN, which record validation
/// rejects.
pub fn phred_to_accuracy(byte: u8, offset: u8) -> f64 {
    match byte.checked_sub(offset) {
        Some(q) => 1.0 - 10f64.powf(-(q as f64) / 10.0),
        None => f64::NAN,
    }
}

/// Inverse of [`phred_to_accuracy`], rounded to the nearest Phred score.
pub fn accuracy_to_phred(accuracy: f64, offset: u8) -> u8 {
    let error = (1.0 - accuracy).max(0.0);
    let q = if error == 0.0 {
        MAX_PHRED as f64
    } else {
        (-10.0 * error.log10()).round().clamp(0.0, MAX_PHRED as f64)
    };
    offset.saturating_add(q as u8)
}

pub fn decode_qualities(encoded: &[u8], offset: u8) -> Vec<f64> {
    encoded.iter().map(|&b| phred_to_accuracy(b, offset)).collect()
}

pub fn encode_qualities(qualities: &[f64], offset: u8) -> Vec<u8> {
    qualities.iter().map(|&q| accuracy_to_phred(q, offset)).collect()
}
