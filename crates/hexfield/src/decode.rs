//! Raw hex text and field rows in, extracted fields out.

use crate::{
    errors::DecodeError,
    extract::{self, ExtractionResult, FieldSource, Omission},
    hex::normalize,
};

/// Full outcome of a successful decode, for front ends that show diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeReport {
    /// Number of bits in the decoded stream.
    pub bit_len: usize,
    pub results: Vec<ExtractionResult>,
    pub omissions: Vec<Omission>,
}

/// Normalizes `raw_hex`, expands it to bits and extracts `fields` in order.
///
/// Hex-level problems fail the whole call; problems with single fields only
/// remove those fields from the result.
pub fn decode<F: FieldSource>(
    raw_hex: &str,
    fields: &[F],
) -> Result<Vec<ExtractionResult>, DecodeError> {
    decode_report(raw_hex, fields).map(|report| report.results)
}

/// Like [decode], but also returns the stream length and the omitted fields.
pub fn decode_report<F: FieldSource>(
    raw_hex: &str,
    fields: &[F],
) -> Result<DecodeReport, DecodeError> {
    let bits = normalize(raw_hex)?.to_bits()?;
    let (results, omissions) = extract::extract_with_omissions(&bits, fields);

    Ok(DecodeReport {
        bit_len: bits.len(),
        results,
        omissions,
    })
}
