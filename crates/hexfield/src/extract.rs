//! Slicing named fields out of a [BitSequence].
//!
//! Extraction is best effort: every field is processed independently, and a
//! field whose numbers do not parse, are not positive, or reach past the end
//! of the stream is omitted while the rest of the batch carries on. [extract]
//! stays silent about omissions; [extract_all] and [extract_with_omissions]
//! report them.

use std::{borrow::Cow, fmt};

use thiserror::Error;
use tracing::debug;

use crate::{
    bits::BitSequence,
    field::{FieldDefinition, FieldRow},
};

/// Widest field that still has a numeric value.
pub const MAX_VALUE_BITS: usize = 64;

/// Numeric interpretation of a field's bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    /// Unsigned, MSB-first.
    U64(u64),
    /// The field is wider than [MAX_VALUE_BITS]; only its bits are available.
    NotRepresentable,
}

impl FieldValue {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::U64(value) => Some(*value),
            FieldValue::NotRepresentable => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::U64(value) => write!(f, "{value}"),
            FieldValue::NotRepresentable => f.write_str("-"),
        }
    }
}

/// One extracted field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub name: String,
    /// Exactly `length` characters of `'0'`/`'1'`.
    pub bits: String,
    pub value: FieldValue,
}

/// Why a field produced no result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OmitReason {
    #[error("start is not an integer")]
    InvalidStart,
    #[error("length is not an integer")]
    InvalidLength,
    #[error("start must be at least 1")]
    NonPositiveStart,
    #[error("length must be at least 1")]
    NonPositiveLength,
    /// `end` is the 1-based last bit the field would need.
    #[error("field ends at bit {end} but only {available} bits are available")]
    OutOfRange { end: u64, available: usize },
}

/// A field that was skipped, with its position in the input list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Omission {
    pub index: usize,
    pub name: String,
    pub reason: OmitReason,
}

/// Per-field outcome, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Extracted(ExtractionResult),
    Omitted(Omission),
}

/// Anything that can describe a field: raw editor rows or parsed definitions.
pub trait FieldSource {
    fn field_name(&self) -> &str;
    fn definition(&self) -> Result<Cow<'_, FieldDefinition>, OmitReason>;
}

impl FieldSource for FieldRow {
    fn field_name(&self) -> &str {
        &self.name
    }

    fn definition(&self) -> Result<Cow<'_, FieldDefinition>, OmitReason> {
        self.parse().map(Cow::Owned)
    }
}

impl FieldSource for FieldDefinition {
    fn field_name(&self) -> &str {
        &self.name
    }

    fn definition(&self) -> Result<Cow<'_, FieldDefinition>, OmitReason> {
        Ok(Cow::Borrowed(self))
    }
}

/// Extracts a single field.
pub fn extract_field(
    bits: &BitSequence,
    definition: &FieldDefinition,
) -> Result<ExtractionResult, OmitReason> {
    let (start_index, length) = definition.span()?;

    let out_of_range = || OmitReason::OutOfRange {
        end: (start_index as u64).saturating_add(length as u64),
        available: bits.len(),
    };

    let end = start_index.checked_add(length).ok_or_else(out_of_range)?;
    if end > bits.len() {
        return Err(out_of_range());
    }

    let text = bits
        .bits(start_index, length)
        .map_err(|_| out_of_range())?;

    let value = if length <= MAX_VALUE_BITS {
        bits.read_u64(start_index, length)
            .map(FieldValue::U64)
            .map_err(|_| out_of_range())?
    } else {
        FieldValue::NotRepresentable
    };

    Ok(ExtractionResult {
        name: definition.name.clone(),
        bits: text,
        value,
    })
}

/// Processes every field in order and reports what happened to each one.
pub fn extract_all<F: FieldSource>(bits: &BitSequence, fields: &[F]) -> Vec<Extraction> {
    fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            match field
                .definition()
                .and_then(|definition| extract_field(bits, &definition))
            {
                Ok(result) => Extraction::Extracted(result),
                Err(reason) => {
                    debug!(index, name = field.field_name(), %reason, "field omitted");
                    Extraction::Omitted(Omission {
                        index,
                        name: field.field_name().to_string(),
                        reason,
                    })
                }
            }
        })
        .collect()
}

/// Extracted fields in input order; omitted fields are left out silently.
pub fn extract<F: FieldSource>(bits: &BitSequence, fields: &[F]) -> Vec<ExtractionResult> {
    extract_with_omissions(bits, fields).0
}

/// Extracted fields plus the list of omitted ones, both in input order.
pub fn extract_with_omissions<F: FieldSource>(
    bits: &BitSequence,
    fields: &[F],
) -> (Vec<ExtractionResult>, Vec<Omission>) {
    let mut results = Vec::with_capacity(fields.len());
    let mut omissions = Vec::new();

    for extraction in extract_all(bits, fields) {
        match extraction {
            Extraction::Extracted(result) => results.push(result),
            Extraction::Omitted(omission) => omissions.push(omission),
        }
    }

    (results, omissions)
}
