//! Field rows, parsed field definitions and templates.

use crate::extract::OmitReason;

/// A field row exactly as an editor supplies it: numbers are still text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    pub name: String,
    /// 1-based start bit.
    pub start: String,
    /// Length in bits.
    pub length: String,
}

impl FieldRow {
    pub fn new(
        name: impl Into<String>,
        start: impl Into<String>,
        length: impl Into<String>,
    ) -> Self {
        FieldRow {
            name: name.into(),
            start: start.into(),
            length: length.into(),
        }
    }

    /// The row an editor adds at zero-based position `row`: `Field {row+1}`,
    /// byte aligned, 8 bits long.
    pub fn default_for_row(row: usize) -> Self {
        FieldDefinition::default_for_row(row).to_row()
    }

    /// Parses start and length. Range validity is not checked here.
    pub fn parse(&self) -> Result<FieldDefinition, OmitReason> {
        let start = parse_int(&self.start).ok_or(OmitReason::InvalidStart)?;
        let length = parse_int(&self.length).ok_or(OmitReason::InvalidLength)?;

        Ok(FieldDefinition {
            name: self.name.clone(),
            start,
            length,
        })
    }
}

/// Row numbers are 32-bit; anything wider does not parse.
fn parse_int(text: &str) -> Option<i64> {
    text.trim().parse::<i32>().ok().map(i64::from)
}

/// A named bit range with parsed numbers.
///
/// Numbers are kept signed so that stored templates can carry rows the
/// extractor will later skip (`start <= 0` or `length <= 0`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    /// 1-based start bit.
    pub start: i64,
    /// Length in bits.
    pub length: i64,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, start: i64, length: i64) -> Self {
        FieldDefinition {
            name: name.into(),
            start,
            length,
        }
    }

    pub fn default_for_row(row: usize) -> Self {
        FieldDefinition {
            name: format!("Field {}", row + 1),
            start: row as i64 * 8 + 1,
            length: 8,
        }
    }

    /// Zero-based start index and length, if both numbers are positive.
    pub fn span(&self) -> Result<(usize, usize), OmitReason> {
        if self.start <= 0 {
            return Err(OmitReason::NonPositiveStart);
        }
        if self.length <= 0 {
            return Err(OmitReason::NonPositiveLength);
        }

        let start_index = usize::try_from(self.start - 1).map_err(|_| OmitReason::InvalidStart)?;
        let length = usize::try_from(self.length).map_err(|_| OmitReason::InvalidLength)?;

        Ok((start_index, length))
    }

    pub fn to_row(&self) -> FieldRow {
        FieldRow {
            name: self.name.clone(),
            start: self.start.to_string(),
            length: self.length.to_string(),
        }
    }
}

impl From<&FieldDefinition> for FieldRow {
    fn from(value: &FieldDefinition) -> Self {
        value.to_row()
    }
}

/// A named, ordered field layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub fields: Vec<FieldDefinition>,
}

impl Template {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Template {
            name: name.into(),
            fields,
        }
    }

    /// Builds a template from editor rows, keeping every row whose numbers
    /// parse (even non-positive ones) and dropping the rest.
    pub fn from_rows(name: impl Into<String>, rows: &[FieldRow]) -> Self {
        Template {
            name: name.into(),
            fields: rows.iter().filter_map(|row| row.parse().ok()).collect(),
        }
    }

    pub fn rows(&self) -> Vec<FieldRow> {
        self.fields.iter().map(FieldRow::from).collect()
    }
}
