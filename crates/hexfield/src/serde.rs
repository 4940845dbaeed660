//! JSON shapes for templates and decode results.
//!
//! Templates are read and written through [TemplateDef]; decode output is
//! written through [DecodeReportDef]. Both convert to and from the core types.

use serde::{Deserialize, Serialize};

use crate::{
    decode::DecodeReport,
    extract::{ExtractionResult, FieldValue, Omission},
    field::{FieldDefinition, Template},
};

/// A single field of a stored template.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    /// 1-based start bit.
    pub start: i64,
    /// Length in bits.
    pub length: i64,
}

/// A named, ordered field layout.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct TemplateDef {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

/// One extracted field. `value` is `null` when the field is wider than 64 bits.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ResultDef {
    pub name: String,
    pub bits: String,
    pub value: Option<u64>,
}

/// A skipped field and a human-readable reason.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct OmissionDef {
    pub index: usize,
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DecodeReportDef {
    pub bit_len: usize,
    pub results: Vec<ResultDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub omitted: Vec<OmissionDef>,
}

impl From<FieldDef> for FieldDefinition {
    fn from(value: FieldDef) -> Self {
        FieldDefinition {
            name: value.name,
            start: value.start,
            length: value.length,
        }
    }
}

impl From<&FieldDefinition> for FieldDef {
    fn from(value: &FieldDefinition) -> Self {
        FieldDef {
            name: value.name.clone(),
            start: value.start,
            length: value.length,
        }
    }
}

impl From<TemplateDef> for Template {
    fn from(value: TemplateDef) -> Self {
        Template {
            name: value.name,
            fields: value.fields.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&Template> for TemplateDef {
    fn from(value: &Template) -> Self {
        TemplateDef {
            name: value.name.clone(),
            fields: value.fields.iter().map(Into::into).collect(),
        }
    }
}

impl From<&ExtractionResult> for ResultDef {
    fn from(value: &ExtractionResult) -> Self {
        ResultDef {
            name: value.name.clone(),
            bits: value.bits.clone(),
            value: value.value.as_u64(),
        }
    }
}

impl From<ResultDef> for ExtractionResult {
    fn from(value: ResultDef) -> Self {
        ExtractionResult {
            name: value.name,
            bits: value.bits,
            value: value
                .value
                .map_or(FieldValue::NotRepresentable, FieldValue::U64),
        }
    }
}

impl From<&Omission> for OmissionDef {
    fn from(value: &Omission) -> Self {
        OmissionDef {
            index: value.index,
            name: value.name.clone(),
            reason: value.reason.to_string(),
        }
    }
}

impl From<&DecodeReport> for DecodeReportDef {
    fn from(value: &DecodeReport) -> Self {
        DecodeReportDef {
            bit_len: value.bit_len,
            results: value.results.iter().map(Into::into).collect(),
            omitted: value.omissions.iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode::decode_report, field::FieldRow};

    #[test]
    fn test_template_json_shape() {
        let template = Template::new(
            "header",
            vec![
                FieldDefinition::new("version", 1, 3),
                FieldDefinition::new("type", 4, 1),
            ],
        );
        let json = serde_json::to_value(TemplateDef::from(&template)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "header",
                "fields": [
                    { "name": "version", "start": 1, "length": 3 },
                    { "name": "type", "start": 4, "length": 1 }
                ]
            })
        );

        let back: TemplateDef = serde_json::from_value(json).unwrap();
        assert_eq!(Template::from(back), template);
    }

    #[test]
    fn test_template_without_fields() {
        let def: TemplateDef = serde_json::from_str(r#"{ "name": "empty" }"#).unwrap();
        assert!(def.fields.is_empty());
    }

    #[test]
    fn test_report_json_shape() {
        let rows = [
            FieldRow::new("all", "1", "8"),
            FieldRow::new("wide", "1", "72"),
            FieldRow::new("past_end", "9", "8"),
        ];
        let report = decode_report("FF", &rows[..1]).unwrap();
        let json = serde_json::to_value(DecodeReportDef::from(&report)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "bit_len": 8,
                "results": [{ "name": "all", "bits": "11111111", "value": 255 }]
            })
        );

        let report = decode_report("000000000000000000", &rows).unwrap();
        let def = DecodeReportDef::from(&report);
        assert_eq!(def.results[1].value, None);
        assert_eq!(def.omitted.len(), 0);
        assert_eq!(
            ExtractionResult::from(def.results[1].clone()).value,
            FieldValue::NotRepresentable
        );

        let report = decode_report("FF", &rows).unwrap();
        let def = DecodeReportDef::from(&report);
        assert_eq!(def.omitted[0].index, 1);
        assert_eq!(def.omitted[1].name, "past_end");
    }
}
