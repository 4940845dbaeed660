//! Subcommand handlers.
//!
//! Handlers write their normal output to `out` and take the template store
//! as a trait object so they can run against an in-memory store in tests.

use std::{
    fs,
    io::{self, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, bail};
use hexfield::{
    decode::{DecodeReport, decode_report},
    errors::DecodeError,
    field::{FieldRow, Template},
    serde::{DecodeReportDef, TemplateDef},
};
use hexfield_store::TemplateStore;
use tracing::{error, info, warn};

/// Where the hex text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HexSource {
    Text(String),
    File(std::path::PathBuf),
    Stdin,
}

impl HexSource {
    pub fn read(&self) -> Result<String> {
        match self {
            HexSource::Text(text) => Ok(text.clone()),
            HexSource::File(path) => read_hex_file(path),
            HexSource::Stdin => {
                let mut text = String::new();
                io::stdin()
                    .read_to_string(&mut text)
                    .context("failed to read hex from stdin")?;
                Ok(text)
            }
        }
    }
}

/// Reads a hex dump from a text file, trimming surrounding whitespace.
pub fn read_hex_file(path: &Path) -> Result<String> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to open hex file {}", path.display()))?;
    Ok(contents.trim().to_string())
}

/// Parses `NAME:START:LEN`. The numbers stay text: rows with bad numbers are
/// skipped at decode time rather than rejected here.
pub fn parse_field_arg(arg: &str) -> Result<FieldRow, String> {
    let mut parts = arg.rsplitn(3, ':');
    let (Some(length), Some(start), Some(name)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected NAME:START:LEN, got {arg:?}"));
    };

    Ok(FieldRow::new(name, start, length))
}

#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    pub template: Option<String>,
    pub fields: Vec<FieldRow>,
    pub json: bool,
    pub explain: bool,
}

/// Template rows first, then rows given on the command line. When no template
/// is named and no field is given, a single default row is used.
pub fn collect_rows(store: &dyn TemplateStore, options: &DecodeOptions) -> Result<Vec<FieldRow>> {
    let mut rows = match &options.template {
        Some(name) => store
            .load(name)
            .with_context(|| format!("failed to load template {name:?}"))?
            .rows(),
        None => Vec::new(),
    };
    rows.extend(options.fields.iter().cloned());

    // Default row only for a bare decode; an empty template stays empty.
    if options.template.is_none() && options.fields.is_empty() {
        rows.push(FieldRow::default_for_row(0));
    }

    Ok(rows)
}

pub fn run_decode(
    store: &dyn TemplateStore,
    raw_hex: &str,
    options: &DecodeOptions,
    out: &mut dyn Write,
) -> Result<()> {
    let rows = collect_rows(store, options)?;

    let report = match decode_report(raw_hex, &rows) {
        Ok(report) => report,
        Err(err) => {
            match &err {
                DecodeError::EmptyInput => info!("Nothing to decode"),
                DecodeError::OddLength { .. } => warn!("{}", err),
                DecodeError::InvalidHexDigit { .. } => error!("{}", err),
            }
            return Err(match err {
                DecodeError::EmptyInput => {
                    anyhow::Error::new(err).context("enter hex text or pass --file")
                }
                err => anyhow::Error::new(err).context("cannot decode hex input"),
            });
        }
    };

    info!(
        "Decoded {} bits: {} fields extracted, {} omitted",
        report.bit_len,
        report.results.len(),
        report.omissions.len()
    );

    if options.json {
        write_report_json(&report, options.explain, out)
    } else {
        write_report_table(&report, options.explain, out)
    }
}

fn write_report_table(report: &DecodeReport, explain: bool, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "NAME\tBITS\tVALUE")?;
    for result in &report.results {
        writeln!(out, "{}\t{}\t{}", result.name, result.bits, result.value)?;
    }

    if explain {
        for omission in &report.omissions {
            writeln!(
                out,
                "# skipped row {} ({}): {}",
                omission.index + 1,
                omission.name,
                omission.reason
            )?;
        }
    }

    Ok(())
}

fn write_report_json(report: &DecodeReport, explain: bool, out: &mut dyn Write) -> Result<()> {
    let mut def = DecodeReportDef::from(report);
    if !explain {
        def.omitted.clear();
    }
    serde_json::to_writer_pretty(&mut *out, &def)?;
    writeln!(out)?;
    Ok(())
}

pub fn run_template_list(store: &dyn TemplateStore, out: &mut dyn Write) -> Result<()> {
    for name in store.list_names()? {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

pub fn run_template_show(
    store: &dyn TemplateStore,
    name: &str,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let template = store.load(name)?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &TemplateDef::from(&template))?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "NAME\tSTART\tLENGTH")?;
    for field in &template.fields {
        writeln!(out, "{}\t{}\t{}", field.name, field.start, field.length)?;
    }
    Ok(())
}

pub fn run_template_save(
    store: &mut dyn TemplateStore,
    name: &str,
    rows: &[FieldRow],
    out: &mut dyn Write,
) -> Result<()> {
    let template = Template::from_rows(name, rows);
    let dropped = rows.len() - template.fields.len();
    if dropped > 0 {
        warn!("{} rows with non-numeric start or length were not saved", dropped);
    }

    let kept = template.fields.len();
    store.save(template)?;
    writeln!(out, "Saved template {} ({} fields)", name.trim(), kept)?;
    Ok(())
}

pub fn run_template_delete(
    store: &mut dyn TemplateStore,
    name: &str,
    out: &mut dyn Write,
) -> Result<()> {
    if !store.delete(name)? {
        bail!("template {:?} does not exist", name.trim());
    }
    writeln!(out, "Deleted template {}", name.trim())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use hexfield::field::FieldDefinition;
    use hexfield_store::MemoryStore;

    use super::*;

    fn output(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn store_with_header() -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .save(Template::new(
                "header",
                vec![
                    FieldDefinition::new("first", 1, 8),
                    FieldDefinition::new("nibble", 9, 4),
                ],
            ))
            .unwrap();
        store
    }

    #[test]
    fn test_parse_field_arg() {
        assert_eq!(parse_field_arg("id:1:8"), Ok(FieldRow::new("id", "1", "8")));
        assert_eq!(
            parse_field_arg("a:b:9:4"),
            Ok(FieldRow::new("a:b", "9", "4"))
        );
        assert_eq!(parse_field_arg("x:y:z"), Ok(FieldRow::new("x", "y", "z")));
        assert!(parse_field_arg("1:8").is_err());
    }

    #[test]
    fn test_decode_with_template_table() {
        let store = store_with_header();
        let options = DecodeOptions {
            template: Some("header".to_string()),
            ..Default::default()
        };
        let text = output(|out| run_decode(&store, "FF0A", &options, out));
        assert_eq!(
            text,
            "NAME\tBITS\tVALUE\nfirst\t11111111\t255\nnibble\t0000\t0\n"
        );
    }

    #[test]
    fn test_decode_default_row() {
        let store = MemoryStore::new();
        let text = output(|out| run_decode(&store, "2A", &DecodeOptions::default(), out));
        assert_eq!(text, "NAME\tBITS\tVALUE\nField 1\t00101010\t42\n");
    }

    #[test]
    fn test_decode_empty_template_has_no_rows() {
        let mut store = MemoryStore::new();
        store.save(Template::new("empty", vec![])).unwrap();
        let options = DecodeOptions {
            template: Some("empty".to_string()),
            ..Default::default()
        };
        let text = output(|out| run_decode(&store, "2A", &options, out));
        assert_eq!(text, "NAME\tBITS\tVALUE\n");
    }

    #[test]
    fn test_decode_explain() {
        let store = MemoryStore::new();
        let options = DecodeOptions {
            fields: vec![FieldRow::new("wide", "1", "16"), FieldRow::new("ok", "1", "4")],
            explain: true,
            ..Default::default()
        };
        let text = output(|out| run_decode(&store, "F0", &options, out));
        assert_eq!(
            text,
            "NAME\tBITS\tVALUE\nok\t1111\t15\n\
             # skipped row 1 (wide): field ends at bit 16 but only 8 bits are available\n"
        );
    }

    #[test]
    fn test_decode_json() {
        let store = MemoryStore::new();
        let options = DecodeOptions {
            fields: vec![FieldRow::new("wide", "1", "72"), FieldRow::new("bad", "", "1")],
            json: true,
            ..Default::default()
        };
        let text = output(|out| run_decode(&store, &"00".repeat(9), &options, out));
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "bit_len": 72,
                "results": [{ "name": "wide", "bits": "0".repeat(72), "value": null }]
            })
        );
    }

    #[test]
    fn test_decode_errors() {
        let store = MemoryStore::new();
        let options = DecodeOptions::default();
        let mut out = Vec::new();

        let err = run_decode(&store, "ABC", &options, &mut out).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DecodeError>(),
            Some(&DecodeError::OddLength { len: 3 })
        );
        let err = run_decode(&store, "  ", &options, &mut out).unwrap_err();
        assert_eq!(err.downcast_ref::<DecodeError>(), Some(&DecodeError::EmptyInput));
        assert!(out.is_empty());
    }

    #[test]
    fn test_decode_unknown_template() {
        let store = MemoryStore::new();
        let options = DecodeOptions {
            template: Some("missing".to_string()),
            ..Default::default()
        };
        assert!(run_decode(&store, "00", &options, &mut Vec::new()).is_err());
    }

    #[test]
    fn test_template_commands() {
        let mut store = MemoryStore::new();
        let rows = vec![
            FieldRow::new("sync", "1", "16"),
            FieldRow::new("junk", "?", "1"),
        ];

        let text = output(|out| run_template_save(&mut store, " frame ", &rows, out));
        assert_eq!(text, "Saved template frame (1 fields)\n");

        let text = output(|out| run_template_list(&store, out));
        assert_eq!(text, "frame\n");

        let text = output(|out| run_template_show(&store, "frame", false, out));
        assert_eq!(text, "NAME\tSTART\tLENGTH\nsync\t1\t16\n");

        let text = output(|out| run_template_show(&store, "frame", true, out));
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["fields"][0]["length"], 16);

        let text = output(|out| run_template_delete(&mut store, "frame", out));
        assert_eq!(text, "Deleted template frame\n");
        assert!(run_template_delete(&mut store, "frame", &mut Vec::new()).is_err());
    }

    #[test]
    fn test_read_hex_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.txt");
        fs::write(&path, "\n  DE AD\nBE EF  \n").unwrap();

        assert_eq!(read_hex_file(&path).unwrap(), "DE AD\nBE EF");
        assert!(read_hex_file(&dir.path().join("missing.txt")).is_err());
    }
}
