//! hexfield command-line tool
//!
//! ## Usage
//!
//! ```bash
//! # Decode with ad-hoc fields (NAME:START:LEN, 1-based start bit)
//! hexfield decode "FF 0A" --field flags:1:8 --field kind:9:4
//!
//! # Save a layout and reuse it
//! hexfield template save header --field version:1:3 --field type:4:1
//! hexfield decode --file dump.txt --template header --json
//!
//! # Manage templates
//! hexfield template list
//! hexfield template show header
//! hexfield template delete header
//! ```

mod commands;
mod config;

use std::{io, path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use hexfield::field::FieldRow;
use hexfield_store::JsonFileStore;
use tracing::debug;
use tracing_subscriber::FmtSubscriber;

use crate::{
    commands::{DecodeOptions, HexSource},
    config::{FileConfig, Settings},
};

#[derive(Parser, Debug)]
#[command(name = "hexfield")]
#[command(version)]
#[command(about = "Extract named bit-fields from hex byte streams", long_about = None)]
struct Args {
    /// Template store file
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode hex text into field values
    Decode(DecodeArgs),

    /// Manage stored templates
    #[command(subcommand)]
    Template(TemplateCommand),
}

#[derive(ClapArgs, Debug)]
struct DecodeArgs {
    /// Hex text; read from stdin when neither this nor --file is given
    #[arg(conflicts_with = "file")]
    hex: Option<String>,

    /// Read hex text from a file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Use the fields of a stored template
    #[arg(short, long)]
    template: Option<String>,

    /// Field as NAME:START:LEN; may be repeated
    #[arg(long = "field", value_parser = commands::parse_field_arg)]
    fields: Vec<FieldRow>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Also report skipped fields and why
    #[arg(long)]
    explain: bool,
}

#[derive(Subcommand, Debug)]
enum TemplateCommand {
    /// List template names
    List,

    /// Print the fields of a template
    Show {
        name: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Save fields under a name, replacing any template with that name
    Save {
        name: String,

        /// Field as NAME:START:LEN; may be repeated
        #[arg(long = "field", value_parser = commands::parse_field_arg)]
        fields: Vec<FieldRow>,
    },

    /// Delete a template
    Delete { name: String },
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let file_config = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(file_config, args.store, args.log_level);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(settings.log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    debug!("Using template store {}", settings.store_path.display());
    let mut store = JsonFileStore::open(&settings.store_path)?;
    let mut out = io::stdout().lock();

    match args.command {
        Command::Decode(decode) => {
            let source = match (decode.hex, decode.file) {
                (Some(text), _) => HexSource::Text(text),
                (None, Some(path)) => HexSource::File(path),
                (None, None) => HexSource::Stdin,
            };
            let options = DecodeOptions {
                template: decode.template,
                fields: decode.fields,
                json: decode.json,
                explain: decode.explain,
            };
            commands::run_decode(&store, &source.read()?, &options, &mut out)
        }
        Command::Template(TemplateCommand::List) => commands::run_template_list(&store, &mut out),
        Command::Template(TemplateCommand::Show { name, json }) => {
            commands::run_template_show(&store, &name, json, &mut out)
        }
        Command::Template(TemplateCommand::Save { name, fields }) => {
            commands::run_template_save(&mut store, &name, &fields, &mut out)
        }
        Command::Template(TemplateCommand::Delete { name }) => {
            commands::run_template_delete(&mut store, &name, &mut out)
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_decode_args() {
        let args = Args::parse_from([
            "hexfield", "decode", "FF0A", "--field", "a:1:8", "--field", "b:9:4", "--json",
        ]);
        let Command::Decode(decode) = args.command else {
            panic!("expected decode");
        };
        assert_eq!(decode.hex.as_deref(), Some("FF0A"));
        assert_eq!(
            decode.fields,
            vec![FieldRow::new("a", "1", "8"), FieldRow::new("b", "9", "4")]
        );
        assert!(decode.json);
    }

    #[test]
    fn test_hex_and_file_conflict() {
        assert!(
            Args::try_parse_from(["hexfield", "decode", "FF", "--file", "dump.txt"]).is_err()
        );
    }

    #[test]
    fn test_global_store_flag() {
        let args = Args::parse_from(["hexfield", "template", "list", "--store", "x.json"]);
        assert_eq!(args.store, Some(PathBuf::from("x.json")));
        assert!(matches!(args.command, Command::Template(TemplateCommand::List)));
    }
}
