//! Convert command - turn a selection into a field value.

use clap::Args;
use console::style;
use serde::Serialize;

use saisie_core::{ConversionResult, ValueClassifier, ValueConverter, ValueKind};

use super::{load_config, OutputFormat};

/// Arguments for the convert command.
#[derive(Args)]
pub struct ConvertArgs {
    /// Selected text (e.g. "vingt-quatre")
    #[arg(required = true)]
    text: String,

    /// Value kind to convert into
    #[arg(short, long, conflicts_with = "field")]
    kind: Option<ValueKind>,

    /// Field path to classify and convert for
    #[arg(long)]
    field: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct ConvertOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'a str>,
    kind: ValueKind,
    #[serde(flatten)]
    result: ConversionResult,
}

pub fn run(args: ConvertArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let kind = match (args.kind, args.field.as_deref()) {
        (Some(kind), _) => kind,
        (None, Some(field)) => ValueClassifier::from_config(&config.classifier).classify(field),
        (None, None) => anyhow::bail!("Either --kind or --field is required"),
    };

    let result = ValueConverter::new().convert(&args.text, kind);

    match args.format {
        OutputFormat::Text => {
            println!("{}", result.final_value);
            if result.was_converted {
                eprintln!("{} converted as {}", style("✓").green(), kind);
            }
        }
        OutputFormat::Json => {
            let output = ConvertOutput {
                field: args.field.as_deref(),
                kind,
                result,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(["kind", "final_value", "was_converted"])?;
            wtr.write_record([
                kind.to_string(),
                result.final_value,
                result.was_converted.to_string(),
            ])?;
            wtr.flush()?;
        }
    }

    Ok(())
}
