//! Classify command - show the value kind of form field paths.

use clap::Args;
use serde::Serialize;

use saisie_core::{ValueClassifier, ValueKind};

use super::{load_config, OutputFormat};

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// Field paths (e.g. "parent1.dateNaissance.jour")
    #[arg(required = true)]
    paths: Vec<String>,

    /// Treat heure/minute fields as plain text
    #[arg(long)]
    strict_time: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct Classified<'a> {
    path: &'a str,
    kind: ValueKind,
}

pub fn run(args: ClassifyArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let mut classifier = ValueClassifier::from_config(&config.classifier);
    if args.strict_time {
        classifier = classifier.with_numeric_time_fields(false);
    }

    let classified: Vec<Classified> = args
        .paths
        .iter()
        .map(|path| Classified {
            path,
            kind: classifier.classify(path),
        })
        .collect();

    match args.format {
        OutputFormat::Text => {
            for entry in &classified {
                println!("{}\t{}", entry.path, entry.kind);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&classified)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(["path", "kind"])?;
            for entry in &classified {
                wtr.write_record([entry.path, &entry.kind.to_string()])?;
            }
            wtr.flush()?;
        }
    }

    Ok(())
}
