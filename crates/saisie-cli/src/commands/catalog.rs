//! Catalog command - show the tab order of a correction form.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;

use saisie_core::{catalog_for, FieldPath, LiveFields, RecordType, ValueClassifier, ValueKind};

use super::{load_config, OutputFormat};

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    /// Record type (naissance, mariage, deces)
    #[arg(required = true)]
    record_type: RecordType,

    /// JSON file listing the rendered field paths
    #[arg(long)]
    live: Option<PathBuf>,

    /// Name slots per group when no live file is given
    #[arg(long, default_value = "3")]
    slots: u32,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct CatalogEntry {
    index: usize,
    path: FieldPath,
    kind: ValueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    gate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reveals: Option<FieldPath>,
}

pub fn run(args: CatalogArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let classifier = ValueClassifier::from_config(&config.classifier);
    let catalog = catalog_for(args.record_type);

    let live: LiveFields = match &args.live {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        }
        None => catalog.all_fields(args.slots).into_iter().collect(),
    };

    let entries: Vec<CatalogEntry> = catalog
        .expand(&live)
        .into_iter()
        .filter(|field| live.contains(field.as_str()))
        .enumerate()
        .map(|(index, path)| {
            let template = catalog.position_of(&path).map(|i| &catalog.templates()[i]);
            CatalogEntry {
                index: index + 1,
                kind: classifier.classify(path.as_str()),
                gate: template.and_then(|t| t.gate()).map(|g| g.to_string()),
                reveals: template.and_then(|t| t.reveals()).cloned(),
                path,
            }
        })
        .collect();

    match args.format {
        OutputFormat::Text => {
            println!(
                "{} {} fields for {}",
                style("ℹ").blue(),
                entries.len(),
                args.record_type
            );
            for entry in &entries {
                let mut line = format!("{:>3}. {:<48} {}", entry.index, entry.path.as_str(), entry.kind);
                if let Some(gate) = &entry.gate {
                    line.push_str(&format!("  when {}", gate));
                }
                if let Some(target) = &entry.reveals {
                    line.push_str(&format!("  reveals {}", target));
                }
                println!("{}", line);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(["index", "path", "kind", "gate", "reveals"])?;
            for entry in &entries {
                wtr.write_record([
                    entry.index.to_string(),
                    entry.path.to_string(),
                    entry.kind.to_string(),
                    entry.gate.clone().unwrap_or_default(),
                    entry.reveals.as_ref().map(|r| r.to_string()).unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
    }

    Ok(())
}
