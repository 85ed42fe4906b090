//! Replay command - run a scripted fill session against the engine.
//!
//! A script stands in for the host UI: it lists the rendered fields, the
//! initial form values and the operator's focus, selection and edit steps.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Instant;

use clap::Args;
use console::style;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use saisie_core::{
    catalog_for, decode_payload, ComposedDocument, ExtractionSession, FieldPath, FormValues,
    PendingFocus, RecordType, SaisieConfig, SessionError, SessionEvent, StatusKind,
};

use super::{load_config, OutputFormat};

/// Name slots rendered per group when a script lists no live fields.
const DEFAULT_NAME_SLOTS: u32 = 3;

/// Arguments for the replay command.
#[derive(Args)]
pub struct ReplayArgs {
    /// Session script (JSON)
    #[arg(required = true)]
    script: PathBuf,

    /// Apply focus moves immediately instead of waiting for the configured delays
    #[arg(long)]
    no_delay: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

/// Scripted fill session.
#[derive(Debug, Deserialize)]
pub struct ReplayScript {
    pub record_type: RecordType,
    #[serde(default)]
    pub live_fields: Option<Vec<FieldPath>>,
    #[serde(default)]
    pub values: Option<Value>,
    /// Composed act payload, wrapped or bare.
    #[serde(default)]
    pub document: Option<Value>,
    pub steps: Vec<Step>,
}

/// One operator action.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Focus(FieldPath),
    Select(String),
    /// Select a whole line of the act body (1-based).
    SelectLine(usize),
    Set { path: String, value: Value },
    AddField(FieldPath),
    RemoveField(String),
}

/// What a replayed session produced.
#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub record_type: RecordType,
    pub events: Vec<SessionEvent>,
    pub values: FormValues,
    pub fields_filled: usize,
    pub last_field: Option<FieldPath>,
    pub rejected_selections: usize,
}

pub fn load_script(path: &Path) -> anyhow::Result<ReplayScript> {
    let content = fs::read_to_string(path)?;
    let script = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid script {}: {}", path.display(), e))?;
    Ok(script)
}

fn load_document(document: &Value) -> anyhow::Result<ComposedDocument> {
    let raw = match document {
        Value::String(raw) => raw.clone(),
        other => other.to_string(),
    };
    Ok(decode_payload(&raw)?)
}

async fn wait_and_focus(session: &mut ExtractionSession, pending: PendingFocus, delays: bool) {
    if delays {
        tokio::time::sleep(pending.delay()).await;
    }
    if !session.complete_focus(&pending) {
        debug!("Focus on {} was not applied", pending.target);
    }
}

/// Replay a script and collect every event the session emitted.
pub async fn replay_script(
    script: &ReplayScript,
    config: &SaisieConfig,
    delays: bool,
) -> anyhow::Result<ReplayReport> {
    let live = match &script.live_fields {
        Some(fields) => fields.clone(),
        None => catalog_for(script.record_type).all_fields(DEFAULT_NAME_SLOTS),
    };
    let values = script.values.clone().map(FormValues::from_json).unwrap_or_default();
    let document = script.document.as_ref().map(load_document).transpose()?;

    let mut session = ExtractionSession::open(script.record_type, config.clone())
        .with_live_fields(live)
        .with_values(values);

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    session.subscribe(move |event: &SessionEvent| sink.borrow_mut().push(event.clone()));

    if let Some(pending) = session.start()? {
        wait_and_focus(&mut session, pending, delays).await;
    }

    let mut fields_filled = 0;
    let mut rejected_selections = 0;

    for (index, step) in script.steps.iter().enumerate() {
        debug!("Step {}: {:?}", index + 1, step);

        let selection = match step {
            Step::Focus(path) => {
                session.on_field_focused(path.clone())?;
                None
            }
            Step::Select(text) => Some(text.clone()),
            Step::SelectLine(line) => {
                let document = document
                    .as_ref()
                    .ok_or_else(|| anyhow::anyhow!("Step {} selects a line but the script has no document", index + 1))?;
                let text = document
                    .body_lines()
                    .get(line.saturating_sub(1))
                    .map(|l| l.to_string())
                    .ok_or_else(|| anyhow::anyhow!("Document has no line {}", line))?;
                Some(text)
            }
            Step::Set { path, value } => {
                session.set_value(path, value.clone())?;
                None
            }
            Step::AddField(path) => {
                session.add_field(path.clone())?;
                None
            }
            Step::RemoveField(path) => {
                session.remove_field(path)?;
                None
            }
        };

        let Some(text) = selection else {
            continue;
        };

        match session.on_text_selected(&text) {
            Ok(outcome) => {
                fields_filled += 1;
                if let Some(pending) = outcome.pending_focus {
                    wait_and_focus(&mut session, pending, delays).await;
                }
            }
            Err(SessionError::NoActiveField) => {
                warn!("Step {}: selection without an active field", index + 1);
                rejected_selections += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    let last_field = session.active_field().cloned();
    let values = session.values().clone();
    session.close();
    info!(
        "Replayed {} steps, {} fields filled",
        script.steps.len(),
        fields_filled
    );

    let events = events.borrow().clone();
    Ok(ReplayReport {
        record_type: script.record_type,
        events,
        values,
        fields_filled,
        last_field,
        rejected_selections,
    })
}

pub async fn run(args: ReplayArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.script.exists() {
        anyhow::bail!("Script not found: {}", args.script.display());
    }

    let script = load_script(&args.script)?;
    let report = replay_script(&script, &config, !args.no_delay).await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Csv => print_events_csv(&report)?,
        OutputFormat::Text => {
            print_events_text(&report);
            println!();
            println!("{}", serde_json::to_string_pretty(report.values.as_json())?);
            println!();
            println!(
                "{} {} fields filled in {:?}",
                style("✓").green(),
                report.fields_filled,
                start.elapsed()
            );
        }
    }

    Ok(())
}

fn print_events_text(report: &ReplayReport) {
    for event in &report.events {
        match event {
            SessionEvent::ActiveFieldChanged { field: Some(field) } => {
                println!("{} {}", style("→").cyan(), field)
            }
            SessionEvent::ActiveFieldChanged { field: None } => {}
            SessionEvent::ValueWritten { field, value } => {
                println!("{} {} = {:?}", style("✓").green(), field, value)
            }
            SessionEvent::FocusRequested { field } => println!("  focus {}", field),
            SessionEvent::StatusChanged(status) => match status.kind {
                StatusKind::Success => println!("  {}", style(status).dim()),
                StatusKind::Error => println!("{} {}", style("✗").red(), status),
            },
        }
    }
}

fn print_events_csv(report: &ReplayReport) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    wtr.write_record(["event", "field", "detail"])?;

    for event in &report.events {
        let (name, field, detail) = match event {
            SessionEvent::ActiveFieldChanged { field } => (
                "active_field_changed",
                field.as_ref().map(|f| f.to_string()).unwrap_or_default(),
                String::new(),
            ),
            SessionEvent::ValueWritten { field, value } => {
                ("value_written", field.to_string(), value.clone())
            }
            SessionEvent::FocusRequested { field } => {
                ("focus_requested", field.to_string(), String::new())
            }
            SessionEvent::StatusChanged(status) => {
                ("status_changed", String::new(), status.message.clone())
            }
        };
        wtr.write_record([name, field.as_str(), detail.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}
