//! Config command - manage configuration.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use saisie_core::SaisieConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "navigation.focus_delay_ms")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("saisie")
        .join("config.json")
}

/// Configuration file the command operates on.
struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    fn new(config_path: Option<&str>) -> Self {
        Self {
            path: config_path.map(PathBuf::from).unwrap_or_else(default_config_path),
        }
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn load(&self) -> anyhow::Result<SaisieConfig> {
        if self.exists() {
            Ok(SaisieConfig::from_file(&self.path)?)
        } else {
            Ok(SaisieConfig::default())
        }
    }

    fn save(&self, config: &SaisieConfig) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        config.save(&self.path)?;
        Ok(())
    }
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let file = ConfigFile::new(config_path);

    match args.command {
        ConfigCommand::Show => show_config(&file),
        ConfigCommand::Init(init_args) => init_config(&file, init_args),
        ConfigCommand::Get { key } => get_config(&file, &key),
        ConfigCommand::Set { key, value } => set_config(&file, &key, &value),
        ConfigCommand::Path => show_path(&file),
    }
}

fn show_config(file: &ConfigFile) -> anyhow::Result<()> {
    if !file.exists() {
        eprintln!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }

    let config = file.load()?;
    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(file: &ConfigFile, args: InitArgs) -> anyhow::Result<()> {
    let target = match args.output {
        Some(path) => ConfigFile { path },
        None => ConfigFile {
            path: file.path.clone(),
        },
    };

    if target.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            target.path.display()
        );
    }

    target.save(&SaisieConfig::default())?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        target.path.display()
    );

    Ok(())
}

/// Value at a dotted key of the serialized configuration.
fn lookup<'a>(json: &'a Value, key: &str) -> anyhow::Result<&'a Value> {
    key.split('.')
        .try_fold(json, |node, part| node.get(part))
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))
}

fn get_config(file: &ConfigFile, key: &str) -> anyhow::Result<()> {
    let json = serde_json::to_value(file.load()?)?;
    println!("{}", serde_json::to_string_pretty(lookup(&json, key)?)?);
    Ok(())
}

fn set_config(file: &ConfigFile, key: &str, value: &str) -> anyhow::Result<()> {
    let mut json = serde_json::to_value(file.load()?)?;

    let parsed_value: Value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));

    let current = lookup(&json, key)?;
    if current.is_object() {
        anyhow::bail!("{} is a section, set one of its keys instead", key);
    }

    let (parent_key, leaf) = key.rsplit_once('.').unwrap_or(("", key));
    let parent = if parent_key.is_empty() {
        Some(&mut json)
    } else {
        parent_key.split('.').try_fold(&mut json, |node, part| node.get_mut(part))
    };
    if let Some(Value::Object(section)) = parent {
        section.insert(leaf.to_string(), parsed_value.clone());
    }

    // Round-trip through the typed config so wrong value types are rejected
    let config: SaisieConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;
    file.save(&config)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed_value)?
    );

    Ok(())
}

fn show_path(file: &ConfigFile) -> anyhow::Result<()> {
    println!("Configuration file: {}", file.path.display());

    if file.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'saisie config init' to create a configuration file.");
    }

    Ok(())
}
