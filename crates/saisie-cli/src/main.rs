//! CLI application for assisted civil-status form filling.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, catalog, classify, config, convert, replay};

/// Assisted field fill - turn selected French act text into form values
#[derive(Parser)]
#[command(name = "saisie")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify form field paths
    Classify(classify::ClassifyArgs),

    /// Convert selected text into a field value
    Convert(convert::ConvertArgs),

    /// Show the field order of a record type
    Catalog(catalog::CatalogArgs),

    /// Replay a scripted fill session
    Replay(replay::ReplayArgs),

    /// Replay multiple session scripts
    Batch(batch::BatchArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    match cli.command {
        Commands::Classify(args) => classify::run(args, cli.config.as_deref()),
        Commands::Convert(args) => convert::run(args, cli.config.as_deref()),
        Commands::Catalog(args) => catalog::run(args, cli.config.as_deref()),
        Commands::Replay(args) => replay::run(args, cli.config.as_deref()).await,
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()).await,
        Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
    }
}
