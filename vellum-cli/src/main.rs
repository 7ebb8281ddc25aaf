//! Vellum CLI - Command-line interface for STF manuscript transport

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "vellum")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack an STF manuscript into a transport container
    Pack {
        /// Input .stf file path
        input: String,

        /// Output container file path
        #[arg(short, long)]
        output: String,
    },

    /// Unpack a transport container into an STF manuscript and its images
    Unpack {
        /// Input container file path
        input: String,

        /// Output directory
        #[arg(short, long)]
        output: String,
    },

    /// Display information about a manuscript or container
    Info {
        /// Input file path (.stf or .stfpack)
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a manuscript or container
    Validate {
        /// Input file path (.stf or .stfpack)
        input: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "vellum_cli=debug,vellum_core=debug"
    } else {
        "vellum_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Pack { input, output } => commands::pack(&input, &output),

        Commands::Unpack { input, output } => commands::unpack(&input, &output),

        Commands::Info { input, json } => commands::info(&input, json),

        Commands::Validate { input } => commands::validate(&input),
    }
}
