//! GovTrackr CLI
//!
//! Command-line front end for structural snapshot diffs

use clap::{Parser, Subcommand};
use govtrackr_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "govtrackr")]
#[command(about = "GovTrackr - Record snapshot comparison", long_about = None)]
struct Cli {
    /// Human-readable debug logs on stderr instead of JSON
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare two snapshot files field by field
    Diff(commands::diff::DiffArgs),
    /// Print the canonical digest of a snapshot file
    Digest(commands::digest::DigestArgs),
}

fn main() {
    let cli = Cli::parse();

    logging_facility::init(if cli.verbose {
        Profile::Development
    } else {
        Profile::Production
    });

    let result = match cli.command {
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::Digest(args) => commands::digest::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
