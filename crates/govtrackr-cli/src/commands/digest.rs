//! Snapshot digest command

use clap::Args;
use govtrackr_core::snapshot::canonical_digest;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DigestArgs {
    /// Snapshot JSON file
    pub file: PathBuf,
}

pub fn execute(args: DigestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = super::read_snapshot(&args.file)?;
    println!("{}", canonical_digest(&snapshot));
    Ok(())
}
