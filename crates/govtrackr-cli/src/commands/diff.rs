//! Snapshot diff command

use clap::{Args, ValueEnum};
use govtrackr_core::core_types::RequestContext;
use govtrackr_core::diff::{compute_diff, render_human_summary};
use govtrackr_core::errors::{ExError, ExErrorKind};
use govtrackr_core::{log_op_end, log_op_error, log_op_start, DiffOptions};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Full `SnapshotDiff` report as pretty JSON
    Json,
    /// Markdown summary of changed paths
    Summary,
}

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Older snapshot (JSON object)
    pub left: PathBuf,

    /// Newer snapshot (JSON object)
    pub right: PathBuf,

    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Overrides `max_depth` from the config file
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Abort on the first type-kind mismatch or depth overflow
    #[arg(long)]
    pub fail_fast: bool,

    /// TOML file with diff options
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn execute(args: DiffArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::new();
    log_op_start!("cli_diff", request_id = %ctx.request_id);
    let start = std::time::Instant::now();

    match run(&args) {
        Ok(output) => {
            log_op_end!(
                "cli_diff",
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %ctx.request_id
            );
            print!("{}", output);
            Ok(())
        }
        Err(e) => {
            let e = e.with_request_id(ctx.request_id.clone());
            log_op_error!(
                "cli_diff",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %ctx.request_id
            );
            Err(e.into())
        }
    }
}

fn run(args: &DiffArgs) -> Result<String, ExError> {
    let options = resolve_options(args)?;
    let left = super::read_snapshot(&args.left)?;
    let right = super::read_snapshot(&args.right)?;

    let report = compute_diff(&left, &right, &options)?;

    match args.format {
        OutputFormat::Json => {
            let mut text = serde_json::to_string_pretty(&report)?;
            text.push('\n');
            Ok(text)
        }
        OutputFormat::Summary => Ok(render_human_summary(&report)),
    }
}

/// Config file first, then command-line overrides
fn resolve_options(args: &DiffArgs) -> Result<DiffOptions, ExError> {
    let mut options = match &args.config {
        Some(path) => load_options(path)?,
        None => DiffOptions::default(),
    };
    if let Some(max_depth) = args.max_depth {
        options.max_depth = max_depth;
    }
    if args.fail_fast {
        options.fail_fast = true;
    }
    options.validate()?;
    Ok(options)
}

fn load_options(path: &Path) -> Result<DiffOptions, ExError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        ExError::new(ExErrorKind::Io)
            .with_op("load_options")
            .with_message(format!("cannot read {}: {}", path.display(), e))
    })?;
    DiffOptions::from_toml_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> DiffArgs {
        DiffArgs {
            left: PathBuf::from("left.json"),
            right: PathBuf::from("right.json"),
            format: OutputFormat::Json,
            max_depth: None,
            fail_fast: false,
            config: None,
        }
    }

    #[test]
    fn test_defaults_without_config() {
        assert_eq!(resolve_options(&args()).unwrap(), DiffOptions::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let mut a = args();
        a.max_depth = Some(5);
        a.fail_fast = true;
        let options = resolve_options(&a).unwrap();
        assert_eq!(options.max_depth, 5);
        assert!(options.fail_fast);
    }

    #[test]
    fn test_zero_depth_flag_rejected() {
        let mut a = args();
        a.max_depth = Some(0);
        let err = resolve_options(&a).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidConfig);
    }

    #[test]
    fn test_missing_config_is_io_error() {
        let mut a = args();
        a.config = Some(PathBuf::from("/nonexistent/govtrackr.toml"));
        let err = resolve_options(&a).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Io);
        assert_eq!(err.op(), Some("load_options"));
    }
}
