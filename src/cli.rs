//! Command-line interface for norms.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::report;
use crate::verify::Verifier;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;

/// Environment variable holding a tracing filter, e.g. `NORMS_LOG=debug`.
pub const LOG_ENV: &str = "NORMS_LOG";

/// Audit a repository against a catalog of project conventions.
///
/// Checks for the presence and configuration of licenses, CI workflows,
/// linters, formatters and lockfiles, with extra checks for each detected
/// language. Nothing in the audited project is modified or executed.
#[derive(Parser)]
#[command(name = "norms")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify a project follows the conventions
    Verify(VerifyArgs),
}

/// Arguments for the verify command.
#[derive(Parser)]
pub struct VerifyArgs {
    /// Project directory to audit
    pub path: PathBuf,

    /// Emit the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to a config file (default: .norms.yaml or norms.yaml in the project)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Install the stderr log subscriber.
///
/// `NORMS_LOG` takes precedence; otherwise only warnings are shown unless
/// `verbose` is set.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("norms=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the verify command.
pub fn run_verify(args: &VerifyArgs) -> anyhow::Result<i32> {
    let mut verifier = Verifier::default();
    if let Some(config) = &args.config {
        verifier = verifier.config_path(config);
    }

    let report = match verifier.run(&args.path) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_FAILED);
        }
    };

    if args.json {
        report::write_json(&report)?;
    } else {
        report::write_pretty(&report);
    }

    if report.has_failures() {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_verify() {
        let cli = Cli::parse_from(["norms", "verify", "some/dir", "--json"]);
        let Commands::Verify(args) = cli.command;
        assert_eq!(args.path, PathBuf::from("some/dir"));
        assert!(args.json);
        assert!(args.config.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_missing_path_exits_with_failure() {
        let temp = tempfile::TempDir::new().unwrap();
        let args = VerifyArgs {
            path: temp.path().join("missing"),
            json: false,
            config: None,
        };
        assert_eq!(run_verify(&args).unwrap(), EXIT_FAILED);
    }
}
