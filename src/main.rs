//! Norms CLI entry point.

use clap::Parser;
use norms::cli::{self, Cli, Commands, EXIT_FAILED};

fn main() {
    let cli = Cli::parse();
    cli::init_logging(cli.verbose);

    let exit_code = match cli.command {
        Commands::Verify(args) => match cli::run_verify(&args) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("Error: {}", e);
                EXIT_FAILED
            }
        },
    };

    std::process::exit(exit_code);
}
