//! TypeTally: report disk usage per detected content type.
//!
//! Thin binary entry point. All logic lives in the `typetally-core`
//! and `typetally-cli` crates.

use clap::Parser;
use std::process::ExitCode;
use typetally_cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    typetally_cli::init_logging(cli.log_level());
    tracing::debug!("TypeTally {} starting", env!("CARGO_PKG_VERSION"));

    let code = typetally_cli::run(&cli, &mut std::io::stdout().lock());
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
