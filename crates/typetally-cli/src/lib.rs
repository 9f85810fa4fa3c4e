/// TypeTally CLI: argument parsing, logging and exit codes.
///
/// All scanning logic lives in `typetally-core`; this crate turns command
/// line flags into a run and a run into output plus an exit status.
pub mod args;

pub use args::Cli;

use anyhow::Context;
use std::io::Write;
use typetally_core::error::EXIT_FAILURE;
use typetally_core::Orchestrator;

/// Exit status of a completed run, including runs with skipped files.
pub const EXIT_SUCCESS: i32 = 0;

/// Install the stderr log subscriber. Safe to call more than once.
pub fn init_logging(level: tracing::Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Execute one invocation, writing the report to `out`.
///
/// Fatal errors are printed to stderr as a single line; the return value
/// is the process exit code.
pub fn run(cli: &Cli, out: &mut impl Write) -> i32 {
    let kind = cli.classifier_kind();
    let mut orchestrator =
        Orchestrator::new(&cli.directory, cli.scan_options(), cli.report_format());

    match orchestrator.run(|| kind.build()) {
        Ok(outcome) => match write_report(out, &outcome.rendered) {
            Ok(()) => EXIT_SUCCESS,
            Err(err) => {
                eprintln!("Error: {err:#}");
                EXIT_FAILURE
            }
        },
        Err(err) => {
            eprintln!("Error: {err}");
            err.exit_code()
        }
    }
}

fn write_report(out: &mut impl Write, rendered: &str) -> anyhow::Result<()> {
    out.write_all(rendered.as_bytes())
        .and_then(|()| out.flush())
        .context("failed to write report")
}
