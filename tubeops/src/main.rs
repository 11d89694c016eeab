//! Tube CLI - YouTube playlist downloader

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tubeops::cli::{Cli, Failure, run_cli};

fn main() -> ExitCode {
    let (non_blocking, _guard) = tracing_appender::non_blocking(std::io::stderr());

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = color_eyre::install() {
        tracing::warn!(error = %e, "failed to install error report handler");
    }

    let Err(report) = run_cli(Cli::parse()) else {
        return ExitCode::SUCCESS;
    };

    let failure = Failure::classify(&report);
    match failure {
        Failure::Interrupted => println!("\nInterrupted by user."),
        Failure::MissingDependency => eprintln!("Error: {report:?}"),
        Failure::Download => eprintln!("\nDownload failed: {report:?}"),
    }

    ExitCode::from(failure.exit_code())
}
