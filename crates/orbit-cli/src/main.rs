//! Silent Orbit directive filter entry point.
//!
//! Narrator text is read from stdin and the validation outcome is printed to
//! stdout. Exits with status 2 when any directive was rejected.

use std::process::ExitCode;

use orbit_cli::config::{Config, LogFormat};
use orbit_cli::filter;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(config.log_format);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    match filter::run(&config, &mut stdin.lock(), &mut stdout.lock()) {
        Ok(outcome) if outcome.ok => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(2),
        Err(e) => {
            tracing::error!(error = %e, "filter failed");
            ExitCode::FAILURE
        }
    }
}
