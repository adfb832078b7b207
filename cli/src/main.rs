use std::io;
use std::process::ExitCode;

use api_post::UreqTransport;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // stdout carries the result line; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    match api_post::run_with_args(std::env::args_os(), UreqTransport, &mut stdout.lock()) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            tracing::error!(error = %err, "failed to write output");
            ExitCode::FAILURE
        }
    }
}
