//! Command-line host for `poster_core`.
//!
//! Parses four positional arguments, sends one POST over a [`Transport`], and
//! prints a single result line. `run_with_args` is the whole program minus
//! logging setup and process exit, so it can be driven from tests.

use std::ffi::OsString;
use std::io::{self, Write};

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use poster_core::{parse_payload, post, PostClient, PostError, PostRequest, Reply, Scheme, StatusPolicy, Transport};
use tracing::debug;

pub mod transport;

pub use transport::UreqTransport;

/// Prefix for every diagnostic line.
pub const TAG: &str = "api-post";
pub const USAGE: &str = "Usage: api-post <host> <path> <payload_json> <bearer_token>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemeArg {
    Https,
    /// Plain HTTP, only meant for local test servers
    Http,
}

impl From<SchemeArg> for Scheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Https => Scheme::Https,
            SchemeArg::Http => Scheme::Http,
        }
    }
}

/// Send one JSON POST with a bearer token and print the response
#[derive(Debug, Parser)]
#[command(name = "api-post", version)]
pub struct Cli {
    /// Server hostname, optionally with `:port`
    pub host: String,

    /// Resource path on the server
    pub path: String,

    /// Request body as JSON text; surrounding single quotes are stripped
    #[arg(allow_hyphen_values = true)]
    pub payload: String,

    /// Sent as `Authorization: Bearer <token>`
    #[arg(allow_hyphen_values = true)]
    pub token: String,

    /// Treat any status other than 200 as a failure
    #[arg(long)]
    pub strict: bool,

    #[arg(long, value_enum, default_value_t = SchemeArg::Https)]
    pub scheme: SchemeArg,
}

impl Cli {
    pub fn policy(&self) -> StatusPolicy {
        if self.strict {
            StatusPolicy::RequireOk
        } else {
            StatusPolicy::PassThrough
        }
    }
}

/// Parse `args` (including the program name) and run. Returns the exit code.
pub fn run_with_args<I, T, R, W>(args: I, transport: R, out: &mut W) -> io::Result<u8>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    R: Transport,
    W: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            write!(out, "{err}")?;
            return Ok(0);
        }
        Err(err) => {
            debug!(error = %err, "rejected arguments");
            writeln!(out, "{USAGE}")?;
            return Ok(1);
        }
    };
    run(&cli, transport, out)
}

pub fn run<R: Transport, W: Write>(cli: &Cli, transport: R, out: &mut W) -> io::Result<u8> {
    match send(cli, transport) {
        Ok(reply) => {
            writeln!(out, "Status: {}, Response: {}", reply.status, reply.text())?;
            Ok(0)
        }
        Err(err) => {
            writeln!(out, "{TAG}: {err}")?;
            Ok(1)
        }
    }
}

fn send<R: Transport>(cli: &Cli, transport: R) -> Result<Reply, PostError> {
    let payload = parse_payload(&cli.payload)?;
    let scheme = Scheme::from(cli.scheme);
    let request = PostRequest::new(&cli.host, &cli.path, payload).with_token(&cli.token);

    let response = post(transport, scheme, &request)?;
    PostClient::interpret(response, cli.policy())
}
