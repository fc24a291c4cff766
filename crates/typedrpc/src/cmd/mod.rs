use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use typedrpc::greet::Environment;

use crate::exit::{io_error, CliError, CliResult, INTERNAL};
use crate::output::OutputFormat;

pub mod call;
pub mod execute;
pub mod validate;
pub mod version;

pub const DEFAULT_URL_BASE: &str = "http://localhost:8787";

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the greet contract's server side on a request body.
    Execute(ExecuteArgs),
    /// Call the greet contract over HTTP.
    Call(CallArgs),
    /// Validate a JSON document against a JSON Schema file.
    Validate(ValidateArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Execute(args) => execute::run(args, format),
        Command::Call(args) => call::run(args, format),
        Command::Validate(args) => validate::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ExecuteArgs {
    /// Request body. Read from stdin when neither --data nor --file is given.
    #[arg(long, conflicts_with = "file")]
    pub data: Option<String>,
    /// Read the request body from a file.
    #[arg(long, conflicts_with = "data")]
    pub file: Option<PathBuf>,
    /// Deployment named in the greeting.
    #[arg(long, env = "TYPEDRPC_ENVIRONMENT", default_value = "development")]
    pub environment: Environment,
}

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Name to greet.
    #[arg(long)]
    pub name: String,
    /// Base URL the contract path is appended to.
    #[arg(long, env = "TYPEDRPC_URL_BASE", default_value = DEFAULT_URL_BASE)]
    pub url_base: String,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// JSON Schema file.
    #[arg(long, value_name = "FILE")]
    pub schema: PathBuf,
    /// Document to validate. Read from stdin when neither --data nor --file is given.
    #[arg(long, conflicts_with = "file")]
    pub data: Option<String>,
    /// Read the document from a file.
    #[arg(long, conflicts_with = "data")]
    pub file: Option<PathBuf>,
    /// Reject properties an object schema does not declare.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Inline text, then file contents, then stdin.
pub(crate) fn read_payload(data: Option<&str>, file: Option<&Path>) -> CliResult<String> {
    if let Some(data) = data {
        return Ok(data.to_string());
    }
    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    let mut payload = String::new();
    std::io::stdin()
        .read_to_string(&mut payload)
        .map_err(|err| io_error("failed reading stdin", err))?;
    Ok(payload)
}

pub(crate) fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| CliError::new(INTERNAL, format!("failed starting runtime: {err}")))
}
