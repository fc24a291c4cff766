mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "typedrpc", version, about = "Typed RPC contracts CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(
        long,
        value_name = "FORMAT",
        env = "TYPEDRPC_LOG_FORMAT",
        default_value = "text",
        global = true
    )]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        env = "TYPEDRPC_LOG_LEVEL",
        default_value = "info",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use typedrpc::greet::Environment;

    use super::*;

    #[test]
    fn parses_execute_subcommand() {
        let cli = Cli::try_parse_from([
            "typedrpc",
            "execute",
            "--data",
            "{\"name\":\"Alice\"}",
            "--environment",
            "staging",
        ])
        .expect("execute args should parse");

        match cli.command {
            Command::Execute(args) => assert_eq!(args.environment, Environment::Staging),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_conflicting_payload_args() {
        let err = Cli::try_parse_from([
            "typedrpc",
            "execute",
            "--data",
            "{}",
            "--file",
            "/tmp/body.json",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn rejects_unknown_environment() {
        let err = Cli::try_parse_from(["typedrpc", "execute", "--environment", "qa"])
            .expect_err("unknown environment should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn call_requires_name() {
        let err = Cli::try_parse_from(["typedrpc", "call"]).expect_err("name is required");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_validate_subcommand() {
        let cli = Cli::try_parse_from([
            "typedrpc",
            "--format",
            "json",
            "validate",
            "--schema",
            "/tmp/schema.json",
            "--strict",
        ])
        .expect("validate args should parse");
        assert!(matches!(cli.command, Command::Validate(ref args) if args.strict));
    }
}
