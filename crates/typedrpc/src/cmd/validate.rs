use serde::Serialize;
use serde_json::Value;
use typedrpc::contract::{parse_and_validate, RpcError};
use typedrpc::schema::{JsonSchema, SchemaConfig};

use crate::cmd::{read_payload, ValidateArgs};
use crate::exit::{code_for, schema_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_document, OutputFormat};

#[derive(Serialize)]
struct ValidationReport<'a> {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a RpcError>,
}

pub fn run(args: ValidateArgs, format: OutputFormat) -> CliResult<i32> {
    let config = SchemaConfig {
        strict_mode: args.strict,
        ..SchemaConfig::default()
    };
    let schema = JsonSchema::<Value>::from_file(&args.schema, &config)
        .map_err(|err| schema_error("invalid schema", err))?;
    let document = read_payload(args.data.as_deref(), args.file.as_deref())?;

    let outcome = parse_and_validate(&document, &schema);
    let report = match &outcome {
        Ok(value) => ValidationReport {
            valid: true,
            value: Some(value),
            error: None,
        },
        Err(err) => ValidationReport {
            valid: false,
            value: None,
            error: Some(err),
        },
    };
    let report = serde_json::to_value(&report)
        .map_err(|err| CliError::new(INTERNAL, format!("failed encoding report: {err}")))?;
    print_document(&report, format);

    Ok(match outcome {
        Ok(_) => SUCCESS,
        Err(err) => code_for(err.code),
    })
}
