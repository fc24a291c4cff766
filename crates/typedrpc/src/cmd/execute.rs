use serde_json::Value;
use typedrpc::contract::{parse_and_validate, parse_text, RpcErrorSchema};
use typedrpc::greet::{greet_handler, greet_rpc};
use typedrpc::schema::{AnySchema, ResultSchema};

use crate::cmd::{read_payload, runtime, ExecuteArgs};
use crate::exit::{code_for, rpc_error, CliResult, SUCCESS};
use crate::output::{print_document, OutputFormat};

pub fn run(args: ExecuteArgs, format: OutputFormat) -> CliResult<i32> {
    let body = read_payload(args.data.as_deref(), args.file.as_deref())?;
    let reply = runtime()?.block_on(greet_rpc().execute(&body, greet_handler(args.environment)));
    tracing::debug!(environment = %args.environment, bytes = reply.len(), "executed greet");

    let envelope = ResultSchema::new(AnySchema, RpcErrorSchema);
    let outcome: Result<Value, _> = parse_and_validate(&reply, &envelope)
        .map_err(|err| rpc_error("malformed reply envelope", &err))?;

    match format {
        OutputFormat::Json => println!("{reply}"),
        other => {
            let document = parse_text(&reply).map_err(|err| rpc_error("malformed reply", &err))?;
            print_document(&document, other);
        }
    }

    Ok(match outcome {
        Ok(_) => SUCCESS,
        Err(err) => {
            tracing::info!(code = %err.code, "request rejected");
            code_for(err.code)
        }
    })
}
