use typedrpc::greet::{greet_rpc, GreetInput};
use typedrpc::transport::HttpTransport;

use crate::cmd::{runtime, CallArgs};
use crate::exit::{rpc_error, CliError, CliResult, INTERNAL, SUCCESS, TRANSPORT_ERROR};
use crate::output::{print_document, OutputFormat};

pub fn run(args: CallArgs, format: OutputFormat) -> CliResult<i32> {
    let rpc = greet_rpc();
    let transport = HttpTransport::new()
        .map_err(|err| CliError::new(TRANSPORT_ERROR, format!("call failed: {err}")))?;
    let input = GreetInput { name: args.name };
    tracing::debug!(url = %rpc.url(&args.url_base), "calling greet");

    let output = runtime()?
        .block_on(rpc.call(&transport, &args.url_base, &input))
        .map_err(|err| rpc_error("call failed", &err))?;

    let document = serde_json::to_value(&output)
        .map_err(|err| CliError::new(INTERNAL, format!("failed encoding output: {err}")))?;
    print_document(&document, format);
    Ok(SUCCESS)
}
