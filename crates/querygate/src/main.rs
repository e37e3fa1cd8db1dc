use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use catalog_access::StaticPermissionSource;
use clap::Parser;
use logutil::LogFormat;
use querygate::{Caller, GateOutcome, QueryGate, QueryRequest};
use serde_json::json;
use tracing::error;

const EXIT_NEEDS_INPUT: u8 = 2;
const EXIT_DENIED: u8 = 3;

/// Resolve a parameterized query and check it against catalog permissions.
///
/// Prints the authorized execution request, or the missing parameters, as
/// JSON on stdout.
#[derive(Parser)]
#[clap(name = "querygate")]
struct Arguments {
    /// JSON file containing the query request.
    #[arg(short, long, env = "QUERYGATE_REQUEST")]
    request: PathBuf,

    /// JSON file mapping caller ids to their allowed catalogs.
    ///
    /// A `null` entry means the caller is unrestricted. Callers not in the
    /// file have access to no catalogs.
    #[arg(short, long, env = "QUERYGATE_PERMISSIONS")]
    permissions: PathBuf,

    /// Caller to run the request as.
    #[arg(short = 'u', long, env = "QUERYGATE_CALLER")]
    caller: String,

    /// Caller has edit capability on the query.
    ///
    /// Allows arbitrary text through `raw` parameters.
    #[arg(long)]
    can_edit: bool,

    /// Fill empty parameters with their declared defaults.
    #[arg(long)]
    apply_defaults: bool,

    /// Log level, overridden by RUST_LOG.
    #[arg(long, default_value = "warn", env = "QUERYGATE_LOG_LEVEL")]
    log_level: tracing::Level,

    /// Log output format, `human` or `json`.
    #[arg(long, default_value = "human", value_parser = parse_log_format)]
    log_format: LogFormat,
}

fn parse_log_format(name: &str) -> Result<LogFormat, String> {
    LogFormat::from_name(name).ok_or_else(|| format!("unknown log format '{name}'"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Arguments::parse();
    logutil::configure_global_logger(args.log_level, args.log_format, io::stderr);

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            error!(%e, "request failed");
            eprintln!("ERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Arguments) -> Result<ExitCode> {
    let request_json = std::fs::read_to_string(&args.request)
        .with_context(|| format!("failed to read request file {}", args.request.display()))?;
    let request: QueryRequest = serde_json::from_str(&request_json).context("invalid request")?;

    let permissions_json = std::fs::read_to_string(&args.permissions)
        .with_context(|| format!("failed to read permissions file {}", args.permissions.display()))?;
    let source = StaticPermissionSource::from_json(&permissions_json).context("invalid permissions")?;

    let caller = Caller {
        id: args.caller,
        can_edit: args.can_edit,
    };
    let gate = QueryGate::new(Arc::new(source)).with_defaults(args.apply_defaults);

    match gate.prepare(&caller, &request).await {
        Ok(outcome) => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(match outcome {
                GateOutcome::Ready(_) => ExitCode::SUCCESS,
                GateOutcome::NeedsInput { .. } => ExitCode::from(EXIT_NEEDS_INPUT),
            })
        }
        Err(e) if e.is_denial() => {
            let body = json!({ "status": "denied", "error": e.to_string() });
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(ExitCode::from(EXIT_DENIED))
        }
        Err(e) => Err(e.into()),
    }
}
