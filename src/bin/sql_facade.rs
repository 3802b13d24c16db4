use std::io::Read;
use std::process::ExitCode;

use clap::Parser;
use serde_json::Value as JsonValue;
use sql_facade::{ExecutionMode, SqlFacade};
use tracing::Level;

/// Run one facade call from the shell and print the normalized JSON result.
#[derive(Parser, Debug)]
#[command(author, version, about = "Execute a SQL command through sql-facade")]
struct Args {
    /// Connection string bound to the facade; overrides any `connectionString` in the input
    #[arg(long)]
    connection_string: Option<String>,
    #[arg(long, value_enum, default_value = "query")]
    mode: ExecutionMode,
    /// Per-call input mapping as JSON; read from stdin when omitted
    #[arg(long)]
    input: Option<String>,
    /// Log execution details to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(level)
        .init();

    let raw = match args.input {
        Some(input) => input,
        None => {
            let mut buf = String::new();
            if let Err(err) = std::io::stdin().read_to_string(&mut buf) {
                eprintln!("failed to read input: {err}");
                return ExitCode::FAILURE;
            }
            buf
        }
    };
    let input: JsonValue = match serde_json::from_str(&raw) {
        Ok(input) => input,
        Err(err) => {
            eprintln!("input is not valid JSON: {err}");
            return ExitCode::FAILURE;
        }
    };

    let facade = SqlFacade::new(args.connection_string);
    match facade.execute(args.mode, &input).await {
        Ok(result) => {
            let rendered =
                serde_json::to_string_pretty(&result).unwrap_or_else(|_| "null".to_string());
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, mode = ?args.mode, "command failed");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
