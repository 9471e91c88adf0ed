use clap::Parser;
use serde_json::{Map, Value};

use backend_logger::observability;
use backend_logger::{Level, LoggerFactory};

#[derive(Parser)]
#[command(name = "logctl")]
#[command(about = "Emit one record through the configured logger", long_about = None)]
struct Cli {
    /// Record level (trace, debug, info, warn, error, fatal)
    #[arg(short, long, default_value = "info")]
    level: Level,

    /// Extra field as key=value; values that parse as JSON keep their type
    #[arg(short = 'f', long = "field", value_parser = parse_field)]
    fields: Vec<(String, Value)>,

    /// Message text
    message: String,
}

fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", raw))?;
    if key.is_empty() {
        return Err("field key must not be empty".to_string());
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::from(value));
    Ok((key.to_string(), value))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    tracing::subscriber::set_global_default(observability::logging::bootstrap())?;

    let logger = LoggerFactory::from_env()?.build()?;
    let fields: Map<String, Value> = cli.fields.into_iter().collect();

    if !logger.is_enabled(cli.level) {
        eprintln!("level {} is below the configured minimum ({:?})", cli.level, logger.filter());
    }
    logger.log(cli.level, cli.message, Value::Object(fields));
    logger.flush().await;
    Ok(())
}
