//! `http-probe`: send one request through the direct transport.
//!
//! ```text
//! http-probe [--config FILE] [-X METHOD] [-H 'Name: value']... [-d BODY] [--log-level LEVEL] URL
//! ```
//!
//! Transport settings (TLS, proxy, redirects, timeouts) come from the TOML
//! config file; without one the defaults apply.

use std::path::PathBuf;

use clap::Parser;

use scenario_http::config::{load_config, Config};
use scenario_http::observability::logging;
use scenario_http::{DirectClient, HttpClient, HttpRequest};

#[derive(Parser)]
#[command(name = "http-probe")]
#[command(about = "Send one HTTP request and print the exchange", long_about = None)]
struct Cli {
    /// Target URL
    url: String,

    /// TOML transport configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Request header, repeatable
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Request body
    #[arg(short, long)]
    data: Option<String>,

    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected 'Name: value', got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in '{raw}'"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(&cli.log_level)?;

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    let client = DirectClient::new(config)?;

    let mut request = HttpRequest::new(cli.method, cli.url);
    for (name, value) in cli.headers {
        request.headers.add(name, value);
    }
    if let Some(data) = cli.data {
        request.body = Some(data.into_bytes());
    }

    let response = client.invoke(&mut request).await?;

    tracing::info!(
        status = response.status,
        elapsed_ms = request.elapsed_millis().unwrap_or_default(),
        "Exchange complete"
    );
    println!("{}", response.status);
    for (name, value) in response.headers.pairs() {
        println!("{name}: {value}");
    }
    println!();
    println!("{}", response.text());
    Ok(())
}
