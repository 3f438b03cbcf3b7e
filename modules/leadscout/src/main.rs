use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use leadscout::{Config, Dispatcher, LeadRequest};

#[derive(Parser)]
#[command(name = "leadscout", about = "Dispatch social lead scrapes to Apify actors")]
struct Cli {
    /// Lead request JSON. Read from stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("leadscout=info".parse()?)
                .add_directive("apify_client=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load config
    let config = Config::from_env()?;
    config.log_keys();

    let raw = match cli.input {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read lead request from stdin")?;
            buf
        }
    };

    let request: LeadRequest = serde_json::from_str(&raw).context("Invalid lead request JSON")?;
    request.validate()?;

    info!(
        query = request.query.as_str(),
        max_leads = request.max_leads,
        platforms = request.platforms.len(),
        "Lead request accepted"
    );

    let dispatcher = Dispatcher::from_config(&config);
    let report = dispatcher.run_batch(&request.platforms).await?;
    if let Some(err) = report.first_error() {
        warn!(error = %err, "At least one platform failed");
    }

    let output = serde_json::json!({
        "query": request.query,
        "maxLeads": request.max_leads,
        "results": report,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    if report.all_failed() {
        bail!("Every platform scrape failed");
    }

    info!(records = report.records().count(), "Lead scrape complete");
    Ok(())
}
