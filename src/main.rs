use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use ticket_context::config::Config;
use ticket_context::error::ContextError;
use ticket_context::match_api::{MatchClient, MatchRequest};
use ticket_context::messaging::{respond, PageMessage};
use ticket_context::metrics::{self, ExtractionMetrics, MATCH_OUTCOME_SKIPPED};
use ticket_context::{logging, PageSnapshot};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "ticket_context")]
#[command(about = "Extract event context from ticket marketplace pages")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./ticket_context.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a GET_PAGE_CONTEXT request for a saved page
    Extract {
        /// HTML file, or "-" for stdin
        #[arg(long)]
        html: String,
        /// URL the page was loaded from
        #[arg(long)]
        url: String,
        /// Pretty-print the JSON response
        #[arg(long)]
        pretty: bool,
    },
    /// Extract, then look up matching offers
    Match {
        /// HTML file, or "-" for stdin
        #[arg(long)]
        html: String,
        /// URL the page was loaded from
        #[arg(long)]
        url: String,
    },
}

fn read_html(source: &str) -> Result<String, ContextError> {
    if source == "-" {
        let mut html = String::new();
        std::io::stdin().read_to_string(&mut html)?;
        return Ok(html);
    }
    Ok(std::fs::read_to_string(Path::new(source))?)
}

fn load_page(html_source: &str, page_url: &str) -> anyhow::Result<PageSnapshot> {
    url::Url::parse(page_url).map_err(ContextError::from)?;
    let html = read_html(html_source).with_context(|| format!("reading HTML from {}", html_source))?;
    debug!(bytes = html.len(), "Loaded HTML");
    Ok(PageSnapshot::from_html(&html, Some(page_url)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?.with_env_overrides();
    let _guard = logging::init_logging(&config.logging);
    metrics::register_metrics();

    match cli.command {
        Commands::Extract { html, url, pretty } => {
            let page = load_page(&html, &url)?;
            let response = respond(&PageMessage::GetPageContext, &page);
            info!(host = %page.host, source = %response.source, "Extracted page context");

            let out = if pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };
            println!("{}", out);
        }
        Commands::Match { html, url } => {
            let page = load_page(&html, &url)?;
            if !config.is_host_enabled(&page.host) {
                info!(host = %page.host, "Matching disabled for host, skipping");
                ExtractionMetrics::record_match_request(MATCH_OUTCOME_SKIPPED);
                return Ok(());
            }

            let extracted = respond(&PageMessage::GetPageContext, &page);
            info!(host = %page.host, source = %extracted.source, "Extracted page context");

            let client = MatchClient::new(&config.api)?;
            let request = MatchRequest::from_context(&extracted.context, Some(&url));
            let matches = client.find_matches(&request).await?;
            info!(offers = matches.offers().count(), "Match lookup finished");

            println!("{}", serde_json::to_string_pretty(&matches)?);
        }
    }

    Ok(())
}
