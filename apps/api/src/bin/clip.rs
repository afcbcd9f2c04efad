//! `clip`: saves a job posting to the tracker from the command line.
//!
//! Fetches the page (or reads a saved HTML file), runs the field extractor,
//! and posts the result to `/api/applications/from-extension`.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use applytrack::extension::{ExtensionClient, ExtensionConfig};
use applytrack::extraction::{extract_job, is_job_posting, HtmlPage, NoPrompt, Prompter};
use applytrack::normalize::ExtensionPayload;

#[derive(Parser)]
#[command(name = "clip")]
#[command(about = "Save a job posting to your application tracker")]
struct Cli {
    /// Job posting URL. With --file, recorded as the page's URL.
    url: Option<String>,

    /// Read the page from a saved HTML file instead of fetching it
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Tracker API base URL
    #[arg(long, env = "TRACKER_API_ENDPOINT")]
    endpoint: Option<String>,

    /// Auth token from the tracker's settings page
    #[arg(long, env = "TRACKER_AUTH_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Print the extracted fields without saving
    #[arg(long)]
    dry_run: bool,

    /// Only check that the endpoint and token work
    #[arg(long)]
    test_connection: bool,

    /// Never ask for a title when extraction finds nothing
    #[arg(long)]
    no_prompt: bool,
}

/// Asks on stderr, reads one line from stdin. A blank line cancels.
struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn ask(&mut self, message: &str) -> Option<String> {
        eprintln!("{message}");
        eprint!("> ");
        io::stderr().flush().ok()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).ok()?;
        let line = line.trim();
        (!line.is_empty()).then(|| line.to_string())
    }
}

async fn load_page(cli: &Cli) -> Result<HtmlPage> {
    match (&cli.file, &cli.url) {
        (Some(path), url) => {
            let html = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let url = match url {
                Some(url) => url.clone(),
                None => format!("file://{}", path.display()),
            };
            Ok(HtmlPage::parse(url, &html))
        }
        (None, Some(url)) => {
            debug!("Fetching {url}");
            let response = reqwest::get(url)
                .await
                .with_context(|| format!("Failed to fetch {url}"))?
                .error_for_status()?;
            let final_url = response.url().to_string();
            let html = response.text().await?;
            Ok(HtmlPage::parse(final_url, &html))
        }
        (None, None) => Err(anyhow!("Give a job posting URL or --file <page.html>")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = || {
        ExtensionConfig::new(
            cli.endpoint.as_deref().unwrap_or(""),
            cli.token.as_deref().unwrap_or(""),
        )
    };

    if cli.test_connection {
        let client = ExtensionClient::new(config()?);
        let info = client.test_connection().await?;
        println!(
            "Connected as {} ({})",
            info.email.as_deref().unwrap_or("unknown email"),
            info.user_id
        );
        return Ok(());
    }

    let page = load_page(&cli).await?;
    if !is_job_posting(&page) {
        warn!("This page does not look like a job posting; extracting anyway");
    }

    let job = if cli.no_prompt {
        extract_job(&page, &mut NoPrompt, Utc::now())
    } else {
        extract_job(&page, &mut StdinPrompter, Utc::now())
    };
    let payload = ExtensionPayload::from(job);

    if cli.dry_run {
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let client = ExtensionClient::new(config()?);
    match client.save_job(&payload).await {
        Ok(saved) => {
            println!("{}", saved.message);
            Ok(())
        }
        Err(e) if e.is_unauthorized() => {
            Err(anyhow!("{e}. Check your auth token and run with --test-connection."))
        }
        Err(e) => Err(e.into()),
    }
}
