mod config;
mod downloader;
mod error;
mod fetcher;
mod images;
mod model;
mod output;
mod parser;
mod pipeline;
mod report;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::error;

use config::ScrapeConfig;
use report::RunSummary;

#[derive(Parser)]
#[command(name = "docs_scraper", about = "Scrape one documentation page and its images")]
struct Cli {
    /// TOML settings file (overrides defaults, overridden by DOCSCRAPE_* env vars)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Page to scrape
    #[arg(long, global = true)]
    url: Option<String>,
    /// Output directory
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the page, download its images and write page_data.json (default)
    Run {
        /// Pause between image downloads in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Re-run extraction on a saved HTML file and print the JSON
    Extract {
        /// Saved markup (default: <output-dir>/page_content.html)
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Summarize an existing page_data.json
    Stats,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    if let Err(e) = run_cli(Cli::parse()).await {
        error!("{:#}", e);
        eprintln!("\nError: {:?}", e);
        std::process::exit(1);
    }
}

async fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let t0 = Instant::now();

    let mut config = ScrapeConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.url = url;
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    match cli.command.unwrap_or(Commands::Run { delay_ms: None }) {
        Commands::Run { delay_ms } => {
            if let Some(ms) = delay_ms {
                config.download_delay_ms = ms;
            }
            println!("{}", "=".repeat(70));
            println!("Documentation scraper: {}", config.url);
            println!("{}", "=".repeat(70));

            let summary = pipeline::run(&config).await?;
            summary.print(&config);
        }
        Commands::Extract { html } => {
            let path = html.unwrap_or_else(|| config.html_path());
            let markup = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let page = parser::extract_page(&markup, &config.url)?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        Commands::Stats => {
            let page = output::load_page_data(&config.data_path())
                .context("No page data found. Run 'run' first.")?;
            // one record is written per unique URL
            let summary = RunSummary::from_page(&page, page.downloaded_images.len());
            summary.print(&config);
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
