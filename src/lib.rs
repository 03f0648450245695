pub mod api;
pub mod config;
pub mod model;
pub mod search;
pub mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

use api::http::HttpBackend;
use api::{CancelToken, SearchBackend};
use config::ClientConfig;
use model::types::{Metric, SearchParams, SearchRequest, SearchResponse};

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "vsq",
    version,
    about = "Interactive TUI client for a remote vector search service"
)]
pub struct Cli {
    /// Base URL of the search service (overrides VSQ_ENDPOINT)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch interactive TUI
    Tui {
        /// Probe the endpoint once and exit (headless-friendly)
        #[arg(long, default_value_t = false)]
        once: bool,
    },
    /// Run a single search and print the ranked results
    Search {
        /// Query text
        query: String,

        /// Number of results to return (1-100)
        #[arg(long)]
        k: Option<usize>,

        /// Similarity metric: cosine, dot, or euclidean
        #[arg(long)]
        metric: Option<String>,

        /// Print the raw JSON response instead of formatted text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Probe the backend's health endpoint
    Health,
    /// Generate shell completions to stdout
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate man page to stdout
    Man,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Tui { once } => ui::tui::run_tui(cli.endpoint, once),
        Commands::Search {
            query,
            k,
            metric,
            json,
        } => run_search(cli.endpoint, &query, k, metric.as_deref(), json),
        Commands::Health => run_health(cli.endpoint),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "vsq", &mut std::io::stdout());
            Ok(())
        }
        Commands::Man => {
            let cmd = Cli::command();
            let man = clap_mangen::Man::new(cmd);
            let mut out = std::io::stdout();
            man.render(&mut out)?;
            Ok(())
        }
    }
}

fn run_search(
    endpoint: Option<String>,
    query: &str,
    k: Option<usize>,
    metric: Option<&str>,
    json: bool,
) -> Result<()> {
    if query.trim().is_empty() {
        anyhow::bail!("query must not be empty");
    }

    let config = ClientConfig::from_env().with_endpoint(endpoint);
    let backend = Arc::new(HttpBackend::new(&config)?);

    let mut params = SearchParams::default();
    if let Some(name) = metric {
        params.metric = Metric::parse(name)
            .ok_or_else(|| anyhow::anyhow!("unknown metric '{name}' (cosine, dot, euclidean)"))?;
    }
    if let Some(k) = k {
        params = params.with_k(k);
    }

    let req = SearchRequest::new(query, params);
    let raw = backend.search(&req, &CancelToken::new())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&raw)?);
        return Ok(());
    }

    let resp = SearchResponse::from_value(&raw)?;
    if resp.results.is_empty() {
        println!("{}", "no results".dimmed());
        return Ok(());
    }
    for hit in &resp.results {
        println!(
            "{}  {}",
            hit.id.blue().bold(),
            format!("score {:.3}", hit.score).green()
        );
        println!("  {}", search::highlight::highlight_marked(&hit.text, query));
    }
    Ok(())
}

fn run_health(endpoint: Option<String>) -> Result<()> {
    let config = ClientConfig::from_env().with_endpoint(endpoint);
    let backend = HttpBackend::new(&config)?;
    backend.health()?;
    println!("{} {}", config.endpoint, "ok".green());
    Ok(())
}

/// Platform data dir for logs and persisted UI preferences.
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("dev", "vsq", "vsq").map_or_else(
        || PathBuf::from(".vsq"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}
