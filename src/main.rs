mod catalog;
mod loader;
mod output;
mod query;
mod search;
#[cfg(feature = "interactive")]
mod tui;
mod utils;

use anyhow::{Context, Result};
use catalog::store::{import_docs, CatalogStore};
use catalog::Catalog;
use clap::{Parser, Subcommand};
use loader::FileTransport;
use search::SearchOrchestrator;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utils::AppConfig;

#[derive(Parser)]
#[command(name = "jdsearch")]
#[command(about = "Incremental, typo-tolerant search over Javadoc names")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Search query (when no subcommand is given)
    #[arg(trailing_var_arg = true)]
    query: Vec<String>,

    /// Javadoc directory (containing allclasses-frame.html)
    #[arg(short, long, default_value = ".")]
    docs: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a Javadoc directory into the catalog store
    Import {
        /// Javadoc directory
        docs: PathBuf,

        /// URL the documentation pages are served from (defaults to file://)
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Run one query and print the results
    Query {
        /// Query, e.g. `JLO`, `java.*.o*e`, `Object#wait` or `Object@2`
        query: String,

        /// Javadoc directory
        #[arg(short, long, default_value = ".")]
        docs: PathBuf,

        /// Colorize output
        #[arg(long)]
        color: bool,
    },
    /// Search interactively
    Search {
        /// Initial query
        query: Option<String>,

        /// Javadoc directory
        #[arg(short, long, default_value = ".")]
        docs: PathBuf,
    },
    /// List imported catalogs
    List,
    /// Remove an imported catalog
    Remove {
        /// Javadoc directory the catalog was imported from
        docs: PathBuf,
    },
    /// Show the config file location and current settings
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    match cli.command {
        Some(Commands::Import { docs, base_url }) => {
            let catalog = import_docs(&docs, base_url.as_deref(), config.include_packages)?;
            let path = CatalogStore::open()?.save(&docs, &catalog)?;
            println!(
                "Imported {} names from {} ({})",
                catalog.len(),
                docs.display(),
                path.display()
            );
        }
        Some(Commands::Query { query, docs, color }) => {
            run_query(&docs, &config, &query, color)?;
        }
        Some(Commands::Search { query, docs }) => {
            interactive(docs, config, query)?;
        }
        Some(Commands::List) => {
            let catalogs = CatalogStore::open()?.list()?;
            output::print_catalogs(&catalogs)?;
        }
        Some(Commands::Remove { docs }) => {
            if CatalogStore::open()?.remove(&docs)? {
                println!("Removed catalog for: {}", docs.display());
            } else {
                println!("No catalog for: {}", docs.display());
            }
        }
        Some(Commands::Config) => {
            let path = utils::get_config_path()?;
            if !path.exists() {
                config.save()?;
            }
            println!("{}", path.display());
            println!(
                "{}",
                serde_json::to_string_pretty(&config).context("Failed to serialize config")?
            );
        }
        None => {
            let query = (!cli.query.is_empty()).then(|| cli.query.join(" "));
            interactive(cli.docs, config, query)?;
        }
    }

    Ok(())
}

fn open_catalog(docs: &Path, config: &AppConfig) -> Result<Arc<Catalog>> {
    let catalog = CatalogStore::open()?.load_or_import(docs, config.include_packages)?;
    Ok(Arc::new(catalog))
}

/// Search once, waiting for the member page if the query needs one
fn run_query(docs: &Path, config: &AppConfig, query: &str, color: bool) -> Result<()> {
    let catalog = open_catalog(docs, config)?;
    let mut search = SearchOrchestrator::new(catalog, FileTransport, &config.search_settings())?;
    search.update(query);

    let mut payload = search.search();
    if search.loader_status().is_some() {
        wait_for_page(&mut search);
        payload = search.search();
    }

    output::print_content(&payload.content, payload.top_url.as_deref(), color)?;
    if let Some(url) = payload.opened_url {
        println!("Opened {}", url);
    }
    Ok(())
}

fn wait_for_page(search: &mut SearchOrchestrator) {
    let spinner = utils::progress::loader_spinner(search.loader().status_message());

    while !search.loader().is_complete() && !search.loader().is_errored() {
        thread::sleep(Duration::from_millis(20));
        if search.poll() {
            spinner.set_message(search.loader().status_message());
        }
    }
    spinner.finish_and_clear();
}

#[cfg(feature = "interactive")]
fn interactive(docs: PathBuf, config: AppConfig, query: Option<String>) -> Result<()> {
    tui::run(docs, config, query)
}

#[cfg(not(feature = "interactive"))]
fn interactive(docs: PathBuf, config: AppConfig, query: Option<String>) -> Result<()> {
    run_query(&docs, &config, query.as_deref().unwrap_or(""), true)
}
