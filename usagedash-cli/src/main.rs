use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use colored::*;
use tracing::{debug, info};
use usagedash_client::{ApiClient, QueryBackend};
use usagedash_core::config::load_dashboard_config;
use usagedash_core::logging::init_tracing;
use usagedash_core::serde_utils::to_pretty_json;
use usagedash_core::DashboardConfig;
use usagedash_engine::{load_overview, OverviewState, SearchSession, SessionConfig};
use usagedash_protocol::prelude::{ExportFormat, FilterParams, FilterPatch};

mod error;
mod output;
mod render;
mod shell;

use error::CliError;

#[derive(Parser)]
#[command(name = "usagedash")]
#[command(about = "Customer usage analytics dashboard", long_about = None)]
struct Cli {
    /// Base URL of the analytics API
    #[arg(long, global = true, env = "USAGEDASH_API_URL")]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dashboard overview
    Summary {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Search events, optionally walking several pages
    Search(SearchArgs),
    /// Download the filtered events as CSV or JSON
    Export(ExportArgs),
    /// Check that the API is reachable
    Health,
    /// Interactive filtering session
    Shell(FilterArgs),
    /// Show version information
    Version,
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Start date (YYYY-MM-DD)
    #[arg(long = "from")]
    start_date: Option<String>,
    /// End date (YYYY-MM-DD)
    #[arg(long = "to")]
    end_date: Option<String>,
    /// Company id; repeat or comma separate for several
    #[arg(long = "company", value_delimiter = ',')]
    companies: Vec<String>,
    /// Event type; repeat or comma separate for several
    #[arg(long = "event-type", value_delimiter = ',')]
    event_types: Vec<String>,
    /// Free-text search
    #[arg(short = 'q', long = "search")]
    search: Option<String>,
    /// Page size
    #[arg(long)]
    limit: Option<u32>,
}

impl FilterArgs {
    /// First page of the filters given on the command line.
    fn to_params(&self, default_page_size: u32) -> FilterParams {
        let mut patch = FilterPatch::new();
        if let Some(date) = &self.start_date {
            patch = patch.start_date(date.clone());
        }
        if let Some(date) = &self.end_date {
            patch = patch.end_date(date.clone());
        }
        if !self.companies.is_empty() {
            patch = patch.company_ids(self.companies.iter().cloned());
        }
        if !self.event_types.is_empty() {
            patch = patch.event_types(self.event_types.iter().cloned());
        }
        if let Some(text) = &self.search {
            patch = patch.search_text(text.clone());
        }

        let mut params = FilterParams::first_page(self.limit.unwrap_or(default_page_size));
        params.apply(patch);
        params
    }
}

#[derive(Args)]
struct SearchArgs {
    #[command(flatten)]
    filters: FilterArgs,
    /// Number of pages to fetch
    #[arg(long, default_value_t = 1)]
    pages: u32,
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    filters: FilterArgs,
    #[arg(long, default_value = "csv")]
    format: ExportFormat,
    /// Target file or directory; defaults to the server-suggested name
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("usagedash v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut config = load_dashboard_config()?;
    if let Some(api_url) = cli.api_url {
        config = config.with_api_url(api_url);
    }
    init_tracing(Some(&config.log_level))?;
    info!(api_url = %config.api_url, environment = ?config.environment, "usagedash starting");

    let client = Arc::new(ApiClient::with_timeout(
        &config.api_url,
        config.request_timeout,
    )?);

    match cli.command {
        Commands::Summary { json } => summary(client, json).await,
        Commands::Search(args) => search(client, &config, args).await,
        Commands::Export(args) => export(client, &config, args).await,
        Commands::Health => {
            let health = client.health().await?;
            println!("{} {}", "✔ API reachable:".green().bold(), client.base_url());
            println!("{}", to_pretty_json(&health)?);
            Ok(())
        }
        Commands::Shell(filters) => {
            let session = new_session(client, &config, &filters);
            shell::run(session).await
        }
        Commands::Version => Ok(()),
    }
}

fn new_session(
    client: Arc<ApiClient>,
    config: &DashboardConfig,
    filters: &FilterArgs,
) -> SearchSession {
    let backend: Arc<dyn QueryBackend> = client;
    SearchSession::new(
        backend,
        SessionConfig::default()
            .debounce(config.debounce)
            .filters(filters.to_params(config.page_size)),
    )
}

async fn summary(client: Arc<ApiClient>, json: bool) -> Result<(), CliError> {
    match load_overview(client.as_ref()).await {
        OverviewState::Ready(overview) if json => {
            println!("{}", to_pretty_json(&overview)?);
            Ok(())
        }
        OverviewState::Ready(overview) => {
            render::print_overview(&overview);
            Ok(())
        }
        OverviewState::Failed(message) => Err(CliError::Overview(message)),
    }
}

async fn search(
    client: Arc<ApiClient>,
    config: &DashboardConfig,
    args: SearchArgs,
) -> Result<(), CliError> {
    let session = new_session(client, config, &args.filters);
    session.enter_search_view();

    for page in 1..=args.pages.max(1) {
        if page > 1 {
            session.load_more();
        }
        let snapshot = session.wait_idle().await;
        if let Some(error) = snapshot.error {
            return Err(CliError::Search(error));
        }

        if args.json {
            println!("{}", to_pretty_json(&snapshot.results)?);
        } else {
            if args.pages > 1 {
                println!("{}", format!("Page {page}").dimmed());
            }
            render::print_results(&snapshot);
        }

        let exhausted = snapshot
            .results
            .as_ref()
            .map_or(true, |results| results.events.is_empty());
        if exhausted {
            debug!(page, "no more results");
            break;
        }
    }
    Ok(())
}

async fn export(
    client: Arc<ApiClient>,
    config: &DashboardConfig,
    args: ExportArgs,
) -> Result<(), CliError> {
    let session = new_session(client, config, &args.filters);
    let file = session.export(args.format).await?;
    let path = output::write_export(&file, args.output.as_deref())?;
    let records = output::record_count(args.format, &file).ok();
    render::print_export(&file, &path, records);
    Ok(())
}
