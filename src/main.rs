use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobfeed_server::config::{AppConfig, CliConfig, FileConfig};
use jobfeed_server::scrape::{PayloadExtraction, DEFAULT_LISTINGS_URL_TEMPLATE};
use jobfeed_server::server::{DEFAULT_PAGE_SIZE, DEFAULT_PATH_PREFIX, MAX_PAGE_SIZE};
use jobfeed_server::{run_server, JobScraper, JobStore, RequestsLoggingLevel, SqliteJobStore};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite jobs database file, created if missing.
    #[clap(value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// Path to a TOML config file. Its values override the command line.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 8080)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path under which the job routes are served.
    #[clap(long, default_value = DEFAULT_PATH_PREFIX)]
    pub path_prefix: String,

    /// Listings page URL, {keyword} is replaced by the keyword slug.
    #[clap(long, default_value = DEFAULT_LISTINGS_URL_TEMPLATE)]
    pub scrape_url_template: String,

    /// Timeout in seconds for fetching a listings page.
    #[clap(long, default_value_t = 30)]
    pub scrape_timeout_sec: u64,

    /// How to locate the listings JSON inside the fetched page.
    #[clap(long, default_value = "line-index")]
    pub payload_extraction: PayloadExtraction,

    /// Page size used when a list request does not specify one.
    #[clap(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub default_page_size: usize,

    /// Upper bound for the page size of list requests.
    #[clap(long, default_value_t = MAX_PAGE_SIZE)]
    pub max_page_size: usize,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_path: self.db_path.clone(),
            port: self.port,
            logging_level: self.logging_level.clone(),
            path_prefix: self.path_prefix.clone(),
            scrape_url_template: self.scrape_url_template.clone(),
            scrape_timeout_sec: self.scrape_timeout_sec,
            payload_extraction: self.payload_extraction,
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
        }
    }
}

fn load_file_config(path: Option<&Path>) -> Result<Option<FileConfig>> {
    match path {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Ok(Some(FileConfig::load(path)?))
        }
        None => Ok(None),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = load_file_config(cli_args.config.as_deref())?;
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Opening SQLite jobs database at {:?}...", config.db_path());
    let job_store: Arc<dyn JobStore> = Arc::new(SqliteJobStore::new(config.db_path())?);
    info!("{} jobs in store", job_store.get_jobs_count()?);

    let scraper = Arc::new(JobScraper::new(&config.scrape)?);
    info!(
        "Scraping from {} ({} payload extraction, {}s timeout)",
        config.scrape.url_template, config.scrape.payload_extraction, config.scrape.timeout_sec
    );

    info!(
        "Serving jobs under {:?} on port {}",
        config.path_prefix, config.port
    );
    run_server(config.server_config(), job_store, scraper).await
}
