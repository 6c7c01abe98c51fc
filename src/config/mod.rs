mod file_config;

pub use file_config::{FileConfig, PaginationFileConfig, ScrapeFileConfig};

use crate::scrape::{PayloadExtraction, ScraperConfig, KEYWORD_PLACEHOLDER};
use crate::server::{RequestsLoggingLevel, ServerConfig};
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::{Path, PathBuf};

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub path_prefix: String,
    pub scrape_url_template: String,
    pub scrape_timeout_sec: u64,
    pub payload_extraction: PayloadExtraction,
    pub default_page_size: usize,
    pub max_page_size: usize,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub path_prefix: String,

    pub scrape: ScraperConfig,

    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_path must be specified on the command line or in config file")
            })?;

        let db_dir = match db_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !db_dir.is_dir() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if db_path.is_dir() {
            bail!("db_path is a directory: {:?}", db_path);
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = match file.logging_level {
            Some(s) => parse_logging_level(&s)
                .ok_or_else(|| anyhow::anyhow!("Invalid logging_level in config file: {:?}", s))?,
            None => cli.logging_level.clone(),
        };

        let path_prefix = normalize_path_prefix(
            file.path_prefix.as_deref().unwrap_or(&cli.path_prefix),
        );

        let scrape_file = file.scrape.unwrap_or_default();
        let scrape = ScraperConfig {
            url_template: scrape_file
                .url_template
                .unwrap_or_else(|| cli.scrape_url_template.clone()),
            timeout_sec: scrape_file.timeout_sec.unwrap_or(cli.scrape_timeout_sec),
            payload_extraction: scrape_file
                .payload_extraction
                .unwrap_or(cli.payload_extraction),
        };
        if !scrape.url_template.contains(KEYWORD_PLACEHOLDER) {
            bail!(
                "Scrape URL template must contain {}: {:?}",
                KEYWORD_PLACEHOLDER,
                scrape.url_template
            );
        }
        if scrape.timeout_sec == 0 {
            bail!("Scrape timeout must be greater than zero");
        }

        let pagination_file = file.pagination.unwrap_or_default();
        let default_page_size = pagination_file
            .default_page_size
            .unwrap_or(cli.default_page_size);
        let max_page_size = pagination_file.max_page_size.unwrap_or(cli.max_page_size);
        if default_page_size == 0 || max_page_size == 0 {
            bail!("Page sizes must be greater than zero");
        }
        if default_page_size > max_page_size {
            bail!(
                "Default page size {} exceeds max page size {}",
                default_page_size,
                max_page_size
            );
        }

        Ok(Self {
            db_path,
            port,
            logging_level,
            path_prefix,
            scrape,
            default_page_size,
            max_page_size,
        })
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level.clone(),
            port: self.port,
            path_prefix: self.path_prefix.clone(),
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}

/// Leading slash, no trailing slash. An empty or `/` prefix mounts at the root.
fn normalize_path_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
