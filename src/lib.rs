//! prismic-blog: a static blog generator backed by a Prismic repository
//!
//! Posts are fetched from the CMS at build time and rendered with embedded
//! Tera templates: a listing page whose "load more" control appends further
//! pages, and one page per post with an estimated reading time. The server
//! renders posts that were published after the last build on first request.

pub mod cms;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod pagination;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::Path;

/// Name of the site configuration file
pub const CONFIG_FILE: &str = "_config.yml";

/// The main blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Blog {
    /// Create a new blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} found, using defaults", CONFIG_FILE);
            config::SiteConfig::default()
        };
        config.apply_env_overrides();

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a blog instance from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);
        Self {
            config,
            base_dir,
            public_dir,
        }
    }

    /// HTTP client for the configured repository
    pub fn client(&self) -> Result<cms::PrismicClient> {
        Ok(cms::PrismicClient::new(&self.config.prismic)?)
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<generator::GenerateReport> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
