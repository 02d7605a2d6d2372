//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::helpers::MissingDate;

/// Environment variable overriding `prismic.api_endpoint`
pub const ENV_API_ENDPOINT: &str = "PRISMIC_API_ENDPOINT";

/// Environment variable overriding `prismic.access_token`
pub const ENV_ACCESS_TOKEN: &str = "PRISMIC_ACCESS_TOKEN";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,
    /// IANA timezone used for publication dates; empty keeps the document's offset
    pub timezone: String,

    // Directory
    pub public_dir: String,

    // Content source
    #[serde(default)]
    pub prismic: PrismicConfig,

    // Rendering
    #[serde(default)]
    pub missing_date: MissingDateConfig,
    pub load_more_label: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            description: String::new(),
            language: "en".to_string(),
            timezone: String::new(),

            public_dir: "public".to_string(),

            prismic: PrismicConfig::default(),

            missing_date: MissingDateConfig::default(),
            load_more_label: "Load more posts".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig =
            serde_yaml::from_str(&content).with_context(|| format!("Invalid {:?}", path))?;
        Ok(config)
    }

    /// Apply backend connection overrides from the environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_API_ENDPOINT).filter(|v| !v.is_empty()) {
            tracing::debug!("Using API endpoint from {}", ENV_API_ENDPOINT);
            self.prismic.api_endpoint = endpoint;
        }
        if let Some(token) = lookup(ENV_ACCESS_TOKEN).filter(|v| !v.is_empty()) {
            self.prismic.access_token = Some(token);
        }
    }

    /// Policy applied when a document has no publication date
    pub fn missing_date_policy(&self) -> MissingDate {
        match self.missing_date.policy {
            MissingDatePolicy::Placeholder => {
                MissingDate::Placeholder(self.missing_date.placeholder.clone())
            }
            MissingDatePolicy::Fail => MissingDate::Fail,
        }
    }

    /// Parsed display timezone, if one is configured
    pub fn display_timezone(&self) -> Result<Option<chrono_tz::Tz>> {
        if self.timezone.trim().is_empty() {
            return Ok(None);
        }
        self.timezone
            .trim()
            .parse::<chrono_tz::Tz>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("Invalid timezone {:?}: {}", self.timezone, e))
    }
}

/// Prismic repository connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrismicConfig {
    /// Repository API root, e.g. `https://my-repo.cdn.prismic.io/api/v2`
    pub api_endpoint: String,
    pub access_token: Option<String>,
    pub document_type: String,
    /// Posts per listing request
    pub page_size: usize,
    pub timeout_secs: u64,
}

impl Default for PrismicConfig {
    fn default() -> Self {
        Self {
            api_endpoint: String::new(),
            access_token: None,
            document_type: "posts".to_string(),
            page_size: 25,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingDatePolicy {
    Placeholder,
    Fail,
}

/// What to render when `first_publication_date` is null
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MissingDateConfig {
    pub policy: MissingDatePolicy,
    pub placeholder: String,
}

impl Default for MissingDateConfig {
    fn default() -> Self {
        Self {
            policy: MissingDatePolicy::Placeholder,
            placeholder: "unpublished".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.public_dir, "public");
        assert_eq!(config.prismic.document_type, "posts");
        assert_eq!(config.prismic.page_size, 25);
        assert!(matches!(
            config.missing_date_policy(),
            MissingDate::Placeholder(ref p) if p == "unpublished"
        ));
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Space Traveling
timezone: America/Sao_Paulo
prismic:
  api_endpoint: https://example.cdn.prismic.io/api/v2
  page_size: 5
missing_date:
  policy: fail
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Space Traveling");
        assert_eq!(
            config.prismic.api_endpoint,
            "https://example.cdn.prismic.io/api/v2"
        );
        assert_eq!(config.prismic.page_size, 5);
        assert_eq!(config.prismic.document_type, "posts");
        assert!(matches!(config.missing_date_policy(), MissingDate::Fail));
        assert_eq!(
            config.display_timezone().unwrap(),
            Some(chrono_tz::America::Sao_Paulo)
        );
    }

    #[test]
    fn test_env_overrides() {
        let mut config = SiteConfig::default();
        config.apply_overrides(|name| match name {
            ENV_API_ENDPOINT => Some("https://env.cdn.prismic.io/api/v2".to_string()),
            ENV_ACCESS_TOKEN => Some(String::new()),
            _ => None,
        });
        assert_eq!(
            config.prismic.api_endpoint,
            "https://env.cdn.prismic.io/api/v2"
        );
        assert_eq!(config.prismic.access_token, None);
    }

    #[test]
    fn test_invalid_timezone() {
        let config = SiteConfig {
            timezone: "Mars/Olympus".to_string(),
            ..SiteConfig::default()
        };
        assert!(config.display_timezone().is_err());
    }
}
