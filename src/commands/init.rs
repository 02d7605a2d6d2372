//! Initialize a new blog

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::CONFIG_FILE;

/// Default `_config.yml` written by `init`
const DEFAULT_CONFIG: &str = r#"# Blog Configuration

# Site
title: Blog
description: ''
language: en
# IANA timezone for publication dates, empty keeps the CMS offset
timezone: ''

# Directory
public_dir: public

# Content source
# api_endpoint and access_token can be overridden with
# PRISMIC_API_ENDPOINT and PRISMIC_ACCESS_TOKEN
prismic:
  api_endpoint: https://your-repository.cdn.prismic.io/api/v2
  access_token:
  document_type: posts
  page_size: 25
  timeout_secs: 30

# Posts without a publication date: placeholder | fail
missing_date:
  policy: placeholder
  placeholder: unpublished

load_more_label: Load more posts
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("{:?} already exists", config_path);
    }
    fs::write(&config_path, DEFAULT_CONFIG)?;
    tracing::info!("Created {:?}", config_path);

    Ok(())
}
