//! Prismic REST API client

use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::OnceCell;

use super::wire::{ApiInfo, RawDocument, SearchResponse};
use super::ContentSource;
use crate::config::PrismicConfig;
use crate::content::{PostDocument, PostPage};

const USER_AGENT: &str = concat!("prismic-blog/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum CmsError {
    #[error("API endpoint is not configured (set prismic.api_endpoint or PRISMIC_API_ENDPOINT)")]
    MissingEndpoint,
    #[error("invalid URL {url:?}: {message}")]
    InvalidUrl { url: String, message: String },
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned status {status}")]
    Status { url: String, status: StatusCode },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("repository has no master ref")]
    MissingMasterRef,
}

/// Client for one Prismic repository
#[derive(Debug)]
pub struct PrismicClient {
    http: reqwest::Client,
    endpoint: Url,
    access_token: Option<String>,
    document_type: String,
    master_ref: OnceCell<String>,
}

impl PrismicClient {
    /// Create a client from the `prismic` section of the site config
    pub fn new(config: &PrismicConfig) -> Result<Self, CmsError> {
        let raw = config.api_endpoint.trim();
        if raw.is_empty() {
            return Err(CmsError::MissingEndpoint);
        }
        let endpoint = parse_url(raw.trim_end_matches('/'))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| CmsError::Http {
                url: endpoint.to_string(),
                source,
            })?;

        Ok(Self {
            http,
            endpoint,
            access_token: config.access_token.clone().filter(|t| !t.is_empty()),
            document_type: config.document_type.clone(),
            master_ref: OnceCell::new(),
        })
    }

    /// Ref of the published content, resolved once per client
    async fn master_ref(&self) -> Result<&str, CmsError> {
        self.master_ref
            .get_or_try_init(|| async {
                let info: ApiInfo = self.get_json(self.with_token(self.endpoint.clone())).await?;
                let master = info.master_ref().ok_or(CmsError::MissingMasterRef)?;
                tracing::debug!(master_ref = master, "Resolved master ref");
                Ok::<_, CmsError>(master.to_string())
            })
            .await
            .map(String::as_str)
    }

    /// Run a `documents/search` query
    async fn search(
        &self,
        predicate: &str,
        fetch: Option<&str>,
        page_size: usize,
    ) -> Result<SearchResponse, CmsError> {
        let master_ref = self.master_ref().await?;
        let mut url = parse_url(&format!(
            "{}/documents/search",
            self.endpoint.as_str().trim_end_matches('/')
        ))?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("ref", master_ref)
                .append_pair("q", &format!("[[{}]]", predicate))
                .append_pair("pageSize", &page_size.max(1).to_string());
            if let Some(fields) = fetch {
                query.append_pair("fetch", fields);
            }
        }
        self.get_json(self.with_token(url)).await
    }

    /// Absolute URL of a cursor; relative ones resolve against the API root
    fn resolve_cursor(&self, cursor: &str) -> Result<Url, CmsError> {
        Url::parse(cursor)
            .or_else(|_| self.endpoint.join(cursor))
            .map_err(|e| CmsError::InvalidUrl {
                url: cursor.to_string(),
                message: e.to_string(),
            })
    }

    /// Attach the access token unless the URL already carries one
    fn with_token(&self, mut url: Url) -> Url {
        if let Some(token) = &self.access_token {
            if !url.query_pairs().any(|(key, _)| key == "access_token") {
                url.query_pairs_mut().append_pair("access_token", token);
            }
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CmsError> {
        // Keep tokens out of logs and error messages
        let shown = redact(&url);
        tracing::debug!(url = %shown, "GET");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| CmsError::Http {
                url: shown.clone(),
                source: source.without_url(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CmsError::Status {
                url: shown,
                status,
            });
        }

        let body = response.text().await.map_err(|source| CmsError::Http {
            url: shown.clone(),
            source: source.without_url(),
        })?;
        serde_json::from_str(&body).map_err(|source| CmsError::Decode {
            url: shown,
            source,
        })
    }
}

impl ContentSource for PrismicClient {
    type Error = CmsError;

    async fn fetch_initial_page(&self, page_size: usize) -> Result<PostPage, CmsError> {
        let predicate = format!("at(document.type, \"{}\")", self.document_type);
        let fetch = format!(
            "{t}.title,{t}.author,{t}.subtitle",
            t = self.document_type
        );
        let response = self.search(&predicate, Some(&fetch), page_size).await?;
        let page = PostPage::from(response);
        tracing::info!(
            posts = page.results.len(),
            has_more = !page.is_last(),
            "Fetched first page"
        );
        Ok(page)
    }

    async fn fetch_next_page(&self, cursor: &str) -> Result<PostPage, CmsError> {
        let url = self.resolve_cursor(cursor)?;
        let response: SearchResponse = self.get_json(self.with_token(url)).await?;
        Ok(PostPage::from(response))
    }

    async fn fetch_by_uid(&self, uid: &str) -> Result<Option<PostDocument>, CmsError> {
        let predicate = format!(
            "at(my.{}.uid, \"{}\")",
            self.document_type,
            uid.replace('\\', "\\\\").replace('"', "\\\"")
        );
        let response = self.search(&predicate, None, 1).await?;
        let document = response
            .results
            .into_iter()
            .next()
            .map(|raw: RawDocument| raw.into_document(uid));
        if document.is_none() {
            tracing::debug!(uid, "Post not found");
        }
        Ok(document)
    }

    fn browser_url(&self, cursor: &str) -> Option<String> {
        let url = match self.resolve_cursor(cursor) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Hiding load more control: {}", e);
                return None;
            }
        };
        if self.access_token.is_some() {
            tracing::warn!(
                "Browser load more requests are sent without the access token; \
                 the repository API must allow public reads"
            );
        }
        Some(without_token(url).to_string())
    }
}

fn parse_url(raw: &str) -> Result<Url, CmsError> {
    Url::parse(raw).map_err(|e| CmsError::InvalidUrl {
        url: raw.to_string(),
        message: e.to_string(),
    })
}

/// URL with the `access_token` pair removed
fn without_token(mut url: Url) -> Url {
    if !url.query_pairs().any(|(key, _)| key == "access_token") {
        return url;
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "access_token")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    url
}

/// URL with the `access_token` value masked
fn redact(url: &Url) -> String {
    if !url.query_pairs().any(|(key, _)| key == "access_token") {
        return url.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == "access_token" {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();
    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: &str) -> PrismicConfig {
        PrismicConfig {
            api_endpoint: endpoint.to_string(),
            access_token: Some("secret".to_string()),
            ..PrismicConfig::default()
        }
    }

    #[test]
    fn test_missing_endpoint() {
        assert!(matches!(
            PrismicClient::new(&config("  ")),
            Err(CmsError::MissingEndpoint)
        ));
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(matches!(
            PrismicClient::new(&config("not a url")),
            Err(CmsError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_token_added_once() {
        let client = PrismicClient::new(&config("https://blog.cdn.prismic.io/api/v2/")).unwrap();
        let url = client.with_token(Url::parse("https://blog.cdn.prismic.io/api/v2").unwrap());
        assert_eq!(url.query(), Some("access_token=secret"));

        let again = client.with_token(url);
        assert_eq!(again.query(), Some("access_token=secret"));
    }

    #[test]
    fn test_browser_url_drops_token_and_resolves() {
        let client = PrismicClient::new(&config("https://blog.cdn.prismic.io/api/v2")).unwrap();

        let absolute = client
            .browser_url(
                "https://blog.cdn.prismic.io/api/v2/documents/search?ref=abc&page=2&access_token=secret",
            )
            .unwrap();
        assert!(!absolute.contains("secret"));
        assert!(absolute.contains("ref=abc"));
        assert!(absolute.contains("page=2"));

        let relative = client.browser_url("/api?cursor=2&access_token=secret").unwrap();
        assert_eq!(relative, "https://blog.cdn.prismic.io/api?cursor=2");
    }

    #[test]
    fn test_redact() {
        let url = Url::parse("https://blog.cdn.prismic.io/api/v2?page=2&access_token=secret")
            .unwrap();
        let shown = redact(&url);
        assert!(!shown.contains("secret"));
        assert!(shown.contains("page=2"));
    }
}
