//! Generator module - renders the blog to static HTML files
//!
//! Output layout under the public directory:
//!
//! - `index.html` - first page of the listing with the "load more" control
//! - `post/{uid}/index.html` - one page per post
//! - `404.html` - not-found page

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::cms::ContentSource;
use crate::content::PostPage;
use crate::pagination::PaginationState;
use crate::templates::{render_index, render_not_found, render_post, DateStyle, TemplateRenderer};
use crate::Blog;

/// Summary of a generation run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    /// Posts on the generated listing page
    pub listed: usize,
    /// Post pages written
    pub posts: usize,
    /// Slugs that were listed but could not be resolved
    pub missing: Vec<String>,
}

/// Static site generator using Tera templates
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
    dates: DateStyle,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        let dates = DateStyle::from_config(&blog.config)?;

        Ok(Self {
            blog: blog.clone(),
            renderer,
            dates,
        })
    }

    /// Generate the entire site
    pub async fn generate<S: ContentSource>(&self, source: &S) -> Result<GenerateReport> {
        tokio::fs::create_dir_all(&self.blog.public_dir)
            .await
            .with_context(|| format!("Failed to create {:?}", self.blog.public_dir))?;

        let first = self.generate_index(source).await?;
        let listed = first.results.len();

        let uids = source
            .collect_uids(first)
            .await
            .context("Failed to list post slugs")?;
        tracing::info!("Found {} posts to pre-render", uids.len());

        let mut report = GenerateReport {
            listed,
            ..GenerateReport::default()
        };
        for uid in uids {
            match self.generate_post(source, &uid).await? {
                Some(path) => {
                    tracing::debug!("Generated post: {:?}", path);
                    report.posts += 1;
                }
                None => {
                    tracing::warn!(uid = %uid, "Listed post could not be resolved, skipping");
                    report.missing.push(uid);
                }
            }
        }

        self.generate_not_found_page().await?;

        Ok(report)
    }

    /// Generate the listing page from the first page of posts.
    ///
    /// Returns that page so the caller can keep walking the listing from it.
    pub async fn generate_index<S: ContentSource>(&self, source: &S) -> Result<PostPage> {
        let page = source
            .fetch_initial_page(self.blog.config.prismic.page_size)
            .await
            .context("Failed to fetch the first page of posts")?;
        let listing = PaginationState::from(page.clone());
        let next_page_url = listing
            .next_page
            .as_deref()
            .and_then(|cursor| source.browser_url(cursor));

        let html = render_index(
            &self.renderer,
            &self.blog.config,
            &self.dates,
            &listing,
            next_page_url.as_deref(),
        )?;
        let output_path = self.blog.public_dir.join("index.html");
        write_page(&output_path, &html).await?;
        tracing::info!(
            posts = listing.len(),
            load_more = next_page_url.is_some(),
            "Generated index"
        );

        Ok(page)
    }

    /// Fetch and render one post.
    ///
    /// Returns the written path, or `None` when the source has no such post.
    pub async fn generate_post<S: ContentSource>(
        &self,
        source: &S,
        uid: &str,
    ) -> Result<Option<PathBuf>> {
        let Some(output_path) = self.post_output_path(uid) else {
            tracing::warn!(uid, "Refusing to render post with unsafe slug");
            return Ok(None);
        };

        let Some(post) = source
            .fetch_by_uid(uid)
            .await
            .with_context(|| format!("Failed to fetch post {:?}", uid))?
        else {
            return Ok(None);
        };

        let html = render_post(&self.renderer, &self.blog.config, &self.dates, &post)?;
        write_page(&output_path, &html).await?;
        Ok(Some(output_path))
    }

    /// Generate the not-found page
    pub async fn generate_not_found_page(&self) -> Result<()> {
        let html = self.render_not_found(None)?;
        write_page(&self.blog.public_dir.join("404.html"), &html).await
    }

    /// Not-found page naming the requested slug
    pub fn render_not_found(&self, slug: Option<&str>) -> Result<String> {
        render_not_found(&self.renderer, &self.blog.config, slug)
    }

    /// Where a post page lives, `None` for slugs that would escape `post/`
    pub fn post_output_path(&self, uid: &str) -> Option<PathBuf> {
        is_safe_slug(uid).then(|| {
            self.blog
                .public_dir
                .join("post")
                .join(uid)
                .join("index.html")
        })
    }
}

/// A slug maps to exactly one directory under `post/`
pub fn is_safe_slug(uid: &str) -> bool {
    !uid.is_empty()
        && uid != "."
        && uid != ".."
        && !uid
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_control())
}

static WRITE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Write a page so readers only ever see the old or the complete new file
async fn write_page(path: &Path, html: &str) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("No parent directory for {:?}", path))?;
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("page");
    let staging = parent.join(format!(
        ".{}.{}-{}.tmp",
        file_name,
        std::process::id(),
        WRITE_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));

    if let Err(e) = tokio::fs::write(&staging, html).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(anyhow::anyhow!("Failed to write {:?}: {}", staging, e));
    }
    if let Err(e) = tokio::fs::rename(&staging, path).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(anyhow::anyhow!("Failed to move {:?} into place: {}", path, e));
    }
    Ok(())
}
