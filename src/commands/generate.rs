//! Generate static files

use anyhow::Result;

use crate::cms::ContentSource;
use crate::generator::{GenerateReport, Generator};
use crate::Blog;

/// Generate the static site from the configured repository
pub async fn run(blog: &Blog) -> Result<GenerateReport> {
    let client = blog.client()?;
    run_with_source(blog, &client).await
}

/// Generate the static site from any content source
pub async fn run_with_source<S: ContentSource>(blog: &Blog, source: &S) -> Result<GenerateReport> {
    let start = std::time::Instant::now();

    let generator = Generator::new(blog)?;
    let report = generator.generate(source).await?;

    if !report.missing.is_empty() {
        tracing::warn!(
            "{} listed posts could not be resolved: {}",
            report.missing.len(),
            report.missing.join(", ")
        );
    }

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} post pages in {:.2}s",
        report.posts,
        duration.as_secs_f64()
    );

    Ok(report)
}
