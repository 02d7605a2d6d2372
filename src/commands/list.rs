//! List posts from the CMS

use anyhow::Result;
use std::io::{BufRead, Write};

use crate::cms::ContentSource;
use crate::content::PostSummary;
use crate::pagination::LoadMore;
use crate::templates::DateStyle;
use crate::Blog;

/// Print the first page of posts; with `interactive`, offer to load more
pub async fn run<S: ContentSource>(blog: &Blog, source: &S, interactive: bool) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_with_io(blog, source, interactive, stdin.lock(), stdout.lock()).await
}

/// [`run`] over arbitrary input and output streams
pub async fn run_with_io<S, R, W>(
    blog: &Blog,
    source: &S,
    interactive: bool,
    mut input: R,
    mut output: W,
) -> Result<()>
where
    S: ContentSource,
    R: BufRead,
    W: Write,
{
    let dates = DateStyle::from_config(&blog.config)?;
    let first = source
        .fetch_initial_page(blog.config.prismic.page_size)
        .await?;

    let mut listing = LoadMore::new(first);
    let mut printed = 0;
    writeln!(output, "Posts:")?;

    loop {
        for post in &listing.state().results[printed..] {
            writeln!(output, "  {}", describe(post, &dates))?;
        }
        printed = listing.state().len();

        if !interactive || !listing.can_load_more() {
            break;
        }

        write!(output, "{} ({} shown)? [y/N] ", blog.config.load_more_label, printed)?;
        output.flush()?;
        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 || !is_yes(&answer) {
            break;
        }

        if let Err(e) = listing.load_more(source).await {
            // The listing is untouched, the user may try again
            writeln!(output, "Failed to load more posts: {}", e)?;
        }
    }

    let state = listing.into_state();
    writeln!(output, "Total: {}", state.len())?;
    if state.has_more() {
        writeln!(output, "More posts available.")?;
    }

    Ok(())
}

fn describe(post: &PostSummary, dates: &DateStyle) -> String {
    let date = crate::helpers::format_publication_date(
        post.first_publication_date.as_deref(),
        &dates.missing,
        dates.timezone,
    )
    .unwrap_or_else(|e| format!("<{}>", e));
    format!("{} - {} by {} [{}]", date, post.title, post.author, post.uid)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("no"));
    }
}
