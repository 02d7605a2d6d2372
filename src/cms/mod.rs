//! Content source - the headless CMS the blog is rendered from
//!
//! Everything above this module only needs two things from the backend: a
//! page of post summaries (first page by size, later pages by cursor) and a
//! full post by slug. [`ContentSource`] is that seam; [`PrismicClient`] is the
//! HTTP implementation.

mod prismic;
mod wire;

use std::future::Future;

use crate::content::{PostDocument, PostPage};

pub use prismic::{CmsError, PrismicClient};

/// A backend that can list posts and resolve a post by slug
pub trait ContentSource: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// First page of the listing
    fn fetch_initial_page(
        &self,
        page_size: usize,
    ) -> impl Future<Output = Result<PostPage, Self::Error>> + Send;

    /// The page a cursor returned by a previous page points at
    fn fetch_next_page(
        &self,
        cursor: &str,
    ) -> impl Future<Output = Result<PostPage, Self::Error>> + Send;

    /// Full post by slug, `None` when no such post exists
    fn fetch_by_uid(
        &self,
        uid: &str,
    ) -> impl Future<Output = Result<Option<PostDocument>, Self::Error>> + Send;

    /// Address the browser fetches the page behind `cursor` from.
    ///
    /// The result ends up in public HTML, so it must not carry credentials.
    /// `None` when the cursor cannot be exposed.
    fn browser_url(&self, cursor: &str) -> Option<String> {
        Some(cursor.to_string())
    }

    /// Slugs of every listed post, walking the cursors to the last page
    fn fetch_all_uids(
        &self,
        page_size: usize,
    ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send {
        async move {
            let first = self.fetch_initial_page(page_size).await?;
            self.collect_uids(first).await
        }
    }

    /// Slugs on `first` and on every page after it
    fn collect_uids(
        &self,
        first: PostPage,
    ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send {
        async move {
            let mut page = first;
            let mut uids = Vec::new();
            loop {
                uids.extend(page.results.into_iter().map(|post| post.uid));
                match page.next_page {
                    Some(cursor) => page = self.fetch_next_page(&cursor).await?,
                    None => break,
                }
            }
            Ok(uids)
        }
    }
}
