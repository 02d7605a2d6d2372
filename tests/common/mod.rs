//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use prismic_blog::cms::ContentSource;
use prismic_blog::content::{PostDocument, PostPage, PostSummary, Section};

#[derive(Debug, thiserror::Error)]
#[error("content source unavailable")]
pub struct SourceDown;

/// In-memory content source serving pages keyed by cursor.
#[derive(Default)]
pub struct FakeSource {
    pub first: PostPage,
    pub pages: HashMap<String, PostPage>,
    pub documents: HashMap<String, PostDocument>,
    pub failing_cursors: Vec<String>,
    pub down: bool,
    pub initial_calls: AtomicUsize,
    pub next_page_calls: AtomicUsize,
    pub by_uid_calls: AtomicUsize,
}

impl FakeSource {
    /// A source listing `documents` in pages of `page_size`, cursors `/page/N`.
    pub fn paged(documents: Vec<PostDocument>, page_size: usize) -> Self {
        let summaries: Vec<PostSummary> = documents.iter().map(summary_of).collect();
        let chunks: Vec<Vec<PostSummary>> = summaries
            .chunks(page_size.max(1))
            .map(|c| c.to_vec())
            .collect();

        let mut pages = HashMap::new();
        let mut first = PostPage::default();
        for (i, chunk) in chunks.iter().enumerate() {
            let next = (i + 1 < chunks.len()).then(|| format!("/page/{}", i + 2));
            let page = PostPage::new(chunk.clone(), next);
            if i == 0 {
                first = page;
            } else {
                pages.insert(format!("/page/{}", i + 1), page);
            }
        }

        Self {
            first,
            pages,
            documents: documents
                .into_iter()
                .map(|doc| (doc.uid.clone(), doc))
                .collect(),
            ..Self::default()
        }
    }
}

impl ContentSource for FakeSource {
    type Error = SourceDown;

    async fn fetch_initial_page(&self, _page_size: usize) -> Result<PostPage, SourceDown> {
        self.initial_calls.fetch_add(1, Ordering::SeqCst);
        if self.down {
            return Err(SourceDown);
        }
        Ok(self.first.clone())
    }

    async fn fetch_next_page(&self, cursor: &str) -> Result<PostPage, SourceDown> {
        self.next_page_calls.fetch_add(1, Ordering::SeqCst);
        if self.down || self.failing_cursors.iter().any(|c| c == cursor) {
            return Err(SourceDown);
        }
        Ok(self.pages.get(cursor).cloned().unwrap_or_default())
    }

    async fn fetch_by_uid(&self, uid: &str) -> Result<Option<PostDocument>, SourceDown> {
        self.by_uid_calls.fetch_add(1, Ordering::SeqCst);
        if self.down {
            return Err(SourceDown);
        }
        Ok(self.documents.get(uid).cloned())
    }
}

pub fn document(uid: &str, words: usize) -> PostDocument {
    let text = vec!["palavra"; words].join(" ");
    PostDocument {
        uid: uid.to_string(),
        first_publication_date: Some("2021-03-15T00:00:00+0000".to_string()),
        title: format!("Post {}", uid),
        banner_url: format!("https://images.prismic.io/{}.png", uid),
        author: "Danilo Vieira".to_string(),
        content: vec![Section::new("", &[text.as_str()])],
    }
}

pub fn summary_of(doc: &PostDocument) -> PostSummary {
    PostSummary {
        uid: doc.uid.clone(),
        first_publication_date: doc.first_publication_date.clone(),
        title: doc.title.clone(),
        subtitle: format!("About {}", doc.uid),
        author: doc.author.clone(),
    }
}
