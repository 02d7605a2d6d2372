//! Post models

use serde::{Deserialize, Serialize};

use crate::helpers::estimate_reading_minutes;

/// A post as it appears in the listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    /// Unique slug, used in `/post/{uid}`
    pub uid: String,

    /// ISO-8601 timestamp, `None` for documents that were never published
    pub first_publication_date: Option<String>,

    pub title: String,
    pub subtitle: String,
    pub author: String,
}

/// One batch of listing results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPage {
    /// Results in the order the source returned them
    pub results: Vec<PostSummary>,

    /// Cursor of the following batch, `None` on the last page
    pub next_page: Option<String>,
}

impl PostPage {
    /// Create a page, treating an empty cursor as the end of the listing
    pub fn new(results: Vec<PostSummary>, next_page: Option<String>) -> Self {
        Self {
            results,
            next_page: next_page.filter(|cursor| !cursor.trim().is_empty()),
        }
    }

    /// Whether no further pages exist after this one
    pub fn is_last(&self) -> bool {
        self.next_page.is_none()
    }
}

/// A full post, fetched by slug for the detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDocument {
    pub uid: String,
    pub first_publication_date: Option<String>,
    pub title: String,
    pub banner_url: String,
    pub author: String,
    pub content: Vec<Section>,
}

impl PostDocument {
    /// Estimated reading time in whole minutes
    pub fn reading_minutes(&self) -> u32 {
        estimate_reading_minutes(&self.content)
    }
}

/// A headed block of paragraphs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub body: Vec<Paragraph>,
}

impl Section {
    pub fn new(heading: impl Into<String>, body: &[&str]) -> Self {
        Self {
            heading: heading.into(),
            body: body.iter().map(|text| Paragraph::new(*text)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
