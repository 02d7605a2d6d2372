//! Content module - posts as fetched from the CMS

mod post;

pub use post::{Paragraph, PostDocument, PostPage, PostSummary, Section};
