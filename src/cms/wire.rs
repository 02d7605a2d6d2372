//! Prismic REST API response shapes

use serde::{Deserialize, Deserializer};

use crate::content::{Paragraph, PostDocument, PostPage, PostSummary, Section};

/// Treat explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `GET {endpoint}` - repository metadata
#[derive(Debug, Deserialize)]
pub(crate) struct ApiInfo {
    #[serde(default)]
    pub refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiRef {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default, rename = "isMasterRef")]
    pub is_master_ref: bool,
}

impl ApiInfo {
    pub fn master_ref(&self) -> Option<&str> {
        self.refs
            .iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference.as_str())
    }
}

/// `GET {endpoint}/documents/search` and every `next_page` URL
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<RawDocument>,
    #[serde(default)]
    pub next_page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDocument {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub first_publication_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: RawPostData,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawPostData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub banner: RawImage,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: Vec<RawSection>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawImage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub heading: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: Vec<RawParagraph>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawParagraph {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

impl RawDocument {
    fn into_summary(self) -> Option<PostSummary> {
        let uid = self.uid.filter(|uid| !uid.is_empty())?;
        Some(PostSummary {
            uid,
            first_publication_date: self.first_publication_date,
            title: self.data.title,
            subtitle: self.data.subtitle,
            author: self.data.author,
        })
    }

    pub fn into_document(self, uid: &str) -> PostDocument {
        PostDocument {
            uid: self.uid.unwrap_or_else(|| uid.to_string()),
            first_publication_date: self.first_publication_date,
            title: self.data.title,
            banner_url: self.data.banner.url,
            author: self.data.author,
            content: self
                .data
                .content
                .into_iter()
                .map(|section| Section {
                    heading: section.heading,
                    body: section
                        .body
                        .into_iter()
                        .map(|p| Paragraph { text: p.text })
                        .collect(),
                })
                .collect(),
        }
    }
}

impl From<SearchResponse> for PostPage {
    fn from(response: SearchResponse) -> Self {
        let results = response
            .results
            .into_iter()
            .filter_map(|doc| {
                let summary = doc.into_summary();
                if summary.is_none() {
                    tracing::warn!("Skipping listed document without a uid");
                }
                summary
            })
            .collect();
        PostPage::new(results, response.next_page)
    }
}
