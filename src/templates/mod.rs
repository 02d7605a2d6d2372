//! Built-in blog templates using the Tera template engine
//!
//! Templates are embedded in the binary. Autoescaping stays on for `.html`
//! templates since titles and paragraphs come straight from the CMS.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{PostDocument, PostSummary, Section};
use crate::helpers::{date_xml, format_publication_date, parse_timestamp, DateError, MissingDate};
use crate::pagination::PaginationState;

/// Template renderer with the embedded blog theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("index.html", include_str!("blog/index.html")),
            ("post.html", include_str!("blog/post.html")),
            ("404.html", include_str!("blog/404.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("blog/partials/header.html"),
            ),
            (
                "partials/post_card.html",
                include_str!("blog/partials/post_card.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

// Data structures for template context

/// How publication dates are displayed
#[derive(Debug, Clone)]
pub struct DateStyle {
    pub missing: MissingDate,
    pub timezone: Option<chrono_tz::Tz>,
}

impl DateStyle {
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            missing: config.missing_date_policy(),
            timezone: config.display_timezone()?,
        })
    }

    fn display(&self, timestamp: Option<&str>) -> Result<String, DateError> {
        format_publication_date(timestamp, &self.missing, self.timezone)
    }

    /// Machine-readable form for `<time datetime>`, empty when unknown
    fn machine(&self, timestamp: Option<&str>) -> String {
        timestamp
            .and_then(parse_timestamp)
            .map(|date| date_xml(&date))
            .unwrap_or_default()
    }

    /// IANA zone name the browser formats appended dates in, empty for the
    /// timestamp's own offset
    fn timezone_name(&self) -> &str {
        self.timezone.as_ref().map(|tz| tz.name()).unwrap_or_default()
    }

    /// Text the browser shows for pages loaded later without a date
    fn placeholder(&self) -> &str {
        match &self.missing {
            MissingDate::Placeholder(text) => text,
            MissingDate::Fail => "",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub language: String,
}

impl SiteData {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
        }
    }
}

/// A post card on the listing
#[derive(Debug, Clone, Serialize)]
pub struct PostCardData {
    pub uid: String,
    pub path: String,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub date_xml: String,
    pub author: String,
}

impl PostCardData {
    pub fn new(post: &PostSummary, dates: &DateStyle) -> Result<Self, DateError> {
        let timestamp = post.first_publication_date.as_deref();
        Ok(Self {
            uid: post.uid.clone(),
            path: post_path(&post.uid),
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            date: dates.display(timestamp)?,
            date_xml: dates.machine(timestamp),
            author: post.author.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadMoreData {
    pub label: String,
    /// Browser-facing address of the next page
    pub next_page: Option<String>,
    pub missing_date: String,
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleData {
    pub title: String,
    pub banner_url: String,
    pub date: String,
    pub date_xml: String,
    pub author: String,
    pub reading_minutes: u32,
    pub sections: Vec<Section>,
}

impl ArticleData {
    pub fn new(post: &PostDocument, dates: &DateStyle) -> Result<Self, DateError> {
        let timestamp = post.first_publication_date.as_deref();
        Ok(Self {
            title: post.title.clone(),
            banner_url: post.banner_url.clone(),
            date: dates.display(timestamp)?,
            date_xml: dates.machine(timestamp),
            author: post.author.clone(),
            reading_minutes: post.reading_minutes(),
            sections: post.content.clone(),
        })
    }
}

/// Route of a post detail page
pub fn post_path(uid: &str) -> String {
    format!("/post/{}/", uid)
}

/// Render the listing page for the posts accumulated so far.
///
/// `next_page_url` is what the "load more" control fetches; the control is
/// left out when it is `None`.
pub fn render_index(
    renderer: &TemplateRenderer,
    config: &SiteConfig,
    dates: &DateStyle,
    listing: &PaginationState,
    next_page_url: Option<&str>,
) -> Result<String> {
    let posts = listing
        .results
        .iter()
        .map(|post| {
            PostCardData::new(post, dates)
                .map_err(|e| anyhow::anyhow!("Post {:?}: {}", post.uid, e))
        })
        .collect::<Result<Vec<_>>>()?;

    let load_more = LoadMoreData {
        label: config.load_more_label.clone(),
        next_page: next_page_url.map(str::to_string),
        missing_date: dates.placeholder().to_string(),
        timezone: dates.timezone_name().to_string(),
    };

    let mut context = Context::new();
    context.insert("site", &SiteData::from_config(config));
    context.insert("posts", &posts);
    context.insert("load_more", &load_more);
    renderer.render("index.html", &context)
}

/// Render a post detail page
pub fn render_post(
    renderer: &TemplateRenderer,
    config: &SiteConfig,
    dates: &DateStyle,
    post: &PostDocument,
) -> Result<String> {
    let article =
        ArticleData::new(post, dates).map_err(|e| anyhow::anyhow!("Post {:?}: {}", post.uid, e))?;

    let mut context = Context::new();
    context.insert("site", &SiteData::from_config(config));
    context.insert("article", &article);
    renderer.render("post.html", &context)
}

/// Render the not-found page, optionally naming the missing slug
pub fn render_not_found(
    renderer: &TemplateRenderer,
    config: &SiteConfig,
    slug: Option<&str>,
) -> Result<String> {
    let mut context = Context::new();
    context.insert("site", &SiteData::from_config(config));
    context.insert("slug", &slug);
    renderer.render("404.html", &context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostPage;

    fn dates() -> DateStyle {
        DateStyle {
            missing: MissingDate::Placeholder("unpublished".to_string()),
            timezone: None,
        }
    }

    fn summary(uid: &str, date: Option<&str>) -> PostSummary {
        PostSummary {
            uid: uid.to_string(),
            first_publication_date: date.map(str::to_string),
            title: format!("Title <{}>", uid),
            subtitle: "Subtitle".to_string(),
            author: "Ana".to_string(),
        }
    }

    #[test]
    fn test_index_with_load_more() {
        let renderer = TemplateRenderer::new().unwrap();
        let config = SiteConfig::default();
        let listing = PaginationState::from(PostPage::new(
            vec![
                summary("first", Some("2021-03-15T00:00:00+0000")),
                summary("second", None),
            ],
            Some("https://blog.cdn.prismic.io/api/v2/documents/search?page=2".to_string()),
        ));

        let html = render_index(&renderer, &config, &dates(), &listing, Some("page-two")).unwrap();
        assert!(html.contains("15 mar 2021"));
        assert!(html.contains("unpublished"));
        assert!(html.contains("Title &lt;first&gt;"));
        assert!(html.contains("id=\"more-posts\""));
        assert!(html.contains("data-next-page=\"page-two\""));
        // Appended cards without a date get the same placeholder
        assert!(html.contains("data-missing-date=\"unpublished\""));
        assert!(html.contains("data-timezone=\"\""));
        assert!(html.contains("Load more posts"));
    }

    #[test]
    fn test_index_passes_timezone_to_load_more() {
        let renderer = TemplateRenderer::new().unwrap();
        let in_sao_paulo = DateStyle {
            missing: MissingDate::Placeholder("unpublished".to_string()),
            timezone: Some(chrono_tz::America::Sao_Paulo),
        };
        let listing = PaginationState::from(PostPage::new(
            vec![summary("late", Some("2021-03-15T02:00:00+0000"))],
            Some("page-two".to_string()),
        ));

        let html = render_index(
            &renderer,
            &SiteConfig::default(),
            &in_sao_paulo,
            &listing,
            Some("page-two"),
        )
        .unwrap();
        assert!(html.contains("14 mar 2021"));
        assert!(html.contains("data-timezone=\"America&#x2F;Sao_Paulo\""));
    }

    #[test]
    fn test_index_without_browser_url_hides_load_more() {
        let renderer = TemplateRenderer::new().unwrap();
        let listing = PaginationState::from(PostPage::new(
            vec![summary("only", None)],
            Some("unexposable".to_string()),
        ));
        let html = render_index(&renderer, &SiteConfig::default(), &dates(), &listing, None).unwrap();
        assert!(!html.contains("id=\"more-posts\""));
        assert!(!html.contains("unexposable"));
    }

    #[test]
    fn test_index_without_cursor_hides_load_more() {
        let renderer = TemplateRenderer::new().unwrap();
        let listing = PaginationState::from(PostPage::new(vec![summary("only", None)], None));
        let html = render_index(&renderer, &SiteConfig::default(), &dates(), &listing, None).unwrap();
        assert!(!html.contains("id=\"more-posts\""));
    }

    #[test]
    fn test_index_fails_on_missing_date_when_strict() {
        let renderer = TemplateRenderer::new().unwrap();
        let strict = DateStyle {
            missing: MissingDate::Fail,
            timezone: None,
        };
        let listing = PaginationState::from(PostPage::new(vec![summary("draft", None)], None));
        assert!(render_index(&renderer, &SiteConfig::default(), &strict, &listing, None).is_err());
    }

    #[test]
    fn test_post_page() {
        let renderer = TemplateRenderer::new().unwrap();
        let post = PostDocument {
            uid: "hello".to_string(),
            first_publication_date: Some("2021-03-15T00:00:00+0000".to_string()),
            title: "Hello".to_string(),
            banner_url: "https://images.prismic.io/banner.png".to_string(),
            author: "Ana".to_string(),
            content: vec![Section::new("Intro", &["First paragraph", "Second"])],
        };
        let html = render_post(&renderer, &SiteConfig::default(), &dates(), &post).unwrap();
        assert!(html.contains("<h2>Intro</h2>"));
        assert!(html.contains("<p>First paragraph</p>"));
        assert!(html.contains("1 min"));
        assert!(html.contains("15 mar 2021"));
        assert!(html.contains("class=\"banner\""));
    }

    #[test]
    fn test_not_found_page() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = render_not_found(&renderer, &SiteConfig::default(), Some("missing")).unwrap();
        assert!(html.contains("Post not found"));
        assert!(html.contains("missing"));
    }
}
