//! Server for the generated site with on-demand post rendering
//!
//! Pre-rendered files are served as they are. A request for a post that was
//! not generated at build time blocks while the post is fetched and rendered;
//! the page is then written next to the others so later requests hit the file.

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::cms::ContentSource;
use crate::generator::Generator;
use crate::Blog;

/// Server state
struct ServerState<S> {
    generator: Generator,
    source: S,
}

/// Build the router serving `blog.public_dir`
pub fn router<S>(blog: &Blog, source: S) -> Result<Router>
where
    S: ContentSource + 'static,
{
    let state = Arc::new(ServerState {
        generator: Generator::new(blog)?,
        source,
    });

    let static_files = ServeDir::new(&blog.public_dir).append_index_html_on_directories(true);

    Ok(Router::new()
        .route("/post/:slug", get(post_handler::<S>))
        .route("/post/:slug/", get(post_handler::<S>))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let app = router(blog, blog.client()?)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Serve a post page, rendering it first if it was never generated
async fn post_handler<S>(
    State(state): State<Arc<ServerState<S>>>,
    Path(slug): Path<String>,
) -> Response
where
    S: ContentSource + 'static,
{
    let Some(file_path) = state.generator.post_output_path(&slug) else {
        return not_found(&state.generator, &slug);
    };

    // Pages are moved into place whole; an empty file is a leftover, not a page
    match tokio::fs::read_to_string(&file_path).await {
        Ok(html) if !html.is_empty() => return Html(html).into_response(),
        _ => {}
    }

    tracing::info!(slug = %slug, "Rendering post on demand");
    match state.generator.generate_post(&state.source, &slug).await {
        Ok(Some(path)) => match tokio::fs::read_to_string(&path).await {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                tracing::error!("Failed to read rendered post {:?}: {}", path, e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }
        },
        Ok(None) => not_found(&state.generator, &slug),
        Err(e) => {
            tracing::error!(slug = %slug, "On-demand render failed: {:#}", e);
            (StatusCode::BAD_GATEWAY, "Failed to load post").into_response()
        }
    }
}

fn not_found(generator: &Generator, slug: &str) -> Response {
    match generator.render_not_found(Some(slug)) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render not-found page: {:#}", e);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}
