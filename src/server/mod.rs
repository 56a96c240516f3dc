//! Preview server for the generated site

use anyhow::Result;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::commands::generate;
use crate::content::ResolveError;
use crate::Blog;

/// Server state
struct ServerState {
    public_dir: PathBuf,
}

/// Build the router serving `public_dir`
pub fn router(public_dir: PathBuf) -> Router {
    let state = Arc::new(ServerState { public_dir });

    Router::new()
        .fallback(fallback_handler)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the preview server; with `watch` the site is rebuilt on changes
pub async fn start(blog: &Blog, ip: &str, port: u16, watch: bool) -> Result<()> {
    let app = router(blog.public_dir.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    if watch {
        let blog = blog.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = generate::watch(&blog) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Serve files from the public directory, answering 404 with the not-found page
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);

    match service.try_call(request).await {
        Ok(response) if response.status() == StatusCode::NOT_FOUND => {
            not_found(&state.public_dir).await
        }
        Ok(response) => response.into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

async fn not_found(public_dir: &std::path::Path) -> Response {
    let err = ResolveError::NotFound {
        slug: String::new(),
    };
    match tokio::fs::read_to_string(public_dir.join("404.html")).await {
        Ok(page) => (err.status(), Html(page)).into_response(),
        Err(_) => (err.status(), err.to_string()).into_response(),
    }
}
