//! HTTP server backed by the live content index.

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Path as AxumPath, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use livepress_core::{build_initial_index, ChangeWatcher, Config, ContentIndex, WatchOptions};
use livepress_render::{RenderError, Site};
use std::path::Path;
use tower_http::{services::ServeDir, trace::TraceLayer};

const HTML: &str = "text/html; charset=utf-8";
const XML: &str = "application/xml";
const RSS: &str = "application/xml; charset=UTF-8";

#[derive(Clone)]
struct AppState {
    site: Site,
}

/// Build the index, start watching, and serve until Ctrl+C.
pub async fn serve(config_path: &Path, port: Option<u16>) -> Result<()> {
    let config = Config::from_file(config_path)
        .with_context(|| format!("Failed to load configuration from {:?}", config_path))?;
    tracing::info!("Config file has been successfully loaded");

    let port = port.unwrap_or(config.server.port);
    let content_dir = config.content_dir();
    let root = content_dir
        .canonicalize()
        .with_context(|| format!("Content directory {:?} is not readable", content_dir))?;

    let index = ContentIndex::new(&root);
    build_initial_index(&index).context("Failed to walk content directory")?;

    let watcher = ChangeWatcher::new(
        index.clone(),
        WatchOptions {
            recursive: config.watch.recursive,
        },
    );
    let watch_handle = watcher.start().context("Failed to start change watcher")?;

    let static_dir = config.static_dir();
    let app = router(Site::new(config, index), &static_dir);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server starting at port {}", port);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error");

    watch_handle.stop().await;
    served
}

fn router(site: Site, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(serve_home))
        .route("/blog", get(serve_blog_index))
        .route("/blog/", get(serve_blog_index))
        .route("/blog/{*slug}", get(serve_post))
        .route("/sitemap.xml", get(serve_sitemap))
        .route("/rss.xml", get(serve_rss))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(serve_404)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { site })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

async fn serve_home(State(state): State<AppState>) -> Response {
    render(state, HTML, |site| site.home().map(Some)).await
}

async fn serve_blog_index(State(state): State<AppState>) -> Response {
    render(state, HTML, |site| site.blog_index().map(Some)).await
}

async fn serve_post(AxumPath(slug): AxumPath<String>, State(state): State<AppState>) -> Response {
    let slug = slug.trim_end_matches('/').to_string();
    render(state, HTML, move |site| site.post(&slug)).await
}

async fn serve_sitemap(State(state): State<AppState>) -> Response {
    render(state, XML, |site| site.sitemap().map(Some)).await
}

async fn serve_rss(State(state): State<AppState>) -> Response {
    render(state, RSS, |site| site.rss().map(Some)).await
}

async fn serve_404(State(state): State<AppState>) -> Response {
    not_found(state).await
}

/// Render off the async executor; `None` becomes the 404 page.
async fn render<F>(state: AppState, content_type: &'static str, f: F) -> Response
where
    F: FnOnce(&Site) -> Result<Option<String>, RenderError> + Send + 'static,
{
    let site = state.site.clone();
    match tokio::task::spawn_blocking(move || f(&site)).await {
        Ok(Ok(Some(body))) => ([(header::CONTENT_TYPE, content_type)], body).into_response(),
        Ok(Ok(None)) => not_found(state).await,
        Ok(Err(e)) => {
            tracing::error!("Render error: {}", e);
            internal_error()
        }
        Err(e) => {
            tracing::error!("Render task panicked: {}", e);
            internal_error()
        }
    }
}

async fn not_found(state: AppState) -> Response {
    let site = state.site;
    match tokio::task::spawn_blocking(move || site.not_found()).await {
        Ok(Ok(html)) => {
            (StatusCode::NOT_FOUND, [(header::CONTENT_TYPE, HTML)], html).into_response()
        }
        Ok(Err(e)) => {
            tracing::error!("Template execution error: {}", e);
            plain_not_found()
        }
        Err(e) => {
            tracing::error!("Render task panicked: {}", e);
            plain_not_found()
        }
    }
}

fn plain_not_found() -> Response {
    (StatusCode::NOT_FOUND, Body::from("404 Not Found")).into_response()
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}
