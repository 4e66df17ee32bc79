//! PdfStamp API Server - Backend for PDF field flattening
//!
//! Provides REST endpoints for:
//! - Flattening placed fields into an uploaded PDF
//! - Serving the signed output documents

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

mod config;
mod error;
mod handlers;
mod models;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pdfstamp_api=info".parse()?)
                .add_directive("pdfstamp_core=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    info!("Initializing PdfStamp API...");

    // Signed documents are written here and served back read-only
    tokio::fs::create_dir_all(&config.upload_dir).await?;

    // CORS is restricted to the editor origin
    let cors = CorsLayer::new()
        .allow_origin(config.frontend_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    let port = config.port;
    let max_body_size = config.max_body_size;
    let upload_dir = config.upload_dir.clone();
    let state = Arc::new(AppState::new(config));

    // Build router
    let app = Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Flattening endpoint
        .route("/api/sign-pdf", post(handlers::sign_pdf))
        // Signed document delivery
        .nest_service("/uploads", ServeDir::new(upload_dir))
        // Add middleware
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting PdfStamp API on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
