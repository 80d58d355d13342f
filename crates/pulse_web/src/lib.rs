use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use pulse_core::{Result, AUDIO_ROUTE};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let audio = ServeDir::new(&state.audio_dir);

    Router::new()
        .route("/", get(handlers::index))
        .route("/get_news", get(handlers::get_news))
        .route("/topics", get(handlers::get_topics))
        .route("/health", get(handlers::health))
        .nest_service(AUDIO_ROUTE, audio)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Binds `addr` and serves until the process exits.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🎧 Pulse AI server running at http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

pub mod prelude {
    pub use crate::{create_app, serve, AppState};
    pub use pulse_core::{Error, NewsRecord, Result};
}
