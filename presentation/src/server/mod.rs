//! HTTP API
//!
//! | Route | Body | Response |
//! |-------|------|----------|
//! | `GET /api/health` | | `{"status": "ok"}` |
//! | `POST /api/generate` | [`GenerateRequest`] | [`GenerateResponse`] |
//! | `POST /api/orchestrate` | [`OrchestrateRequest`] | [`OrchestrateResponse`] |
//! | `POST /api/generate-artist` | [`GenerateArtistRequest`] | [`GenerateArtistResponse`] |
//!
//! Failures are `{"error": "<message>"}` with status 400 for requests that
//! can never succeed and 500 otherwise.

pub mod dto;
mod error;
mod routes;
mod state;

pub use dto::{
    GenerateArtistRequest, GenerateArtistResponse, GenerateRequest, GenerateResponse,
    OrchestrateRequest, OrchestrateResponse,
};
pub use error::ApiError;
pub use state::{ApiDefaults, AppState};

use axum::Router;
use songmaster_application::LlmGateway;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the full application router.
pub fn router<G: LlmGateway + 'static>(state: Arc<AppState<G>>) -> Router {
    Router::new()
        .nest("/api", routes::api_router::<G>())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the API on `listener` until `shutdown` resolves.
pub async fn serve<G, F>(
    listener: TcpListener,
    state: Arc<AppState<G>>,
    shutdown: F,
) -> std::io::Result<()>
where
    G: LlmGateway + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("SongMaster API listening on http://{}", addr);
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
