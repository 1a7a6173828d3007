pub mod config;
pub mod email;
pub mod error;
pub mod models;
pub mod routes;
pub mod sheet;
pub mod state;
pub mod storage;
pub mod submission;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::email::Mailer;
use crate::state::{AppState, SharedState};
use crate::storage::DocumentStore;

/// Build the router around the given storage and mail collaborators.
pub fn build_app(
    config: Config,
    store: Arc<dyn DocumentStore>,
    mailer: Arc<dyn Mailer>,
) -> Router {
    let body_limit = config.max_upload_size;
    let static_dir = config.static_dir.clone();

    let state: SharedState = Arc::new(AppState {
        config,
        store,
        mailer,
    });

    Router::new()
        .merge(routes::submit_routes())
        .route("/health", axum::routing::get(health))
        .fallback_service(ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(CorsLayer::permissive())
                .layer(CatchPanicLayer::custom(error::panic_response)),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
