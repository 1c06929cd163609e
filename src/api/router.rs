//! Assessment API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`. CORS is permissive — the original
//! deployment fronts a browser form on a different origin.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the assessment API router.
pub fn assessment_router(ctx: ApiContext) -> Router {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .route("/assess", post(endpoints::assess::assess))
                .route("/health", get(endpoints::health::check))
                .with_state(ctx),
        )
        .layer(CorsLayer::permissive())
}
