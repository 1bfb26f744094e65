//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//!
//! Middleware stack (outermost → innermost):
//! 1. CORS → 2. Access logger

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the application router.
///
/// `GET /` does not touch the store, so it answers even when the store
/// is unusable.
pub fn app_router(ctx: ApiContext, cors: CorsLayer) -> Router {
    let auth = Router::new()
        .route("/signup", post(endpoints::auth::signup))
        .route("/login", post(endpoints::auth::login));

    Router::new()
        .route("/", get(endpoints::health::liveness))
        .route("/api/medicine/add", post(endpoints::medications::add))
        .nest("/api/auth", auth)
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::access_log::log_access))
        .layer(cors)
}
