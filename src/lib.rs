pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod store;

use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::state::AppState;

/// Build the full application router around the shared state.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Card endpoints, all behind the owner gate
        .nest("/cashcards", cashcard_routes(state.clone()))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Routes under /cashcards. The fallback sits inside the gated subtree, so
/// unmatched paths under the prefix still answer 401/403 before 404.
fn cashcard_routes(state: AppState) -> Router<AppState> {
    use crate::handlers::cashcards;

    Router::new()
        .route("/", get(cashcards::list).post(cashcards::create))
        .route(
            "/:id",
            get(cashcards::get_by_id)
                .put(cashcards::update_by_id)
                .delete(cashcards::delete_by_id),
        )
        .fallback(gated_not_found)
        .layer(from_fn_with_state(state, middleware::require_card_owner))
}

async fn gated_not_found() -> ApiError {
    ApiError::not_found("Not found")
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Family Cash Card API",
        "version": version,
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "cashcards": "/cashcards[/:id] (HTTP Basic, CARD-OWNER role)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "store_error": e.to_string()
            })),
        ),
    }
}
