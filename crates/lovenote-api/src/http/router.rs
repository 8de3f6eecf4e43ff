//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`. Admin routes are only mounted when
//! `admin.enabled` is set in `config.toml`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut api_routes = Router::new()
        // Confessions
        .route(
            "/confessions",
            post(handlers::confession::submit_confession).get(handlers::confession::list_feed),
        )
        .route(
            "/confessions/search",
            get(handlers::confession::search_confessions),
        )
        .route("/confessions/{code}", get(handlers::confession::get_confession))
        .route(
            "/confessions/{code}/reactions",
            post(handlers::confession::add_reaction),
        )
        // Submission wizard
        .route("/wizard", post(handlers::wizard::open_wizard))
        .route(
            "/wizard/{id}",
            get(handlers::wizard::get_wizard).delete(handlers::wizard::close_wizard),
        )
        .route("/wizard/{id}/advance", post(handlers::wizard::advance))
        .route("/wizard/{id}/retreat", post(handlers::wizard::retreat))
        .route(
            "/wizard/{id}/enhancement",
            put(handlers::wizard::set_enhancement),
        )
        .route(
            "/wizard/{id}/revert-enhancement",
            post(handlers::wizard::revert_enhancement),
        )
        .route("/wizard/{id}/submit", post(handlers::wizard::submit))
        // Countdown
        .route("/countdown", get(handlers::countdown::get_countdown));

    if state.config.admin.enabled {
        api_routes = api_routes
            .route("/admin/confessions", get(handlers::admin::list_confessions))
            .route(
                "/admin/confessions/{id}/status",
                put(handlers::admin::update_status),
            )
            .route("/admin/stats", get(handlers::admin::get_stats));
    }

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
