use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Club endpoints under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/generate-movie", post(handlers::generate_movie))
        .route("/weekly-movie", get(handlers::get_weekly_movie))
        .route("/weekly-movie", post(handlers::set_weekly_movie))
        .route("/get-reviews", get(handlers::get_reviews))
        .route("/receive-review", post(handlers::receive_review))
        .route("/register-user", post(handlers::register_user))
        .route("/ai-witty-intro", post(handlers::ai_witty_intro))
        .route("/send-results", post(handlers::send_results))
}
