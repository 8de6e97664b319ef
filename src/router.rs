use crate::config::CorsConfig;
use crate::handlers;
use crate::http::cors::{cors_headers, with_cors_headers};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState, cors: &CorsConfig, body_limit: usize) -> Router {
    let routes = Router::new()
        .route(
            "/",
            get(handlers::handle_get)
                .post(handlers::handle_submit)
                .options(handlers::handle_preflight)
                .fallback(handlers::handle_unsupported_method),
        )
        .fallback(handlers::handle_fallback)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http());

    with_cors_headers(routes, cors_headers(cors)).with_state(state)
}
