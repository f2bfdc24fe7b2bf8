//! HTTP endpoints: `/check-word`, `/leaderboard` and `/health`.

mod check_word;
mod error;
mod leaderboard;
mod state;

pub use check_word::check_word;
pub use error::{ApiError, ErrorBody};
pub use leaderboard::{ListParams, list_leaderboard, submit_score};
pub use state::AppState;

use axum::{
    Router,
    http::{HeaderValue, StatusCode, header},
    middleware,
    response::Response,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

/// Methods advertised on every response.
pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Builds the router over `state`.
#[instrument]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/check-word",
            post(check_word)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route(
            "/leaderboard",
            get(list_leaderboard)
                .post(submit_score)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .layer(middleware::map_response(add_cors_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the router on `host:port` until the process stops.
///
/// # Errors
///
/// Returns an I/O error if the address cannot be bound.
#[instrument]
pub async fn serve(state: AppState, host: &str, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!(address = %listener.local_addr()?, "Word battle server listening");
    axum::serve(listener, router(state)).await
}

async fn health() -> &'static str {
    "ok"
}

async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

async fn add_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}
