/// API route modules
pub mod health;
pub mod users;

use crate::{config::QrSettings, state::AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the full application router
///
/// API routes live under `/api`; generated QR codes are served as static
/// files under `qr.static_route`.
pub fn create_router(app_state: AppState, qr: &QrSettings) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health::health))
        .route("/sign-on", post(users::sign_on))
        .route(
            "/users/details/:email",
            get(users::get_details).patch(users::update_details),
        )
        .route("/users/my-qr/:email", get(users::get_qr_code));

    Router::new()
        .nest("/api", api_routes)
        .nest_service(&qr.static_route, ServeDir::new(&qr.output_dir))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
