// src/routes.rs

use axum::{
    Router,
    http::{Method, header},
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{docs, health, question},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Mounts the question collection at both `/questions/` and `/questions`.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool + Config).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let collection = get(question::list_questions).post(question::create_question);

    Router::new()
        .route("/", get(health::root))
        .route("/openapi.json", get(docs::openapi_json))
        .route("/questions", collection.clone())
        .route("/questions/", collection)
        .route(
            "/questions/{id}",
            get(question::get_question)
                .put(question::update_question)
                .delete(question::delete_question),
        )
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
