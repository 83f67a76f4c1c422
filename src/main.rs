mod constants;
mod detector;
mod routes;
mod services;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};

use constants::{
    DEFAULT_ALLOWED_ORIGIN, DEFAULT_MODEL_PATH, DEFAULT_MODEL_REPO, DEFAULT_PORT, MAX_UPLOAD_SIZE,
};
use detector::{Detector, EfficientNetDetector, FixedDetector};

#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<dyn Detector>,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let model_path =
        std::env::var("MODEL_PATH").unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string());
    let model_repo =
        std::env::var("MODEL_REPO").unwrap_or_else(|_| DEFAULT_MODEL_REPO.to_string());
    let allowed_origin =
        std::env::var("ALLOWED_ORIGIN").unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGIN.to_string());

    let detector: Arc<dyn Detector> = match std::env::var("DETECTOR").as_deref() {
        Ok("fixed") => Arc::new(FixedDetector::default()),
        _ => Arc::new(
            EfficientNetDetector::load(&PathBuf::from(&model_path), &model_repo)
                .expect("Failed to load detector model"),
        ),
    };

    let state = Arc::new(AppState { detector });

    // Single configured browser origin; methods/headers mirrored since the
    // frontend sends credentials.
    let cors = CorsLayer::new()
        .allow_origin(
            allowed_origin
                .parse::<HeaderValue>()
                .expect("Invalid ALLOWED_ORIGIN"),
        )
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    let app = routes::build_routes()
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
        .layer(cors)
        .with_state(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to {}: {}", addr, e));

    println!("Listening on http://{}", addr);
    axum::serve(listener, app).await.expect("Server failed");
}
