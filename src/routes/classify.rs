//! Image classification endpoint (/classify)

use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::post,
};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;
use crate::detector::verdict;
use crate::services::error::LogErr;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/classify", post(classify))
}

/// Response envelope: {"status":"success","result":{...}} or
/// {"status":"error","message":"..."}
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ClassifyResponse {
    Success { result: ClassifyResult },
    Error { message: String },
}

#[derive(Debug, Serialize)]
pub struct ClassifyResult {
    pub prediction: String,
    pub confidence: String,
}

/// Classify one uploaded image as a real photograph or AI-generated.
///
/// Any failure in the pipeline (missing field, unreadable body, undecodable
/// image, inference error) is reported in the envelope with HTTP 200, matching
/// the service's published contract.
async fn classify(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Json<ClassifyResponse> {
    match run_pipeline(&state, multipart).await {
        Ok(result) => Json(ClassifyResponse::Success { result }),
        Err(message) => Json(ClassifyResponse::Error { message }),
    }
}

async fn run_pipeline(
    state: &Arc<AppState>,
    mut multipart: Multipart,
) -> Result<ClassifyResult, String> {
    let field = multipart
        .next_field()
        .await
        .log_err("[classify] Multipart field error")?
        .ok_or_else(|| {
            log::warn!("[classify] Request carried no file field");
            "No file uploaded".to_string()
        })?;

    let bytes = field
        .bytes()
        .await
        .log_err("[classify] Failed to read upload body")?;

    let scaled = state
        .detector
        .scale(&bytes)
        .log_err("[classify] Failed to decode image")?;

    let probability = state
        .detector
        .score(&scaled)
        .log_err("[classify] Inference failed")?;

    log::info!("[classify] Raw prediction: {}", probability);

    let v = verdict(probability);
    Ok(ClassifyResult {
        prediction: v.prediction.to_string(),
        confidence: v.confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::FixedDetector;
    use crate::routes::build_routes;
    use axum::body::Body;
    use axum::http::Request;
    use std::io::Cursor;
    use tower::ServiceExt;

    const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

    fn test_app(probability: f32) -> Router {
        let state = Arc::new(AppState {
            detector: Arc::new(FixedDetector::new(probability)),
        });
        build_routes().with_state(state)
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(64, 64, image::Rgb([120, 80, 200]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn multipart_body(payload: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"file\"; filename=\"upload.png\"\r\n\
                 Content-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(payload);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn post_classify(app: Router, body: Vec<u8>) -> serde_json::Value {
        let request = Request::builder()
            .method("POST")
            .uri("/classify")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), 200);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_classify_real_photo() {
        let json = post_classify(test_app(0.9), multipart_body(&png_bytes())).await;

        assert_eq!(json["status"], "success");
        assert_eq!(json["result"]["prediction"], "Real");
        assert_eq!(json["result"]["confidence"], "90.0%");
    }

    #[tokio::test]
    async fn test_classify_generated_image() {
        let json = post_classify(test_app(0.2), multipart_body(&png_bytes())).await;

        assert_eq!(json["status"], "success");
        assert_eq!(json["result"]["prediction"], "AI-Generated");
        assert_eq!(json["result"]["confidence"], "80.0%");
    }

    #[tokio::test]
    async fn test_classify_non_image_payload() {
        let json = post_classify(test_app(0.9), multipart_body(b"not an image")).await;

        assert_eq!(json["status"], "error");
        assert!(!json["message"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_classify_without_file_field() {
        let body = format!("--{BOUNDARY}--\r\n").into_bytes();
        let json = post_classify(test_app(0.9), body).await;

        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "No file uploaded");
    }

    #[tokio::test]
    async fn test_repeated_uploads_are_deterministic() {
        let payload = multipart_body(&png_bytes());
        let first = post_classify(test_app(0.73), payload.clone()).await;
        let second = post_classify(test_app(0.73), payload).await;

        assert_eq!(first, second);
        assert_eq!(first["result"]["confidence"], "73.0%");
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app(0.5)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }
}
