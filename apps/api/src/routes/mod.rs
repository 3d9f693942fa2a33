pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::handle_index))
        .route("/healthz", get(health::health_handler))
        .route("/generate", post(handlers::handle_generate))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::config::Config;

    fn app() -> Router {
        build_router(AppState::new(Config::default()))
    }

    fn post_generate(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_index_points_at_generate() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["message"].as_str().unwrap().contains("/generate"));
    }

    #[tokio::test]
    async fn test_generate_returns_png_with_metadata() {
        let response = app()
            .oneshot(post_generate(
                r#"{"w": 40, "h": 30, "tiles": "2x1*25,1x1*10", "seed": "demo", "rot": 0}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers().clone();
        assert_eq!(headers[header::CONTENT_TYPE], "image/png");
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");
        assert_eq!(headers["x-tile-batches"], "2");
        assert_eq!(headers["x-tile-count"], "35");
        assert_eq!(
            headers["x-seed"],
            crate::generation::seed::seed_from_string("demo").to_string().as_str()
        );
        assert!(headers.contains_key("x-request-id"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (40, 30));
    }

    #[tokio::test]
    async fn test_identical_requests_identical_png() {
        let body = r#"{"w": 32, "h": 32, "mode": "adalar", "seed": "ayni"}"#;
        let first = app().oneshot(post_generate(body)).await.unwrap();
        let second = app().oneshot(post_generate(body)).await.unwrap();
        let a = to_bytes(first.into_body(), usize::MAX).await.unwrap();
        let b = to_bytes(second.into_body(), usize::MAX).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_empty_body_uses_defaults() {
        let response = app().oneshot(post_generate("")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-tile-count"], "800");
    }

    #[tokio::test]
    async fn test_invalid_json_is_bad_request() {
        let response = app().oneshot(post_generate("{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_field_is_bad_request() {
        let response = app()
            .oneshot(post_generate(r#"{"width": 10}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unsupported_mode_is_bad_request() {
        let response = app()
            .oneshot(post_generate(r#"{"mode": "spiral"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("unsupported mode"));
    }

    #[tokio::test]
    async fn test_nothing_to_place_is_allocation_error() {
        let response = app()
            .oneshot(post_generate(r#"{"tiles": "1x1*0.2"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "ALLOCATION_ERROR");
    }

    #[tokio::test]
    async fn test_tile_count_over_limit_is_validation_error() {
        let config = Config {
            max_tile_count: 1_000,
            ..Config::default()
        };
        let response = build_router(AppState::new(config))
            .oneshot(post_generate(r#"{"tiles": "1x1*5e9"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_get_generate_not_allowed() {
        let response = app()
            .oneshot(Request::get("/generate").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
