//! Axum route handlers for the map generation API.

use std::time::Instant;

use axum::{
    extract::State,
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::encode::encode_png;
use crate::generation::generator::generate_map;
use crate::generation::params::MapRequest;
use crate::state::AppState;

/// GET /
pub async fn handle_index() -> Json<Value> {
    Json(json!({
        "message": "POST a JSON payload to /generate to receive a PNG map"
    }))
}

/// POST /generate
///
/// Body: optional JSON `MapRequest`; an empty body renders with all defaults.
/// Returns the PNG with batch count, placement count and resolved seed in
/// `X-Tile-Batches`, `X-Tile-Count` and `X-Seed`.
pub async fn handle_generate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let request = parse_request(&body)?;
    let params = request.normalize(&state.config)?;

    let request_id = Uuid::new_v4();
    let started = Instant::now();
    let palette = state.palette;
    let job_params = params.clone();

    // CPU-bound: keep it off the async executor.
    let (png, stats) = tokio::task::spawn_blocking(move || {
        let map = generate_map(&job_params, palette)?;
        let png = encode_png(&map.image)?;
        Ok::<_, AppError>((png, map.stats))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in generation: {e}")))??;

    info!(
        %request_id,
        width = params.width,
        height = params.height,
        mode = %params.mode,
        placements = stats.total_placements,
        batches = stats.batches,
        seed = stats.seed,
        duration_ms = started.elapsed().as_millis() as u64,
        "generated map"
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CACHE_CONTROL, "no-store".to_string()),
            (
                HeaderName::from_static("x-tile-batches"),
                stats.batches.to_string(),
            ),
            (
                HeaderName::from_static("x-tile-count"),
                stats.total_placements.to_string(),
            ),
            (HeaderName::from_static("x-seed"), stats.seed.to_string()),
            (
                HeaderName::from_static("x-request-id"),
                request_id.to_string(),
            ),
        ],
        png,
    )
        .into_response())
}

fn parse_request(body: &[u8]) -> Result<MapRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(MapRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::Validation(format!("invalid JSON: {e}")))
}
