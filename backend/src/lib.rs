pub mod distance;
pub mod error;
pub mod gazetteer;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use shared::{ApiError, DistanceMatrixRequest, SearchHit};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ServiceError;
use crate::gazetteer::Gazetteer;

pub const SEARCH_LIMIT: usize = 10;

#[derive(Clone)]
pub struct AppState {
    pub gazetteer: Arc<Gazetteer>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/search", get(search_handler))
        .route("/distance-matrix", post(distance_matrix_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub text: String,
}

async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<SearchHit>> {
    let hits = state.gazetteer.search(&params.text, SEARCH_LIMIT);
    tracing::debug!(text = %params.text, hits = hits.len(), "search");
    Json(hits)
}

async fn distance_matrix_handler(
    Json(req): Json<DistanceMatrixRequest>,
) -> Result<Json<Vec<f64>>, (StatusCode, Json<ApiError>)> {
    let distances = distance::distance_matrix(&req).map_err(api_error)?;
    tracing::debug!(
        points = req.latitudes.len(),
        unit = %req.unit,
        "distance matrix"
    );
    Ok(Json(distances))
}

fn api_error(err: ServiceError) -> (StatusCode, Json<ApiError>) {
    let status = err.status();
    if status.is_server_error() {
        tracing::error!("request failed: {err}");
    } else {
        tracing::warn!("rejected request: {err}");
    }
    (
        status,
        Json(ApiError {
            message: err.to_string(),
        }),
    )
}
