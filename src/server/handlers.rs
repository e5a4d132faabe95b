use super::types::{ErrorResponse, HealthResponse, ScoreRequest};
use crate::classifier::{Classification, Classifier};
use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            started_at: Utc::now(),
        }
    }
}

pub async fn score(
    State(state): State<AppState>,
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<Json<Vec<Classification>>, ApiError> {
    let request_id = Uuid::new_v4();

    let Json(request) = payload.map_err(|rejection| {
        warn!(%request_id, "Rejected score request: {}", rejection.body_text());
        (
            rejection.status(),
            Json(ErrorResponse {
                error: rejection.body_text(),
            }),
        )
    })?;

    let essay = request.essay.unwrap_or_default();
    info!(
        %request_id,
        "Received score request with {} characters",
        essay.chars().count()
    );

    match state.classifier.classify(&essay).await {
        Ok(classifications) => {
            info!(%request_id, "Scored essay with {} labels", classifications.len());
            Ok(Json(classifications))
        }
        Err(e) => {
            error!(%request_id, "Failed to score essay: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.classifier.model_name().to_string(),
        backend: state.classifier.backend().as_str().to_string(),
        started_at: state.started_at,
    })
}
