use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use serde::Serialize;
use shared::models::VehicleId;
use tracing::warn;

use crate::error::AppError;
use crate::metrics::VehicleMetrics;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    api_reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_error: Option<String>,
}

/// Own liveness plus whether the garage API answers. Always 200 so the
/// dashboard stays up while the API is down.
pub async fn healthz(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let api_error = match state.api.health().await {
        Ok(()) => None,
        Err(e) => {
            warn!("API health check failed: {e}");
            Some(e.to_string())
        }
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            api_reachable: api_error.is_none(),
            api_error,
        }),
    )
}

#[derive(Serialize)]
pub struct MetricsResponse {
    vehicle_id: VehicleId,
    computed_at: String,
    #[serde(flatten)]
    metrics: VehicleMetrics,
}

/// The derived metrics of one vehicle as JSON.
pub async fn vehicle_metrics(
    Path(id): Path<VehicleId>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<MetricsResponse>, AppError> {
    let snapshot = state.api.vehicle_snapshot(id).await?;
    let now = Utc::now();
    let metrics = VehicleMetrics::compute(
        &snapshot.services,
        &snapshot.fuel_logs,
        &snapshot.reminders,
        now,
    );

    Ok(Json(MetricsResponse {
        vehicle_id: id,
        computed_at: now.to_rfc3339(),
        metrics,
    }))
}
