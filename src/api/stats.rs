use crate::api::AppState;
use crate::error::Result;
use crate::stats::DashboardStats;
use axum::extract::State;
use axum::Json;
use chrono::Utc;

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<DashboardStats>> {
    let stats = state
        .service
        .dashboard_stats(Utc::now().fixed_offset())
        .await?;
    Ok(Json(stats))
}
