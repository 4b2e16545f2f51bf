use crate::api::error::JsonBody;
use crate::api::AppState;
use crate::error::{InventoryError, Result};
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceRequest {
    #[serde(default)]
    query: String,
    inventory_context: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdviceResponse {
    pub advice: String,
}

#[instrument(skip_all)]
pub async fn get_advice(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AdviceRequest>,
) -> Result<Json<AdviceResponse>> {
    let question = request.query.trim();
    if question.is_empty() {
        return Err(InventoryError::validation("Query is required"));
    }

    let context = state
        .service
        .consultant_context(request.inventory_context)
        .await?;
    let advice = state.consultant.advise(question, &context).await?;
    tracing::info!(chars = advice.len(), "consultant advice returned");
    Ok(Json(AdviceResponse { advice }))
}
