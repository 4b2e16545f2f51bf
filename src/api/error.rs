use crate::error::InventoryError;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{async_trait, Json};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A plain json error body.
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub message: String,
}

impl InventoryError {
    pub fn status(&self) -> StatusCode {
        match self {
            InventoryError::Validation(_) | InventoryError::InsufficientStock { .. } => {
                StatusCode::BAD_REQUEST
            }
            InventoryError::Unauthorized => StatusCode::UNAUTHORIZED,
            InventoryError::NotFound(_) => StatusCode::NOT_FOUND,
            InventoryError::Consultant(_) | InventoryError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for InventoryError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            InventoryError::Internal(error) => tracing::error!(error = ?error, "internal error"),
            InventoryError::Consultant(error) => tracing::error!(%error, "consultant failed"),
            _ => tracing::debug!(%status, error = %self, "request rejected"),
        }
        (
            status,
            Json(ErrorResponse {
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for InventoryError {
    fn from(rejection: JsonRejection) -> Self {
        InventoryError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for InventoryError {
    fn from(rejection: QueryRejection) -> Self {
        InventoryError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for InventoryError {
    fn from(rejection: PathRejection) -> Self {
        InventoryError::Validation(rejection.body_text())
    }
}

/// `Json` whose rejections (bad syntax, wrong types, missing fields) become a
/// 400 with a json message instead of axum's plain-text 422.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = InventoryError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
