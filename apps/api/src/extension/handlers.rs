use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::AuthUser;
use crate::normalize::{stamp, ExtensionPayload, Submission, WriteMode};
use crate::state::AppState;
use crate::store::{encode_record, Table};

#[derive(Debug, Serialize)]
pub struct SavedResponse {
    pub success: bool,
    pub data: Value,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ConnectionResponse {
    pub success: bool,
    pub message: &'static str,
    pub email: Option<String>,
    pub user_id: Uuid,
}

/// POST /api/applications/from-extension
///
/// The token is checked before the body, so an unauthenticated caller gets
/// 401 even with an empty payload.
pub async fn save_from_extension(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<ExtensionPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<SavedResponse>), AppError> {
    let Json(payload) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    info!(
        user_id = %user.id,
        company = payload.company.as_deref().unwrap_or(""),
        position = payload.position.as_deref().unwrap_or(""),
        "Received job data from extension"
    );

    let now = Utc::now();
    let application = payload.normalize(user.id, now)?;
    let mut record = encode_record(&application)?;
    stamp(&mut record, WriteMode::Insert, now);

    let data = state.store.insert(Table::Applications, record).await?;
    info!("Saved extension application for user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(SavedResponse {
            success: true,
            data,
            message: "Application saved successfully",
        }),
    ))
}

/// GET /api/test-connection
pub async fn test_connection(user: AuthUser) -> Json<ConnectionResponse> {
    Json(ConnectionResponse {
        success: true,
        message: "Connection successful",
        email: user.email,
        user_id: user.id,
    })
}

/// OPTIONS on either extension endpoint. CORS headers come from the router's layer.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
