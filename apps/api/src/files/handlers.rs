use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use super::{object_key, ResumeFormat, MAX_UPLOAD_BYTES};
use crate::errors::AppError;
use crate::identity::AuthUser;
use crate::store::{Record, Table};
use crate::state::AppState;

pub const TOO_LARGE: &str = "File size must be less than 10MB";
pub const WRONG_TYPE: &str = "Only PDF, DOCX, and TXT files are allowed";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub file_url: String,
    pub file_format: &'static str,
    /// The updated resume when the upload replaced an existing file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume: Option<Value>,
}

struct Upload {
    content_type: String,
    body: Bytes,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(TOO_LARGE.to_string())
    } else {
        AppError::Validation(e.body_text())
    }
}

/// POST /api/resumes/upload
///
/// Multipart with a `file` part and an optional `resume_id` part. With a
/// `resume_id`, the resume is pointed at the new file and its previous
/// upload is removed from the bucket.
pub async fn upload_resume_file(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let mut upload: Option<Upload> = None;
    let mut resume_id: Option<Uuid> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let content_type = field.content_type().unwrap_or("").to_string();
                let body = field.bytes().await.map_err(multipart_error)?;
                upload = Some(Upload { content_type, body });
            }
            "resume_id" => {
                let text = field.text().await.map_err(multipart_error)?;
                let id = Uuid::parse_str(text.trim())
                    .map_err(|_| AppError::Validation(format!("Invalid resume_id: '{text}'")))?;
                resume_id = Some(id);
            }
            _ => {}
        }
    }

    let upload = upload.ok_or_else(|| AppError::Validation("Missing file".to_string()))?;
    if upload.body.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::PayloadTooLarge(TOO_LARGE.to_string()));
    }
    let format = ResumeFormat::from_content_type(&upload.content_type)
        .ok_or_else(|| AppError::Validation(WRONG_TYPE.to_string()))?;

    let previous_url = match resume_id {
        Some(id) => {
            let row = state
                .store
                .get(Table::Resumes, user.id, id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
            Some(row.get("file_url").and_then(Value::as_str).map(str::to_string))
        }
        None => None,
    };

    let key = object_key(user.id, Utc::now().timestamp_millis(), format);
    let file_url = state.files.put(&key, format, upload.body).await?;
    info!("Stored resume upload for user {}", user.id);

    let mut resume = None;
    if let Some(id) = resume_id {
        let mut changes = Record::new();
        changes.insert("file_url".to_string(), json!(file_url));
        changes.insert("file_format".to_string(), json!(format.label()));
        changes.insert("updated_at".to_string(), json!(Utc::now()));
        resume = state.store.update(Table::Resumes, user.id, id, changes).await?;

        if let Some(Some(old)) = previous_url {
            match state.files.delete_url(&old).await {
                Ok(true) => info!("Removed replaced resume file"),
                Ok(false) => {}
                Err(e) => warn!("Could not remove replaced resume file: {e}"),
            }
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            file_url,
            file_format: format.label(),
            resume,
        }),
    ))
}
