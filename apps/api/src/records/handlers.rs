use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use super::{Applications, Events, Interviews, Resource, Resumes, Surveys};
use crate::errors::AppError;
use crate::identity::AuthUser;
use crate::models::labels::{ApplicationStatus, SurveyStatus};
use crate::models::ApplicationRow;
use crate::normalize::{stamp, Submission, WriteMode};
use crate::state::AppState;
use crate::store::{decode_rows, encode_record, Record, StoreError, Table};
use crate::views::stats::{ApplicationStats, EventStats, InterviewStats, ResumeStats, SurveyStats};
use crate::views::{apply_view, count_by, CategoryCount, Dimension, SortOrder, ViewConfig};

pub const UNKNOWN_PARENT: &str = "Linked application not found";

/// Query string of the list endpoints. Absent values fall back to the
/// entity's default view.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl ListQuery {
    pub fn view_config<R: Resource>(self) -> ViewConfig {
        let mut config = ViewConfig::defaults_for::<R::Row>();
        if let Some(search) = self.search {
            config.search_term = search;
        }
        if let Some(status) = self.status.filter(|s| !s.is_empty()) {
            config.status_filter = status;
        }
        if let Some(filter) = self.filter.filter(|s| !s.is_empty()) {
            config.secondary_filter = filter;
        }
        if let Some(sort) = self.sort.filter(|s| !s.is_empty()) {
            config.sort_field = sort;
        }
        if let Some(order) = self.order {
            config.sort_order = SortOrder::parse(&order);
        }
        config
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T, S> {
    pub items: Vec<T>,
    /// Size of the whole collection, before filtering.
    pub total: usize,
    pub shown: usize,
    pub status_counts: Vec<CategoryCount>,
    pub filter_counts: Vec<CategoryCount>,
    pub stats: S,
}

#[derive(Debug, Serialize)]
pub struct RecordResponse<T, F> {
    pub record: T,
    /// The record mapped back to form-input values.
    pub form: F,
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub applications: ApplicationStats,
    pub interviews: InterviewStats,
    pub events: EventStats,
    pub surveys: SurveyStats,
    pub resumes: ResumeStats,
    /// Five most recently created applications.
    pub recent_applications: Vec<ApplicationRow>,
}

fn record_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, AppError> {
    path.map(|Path(id)| id)
        .map_err(|e| AppError::Validation(e.body_text()))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(value)| value)
        .map_err(|e| AppError::Validation(e.body_text()))
}

fn not_found<R: Resource>() -> AppError {
    AppError::NotFound(format!("{} not found", R::NAME))
}

async fn load<R: Resource>(state: &AppState, user_id: Uuid) -> Result<Vec<R::Row>, AppError> {
    let rows = state.store.list(R::TABLE, user_id).await?;
    Ok(decode_rows(rows)?)
}

/// Links the form to its parent application, normalizes it, and stamps write
/// times. A parent the user does not own is rejected, except for the link a
/// stored record already carries (`current_parent`), since deleting an
/// application leaves its children in place.
async fn prepare<R: Resource>(
    state: &AppState,
    user_id: Uuid,
    mut form: R::Form,
    current_parent: Option<Uuid>,
    mode: WriteMode,
    now: DateTime<Utc>,
) -> Result<Record, AppError> {
    if let Some(parent_id) = R::parent_of(&form) {
        match state.store.get(Table::Applications, user_id, parent_id).await? {
            Some(row) => {
                let parent: ApplicationRow =
                    serde_json::from_value(row).map_err(StoreError::from)?;
                R::link_parent(&mut form, &parent);
            }
            None if current_parent == Some(parent_id) => {}
            None => return Err(AppError::Validation(UNKNOWN_PARENT.to_string())),
        }
    }

    let normalized = form.normalize(user_id, now)?;
    let mut record = encode_record(&normalized)?;
    stamp(&mut record, mode, now);
    Ok(record)
}

/// Lays the submitted fields over the stored record's form values. Absent,
/// `null`, and blank fields keep what is stored.
fn merge_form<R: Resource>(stored: &R::Row, submitted: Value) -> Result<R::Form, AppError> {
    let Value::Object(changes) = submitted else {
        return Err(AppError::Validation(
            "Request body must be a JSON object".to_string(),
        ));
    };
    let mut merged = serde_json::to_value(R::Form::from(stored)).map_err(StoreError::from)?;
    if let Value::Object(base) = &mut merged {
        for (key, value) in changes {
            let blank = match &value {
                Value::Null => true,
                Value::String(s) => s.trim().is_empty(),
                _ => false,
            };
            if !blank {
                base.insert(key, value);
            }
        }
    }
    serde_json::from_value(merged).map_err(|e| AppError::Validation(e.to_string()))
}

/// Resumes only: pulls a requested default flag out of the record so it can be
/// applied through `set_default_resume`, which clears every other default.
fn take_default_flag<R: Resource>(record: &mut Record) -> bool {
    if R::TABLE != Table::Resumes {
        return false;
    }
    match record.get("is_default") {
        Some(Value::Bool(true)) => {
            record.insert("is_default".to_string(), Value::Bool(false));
            true
        }
        _ => false,
    }
}

async fn finish_default(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
    row: Value,
) -> Result<Value, AppError> {
    if !state.store.set_default_resume(user_id, id).await? {
        return Ok(row);
    }
    Ok(state
        .store
        .get(Table::Resumes, user_id, id)
        .await?
        .unwrap_or(row))
}

fn row_id(row: &Value) -> Option<Uuid> {
    row.get("id")
        .and_then(Value::as_str)
        .and_then(|id| Uuid::parse_str(id).ok())
}

// ────────────────────────────────────────────
// Generic CRUD
// ────────────────────────────────────────────

/// GET /api/<kind>
pub async fn list<R: Resource>(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse<R::Row, R::Stats>>, AppError> {
    let rows = load::<R>(&state, user.id).await?;
    let config = query.view_config::<R>();
    let items = apply_view(&rows, &config);

    let status_counts = if R::STATUS_VALUES.is_empty() {
        Vec::new()
    } else {
        count_by(&rows, Dimension::Status, R::STATUS_VALUES, R::STATUS_TONE)
    };
    let filter_counts = if R::SECONDARY_VALUES.is_empty() {
        Vec::new()
    } else {
        count_by(&rows, Dimension::Secondary, R::SECONDARY_VALUES, R::SECONDARY_TONE)
    };

    Ok(Json(ListResponse {
        total: rows.len(),
        shown: items.len(),
        stats: R::stats(&rows, Utc::now()),
        items,
        status_counts,
        filter_counts,
    }))
}

/// POST /api/<kind>
pub async fn create<R: Resource>(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<R::Form>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let form = json_body(body)?;
    let mut record =
        prepare::<R>(&state, user.id, form, None, WriteMode::Insert, Utc::now()).await?;
    let make_default = take_default_flag::<R>(&mut record);

    let mut row = state.store.insert(R::TABLE, record).await?;
    if make_default {
        if let Some(id) = row_id(&row) {
            row = finish_default(&state, user.id, id, row).await?;
        }
    }

    info!("Created {} for user {}", R::TABLE.as_str(), user.id);
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/<kind>/:id
pub async fn get_one<R: Resource>(
    State(state): State<AppState>,
    user: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<RecordResponse<R::Row, R::Form>>, AppError> {
    let id = record_id(path)?;
    let row = state
        .store
        .get(R::TABLE, user.id, id)
        .await?
        .ok_or_else(not_found::<R>)?;
    let record: R::Row = serde_json::from_value(row).map_err(StoreError::from)?;
    let form = R::Form::from(&record);
    Ok(Json(RecordResponse { record, form }))
}

/// PUT /api/<kind>/:id
///
/// Fields left out of the body, or sent blank, keep their stored value.
pub async fn update<R: Resource>(
    State(state): State<AppState>,
    user: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let id = record_id(path)?;
    let submitted = json_body(body)?;
    let stored = state
        .store
        .get(R::TABLE, user.id, id)
        .await?
        .ok_or_else(not_found::<R>)?;
    let stored: R::Row = serde_json::from_value(stored).map_err(StoreError::from)?;
    let current_parent = R::parent_of(&R::Form::from(&stored));
    let form = merge_form::<R>(&stored, submitted)?;

    let mut record = prepare::<R>(
        &state,
        user.id,
        form,
        current_parent,
        WriteMode::Update,
        Utc::now(),
    )
    .await?;
    let make_default = take_default_flag::<R>(&mut record);

    let mut row = state
        .store
        .update(R::TABLE, user.id, id, record)
        .await?
        .ok_or_else(not_found::<R>)?;
    if make_default {
        row = finish_default(&state, user.id, id, row).await?;
    }
    Ok(Json(row))
}

/// DELETE /api/<kind>/:id
pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    user: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = record_id(path)?;
    if !state.store.delete(R::TABLE, user.id, id).await? {
        return Err(not_found::<R>());
    }
    info!("Deleted {} {id} for user {}", R::TABLE.as_str(), user.id);
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────
// Entity-specific actions
// ────────────────────────────────────────────

/// PATCH /api/applications/:id/status
pub async fn update_application_status(
    State(state): State<AppState>,
    user: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<StatusChange>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let id = record_id(path)?;
    let change = json_body(body)?;
    let status = ApplicationStatus::from_label(change.status.trim())
        .ok_or_else(|| AppError::Validation(format!("Unknown status '{}'", change.status)))?;

    let mut changes = Record::new();
    changes.insert("status".to_string(), json!(status.as_str()));
    stamp(&mut changes, WriteMode::Update, Utc::now());

    let row = state
        .store
        .update(Table::Applications, user.id, id, changes)
        .await?
        .ok_or_else(not_found::<Applications>)?;
    Ok(Json(row))
}

/// PATCH /api/surveys/:id/status
pub async fn update_survey_status(
    State(state): State<AppState>,
    user: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<StatusChange>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let id = record_id(path)?;
    let change = json_body(body)?;
    let status = SurveyStatus::from_label(change.status.trim())
        .ok_or_else(|| AppError::Validation(format!("Unknown status '{}'", change.status)))?;

    let now = Utc::now();
    let mut changes = Record::new();
    changes.insert("status".to_string(), json!(status.as_str()));
    if status == SurveyStatus::Completed {
        changes.insert("completed_date".to_string(), json!(now));
    }
    stamp(&mut changes, WriteMode::Update, now);

    let row = state
        .store
        .update(Table::Surveys, user.id, id, changes)
        .await?
        .ok_or_else(not_found::<Surveys>)?;
    Ok(Json(row))
}

/// POST /api/resumes/:id/default
pub async fn set_default_resume(
    State(state): State<AppState>,
    user: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let id = record_id(path)?;
    if !state.store.set_default_resume(user.id, id).await? {
        return Err(not_found::<Resumes>());
    }
    let row = state
        .store
        .get(Table::Resumes, user.id, id)
        .await?
        .ok_or_else(not_found::<Resumes>)?;
    Ok(Json(row))
}

/// GET /api/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let (applications, interviews, events, surveys, resumes) = tokio::try_join!(
        load::<Applications>(&state, user.id),
        load::<Interviews>(&state, user.id),
        load::<Events>(&state, user.id),
        load::<Surveys>(&state, user.id),
        load::<Resumes>(&state, user.id),
    )?;
    let now = Utc::now();

    Ok(Json(DashboardResponse {
        applications: Applications::stats(&applications, now),
        interviews: Interviews::stats(&interviews, now),
        events: Events::stats(&events, now),
        surveys: Surveys::stats(&surveys, now),
        resumes: Resumes::stats(&resumes, now),
        recent_applications: applications.into_iter().take(5).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};

    use super::UNKNOWN_PARENT;
    use crate::store::Table;
    use crate::test_support::{test_app, TestApp, OTHER_TOKEN, TOKEN};

    async fn create(app: &TestApp, uri: &str, body: Value) -> Value {
        let (status, row) = app.send(Method::POST, uri, Some(TOKEN), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{row}");
        row
    }

    fn id_of(row: &Value) -> String {
        row["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_interview_search_and_status_filter() {
        let app = test_app();
        create(
            &app,
            "/api/interviews",
            json!({
                "company": "Google",
                "position": "SRE",
                "interview_date": "2026-10-01T10:00",
                "status": "Completed",
                "rating": "4"
            }),
        )
        .await;
        let scheduled = create(
            &app,
            "/api/interviews",
            json!({
                "company": "Google",
                "position": "SWE",
                "interview_date": "2026-11-02T15:30",
                "status": "Scheduled"
            }),
        )
        .await;

        let (status, body) = app
            .send(
                Method::GET,
                "/api/interviews?search=goog&status=Scheduled",
                Some(TOKEN),
                None,
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["shown"], 1);
        assert_eq!(body["items"][0]["id"], scheduled["id"]);
        let scheduled_count = body["status_counts"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["value"] == "Scheduled")
            .unwrap();
        assert_eq!(scheduled_count["count"], 1);
        assert_eq!(body["stats"]["completed"], 1);
        assert_eq!(body["stats"]["avg_rating"], 4.0);
    }

    #[tokio::test]
    async fn test_interview_missing_required_fields() {
        let app = test_app();

        let (status, body) = app
            .send(
                Method::POST,
                "/api/interviews",
                Some(TOKEN),
                Some(json!({ "company": "Google" })),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Company, Position, and Interview Date are required");
        assert_eq!(app.store.insert_count(), 0);
    }

    #[tokio::test]
    async fn test_list_sorts_by_requested_field() {
        let app = test_app();
        for company in ["beta", "Alpha", "gamma"] {
            create(&app, "/api/applications", json!({ "company": company, "position": "Dev" }))
                .await;
        }

        let (_, body) = app
            .send(
                Method::GET,
                "/api/applications?sort=company&order=asc",
                Some(TOKEN),
                None,
            )
            .await;

        let companies: Vec<&str> = body["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["company"].as_str().unwrap())
            .collect();
        assert_eq!(companies, vec!["Alpha", "beta", "gamma"]);
        assert!(body["filter_counts"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_default_leaves_single_default() {
        let app = test_app();
        let a = create(
            &app,
            "/api/resumes",
            json!({ "title": "Resume A", "is_default": true }),
        )
        .await;
        let b = create(&app, "/api/resumes", json!({ "title": "Resume B" })).await;
        assert_eq!(a["is_default"], true);
        assert_eq!(b["is_default"], false);

        let (status, row) = app
            .send(
                Method::POST,
                &format!("/api/resumes/{}/default", id_of(&b)),
                Some(TOKEN),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(row["is_default"], true);

        let (_, a_now) = app
            .send(Method::GET, &format!("/api/resumes/{}", id_of(&a)), Some(TOKEN), None)
            .await;
        assert_eq!(a_now["record"]["is_default"], false);

        let defaults = app
            .store
            .rows(Table::Resumes)
            .into_iter()
            .filter(|row| row["is_default"] == true)
            .count();
        assert_eq!(defaults, 1);
    }

    #[tokio::test]
    async fn test_creating_a_default_resume_clears_the_old_one() {
        let app = test_app();
        create(&app, "/api/resumes", json!({ "title": "Old", "is_default": true })).await;
        let new = create(
            &app,
            "/api/resumes",
            json!({ "title": "New", "is_default": "true", "tags": " rust,  backend ,," }),
        )
        .await;

        assert_eq!(new["is_default"], true);
        assert_eq!(new["tags"], "rust, backend");
        let (_, body) = app.send(Method::GET, "/api/resumes", Some(TOKEN), None).await;
        assert_eq!(body["stats"]["defaults"], 1);
        assert!(body["status_counts"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_default_for_unknown_resume_is_404() {
        let app = test_app();

        let (status, body) = app
            .send(
                Method::POST,
                &format!("/api/resumes/{}/default", uuid::Uuid::new_v4()),
                Some(TOKEN),
                None,
            )
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Resume not found");
    }

    #[tokio::test]
    async fn test_survey_copies_company_from_linked_application() {
        let app = test_app();
        let parent = create(
            &app,
            "/api/applications",
            json!({ "company": "Stripe", "position": "Platform Engineer" }),
        )
        .await;

        let survey = create(
            &app,
            "/api/surveys",
            json!({
                "application_id": id_of(&parent),
                "company": "typed by hand",
                "survey_type": "Candidate Experience"
            }),
        )
        .await;

        assert_eq!(survey["company"], "Stripe");
        assert_eq!(survey["position"], "Platform Engineer");
        assert_eq!(survey["status"], "Pending");
        assert_eq!(survey["priority"], "Medium");
    }

    #[tokio::test]
    async fn test_get_returns_record_and_form() {
        let app = test_app();
        let event = create(
            &app,
            "/api/events",
            json!({ "title": "Rust meetup", "event_date": "2026-11-20T18:30" }),
        )
        .await;

        let (status, body) = app
            .send(Method::GET, &format!("/api/events/{}", id_of(&event)), Some(TOKEN), None)
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["record"]["event_type"], "Career Fair");
        assert_eq!(body["form"]["event_date"], "2026-11-20T18:30");
        assert_eq!(body["form"]["status"], "Upcoming");
    }

    #[tokio::test]
    async fn test_records_are_scoped_to_their_owner() {
        let app = test_app();
        let row = create(&app, "/api/applications", json!({ "company": "Acme" })).await;
        let uri = format!("/api/applications/{}", id_of(&row));

        let (status, _) = app.send(Method::GET, &uri, Some(OTHER_TOKEN), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .send(Method::PUT, &uri, Some(OTHER_TOKEN), Some(json!({ "company": "Evil" })))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app.send(Method::DELETE, &uri, Some(OTHER_TOKEN), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, list) = app
            .send(Method::GET, "/api/applications", Some(OTHER_TOKEN), None)
            .await;
        assert_eq!(list["total"], 0);
        assert_eq!(app.other.email.as_deref(), Some("bob@example.com"));
    }

    #[tokio::test]
    async fn test_update_then_delete() {
        let app = test_app();
        let row = create(
            &app,
            "/api/applications",
            json!({ "company": "Acme", "position": "Dev", "location": "Berlin" }),
        )
        .await;
        let uri = format!("/api/applications/{}", id_of(&row));

        let (status, updated) = app
            .send(
                Method::PUT,
                &uri,
                Some(TOKEN),
                Some(json!({ "company": "Acme", "position": "Senior Dev", "status": "Shortlisted" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["position"], "Senior Dev");
        assert_eq!(updated["status"], "Shortlisted");
        assert_eq!(updated["location"], "Berlin");
        assert_eq!(updated["created_at"], row["created_at"]);

        let (status, body) = app.send(Method::DELETE, &uri, Some(TOKEN), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = app.send(Method::DELETE, &uri, Some(TOKEN), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_stored_values() {
        let app = test_app();
        let row = create(
            &app,
            "/api/applications",
            json!({
                "company": "Acme",
                "position": "Dev",
                "applied_date": "2024-01-15",
                "status": "Shortlisted"
            }),
        )
        .await;

        let (status, updated) = app
            .send(
                Method::PUT,
                &format!("/api/applications/{}", id_of(&row)),
                Some(TOKEN),
                Some(json!({ "company": "Acme", "position": "Senior Dev", "status": "" })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["position"], "Senior Dev");
        assert_eq!(updated["applied_date"], "2024-01-15");
        assert_eq!(updated["status"], "Shortlisted");
    }

    #[tokio::test]
    async fn test_interview_update_keeps_non_default_fields() {
        let app = test_app();
        let interview = create(
            &app,
            "/api/interviews",
            json!({
                "company": "Google",
                "position": "SRE",
                "interview_date": "2026-11-02T15:30",
                "interview_type": "Technical Interview",
                "duration_minutes": 90,
                "round_number": "3"
            }),
        )
        .await;

        let (status, updated) = app
            .send(
                Method::PUT,
                &format!("/api/interviews/{}", id_of(&interview)),
                Some(TOKEN),
                Some(json!({ "status": "Completed", "rating": "5" })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "{updated}");
        assert_eq!(updated["status"], "Completed");
        assert_eq!(updated["rating"], 5);
        assert_eq!(updated["interview_type"], "Technical Interview");
        assert_eq!(updated["duration_minutes"], 90);
        assert_eq!(updated["round_number"], 3);
    }

    #[tokio::test]
    async fn test_update_body_must_be_an_object() {
        let app = test_app();
        let row = create(&app, "/api/applications", json!({ "company": "Acme" })).await;

        let (status, _) = app
            .send(
                Method::PUT,
                &format!("/api/applications/{}", id_of(&row)),
                Some(TOKEN),
                Some(json!(["company", "Acme"])),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_link_to_unknown_application_is_rejected() {
        let app = test_app();

        let (status, body) = app
            .send(
                Method::POST,
                "/api/surveys",
                Some(TOKEN),
                Some(json!({
                    "application_id": uuid::Uuid::new_v4().to_string(),
                    "company": "Acme",
                    "survey_type": "Other"
                })),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], UNKNOWN_PARENT);
        assert_eq!(app.store.insert_count(), 0);
    }

    #[tokio::test]
    async fn test_link_to_another_users_application_is_rejected() {
        let app = test_app();
        let (_, foreign) = app
            .send(
                Method::POST,
                "/api/applications",
                Some(OTHER_TOKEN),
                Some(json!({ "company": "Bob's pick" })),
            )
            .await;

        let (status, body) = app
            .send(
                Method::POST,
                "/api/events",
                Some(TOKEN),
                Some(json!({
                    "application_id": id_of(&foreign),
                    "title": "Onsite",
                    "event_date": "2026-11-20T09:00"
                })),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], UNKNOWN_PARENT);
        assert!(app.store.rows(Table::Events).is_empty());
    }

    #[tokio::test]
    async fn test_orphaned_child_can_still_be_edited() {
        let app = test_app();
        let parent = create(
            &app,
            "/api/applications",
            json!({ "company": "Stripe", "position": "Platform Engineer" }),
        )
        .await;
        let interview = create(
            &app,
            "/api/interviews",
            json!({
                "application_id": id_of(&parent),
                "interview_date": "2026-11-02T15:30"
            }),
        )
        .await;
        assert_eq!(interview["company"], "Stripe");

        let (status, _) = app
            .send(
                Method::DELETE,
                &format!("/api/applications/{}", id_of(&parent)),
                Some(TOKEN),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, updated) = app
            .send(
                Method::PUT,
                &format!("/api/interviews/{}", id_of(&interview)),
                Some(TOKEN),
                Some(json!({ "preparation_notes": "Review system design" })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "{updated}");
        assert_eq!(updated["application_id"], parent["id"]);
        assert_eq!(updated["company"], "Stripe");
        assert_eq!(updated["preparation_notes"], "Review system design");
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let app = test_app();

        let (status, body) = app
            .send(Method::GET, "/api/interviews/not-a-uuid", Some(TOKEN), None)
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_application_status_patch() {
        let app = test_app();
        let row = create(&app, "/api/applications", json!({ "company": "Acme" })).await;
        let uri = format!("/api/applications/{}/status", id_of(&row));

        let (status, updated) = app
            .send(Method::PATCH, &uri, Some(TOKEN), Some(json!({ "status": "Offer Received" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "Offer Received");

        let (status, _) = app
            .send(Method::PATCH, &uri, Some(TOKEN), Some(json!({ "status": "Ghosted" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_completing_a_survey_stamps_completed_date() {
        let app = test_app();
        let survey = create(
            &app,
            "/api/surveys",
            json!({ "company": "Acme", "survey_type": "Other" }),
        )
        .await;
        assert!(survey.get("completed_date").is_none());

        let (status, updated) = app
            .send(
                Method::PATCH,
                &format!("/api/surveys/{}/status", id_of(&survey)),
                Some(TOKEN),
                Some(json!({ "status": "Completed" })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "Completed");
        assert!(updated["completed_date"].is_string());
    }

    #[tokio::test]
    async fn test_dashboard_aggregates_every_kind() {
        let app = test_app();
        create(&app, "/api/applications", json!({ "company": "A", "status": "Offer Received" })).await;
        create(&app, "/api/applications", json!({ "company": "B", "status": "Shortlisted" })).await;
        create(&app, "/api/resumes", json!({ "title": "General" })).await;

        let (status, body) = app.send(Method::GET, "/api/dashboard", Some(TOKEN), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applications"]["total"], 2);
        assert_eq!(body["applications"]["offers"], 1);
        assert_eq!(body["applications"]["shortlisted"], 1);
        assert_eq!(body["resumes"]["total"], 1);
        assert_eq!(body["resumes"]["recent"], 1);
        assert_eq!(body["interviews"]["upcoming"], 0);
        assert_eq!(body["recent_applications"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_requires_token() {
        let app = test_app();

        let (status, _) = app.send(Method::GET, "/api/surveys", None, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
