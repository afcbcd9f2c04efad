pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::errors::panic_response;
use crate::extension::handlers as extension;
use crate::files::{handlers as files, MAX_UPLOAD_BYTES};
use crate::records::handlers::{self as records, create, delete, get_one, list, update};
use crate::records::{Applications, Events, Interviews, Resumes, Surveys};
use crate::state::AppState;

/// Multipart framing on top of the largest accepted file.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Browser extension
        .route(
            "/api/applications/from-extension",
            post(extension::save_from_extension)
                .options(extension::preflight)
                .fallback(extension::method_not_allowed),
        )
        .route(
            "/api/test-connection",
            get(extension::test_connection)
                .options(extension::preflight)
                .fallback(extension::method_not_allowed),
        )
        .route("/api/dashboard", get(records::dashboard))
        // Applications
        .route(
            "/api/applications",
            get(list::<Applications>).post(create::<Applications>),
        )
        .route(
            "/api/applications/:id",
            get(get_one::<Applications>)
                .put(update::<Applications>)
                .delete(delete::<Applications>),
        )
        .route(
            "/api/applications/:id/status",
            patch(records::update_application_status),
        )
        // Interviews
        .route(
            "/api/interviews",
            get(list::<Interviews>).post(create::<Interviews>),
        )
        .route(
            "/api/interviews/:id",
            get(get_one::<Interviews>)
                .put(update::<Interviews>)
                .delete(delete::<Interviews>),
        )
        // Events
        .route("/api/events", get(list::<Events>).post(create::<Events>))
        .route(
            "/api/events/:id",
            get(get_one::<Events>)
                .put(update::<Events>)
                .delete(delete::<Events>),
        )
        // Surveys
        .route("/api/surveys", get(list::<Surveys>).post(create::<Surveys>))
        .route(
            "/api/surveys/:id",
            get(get_one::<Surveys>)
                .put(update::<Surveys>)
                .delete(delete::<Surveys>),
        )
        .route(
            "/api/surveys/:id/status",
            patch(records::update_survey_status),
        )
        // Resumes
        .route("/api/resumes", get(list::<Resumes>).post(create::<Resumes>))
        .route(
            "/api/resumes/upload",
            post(files::upload_resume_file).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/api/resumes/:id",
            get(get_one::<Resumes>)
                .put(update::<Resumes>)
                .delete(delete::<Resumes>),
        )
        .route(
            "/api/resumes/:id/default",
            post(records::set_default_resume),
        )
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
}
