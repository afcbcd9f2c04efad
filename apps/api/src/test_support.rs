//! In-process doubles and request helpers for router tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::files::{FileError, FileStore, ResumeFormat};
use crate::identity::{Identity, IdentityError, IdentityProvider};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::memory::MemoryStore;

pub const TOKEN: &str = "token-alice";
pub const OTHER_TOKEN: &str = "token-bob";
pub const FILES_PREFIX: &str = "http://files.test/resumes/";

/// Fixed token table.
pub struct StaticIdentity {
    users: HashMap<String, Identity>,
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn get_user(&self, token: &str) -> Result<Option<Identity>, IdentityError> {
        Ok(self.users.get(token).cloned())
    }
}

/// Records puts and deletes instead of talking to a bucket.
#[derive(Default)]
pub struct MemoryFiles {
    pub stored: Mutex<Vec<(String, ResumeFormat, usize)>>,
    pub deleted: Mutex<Vec<String>>,
}

#[async_trait]
impl FileStore for MemoryFiles {
    async fn put(&self, key: &str, format: ResumeFormat, body: Bytes) -> Result<String, FileError> {
        self.stored
            .lock()
            .unwrap()
            .push((key.to_string(), format, body.len()));
        Ok(format!("{FILES_PREFIX}{key}"))
    }

    async fn delete_url(&self, url: &str) -> Result<bool, FileError> {
        if !url.starts_with(FILES_PREFIX) {
            return Ok(false);
        }
        self.deleted.lock().unwrap().push(url.to_string());
        Ok(true)
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub files: Arc<MemoryFiles>,
    pub user: Identity,
    pub other: Identity,
}

pub fn test_app() -> TestApp {
    let user = Identity {
        id: Uuid::new_v4(),
        email: Some("alice@example.com".to_string()),
    };
    let other = Identity {
        id: Uuid::new_v4(),
        email: Some("bob@example.com".to_string()),
    };
    let users = HashMap::from([
        (TOKEN.to_string(), user.clone()),
        (OTHER_TOKEN.to_string(), other.clone()),
    ]);

    let store = Arc::new(MemoryStore::new());
    let files = Arc::new(MemoryFiles::default());
    let state = AppState {
        store: store.clone(),
        identity: Arc::new(StaticIdentity { users }),
        files: files.clone(),
    };

    TestApp {
        router: build_router(state),
        store,
        files,
        user,
        other,
    }
}

impl TestApp {
    /// Sends one request and returns the status and JSON body (`Null` when empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        self.dispatch(request).await
    }

    pub async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }
}

/// A multipart body with the given `(name, content_type, bytes)` parts.
pub fn multipart_request(
    uri: &str,
    token: &str,
    parts: &[(&str, Option<&str>, &[u8])],
) -> Request<Body> {
    const BOUNDARY: &str = "applytrack-test-boundary";
    let mut body = Vec::new();
    for (name, content_type, bytes) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match content_type {
            Some(content_type) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"upload\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
            }
        }
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
