//! Bearer-token identity.
//!
//! Tokens are issued by a hosted identity service; we only ask it who a token
//! belongs to. `AppState` holds an `Arc<dyn IdentityProvider>` so tests can
//! swap in a static table of users.

pub mod bearer;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use bearer::AuthUser;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("identity service returned {status}: {body}")]
    Unexpected { status: u16, body: String },
}

/// The owner of a valid token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` for tokens the service rejects.
    async fn get_user(&self, token: &str) -> Result<Option<Identity>, IdentityError>;
}

/// Asks `GET {base}/auth/v1/user` who the token belongs to.
#[derive(Clone)]
pub struct HttpIdentityProvider {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl HttpIdentityProvider {
    pub fn new(base_url: &str, anon_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn get_user(&self, token: &str) -> Result<Option<Identity>, IdentityError> {
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityError::Unexpected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(Some(response.json::<Identity>().await?))
    }
}
