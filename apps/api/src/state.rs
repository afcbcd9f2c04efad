use std::sync::Arc;

use crate::files::FileStore;
use crate::identity::IdentityProvider;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Per-user rows for every tracked entity. Production: `PgStore`.
    pub store: Arc<dyn RecordStore>,
    /// Resolves bearer tokens to users.
    pub identity: Arc<dyn IdentityProvider>,
    pub files: Arc<dyn FileStore>,
}
