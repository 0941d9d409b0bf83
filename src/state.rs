//! Application state management

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::TokenVerifier;
use crate::config::Config;
use crate::notify::ShareMailer;
use crate::storage::ObjectStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    db: SqlitePool,
    object_store: Arc<dyn ObjectStore>,
    verifier: Arc<dyn TokenVerifier>,
    mailer: ShareMailer,
}

impl AppState {
    /// Create a new application state
    pub fn new(
        config: Config,
        db: SqlitePool,
        object_store: Arc<dyn ObjectStore>,
        verifier: Arc<dyn TokenVerifier>,
        mailer: ShareMailer,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                object_store,
                verifier,
                mailer,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    /// Get the object store holding PDF bytes
    pub fn object_store(&self) -> &dyn ObjectStore {
        self.inner.object_store.as_ref()
    }

    /// Get the bearer token verifier
    pub fn verifier(&self) -> &dyn TokenVerifier {
        self.inner.verifier.as_ref()
    }

    /// Get the share invite mailer
    pub fn mailer(&self) -> &ShareMailer {
        &self.inner.mailer
    }
}
