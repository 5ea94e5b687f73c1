//! Session store backed by the key/value repository.

use std::sync::Arc;

use tokio::sync::RwLock;

use super::CredentialVerifier;
use crate::db::Repository;
use crate::errors::AppError;
use crate::models::Session;

/// Storage key holding the serialized session.
pub const SESSION_STORAGE_KEY: &str = "auth_user";

/// Holds the current session and keeps the persisted record in sync.
///
/// Constructed once at startup and shared through application state.
pub struct SessionStore {
    repo: Repository,
    verifier: Arc<dyn CredentialVerifier>,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new(repo: Repository, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            repo,
            verifier,
            current: RwLock::new(None),
        }
    }

    /// Rehydrate the session from storage without re-checking credentials.
    ///
    /// A record that cannot be parsed is removed and treated as logged out.
    pub async fn restore(&self) -> Result<Option<Session>, AppError> {
        let restored = match self.repo.get_item(SESSION_STORAGE_KEY).await? {
            None => None,
            Some(raw) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!("Discarding unreadable session record: {}", e);
                    self.repo.remove_item(SESSION_STORAGE_KEY).await?;
                    None
                }
            },
        };

        if let Some(session) = &restored {
            tracing::info!(username = %session.username, "Restored session");
        }
        *self.current.write().await = restored.clone();
        Ok(restored)
    }

    /// Attempt a login. Returns `false` and leaves state untouched on mismatch.
    pub async fn login(&self, email: &str, password: &str) -> Result<bool, AppError> {
        if !self.verifier.verify(email, password) {
            tracing::info!("Login rejected");
            return Ok(false);
        }

        let session = Session::for_email(email);
        let raw = serde_json::to_string(&session)?;
        self.repo.set_item(SESSION_STORAGE_KEY, &raw).await?;

        tracing::info!(username = %session.username, "Login succeeded");
        *self.current.write().await = Some(session);
        Ok(true)
    }

    /// Clear the session. Storage failures are logged, never reported.
    pub async fn logout(&self) {
        let previous = self.current.write().await.take();

        if let Err(e) = self.repo.remove_item(SESSION_STORAGE_KEY).await {
            tracing::error!("Failed to remove persisted session: {}", e);
        }

        if let Some(session) = previous {
            tracing::info!(username = %session.username, "Logged out");
        }
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }
}
