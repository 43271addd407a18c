//! Sessions addressed by id.

use crate::{NarrativeConfig, NarrativeSession, SessionId, SessionSnapshot};
use saga_core::StoryResponse;
use saga_error::{NarrativeError, NarrativeErrorKind, SagaResult};
use saga_interface::SagaDriver;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, instrument};

type SharedSession = Arc<Mutex<NarrativeSession>>;

/// Owns every live session and the driver they share.
///
/// Each session sits behind its own async mutex, held for a whole turn, so
/// two advances on one id run one after the other while different ids never
/// wait on each other.
pub struct SessionRegistry<D: ?Sized> {
    driver: Arc<D>,
    config: NarrativeConfig,
    sessions: RwLock<HashMap<SessionId, SharedSession>>,
}

impl<D> SessionRegistry<D>
where
    D: SagaDriver + ?Sized,
{
    /// Create an empty registry.
    pub fn new(driver: Arc<D>, config: NarrativeConfig) -> Self {
        Self {
            driver,
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// The shared model driver.
    pub fn driver(&self) -> &Arc<D> {
        &self.driver
    }

    /// Settings applied to new sessions.
    pub fn config(&self) -> &NarrativeConfig {
        &self.config
    }

    /// Begin a new story under `id`.
    ///
    /// The new session replaces any previous one for `id` only once its
    /// opening turn succeeds. A rejected theme or a failed model call leaves
    /// the previous story in place.
    #[instrument(skip(self, theme), fields(session = %id))]
    pub async fn start(&self, id: SessionId, theme: &str) -> SagaResult<StoryResponse> {
        let mut session = NarrativeSession::new(id.clone(), self.config);
        let story = session.start(&*self.driver, theme).await?;

        let replaced = self
            .sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)))
            .is_some();
        debug!(replaced, "Registered session");
        Ok(story)
    }

    /// Play the next turn of the story under `id`.
    ///
    /// # Errors
    ///
    /// `SessionNotStarted` when no session is registered for `id`, otherwise
    /// whatever [`NarrativeSession::advance`] reports.
    #[instrument(skip(self, choice), fields(session = %id))]
    pub async fn advance(&self, id: &SessionId, choice: &str) -> SagaResult<StoryResponse> {
        let session = self.lookup(id).await.ok_or_else(|| {
            NarrativeError::new(NarrativeErrorKind::SessionNotStarted(id.to_string()))
        })?;

        let mut session = session.lock().await;
        session.advance(&*self.driver, choice).await
    }

    /// Discard the session under `id`. Returns whether one existed.
    pub async fn reset(&self, id: &SessionId) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        debug!(session = %id, removed, "Reset session");
        removed
    }

    /// Snapshot of the session under `id`.
    ///
    /// Waits for an in-flight turn on that session to finish.
    pub async fn snapshot(&self, id: &SessionId) -> Option<SessionSnapshot> {
        let session = self.lookup(id).await?;
        let snapshot = session.lock().await.snapshot();
        Some(snapshot)
    }

    /// Number of registered sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether no sessions are registered.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    async fn lookup(&self, id: &SessionId) -> Option<SharedSession> {
        self.sessions.read().await.get(id).cloned()
    }
}
