//! Editable session for a single post.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use uuid::Uuid;

use quill_core::domain::{Post, PostStatus};

use crate::credential::Credential;
use crate::error::SessionError;
use crate::gateway::{DraftPayload, PostGateway, PostSnapshot};
use crate::session::debounce::Debouncer;
use crate::session::state::SessionPhase;

/// Quiet period after the last edit before a draft is auto-saved.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_secs(5);

/// Tunables for an editing session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub autosave_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
        }
    }
}

/// An editing session for one post.
///
/// The session holds the post's editable state in memory and keeps it
/// synchronized with the post store: edits arm a debounce timer, the timer
/// fires an auto-save, and the identifier returned by the first successful
/// save is adopted for every later request in the session. At most one save
/// request is in flight at any time; edits arriving while one is are
/// captured and flushed once it settles, so repeated auto-saves can never
/// create duplicate posts or race each other.
///
/// Two sessions editing the same post are not coordinated; the store
/// applies last-write-wins.
pub struct EditSession<G: PostGateway + 'static> {
    shared: Arc<Shared<G>>,
}

impl<G: PostGateway + 'static> std::fmt::Debug for EditSession<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession").finish_non_exhaustive()
    }
}

struct Shared<G> {
    gateway: Arc<G>,
    credential: Credential,
    autosave_delay: Duration,
    inner: Mutex<Inner>,
    timer: Mutex<Debouncer>,
    settled: Notify,
}

struct Inner {
    phase: SessionPhase,
    draft: DraftPayload,
    /// Edits arrived while a save was in flight; flush after it settles.
    dirty_while_saving: bool,
    /// Cleared by teardown. A save settling afterwards is discarded.
    live: bool,
    last_error: Option<String>,
}

impl<G: PostGateway + 'static> EditSession<G> {
    /// Start a session for a brand new post. Creating posts requires an
    /// authenticated caller, so a credential is required to construct the
    /// session at all.
    pub fn open_new(gateway: Arc<G>, credential: Credential, config: SessionConfig) -> Self {
        Self::from_parts(
            gateway,
            credential,
            config,
            DraftPayload::default(),
            SessionPhase::NewUnsaved,
        )
    }

    /// Start a session for an existing post owned by the caller.
    ///
    /// Fails with [`SessionError::NotFound`] when the identifier does not
    /// resolve and with [`SessionError::Authorization`] when the post
    /// belongs to someone else.
    pub async fn open_existing(
        gateway: Arc<G>,
        credential: Credential,
        id: Uuid,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let snapshot = gateway.get_by_id(Some(&credential), id).await?;
        if snapshot.owner_id != credential.user_id() {
            return Err(SessionError::Authorization(
                "Only the author may edit this post".to_string(),
            ));
        }

        let phase = match snapshot.status {
            PostStatus::Published => SessionPhase::Published,
            PostStatus::Draft => SessionPhase::DraftSaved,
        };
        let draft = DraftPayload {
            id: Some(snapshot.id),
            title: snapshot.title,
            content: snapshot.content,
            tags: snapshot.tags,
        };
        Ok(Self::from_parts(gateway, credential, config, draft, phase))
    }

    fn from_parts(
        gateway: Arc<G>,
        credential: Credential,
        config: SessionConfig,
        draft: DraftPayload,
        phase: SessionPhase,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                gateway,
                credential,
                autosave_delay: config.autosave_delay,
                inner: Mutex::new(Inner {
                    phase,
                    draft,
                    dirty_while_saving: false,
                    live: true,
                    last_error: None,
                }),
                timer: Mutex::new(Debouncer::new()),
                settled: Notify::new(),
            }),
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.shared.inner.lock().phase
    }

    /// Identifier adopted from the store, if any.
    pub fn post_id(&self) -> Option<Uuid> {
        self.shared.inner.lock().draft.id
    }

    /// Copy of the current in-memory draft.
    pub fn draft(&self) -> DraftPayload {
        self.shared.inner.lock().draft.clone()
    }

    /// Message of the last failed save, cleared by the next success.
    pub fn last_error(&self) -> Option<String> {
        self.shared.inner.lock().last_error.clone()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.apply_edit(move |draft| draft.title = title);
    }

    pub fn set_content(&self, content: impl Into<String>) {
        let content = content.into();
        self.apply_edit(move |draft| draft.content = content);
    }

    pub fn set_tags(&self, tags: Vec<String>) {
        let tags = Post::normalize_tags(tags);
        self.apply_edit(move |draft| draft.tags = tags);
    }

    /// Record an edit and (re)arm the auto-save timer. While a save is in
    /// flight the edit is captured and its flush deferred until the save
    /// settles.
    fn apply_edit(&self, apply: impl FnOnce(&mut DraftPayload)) {
        let mut inner = self.shared.inner.lock();
        if !inner.live {
            return;
        }
        apply(&mut inner.draft);
        if inner.phase.is_saving() {
            inner.dirty_while_saving = true;
            return;
        }
        drop(inner);
        Shared::arm_autosave(&self.shared);
    }

    /// Explicitly persist the current draft.
    ///
    /// Returns `Ok(None)` without touching the store when both title and
    /// content are empty. Waits for any in-flight save to settle first, so
    /// saves never overlap.
    pub async fn save_draft(&self) -> Result<Option<PostSnapshot>, SessionError> {
        self.shared.timer.lock().cancel();
        self.shared.wait_until_settled().await;
        // a settle above may have re-armed for captured edits; this save
        // flushes them itself
        self.shared.timer.lock().cancel();

        let payload = {
            let mut inner = self.shared.inner.lock();
            if !inner.live || inner.draft.is_empty() {
                return Ok(None);
            }
            inner.phase = SessionPhase::Saving;
            inner.draft.clone()
        };

        tracing::debug!(post_id = ?payload.id, "Saving draft");
        let result = self
            .shared
            .gateway
            .create_or_update_draft(&self.shared.credential, &payload)
            .await;
        Shared::settle(&self.shared, result).map(Some)
    }

    /// Publish the post.
    ///
    /// Requires a non-empty title and content; violations are rejected
    /// locally without a store call. On success the session transitions to
    /// `Published` and the canonical snapshot is returned for navigation to
    /// the read view. On failure the stored post keeps its previous state.
    pub async fn publish(&self) -> Result<PostSnapshot, SessionError> {
        {
            let inner = self.shared.inner.lock();
            if inner.draft.title.trim().is_empty() || inner.draft.content.trim().is_empty() {
                return Err(SessionError::Validation(
                    "Title and content are required to publish".to_string(),
                ));
            }
        }

        self.shared.timer.lock().cancel();
        self.shared.wait_until_settled().await;
        self.shared.timer.lock().cancel();

        let payload = {
            let mut inner = self.shared.inner.lock();
            inner.phase = SessionPhase::Saving;
            inner.draft.clone()
        };

        tracing::debug!(post_id = ?payload.id, "Publishing");
        let result = self
            .shared
            .gateway
            .publish(&self.shared.credential, &payload)
            .await;
        Shared::settle(&self.shared, result)
    }

    /// End the session: cancel any pending auto-save and discard the result
    /// of a save still in flight. Safe to call more than once; also runs on
    /// drop.
    pub fn teardown(&self) {
        self.shared.timer.lock().cancel();
        self.shared.inner.lock().live = false;
        self.shared.settled.notify_waiters();
    }
}

impl<G: PostGateway + 'static> Drop for EditSession<G> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<G: PostGateway + 'static> Shared<G> {
    /// Arm (or re-arm) the debounced auto-save. The timer task holds only a
    /// weak reference, so a dropped session cannot be revived by its own
    /// timer.
    fn arm_autosave(this: &Arc<Self>) {
        let weak = Arc::downgrade(this);
        let delay = this.autosave_delay;
        this.timer.lock().arm(delay, async move {
            if let Some(shared) = weak.upgrade() {
                Shared::autosave(shared).await;
            }
        });
    }

    /// Debounced save: skipped for empty drafts, coalesced with any save
    /// already in flight.
    async fn autosave(this: Arc<Self>) {
        let payload = {
            let mut inner = this.inner.lock();
            if !inner.live {
                return;
            }
            if inner.phase.is_saving() {
                // the settle path re-arms for edits captured meanwhile
                inner.dirty_while_saving = true;
                return;
            }
            if inner.draft.is_empty() {
                return;
            }
            inner.phase = SessionPhase::Saving;
            inner.draft.clone()
        };

        tracing::debug!(post_id = ?payload.id, "Auto-saving draft");
        let result = this
            .gateway
            .create_or_update_draft(&this.credential, &payload)
            .await;
        if let Err(error) = Shared::settle(&this, result) {
            tracing::warn!(%error, "Auto-save failed; edits kept for retry");
        }
    }

    /// Apply the outcome of a settled save and wake anything waiting on it.
    fn settle(
        this: &Arc<Self>,
        result: Result<PostSnapshot, SessionError>,
    ) -> Result<PostSnapshot, SessionError> {
        let rearm = {
            let mut inner = this.inner.lock();
            if !inner.live {
                // The session ended while the request was in flight; the
                // result must not touch the now-gone state.
                this.settled.notify_waiters();
                return result;
            }

            match &result {
                Ok(snapshot) => {
                    match inner.draft.id {
                        None => inner.draft.id = Some(snapshot.id),
                        Some(adopted) if adopted != snapshot.id => {
                            tracing::warn!(
                                %adopted,
                                returned = %snapshot.id,
                                "Store returned a different identifier; keeping the adopted one"
                            );
                        }
                        Some(_) => {}
                    }
                    inner.phase = match snapshot.status {
                        PostStatus::Published => SessionPhase::Published,
                        PostStatus::Draft => SessionPhase::DraftSaved,
                    };
                    inner.last_error = None;
                }
                Err(error) => {
                    inner.phase = SessionPhase::Error;
                    inner.last_error = Some(error.to_string());
                }
            }
            std::mem::take(&mut inner.dirty_while_saving)
        };

        this.settled.notify_waiters();
        if rearm {
            Shared::arm_autosave(this);
        }
        result
    }

    /// Wait until no save is in flight. Also returns once the session is
    /// torn down.
    async fn wait_until_settled(&self) {
        loop {
            let notified = self.settled.notified();
            {
                let inner = self.inner.lock();
                if !inner.live || !inner.phase.is_saving() {
                    return;
                }
            }
            notified.await;
        }
    }
}
