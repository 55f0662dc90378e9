//! Lifecycle properties of edit and view sessions, driven against a
//! recording mock gateway on a paused-time runtime.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tokio::time;
use uuid::Uuid;

use quill_core::domain::PostStatus;
use quill_editor::{
    Credential, DraftPayload, EditSession, PostGateway, PostQuery, PostSnapshot, SessionConfig,
    SessionError, SessionPhase, ViewSession,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    SaveDraft(DraftPayload),
    Publish(DraftPayload),
    Get(Uuid),
    List,
    Delete(Uuid),
}

#[derive(Default)]
struct MockState {
    calls: Vec<Call>,
    fail_next_saves: usize,
    posts: HashMap<Uuid, PostSnapshot>,
}

/// Recording post gateway. `save_delay` holds save/publish requests in
/// flight for the given virtual duration.
struct MockGateway {
    state: Mutex<MockState>,
    save_delay: Duration,
}

impl MockGateway {
    fn new() -> Self {
        Self::with_save_delay(Duration::ZERO)
    }

    fn with_save_delay(save_delay: Duration) -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            save_delay,
        }
    }

    fn fail_next_save(&self) {
        self.state.lock().fail_next_saves += 1;
    }

    fn seed(&self, snapshot: PostSnapshot) {
        self.state.lock().posts.insert(snapshot.id, snapshot);
    }

    fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    fn save_calls(&self) -> Vec<DraftPayload> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::SaveDraft(payload) => Some(payload.clone()),
                _ => None,
            })
            .collect()
    }

    fn publish_calls(&self) -> Vec<DraftPayload> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Publish(payload) => Some(payload.clone()),
                _ => None,
            })
            .collect()
    }

    fn snapshot_for(owner_id: Uuid, draft: &DraftPayload, status: PostStatus) -> PostSnapshot {
        let now = Utc::now();
        PostSnapshot {
            id: draft.id.unwrap_or_else(Uuid::new_v4),
            owner_id,
            author_username: None,
            title: draft.title.clone(),
            content: draft.content.clone(),
            tags: draft.tags.clone(),
            status,
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait]
impl PostGateway for MockGateway {
    async fn create_or_update_draft(
        &self,
        credential: &Credential,
        draft: &DraftPayload,
    ) -> Result<PostSnapshot, SessionError> {
        self.state.lock().calls.push(Call::SaveDraft(draft.clone()));
        if !self.save_delay.is_zero() {
            time::sleep(self.save_delay).await;
        }

        let mut state = self.state.lock();
        if state.fail_next_saves > 0 {
            state.fail_next_saves -= 1;
            return Err(SessionError::Transient("connection reset".to_string()));
        }

        // updates keep the stored status; new posts start as drafts
        let status = draft
            .id
            .and_then(|id| state.posts.get(&id))
            .map(|post| post.status)
            .unwrap_or(PostStatus::Draft);
        let snapshot = Self::snapshot_for(credential.user_id(), draft, status);
        state.posts.insert(snapshot.id, snapshot.clone());
        Ok(snapshot)
    }

    async fn publish(
        &self,
        credential: &Credential,
        draft: &DraftPayload,
    ) -> Result<PostSnapshot, SessionError> {
        self.state.lock().calls.push(Call::Publish(draft.clone()));
        if !self.save_delay.is_zero() {
            time::sleep(self.save_delay).await;
        }

        let mut state = self.state.lock();
        if state.fail_next_saves > 0 {
            state.fail_next_saves -= 1;
            return Err(SessionError::Transient("connection reset".to_string()));
        }

        let snapshot = Self::snapshot_for(credential.user_id(), draft, PostStatus::Published);
        state.posts.insert(snapshot.id, snapshot.clone());
        Ok(snapshot)
    }

    async fn get_by_id(
        &self,
        _credential: Option<&Credential>,
        id: Uuid,
    ) -> Result<PostSnapshot, SessionError> {
        let mut state = self.state.lock();
        state.calls.push(Call::Get(id));
        state.posts.get(&id).cloned().ok_or(SessionError::NotFound)
    }

    async fn list(
        &self,
        _credential: Option<&Credential>,
        _query: PostQuery,
    ) -> Result<Vec<PostSnapshot>, SessionError> {
        let mut state = self.state.lock();
        state.calls.push(Call::List);
        Ok(state.posts.values().cloned().collect())
    }

    async fn delete(&self, _credential: &Credential, id: Uuid) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        state.calls.push(Call::Delete(id));
        state.posts.remove(&id).map(|_| ()).ok_or(SessionError::NotFound)
    }
}

fn credential() -> Credential {
    Credential::new("token-alice", Uuid::new_v4(), "alice")
}

fn seeded_snapshot(owner_id: Uuid, status: PostStatus) -> PostSnapshot {
    let now = Utc::now();
    PostSnapshot {
        id: Uuid::new_v4(),
        owner_id,
        author_username: Some("alice".to_string()),
        title: "Hello".to_string(),
        content: "World".to_string(),
        tags: vec!["rust".to_string()],
        status,
        created_at: now,
        updated_at: now,
    }
}

// P1: however many auto-saves fire, exactly one request omits the id and
// every later one carries the identifier returned by the first.
#[tokio::test(start_paused = true)]
async fn adopts_identifier_from_first_save() {
    let gateway = Arc::new(MockGateway::new());
    let session = EditSession::open_new(gateway.clone(), credential(), SessionConfig::default());

    session.set_title("Hello");
    time::sleep(Duration::from_secs(6)).await;

    session.set_content("World");
    time::sleep(Duration::from_secs(6)).await;

    session.save_draft().await.unwrap();

    let saves = gateway.save_calls();
    assert_eq!(saves.len(), 3);
    assert_eq!(saves[0].id, None);
    assert_eq!(saves[0].title, "Hello");
    assert_eq!(saves[0].content, "");
    assert!(saves[0].tags.is_empty());

    let adopted = session.post_id().expect("identifier adopted");
    assert!(saves[1..].iter().all(|save| save.id == Some(adopted)));
    assert_eq!(saves[1].title, "Hello");
    assert_eq!(saves[1].content, "World");
    assert_eq!(session.phase(), SessionPhase::DraftSaved);
}

// P2: an empty draft never reaches the store, explicitly or debounced.
#[tokio::test(start_paused = true)]
async fn empty_draft_is_never_persisted() {
    let gateway = Arc::new(MockGateway::new());
    let session = EditSession::open_new(gateway.clone(), credential(), SessionConfig::default());

    assert!(session.save_draft().await.unwrap().is_none());
    assert!(session.save_draft().await.unwrap().is_none());

    // tags alone do not make a draft worth saving
    session.set_tags(vec!["rust".to_string()]);
    time::sleep(Duration::from_secs(7)).await;

    assert!(gateway.calls().is_empty());
    assert_eq!(session.phase(), SessionPhase::NewUnsaved);
}

// P3: edits during an in-flight save never dispatch a second request; the
// follow-up save carries the most recent state.
#[tokio::test(start_paused = true)]
async fn saves_never_overlap() {
    let gateway = Arc::new(MockGateway::with_save_delay(Duration::from_secs(10)));
    let session = EditSession::open_new(gateway.clone(), credential(), SessionConfig::default());

    session.set_title("a");
    time::sleep(Duration::from_secs(6)).await;
    assert_eq!(gateway.save_calls().len(), 1);
    assert_eq!(session.phase(), SessionPhase::Saving);

    session.set_content("b");
    session.set_content("bc");
    time::sleep(Duration::from_secs(6)).await;
    assert_eq!(gateway.save_calls().len(), 1);

    // first save settles around t=15s, the captured edits re-arm the
    // debounce, and the follow-up save dispatches and settles after it
    time::sleep(Duration::from_secs(22)).await;

    let saves = gateway.save_calls();
    assert_eq!(saves.len(), 2);
    assert_eq!(saves[1].content, "bc");
    let adopted = session.post_id().unwrap();
    assert_eq!(saves[1].id, Some(adopted));
    assert_eq!(session.phase(), SessionPhase::DraftSaved);
}

// P4: publishing with an empty title or content is rejected locally.
#[tokio::test(start_paused = true)]
async fn publish_requires_title_and_content() {
    let gateway = Arc::new(MockGateway::new());
    let session = EditSession::open_new(gateway.clone(), credential(), SessionConfig::default());

    let err = session.publish().await.unwrap_err();
    assert!(matches!(err, SessionError::Validation(_)));
    assert!(gateway.calls().is_empty());
    assert_eq!(session.phase(), SessionPhase::NewUnsaved);

    session.set_title("Hello");
    let err = session.publish().await.unwrap_err();
    assert!(matches!(err, SessionError::Validation(_)));
    assert!(gateway.publish_calls().is_empty());
}

// P5: teardown before the debounce fires means zero store calls.
#[tokio::test(start_paused = true)]
async fn teardown_cancels_pending_autosave() {
    let gateway = Arc::new(MockGateway::new());
    let session = EditSession::open_new(gateway.clone(), credential(), SessionConfig::default());

    session.set_title("Hello");
    session.teardown();
    time::sleep(Duration::from_secs(7)).await;

    assert!(gateway.calls().is_empty());
}

// Dropping the session behaves like teardown.
#[tokio::test(start_paused = true)]
async fn drop_cancels_pending_autosave() {
    let gateway = Arc::new(MockGateway::new());
    let session = EditSession::open_new(gateway.clone(), credential(), SessionConfig::default());

    session.set_title("Hello");
    drop(session);
    time::sleep(Duration::from_secs(7)).await;

    assert!(gateway.calls().is_empty());
}

// P6: a view session only ever reads.
#[tokio::test(start_paused = true)]
async fn view_session_is_read_only() {
    let gateway = Arc::new(MockGateway::new());
    let snapshot = seeded_snapshot(Uuid::new_v4(), PostStatus::Published);
    gateway.seed(snapshot.clone());

    let view = ViewSession::open(gateway.as_ref(), None, snapshot.id)
        .await
        .unwrap();

    assert_eq!(view.phase(), SessionPhase::ViewOnly);
    assert_eq!(view.snapshot().title, "Hello");
    assert_eq!(gateway.calls(), vec![Call::Get(snapshot.id)]);
}

// Transient save failures keep local edits and retry on the next cycle.
#[tokio::test(start_paused = true)]
async fn failed_autosave_keeps_edits_and_retries() {
    let gateway = Arc::new(MockGateway::new());
    gateway.fail_next_save();
    let session = EditSession::open_new(gateway.clone(), credential(), SessionConfig::default());

    session.set_title("Hello");
    time::sleep(Duration::from_secs(6)).await;

    assert_eq!(session.phase(), SessionPhase::Error);
    assert!(session.last_error().is_some());
    assert_eq!(session.post_id(), None);
    assert_eq!(session.draft().title, "Hello");

    session.set_content("World");
    time::sleep(Duration::from_secs(6)).await;

    assert_eq!(session.phase(), SessionPhase::DraftSaved);
    assert!(session.post_id().is_some());
    assert!(session.last_error().is_none());
    assert_eq!(gateway.save_calls().len(), 2);
}

// Once adopted, the identifier is carried by publish as well.
#[tokio::test(start_paused = true)]
async fn publish_carries_adopted_identifier() {
    let gateway = Arc::new(MockGateway::new());
    let session = EditSession::open_new(gateway.clone(), credential(), SessionConfig::default());

    session.set_title("Hello");
    session.set_content("World");
    time::sleep(Duration::from_secs(6)).await;
    let adopted = session.post_id().expect("identifier adopted by autosave");

    let snapshot = session.publish().await.unwrap();

    assert_eq!(snapshot.id, adopted);
    let publishes = gateway.publish_calls();
    assert_eq!(publishes.len(), 1);
    assert_eq!(publishes[0].id, Some(adopted));
    assert_eq!(session.phase(), SessionPhase::Published);
}

#[tokio::test(start_paused = true)]
async fn open_existing_rejects_non_owner() {
    let gateway = Arc::new(MockGateway::new());
    let foreign = seeded_snapshot(Uuid::new_v4(), PostStatus::Draft);
    gateway.seed(foreign.clone());

    let err = EditSession::open_existing(
        gateway.clone(),
        credential(),
        foreign.id,
        SessionConfig::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, SessionError::Authorization(_)));
}

#[tokio::test(start_paused = true)]
async fn open_existing_unknown_post_is_not_found() {
    let gateway = Arc::new(MockGateway::new());

    let err = EditSession::open_existing(
        gateway.clone(),
        credential(),
        Uuid::new_v4(),
        SessionConfig::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, SessionError::NotFound));
}

// Re-saving a published post keeps it published.
#[tokio::test(start_paused = true)]
async fn republished_post_stays_published() {
    let gateway = Arc::new(MockGateway::new());
    let me = credential();
    let mine = seeded_snapshot(me.user_id(), PostStatus::Published);
    gateway.seed(mine.clone());

    let session = EditSession::open_existing(gateway.clone(), me, mine.id, SessionConfig::default())
        .await
        .unwrap();
    assert_eq!(session.phase(), SessionPhase::Published);

    session.set_content("Updated body");
    time::sleep(Duration::from_secs(6)).await;

    let saves = gateway.save_calls();
    assert_eq!(saves.len(), 1);
    assert_eq!(saves[0].id, Some(mine.id));
    assert_eq!(session.phase(), SessionPhase::Published);
}

// An explicit save waits for the in-flight auto-save to settle and then
// flushes the latest state itself.
#[tokio::test(start_paused = true)]
async fn explicit_save_waits_for_inflight_autosave() {
    let gateway = Arc::new(MockGateway::with_save_delay(Duration::from_secs(10)));
    let session = EditSession::open_new(gateway.clone(), credential(), SessionConfig::default());

    session.set_title("a");
    time::sleep(Duration::from_secs(6)).await;
    assert_eq!(session.phase(), SessionPhase::Saving);

    session.set_content("b");
    let saved = session.save_draft().await.unwrap().expect("draft saved");

    let saves = gateway.save_calls();
    assert_eq!(saves.len(), 2);
    assert_eq!(saves[1].content, "b");
    assert_eq!(saved.content, "b");
    assert_eq!(session.phase(), SessionPhase::DraftSaved);
}

// A save still in flight at teardown completes but its result is discarded.
#[tokio::test(start_paused = true)]
async fn teardown_discards_inflight_result() {
    let gateway = Arc::new(MockGateway::with_save_delay(Duration::from_secs(10)));
    let session = EditSession::open_new(gateway.clone(), credential(), SessionConfig::default());

    session.set_title("Hello");
    time::sleep(Duration::from_secs(6)).await;
    assert_eq!(gateway.save_calls().len(), 1);

    session.teardown();
    time::sleep(Duration::from_secs(20)).await;

    assert_eq!(session.post_id(), None);
    assert_eq!(gateway.save_calls().len(), 1);
}
