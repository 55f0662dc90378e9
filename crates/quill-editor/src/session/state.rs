//! Session lifecycle phases.

/// The lifecycle phase of a post session.
///
/// A session starts in `NewUnsaved` (fresh post) or `DraftSaved`/`Published`
/// (loaded post) depending on how it was opened; the pre-construction
/// "uninitialized" state has no runtime representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// New post, never persisted; no identifier yet.
    NewUnsaved,
    /// A draft of this post exists in the store.
    DraftSaved,
    /// A save or publish request is in flight.
    Saving,
    /// The post is published. The owner may keep editing and re-saving.
    Published,
    /// Read-only viewing; no save path.
    ViewOnly,
    /// The last save failed. Local edits are retained and retried.
    Error,
}

impl SessionPhase {
    /// True while a request is in flight.
    pub fn is_saving(&self) -> bool {
        matches!(self, SessionPhase::Saving)
    }

    /// True when a new save request may be dispatched.
    pub fn can_start_save(&self) -> bool {
        matches!(
            self,
            SessionPhase::NewUnsaved
                | SessionPhase::DraftSaved
                | SessionPhase::Published
                | SessionPhase::Error
        )
    }

    /// True for sessions without a save path.
    pub fn is_read_only(&self) -> bool {
        matches!(self, SessionPhase::ViewOnly)
    }
}
