//! Read-only session for a single post.

use uuid::Uuid;

use crate::credential::Credential;
use crate::error::SessionError;
use crate::gateway::{PostGateway, PostSnapshot};
use crate::session::state::SessionPhase;

/// A read-only viewing session.
///
/// Selected explicitly by the caller instead of switching an edit session
/// into a view mode. The type has no mutation methods, so a viewer cannot
/// issue saves, publishes or deletes.
#[derive(Debug, Clone)]
pub struct ViewSession {
    snapshot: PostSnapshot,
}

impl ViewSession {
    /// Fetch the post and open it for viewing. Published posts are readable
    /// by anyone; drafts only resolve for their owner's credential.
    pub async fn open<G: PostGateway>(
        gateway: &G,
        credential: Option<&Credential>,
        id: Uuid,
    ) -> Result<Self, SessionError> {
        let snapshot = gateway.get_by_id(credential, id).await?;
        Ok(Self { snapshot })
    }

    pub fn phase(&self) -> SessionPhase {
        SessionPhase::ViewOnly
    }

    pub fn snapshot(&self) -> &PostSnapshot {
        &self.snapshot
    }
}
