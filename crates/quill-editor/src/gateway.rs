//! Collaborator contracts consumed by the lifecycle manager.
//!
//! The auth gateway and the post store are remote services; sessions only
//! ever talk to them through these traits, which keeps the lifecycle logic
//! testable against an in-process mock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use quill_core::domain::PostStatus;
use quill_shared::dto::{PostResponse, SavePostRequest, UserResponse};

use crate::credential::Credential;
use crate::error::SessionError;

/// Identity of an authenticated user as reported by the auth gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: Uuid,
    pub username: String,
}

impl From<UserResponse> for UserIdentity {
    fn from(user: UserResponse) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Read-only view of a post, shared by edit and view sessions.
#[derive(Debug, Clone)]
pub struct PostSnapshot {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub author_username: Option<String>,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PostResponse> for PostSnapshot {
    fn from(response: PostResponse) -> Self {
        Self {
            id: response.id,
            owner_id: response.owner_id,
            author_username: response.author_username,
            title: response.title,
            content: response.content,
            tags: response.tags,
            status: PostStatus::parse(&response.status).unwrap_or_default(),
            created_at: response.created_at,
            updated_at: response.updated_at,
        }
    }
}

/// In-memory editable state of one post. `id` stays `None` until the first
/// successful save returns the store-assigned identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftPayload {
    pub id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

impl DraftPayload {
    /// An empty draft is never persisted.
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.content.trim().is_empty()
    }

    pub(crate) fn to_request(&self) -> SavePostRequest {
        SavePostRequest {
            id: self.id,
            title: self.title.clone(),
            content: self.content.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// Filter for the listing service. `None` fields match everything the
/// caller is allowed to see.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostQuery {
    pub status: Option<PostStatus>,
    pub owner_id: Option<Uuid>,
}

/// Auth gateway contract: issues credentials and answers "who is calling".
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<Credential, SessionError>;

    async fn register(&self, username: &str, password: &str) -> Result<(), SessionError>;

    async fn current_user(&self, credential: &Credential) -> Result<UserIdentity, SessionError>;
}

/// Post store and listing service contract.
#[async_trait]
pub trait PostGateway: Send + Sync {
    /// Persist a draft. Without an id the store creates the post and
    /// allocates an identifier; with an id it updates in place.
    async fn create_or_update_draft(
        &self,
        credential: &Credential,
        draft: &DraftPayload,
    ) -> Result<PostSnapshot, SessionError>;

    /// Persist and publish in one step. Same id-allocation rule as
    /// [`Self::create_or_update_draft`].
    async fn publish(
        &self,
        credential: &Credential,
        draft: &DraftPayload,
    ) -> Result<PostSnapshot, SessionError>;

    /// Fetch a single post. Published posts are public; drafts resolve only
    /// for their owner's credential.
    async fn get_by_id(
        &self,
        credential: Option<&Credential>,
        id: Uuid,
    ) -> Result<PostSnapshot, SessionError>;

    /// Posts matching the query, most recently updated first.
    async fn list(
        &self,
        credential: Option<&Credential>,
        query: PostQuery,
    ) -> Result<Vec<PostSnapshot>, SessionError>;

    /// Permanently delete a post. Owner only.
    async fn delete(&self, credential: &Credential, id: Uuid) -> Result<(), SessionError>;
}
