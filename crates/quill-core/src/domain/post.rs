use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Publication state of a post. Drafts are visible only to their owner;
/// re-saving a published post does not revert it to draft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(PostStatus::Draft),
            "published" => Some(PostStatus::Published),
            _ => None,
        }
    }
}

/// Post entity - a blog post in either draft or published state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new draft. The identifier is allocated here, on the server
    /// side; clients hold no identifier until the first save returns one.
    pub fn new_draft(owner_id: Uuid, title: String, content: String, tags: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title,
            content,
            tags: Self::normalize_tags(tags),
            status: PostStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    /// Trim tag entries and strip empty ones. Order is preserved and
    /// duplicates are allowed.
    pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
        tags.into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect()
    }

    /// A post may only be published with a non-empty title and content.
    pub fn ready_to_publish(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(DomainError::Validation(
                "Title and content are required to publish".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// True when the given user may modify or delete this post.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_tags_strips_empty_entries() {
        let tags = vec![
            " rust ".to_string(),
            "".to_string(),
            "   ".to_string(),
            "web".to_string(),
        ];
        assert_eq!(
            Post::normalize_tags(tags),
            vec!["rust".to_string(), "web".to_string()]
        );
    }

    #[test]
    fn normalize_tags_keeps_order_and_duplicates() {
        let tags = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(Post::normalize_tags(tags), vec!["b", "a", "b"]);
    }

    #[test]
    fn new_draft_starts_as_draft() {
        let post = Post::new_draft(Uuid::new_v4(), "".into(), "".into(), vec![]);
        assert_eq!(post.status, PostStatus::Draft);
        assert!(!post.is_published());
    }

    #[test]
    fn publish_requires_title_and_content() {
        let owner = Uuid::new_v4();
        let empty = Post::new_draft(owner, "".into(), "body".into(), vec![]);
        assert!(empty.ready_to_publish().is_err());

        let blank = Post::new_draft(owner, "title".into(), "   ".into(), vec![]);
        assert!(blank.ready_to_publish().is_err());

        let complete = Post::new_draft(owner, "title".into(), "body".into(), vec![]);
        assert!(complete.ready_to_publish().is_ok());
    }

    #[test]
    fn status_round_trips_through_strings() {
        assert_eq!(PostStatus::parse("draft"), Some(PostStatus::Draft));
        assert_eq!(PostStatus::parse("published"), Some(PostStatus::Published));
        assert_eq!(PostStatus::parse("archived"), None);
        assert_eq!(PostStatus::Published.as_str(), "published");
    }
}
