//! Post handlers: draft saving, publishing, listing, viewing and deletion.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use quill_core::domain::{Post, PostStatus};
use quill_core::ports::{BaseRepository, PostFilter, PostRepository};
use quill_shared::ApiResponse;
use quill_shared::dto::{ListPostsQuery, PostResponse, SavePostRequest};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn post_response(post: Post, author_username: Option<String>) -> PostResponse {
    PostResponse {
        id: post.id,
        owner_id: post.owner_id,
        author_username,
        title: post.title,
        content: post.content,
        tags: post.tags,
        status: post.status.as_str().to_string(),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

async fn author_username(state: &AppState, owner_id: Uuid) -> Option<String> {
    match state.users.find_by_id(owner_id).await {
        Ok(user) => user.map(|u| u.username),
        Err(e) => {
            tracing::warn!("Failed to resolve author {}: {}", owner_id, e);
            None
        }
    }
}

/// Fetch a post and verify the caller owns it.
async fn owned_post(state: &AppState, identity: &Identity, id: Uuid) -> AppResult<Post> {
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))?;

    if !post.is_owned_by(identity.user_id) {
        return Err(AppError::Forbidden);
    }
    Ok(post)
}

/// POST /api/posts/save-draft
///
/// Without an id, creates a draft and allocates the identifier (201); with
/// an id, updates in place (200). Updating never changes the stored status:
/// a published post stays published when re-saved.
pub async fn save_draft(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<SavePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let tags = Post::normalize_tags(req.tags);

    match req.id {
        Some(id) => {
            let mut post = owned_post(&state, &identity, id).await?;
            post.title = req.title;
            post.content = req.content;
            post.tags = tags;
            post.updated_at = Utc::now();

            let saved = state.posts.update(post).await?;
            Ok(HttpResponse::Ok().json(post_response(saved, Some(identity.username))))
        }
        None => {
            let post = Post::new_draft(identity.user_id, req.title, req.content, tags);
            let saved = state.posts.insert(post).await?;

            tracing::debug!(post_id = %saved.id, "Draft created");
            Ok(HttpResponse::Created().json(post_response(saved, Some(identity.username))))
        }
    }
}

/// POST /api/posts/publish
///
/// Same create-or-update rule as save-draft, but requires a non-empty title
/// and content and leaves the post published.
pub async fn publish(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<SavePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let tags = Post::normalize_tags(req.tags);

    let mut post = match req.id {
        Some(id) => {
            let mut post = owned_post(&state, &identity, id).await?;
            post.title = req.title;
            post.content = req.content;
            post.tags = tags;
            post
        }
        None => Post::new_draft(identity.user_id, req.title, req.content, tags),
    };

    post.ready_to_publish()?;
    post.status = PostStatus::Published;
    post.updated_at = Utc::now();

    let saved = match req.id {
        Some(_) => state.posts.update(post).await?,
        None => state.posts.insert(post).await?,
    };

    tracing::info!(post_id = %saved.id, "Post published");
    Ok(HttpResponse::Ok().json(post_response(saved, Some(identity.username))))
}

/// GET /api/posts/{id}
///
/// Published posts are public. Drafts resolve only for their owner; everyone
/// else gets a 404, so draft existence is not observable.
pub async fn get_by_id(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))?;

    let is_owner = identity
        .0
        .as_ref()
        .is_some_and(|who| post.is_owned_by(who.user_id));
    if !post.is_published() && !is_owner {
        return Err(AppError::NotFound(format!("Post {} not found", id)));
    }

    let author = author_username(&state, post.owner_id).await;
    Ok(HttpResponse::Ok().json(post_response(post, author)))
}

/// GET /api/posts?status=&owner_id=
///
/// The listing service. Unauthenticated callers only ever see published
/// posts; authenticated callers additionally see their own drafts, never
/// anyone else's. Ordered by `updated_at`, most recent first.
pub async fn list(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();

    let status = match query.status.as_deref() {
        Some(raw) => Some(
            PostStatus::parse(raw)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown status filter: {}", raw)))?,
        ),
        None => None,
    };

    let caller = identity.0;
    let posts = state
        .posts
        .find_filtered(PostFilter {
            status,
            owner_id: query.owner_id,
        })
        .await?;

    let visible: Vec<Post> = posts
        .into_iter()
        .filter(|post| {
            post.is_published()
                || caller
                    .as_ref()
                    .is_some_and(|who| post.is_owned_by(who.user_id))
        })
        .collect();

    let mut authors: HashMap<Uuid, Option<String>> = HashMap::new();
    let mut responses = Vec::with_capacity(visible.len());
    for post in visible {
        let author = match authors.get(&post.owner_id) {
            Some(author) => author.clone(),
            None => {
                let author = author_username(&state, post.owner_id).await;
                authors.insert(post.owner_id, author.clone());
                author
            }
        };
        responses.push(post_response(post, author));
    }

    Ok(HttpResponse::Ok().json(responses))
}

/// DELETE /api/posts/{id} - owner only.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    owned_post(&state, &identity, id).await?;

    state.posts.delete(id).await?;

    tracing::info!(post_id = %id, "Post deleted");
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message((), "Post deleted")))
}
