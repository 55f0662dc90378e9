//! HTTP implementation of the gateway contracts against the Quill REST API.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use quill_shared::ErrorResponse;
use quill_shared::dto::{AuthResponse, LoginRequest, PostResponse, RegisterRequest, UserResponse};

use crate::credential::Credential;
use crate::error::SessionError;
use crate::gateway::{AuthGateway, DraftPayload, PostGateway, PostQuery, PostSnapshot, UserIdentity};

/// Gateway speaking to the REST API over HTTP.
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// `base_url` includes the `/api` prefix, e.g. `http://localhost:8080/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(credential: &Credential) -> String {
        format!("Bearer {}", credential.token())
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, SessionError> {
        if response.status().is_success() {
            return response
                .json()
                .await
                .map_err(|e| SessionError::Transient(e.to_string()));
        }
        Err(Self::failure(response).await)
    }

    async fn failure(response: Response) -> SessionError {
        let status = response.status();
        let detail = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .unwrap_or_else(|| status.to_string());
        error_for(status, detail)
    }
}

/// Map an HTTP error status to the session error kinds.
fn error_for(status: StatusCode, detail: String) -> SessionError {
    match status {
        StatusCode::UNAUTHORIZED => SessionError::AuthenticationRequired,
        StatusCode::FORBIDDEN => SessionError::Authorization(detail),
        StatusCode::NOT_FOUND => SessionError::NotFound,
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            SessionError::Validation(detail)
        }
        _ => SessionError::Transient(detail),
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        SessionError::Transient(err.to_string())
    }
}

#[async_trait]
impl AuthGateway for HttpGateway {
    async fn login(&self, username: &str, password: &str) -> Result<Credential, SessionError> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        let auth: AuthResponse = Self::parse(response).await?;
        Ok(Credential::new(
            auth.access_token,
            auth.user.id,
            auth.user.username,
        ))
    }

    async fn register(&self, username: &str, password: &str) -> Result<(), SessionError> {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(&RegisterRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        let _: UserResponse = Self::parse(response).await?;
        Ok(())
    }

    async fn current_user(&self, credential: &Credential) -> Result<UserIdentity, SessionError> {
        let response = self
            .client
            .get(self.url("/auth/me"))
            .header(header::AUTHORIZATION, Self::bearer(credential))
            .send()
            .await?;

        let user: UserResponse = Self::parse(response).await?;
        Ok(user.into())
    }
}

#[async_trait]
impl PostGateway for HttpGateway {
    async fn create_or_update_draft(
        &self,
        credential: &Credential,
        draft: &DraftPayload,
    ) -> Result<PostSnapshot, SessionError> {
        let response = self
            .client
            .post(self.url("/posts/save-draft"))
            .header(header::AUTHORIZATION, Self::bearer(credential))
            .json(&draft.to_request())
            .send()
            .await?;

        let post: PostResponse = Self::parse(response).await?;
        Ok(post.into())
    }

    async fn publish(
        &self,
        credential: &Credential,
        draft: &DraftPayload,
    ) -> Result<PostSnapshot, SessionError> {
        let response = self
            .client
            .post(self.url("/posts/publish"))
            .header(header::AUTHORIZATION, Self::bearer(credential))
            .json(&draft.to_request())
            .send()
            .await?;

        let post: PostResponse = Self::parse(response).await?;
        Ok(post.into())
    }

    async fn get_by_id(
        &self,
        credential: Option<&Credential>,
        id: Uuid,
    ) -> Result<PostSnapshot, SessionError> {
        let mut request = self.client.get(self.url(&format!("/posts/{id}")));
        if let Some(credential) = credential {
            request = request.header(header::AUTHORIZATION, Self::bearer(credential));
        }

        let post: PostResponse = Self::parse(request.send().await?).await?;
        Ok(post.into())
    }

    async fn list(
        &self,
        credential: Option<&Credential>,
        query: PostQuery,
    ) -> Result<Vec<PostSnapshot>, SessionError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(status) = query.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(owner_id) = query.owner_id {
            params.push(("owner_id", owner_id.to_string()));
        }

        let mut request = self.client.get(self.url("/posts")).query(&params);
        if let Some(credential) = credential {
            request = request.header(header::AUTHORIZATION, Self::bearer(credential));
        }

        let posts: Vec<PostResponse> = Self::parse(request.send().await?).await?;
        Ok(posts.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, credential: &Credential, id: Uuid) -> Result<(), SessionError> {
        let response = self
            .client
            .delete(self.url(&format!("/posts/{id}")))
            .header(header::AUTHORIZATION, Self::bearer(credential))
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::failure(response).await)
    }
}
