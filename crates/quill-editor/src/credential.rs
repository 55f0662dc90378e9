//! Explicitly passed bearer credential.

use uuid::Uuid;

/// A bearer credential acquired from [`AuthGateway::login`] and passed
/// explicitly to every gateway call that needs one. Nothing is kept in
/// ambient storage: dropping the credential is the logout, and callers
/// receiving [`SessionError::AuthenticationRequired`] should drop theirs
/// and re-authenticate.
///
/// [`AuthGateway::login`]: crate::gateway::AuthGateway::login
/// [`SessionError::AuthenticationRequired`]: crate::error::SessionError::AuthenticationRequired
#[derive(Debug, Clone)]
pub struct Credential {
    token: String,
    user_id: Uuid,
    username: String,
}

impl Credential {
    pub fn new(token: impl Into<String>, user_id: Uuid, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_id,
            username: username.into(),
        }
    }

    /// The opaque bearer token attached to requests.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}
