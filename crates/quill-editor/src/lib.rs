//! # Quill Editor
//!
//! The client-side half of the Quill blogging platform: the draft/publish
//! lifecycle manager. An [`EditSession`] owns the editable state of a single
//! post, auto-saves it after a quiet period, adopts the identifier the store
//! assigns on first save, and guarantees at most one save request in flight
//! per session. A [`ViewSession`] is the read-only counterpart.
//!
//! Gateways to the REST API are traits ([`AuthGateway`], [`PostGateway`]) so
//! tests can drive sessions against an in-process mock; [`HttpGateway`] is
//! the reqwest implementation.

pub mod credential;
pub mod error;
pub mod gateway;
pub mod http;
pub mod session;

pub use credential::Credential;
pub use error::SessionError;
pub use gateway::{AuthGateway, DraftPayload, PostGateway, PostQuery, PostSnapshot, UserIdentity};
pub use http::HttpGateway;
pub use session::{EditSession, SessionConfig, SessionPhase, ViewSession};
