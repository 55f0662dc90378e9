//! # Quill Shared
//!
//! Wire types shared between the API server and the Rust client.
//! Both sides serialize through these DTOs, so the editor and the
//! backend cannot drift apart.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
