//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! SeaORM/Postgres repositories, in-memory fallbacks, JWT tokens and
//! Argon2 password hashing.

pub mod auth;
pub mod database;
pub mod memory;

pub use auth::{Argon2PasswordHasher, JwtConfig, JwtTokenService};
pub use database::{DatabaseConfig, PostgresPostRepository, PostgresUserRepository};
pub use memory::{InMemoryPostRepository, InMemoryUserRepository};
