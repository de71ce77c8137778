//! Core Module - infrastructure shared by every endpoint
//!
//! - Authentication (JWT) and the authorization guard
//! - Configuration
//! - Error taxonomy
//! - Database pool
//! - Application state

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod extract;
pub mod guard;
pub mod state;

pub use auth::{Claims, authentication_middleware, decode_jwt, encode_jwt};
pub use config::Config;
pub use error::{AppError, ErrorKind, is_unique_violation};
pub use state::AppState;
