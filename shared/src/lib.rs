//! Shared types for the SGG menu service
//!
//! Domain models (orders, dishes, cart), chat message types and the
//! unified error/response structures used by the server and its clients.

pub mod chat;
pub mod error;
pub mod models;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
