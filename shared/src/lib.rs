//! Shared types for the hanmall platform
//!
//! Common types used by the API server and admin console clients:
//! error codes, response structures, domain models, and store events.

pub mod error;
pub mod events;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use events::{EventKind, StoreEvent};
