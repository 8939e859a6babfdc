//! Unified error system for the hanmall platform
//!
//! - [`ErrorCode`]: standardized error codes grouped by domain
//! - [`ErrorCategory`]: classification of errors by code range
//! - [`AppError`]: rich error type with codes, messages, and details
//! - [`ApiResponse`]: unified API response format
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Language / localization errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Product errors
//! - 7xxx: Cart errors
//! - 8xxx: UI section / cache errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use hanmall_shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::LanguageLimitReached);
//! let err = AppError::with_message(ErrorCode::ValidationFailed, "Invalid email format");
//! let err = AppError::validation("Missing required field").with_detail("field", "email");
//! let response = ApiResponse::<()>::error(&err);
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
