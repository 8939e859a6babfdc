//! Unified error codes for the hanmall platform
//!
//! Error codes are shared between the API server, the storefront, and the
//! admin console. They are organized by category:
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

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,

    // ==================== 3xxx: Language / localization ====================
    /// Language not found in the supported catalog
    LanguageNotFound = 3001,
    /// Language is already active
    LanguageAlreadyActive = 3002,
    /// Language is not active
    LanguageNotActive = 3003,
    /// Active language limit reached (max 3)
    LanguageLimitReached = 3004,
    /// The default language cannot be removed
    DefaultLanguageImmutable = 3005,
    /// Language pack entry not found
    LanguagePackNotFound = 3006,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order status transition not allowed
    InvalidStatusTransition = 4002,
    /// Order has no items
    EmptyOrder = 4003,
    /// Order total mismatch
    OrderAmountMismatch = 4004,
    /// Order already cancelled
    OrderAlreadyCancelled = 4005,

    // ==================== 5xxx: Payment ====================
    /// Payment not found
    PaymentNotFound = 5001,
    /// Payment gateway call failed
    GatewayError = 5002,
    /// Payment already confirmed
    PaymentAlreadyConfirmed = 5003,
    /// Payment cancellation failed
    CancellationFailed = 5004,
    /// Webhook signature verification failed
    WebhookSignatureInvalid = 5005,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product is not available for sale
    ProductInactive = 6002,
    /// Insufficient stock
    InsufficientStock = 6003,
    /// Category not found
    CategoryNotFound = 6004,

    // ==================== 7xxx: Cart ====================
    /// Cart item not found
    CartItemNotFound = 7001,
    /// Invalid quantity
    InvalidQuantity = 7002,

    // ==================== 8xxx: UI section / cache ====================
    /// UI section not found
    SectionNotFound = 8001,
    /// Duplicate section key
    SectionKeyConflict = 8002,
    /// Snapshot cache is invalid or missing
    CacheInvalid = 8003,
    /// Snapshot generation failed
    CacheGenerationFailed = 8004,
    /// Snapshot sync partially failed (some languages not written)
    SyncPartialFailure = 8005,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Serialization error
    SerializationError = 9003,
    /// I/O error
    IoError = 9004,
    /// Service unavailable
    ServiceUnavailable = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default English message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidFormat => "Invalid format",
            Self::RequiredField => "Required field missing",
            Self::ValueOutOfRange => "Value out of range",

            Self::NotAuthenticated => "Not authenticated",
            Self::InvalidCredentials => "Invalid email or password",
            Self::TokenExpired => "Token has expired",
            Self::TokenInvalid => "Token is invalid",
            Self::AccountDisabled => "Account is disabled",

            Self::PermissionDenied => "Permission denied",
            Self::AdminRequired => "Admin role required",

            Self::LanguageNotFound => "Language not found",
            Self::LanguageAlreadyActive => "Language is already active",
            Self::LanguageNotActive => "Language is not active",
            Self::LanguageLimitReached => "Active language limit reached (max 3)",
            Self::DefaultLanguageImmutable => "The default language cannot be removed",
            Self::LanguagePackNotFound => "Language pack entry not found",

            Self::OrderNotFound => "Order not found",
            Self::InvalidStatusTransition => "Order status transition not allowed",
            Self::EmptyOrder => "Order has no items",
            Self::OrderAmountMismatch => "Order amount does not match",
            Self::OrderAlreadyCancelled => "Order is already cancelled",

            Self::PaymentNotFound => "Payment not found",
            Self::GatewayError => "Payment gateway error",
            Self::PaymentAlreadyConfirmed => "Payment already confirmed",
            Self::CancellationFailed => "Payment cancellation failed",
            Self::WebhookSignatureInvalid => "Webhook signature verification failed",

            Self::ProductNotFound => "Product not found",
            Self::ProductInactive => "Product is not available for sale",
            Self::InsufficientStock => "Insufficient stock",
            Self::CategoryNotFound => "Category not found",

            Self::CartItemNotFound => "Cart item not found",
            Self::InvalidQuantity => "Invalid quantity",

            Self::SectionNotFound => "UI section not found",
            Self::SectionKeyConflict => "Section key already exists",
            Self::CacheInvalid => "Snapshot cache is invalid",
            Self::CacheGenerationFailed => "Snapshot generation failed",
            Self::SyncPartialFailure => "Snapshot sync partially failed",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::SerializationError => "Serialization error",
            Self::IoError => "I/O error",
            Self::ServiceUnavailable => "Service unavailable",
        }
    }

    /// Get the HTTP status code for this error code
    pub fn http_status(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Self::Success => StatusCode::OK,

            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::ValueOutOfRange
            | Self::LanguageLimitReached
            | Self::LanguageAlreadyActive
            | Self::LanguageNotActive
            | Self::DefaultLanguageImmutable
            | Self::EmptyOrder
            | Self::OrderAmountMismatch
            | Self::InvalidQuantity
            | Self::WebhookSignatureInvalid => StatusCode::BAD_REQUEST,

            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            Self::PermissionDenied | Self::AdminRequired | Self::AccountDisabled => {
                StatusCode::FORBIDDEN
            }

            Self::NotFound
            | Self::LanguageNotFound
            | Self::LanguagePackNotFound
            | Self::OrderNotFound
            | Self::PaymentNotFound
            | Self::ProductNotFound
            | Self::CategoryNotFound
            | Self::CartItemNotFound
            | Self::SectionNotFound => StatusCode::NOT_FOUND,

            Self::AlreadyExists
            | Self::SectionKeyConflict
            | Self::PaymentAlreadyConfirmed
            | Self::OrderAlreadyCancelled
            | Self::InvalidStatusTransition => StatusCode::CONFLICT,

            Self::ProductInactive | Self::InsufficientStock => StatusCode::UNPROCESSABLE_ENTITY,

            Self::SyncPartialFailure => StatusCode::MULTI_STATUS,

            Self::GatewayError | Self::CancellationFailed => StatusCode::BAD_GATEWAY,

            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::SerializationError
            | Self::IoError
            | Self::CacheInvalid
            | Self::CacheGenerationFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            6 => Self::InvalidFormat,
            7 => Self::RequiredField,
            8 => Self::ValueOutOfRange,

            1001 => Self::NotAuthenticated,
            1002 => Self::InvalidCredentials,
            1003 => Self::TokenExpired,
            1004 => Self::TokenInvalid,
            1005 => Self::AccountDisabled,

            2001 => Self::PermissionDenied,
            2002 => Self::AdminRequired,

            3001 => Self::LanguageNotFound,
            3002 => Self::LanguageAlreadyActive,
            3003 => Self::LanguageNotActive,
            3004 => Self::LanguageLimitReached,
            3005 => Self::DefaultLanguageImmutable,
            3006 => Self::LanguagePackNotFound,

            4001 => Self::OrderNotFound,
            4002 => Self::InvalidStatusTransition,
            4003 => Self::EmptyOrder,
            4004 => Self::OrderAmountMismatch,
            4005 => Self::OrderAlreadyCancelled,

            5001 => Self::PaymentNotFound,
            5002 => Self::GatewayError,
            5003 => Self::PaymentAlreadyConfirmed,
            5004 => Self::CancellationFailed,
            5005 => Self::WebhookSignatureInvalid,

            6001 => Self::ProductNotFound,
            6002 => Self::ProductInactive,
            6003 => Self::InsufficientStock,
            6004 => Self::CategoryNotFound,

            7001 => Self::CartItemNotFound,
            7002 => Self::InvalidQuantity,

            8001 => Self::SectionNotFound,
            8002 => Self::SectionKeyConflict,
            8003 => Self::CacheInvalid,
            8004 => Self::CacheGenerationFailed,
            8005 => Self::SyncPartialFailure,

            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            9003 => Self::SerializationError,
            9004 => Self::IoError,
            9005 => Self::ServiceUnavailable,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::LanguageLimitReached,
            ErrorCode::OrderAmountMismatch,
            ErrorCode::WebhookSignatureInvalid,
            ErrorCode::SyncPartialFailure,
            ErrorCode::InternalError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert_eq!(ErrorCode::try_from(12345), Err(InvalidErrorCode(12345)));
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            ErrorCode::LanguageLimitReached.http_status(),
            http::StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::OrderNotFound.http_status(),
            http::StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::InvalidStatusTransition.http_status(),
            http::StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::SyncPartialFailure.http_status(),
            http::StatusCode::MULTI_STATUS
        );
        assert_eq!(
            ErrorCode::GatewayError.http_status(),
            http::StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_serialize_as_u16() {
        let json = serde_json::to_string(&ErrorCode::LanguageLimitReached).unwrap();
        assert_eq!(json, "3004");
        let code: ErrorCode = serde_json::from_str("3004").unwrap();
        assert_eq!(code, ErrorCode::LanguageLimitReached);
    }
}
