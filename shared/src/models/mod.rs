//! Data models
//!
//! Shared between the API server and its clients (storefront, admin console).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (Postgres BIGSERIAL), all timestamps are Unix millis.

pub mod cart;
pub mod category;
pub mod language;
pub mod order;
pub mod payment;
pub mod product;
pub mod ui_section;

// Re-exports
pub use cart::*;
pub use category::*;
pub use language::*;
pub use order::*;
pub use payment::*;
pub use product::*;
pub use ui_section::*;
