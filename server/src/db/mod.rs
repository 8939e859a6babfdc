//! Database access layer
//!
//! Free async functions per entity, raw parameterized sqlx queries against
//! the `PgPool`. Errors are boxed and mapped to `AppError` at the API layer.

pub mod carts;
pub mod categories;
pub mod language_packs;
pub mod languages;
pub mod orders;
pub mod payments;
pub mod products;
pub mod ui_sections;
pub mod users;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;
