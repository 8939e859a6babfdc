//! Language catalog and language pack models

use serde::{Deserialize, Serialize};

/// At most this many languages may be active at once.
pub const MAX_ACTIVE_LANGUAGES: usize = 3;

/// A language in the supported catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Language {
    pub id: i64,
    /// BCP-47 style code (`ko`, `en`, `ja`, `zh`, ...)
    pub code: String,
    /// English display name
    pub name: String,
    /// Name in the language itself (한국어, English, 日本語)
    pub native_name: String,
    pub is_active: bool,
    pub is_default: bool,
}

/// One translation entry: a (language, namespace, key) → value row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LanguagePackEntry {
    pub id: i64,
    pub language_code: String,
    /// Grouping namespace (`common`, `checkout`, `admin`, ...)
    pub namespace: String,
    pub key: String,
    pub value: String,
    pub category: Option<String>,
    pub is_active: bool,
    /// Bumped on every edit
    pub version: i32,
    pub updated_at: i64,
}

/// Create/upsert language pack entry payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguagePackUpsert {
    pub language_code: String,
    pub namespace: String,
    pub key: String,
    pub value: String,
    pub category: Option<String>,
}

/// Request to activate a language
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddLanguageRequest {
    pub language_code: String,
}

/// Request to swap one active language for another
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchLanguageRequest {
    pub remove: String,
    pub add: String,
}
