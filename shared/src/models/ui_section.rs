//! UI section model and snapshot types
//!
//! A UI section is an admin-configurable content block (hero, category list,
//! promo banner) rendered on the storefront homepage. Snapshots are the
//! per-language denormalized views written to disk by the cache service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// UI section entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UiSection {
    pub id: i64,
    /// Human-chosen key, unique per section (`hero`, `best-sellers`, ...)
    pub key: String,
    /// Section renderer type (`hero`, `category-grid`, `promo`, ...)
    pub section_type: String,
    pub title: String,
    /// Renderer-specific content blob
    pub data: Value,
    pub sort_order: i32,
    pub is_active: bool,
    /// Per-language title/content overrides: `{ "en": { "title": ... }, ... }`
    pub translations: Value,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create section payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSectionCreate {
    pub key: String,
    pub section_type: String,
    pub title: String,
    #[serde(default)]
    pub data: Value,
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub translations: Value,
}

/// Update section payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiSectionUpdate {
    pub section_type: Option<String>,
    pub title: Option<String>,
    pub data: Option<Value>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
    pub translations: Option<Value>,
}

/// A section as it appears inside a language snapshot: the base content with
/// that language's translation overrides already applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotSection {
    pub id: i64,
    pub key: String,
    pub section_type: String,
    pub title: String,
    pub data: Value,
    pub sort_order: i32,
    pub is_active: bool,
}

/// One per-language snapshot file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageSnapshot {
    pub language: String,
    /// Unix millis at generation time
    pub generated_at: i64,
    /// Section IDs in display order
    pub section_order: Vec<i64>,
    pub sections: Vec<SnapshotSection>,
    /// Flattened language-pack strings for this language (`namespace.key` → value)
    #[serde(default)]
    pub strings: std::collections::HashMap<String, String>,
}

/// Result of a snapshot regeneration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheGenerateResult {
    pub success: bool,
    pub languages: Vec<String>,
    pub sections_count: usize,
}

/// Freshness report for the snapshot cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStatus {
    pub is_valid: bool,
    pub languages: Vec<String>,
    /// Unix millis of the oldest snapshot file, if any exist
    pub oldest_generated_at: Option<i64>,
}

/// Outcome of fanning an admin edit out over every active language
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub updated_languages: Vec<String>,
    pub errors: Vec<SyncError>,
}

/// A single language that failed to sync
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncError {
    pub language: String,
    pub error: String,
}

impl SyncOutcome {
    pub fn is_partial_failure(&self) -> bool {
        !self.errors.is_empty() && !self.updated_languages.is_empty()
    }

    pub fn is_total_failure(&self) -> bool {
        !self.errors.is_empty() && self.updated_languages.is_empty()
    }
}
