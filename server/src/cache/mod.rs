//! Per-language snapshot cache for storefront UI sections.
//!
//! The storefront reads a single pre-denormalized JSON file per active
//! language instead of querying the database on every page load. Files live
//! under `snapshot_dir` as `ui-sections.<lang>.json` and are considered fresh
//! while younger than `cache_max_age_secs`. Regeneration is last-writer-wins;
//! a torn read is avoided by writing to a temp file and renaming.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use sqlx::PgPool;

use hanmall_shared::models::{
    CacheGenerateResult, CacheStatus, LanguageSnapshot, SnapshotSection, UiSection,
};
use hanmall_shared::util::now_millis;

use crate::db;
use crate::error::{ServiceError, ServiceResult};

const SNAPSHOT_PREFIX: &str = "ui-sections.";

#[derive(Debug, Clone)]
pub struct SnapshotCache {
    dir: PathBuf,
    max_age: Duration,
}

impl SnapshotCache {
    pub fn new(dir: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self {
            dir: dir.into(),
            max_age,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_path(&self, language: &str) -> PathBuf {
        self.dir.join(format!("{SNAPSHOT_PREFIX}{language}.json"))
    }

    /// Fresh means: every active language has a snapshot file younger than
    /// the configured max age.
    pub fn is_valid(&self, active_languages: &[String]) -> bool {
        if active_languages.is_empty() {
            return false;
        }
        active_languages
            .iter()
            .all(|lang| self.file_age(lang).is_some_and(|age| age < self.max_age))
    }

    pub fn status(&self, active_languages: &[String]) -> CacheStatus {
        let oldest_generated_at = active_languages
            .iter()
            .filter_map(|lang| self.read(lang))
            .map(|snapshot| snapshot.generated_at)
            .min();
        CacheStatus {
            is_valid: self.is_valid(active_languages),
            languages: active_languages.to_vec(),
            oldest_generated_at,
        }
    }

    /// Read one language's snapshot. Returns `None` when the file is missing
    /// or unparseable; callers fall back to the database.
    pub fn read(&self, language: &str) -> Option<LanguageSnapshot> {
        let path = self.file_path(language);
        let raw = fs::read(&path).ok()?;
        match serde_json::from_slice(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "discarding corrupt snapshot file");
                None
            }
        }
    }

    pub fn write(&self, snapshot: &LanguageSnapshot) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.file_path(&snapshot.language);
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(snapshot)?;
        fs::write(&tmp, body)?;
        fs::rename(&tmp, path)
    }

    /// Remove every snapshot file. Returns how many were deleted.
    pub fn clear(&self) -> io::Result<usize> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(err),
        };
        let mut removed = 0;
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(SNAPSHOT_PREFIX) && name.ends_with(".json") {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Rebuild every active language's snapshot from the database.
    pub async fn generate(&self, pool: &PgPool) -> ServiceResult<CacheGenerateResult> {
        let languages = db::languages::active_language_codes(pool).await?;
        let sections = db::ui_sections::list_sections(pool, true).await?;
        for language in &languages {
            let strings = db::language_packs::translation_map(pool, language).await?;
            let snapshot = build_snapshot(language, &sections, strings);
            self.write(&snapshot).map_err(|err| {
                ServiceError::Db(
                    format!("write snapshot for {language}: {err}").into(),
                )
            })?;
        }
        tracing::info!(
            languages = languages.len(),
            sections = sections.len(),
            "regenerated ui-section snapshots"
        );
        Ok(CacheGenerateResult {
            success: true,
            languages,
            sections_count: sections.len(),
        })
    }

    fn file_age(&self, language: &str) -> Option<Duration> {
        let meta = fs::metadata(self.file_path(language)).ok()?;
        let modified = meta.modified().ok()?;
        SystemTime::now().duration_since(modified).ok()
    }
}

/// Denormalize sections for one language: apply that language's translation
/// overrides onto the base title/data of every active section.
pub fn build_snapshot(
    language: &str,
    sections: &[UiSection],
    strings: HashMap<String, String>,
) -> LanguageSnapshot {
    let order = sections.iter().map(|s| s.id).collect();
    build_snapshot_with_order(language, sections, strings, order)
}

/// Like [`build_snapshot`], but `section_order` is taken verbatim from the
/// caller. An admin reorder covers hidden sections too, so the order may
/// contain ids that have no entry in `sections`.
pub fn build_snapshot_with_order(
    language: &str,
    sections: &[UiSection],
    strings: HashMap<String, String>,
    section_order: Vec<i64>,
) -> LanguageSnapshot {
    let projected: Vec<SnapshotSection> = sections
        .iter()
        .map(|section| project_section(section, language))
        .collect();
    LanguageSnapshot {
        language: language.to_string(),
        generated_at: now_millis(),
        section_order,
        sections: projected,
        strings,
    }
}

fn project_section(section: &UiSection, language: &str) -> SnapshotSection {
    let overrides = section.translations.get(language);
    let title = overrides
        .and_then(|o| o.get("title"))
        .and_then(|t| t.as_str())
        .unwrap_or(&section.title)
        .to_string();
    let mut data = section.data.clone();
    if let (Some(base), Some(extra)) = (
        data.as_object_mut(),
        overrides.and_then(|o| o.get("data")).and_then(|d| d.as_object()),
    ) {
        for (key, value) in extra {
            base.insert(key.clone(), value.clone());
        }
    }
    SnapshotSection {
        id: section.id,
        key: section.key.clone(),
        section_type: section.section_type.clone(),
        title,
        data,
        sort_order: section.sort_order,
        is_active: section.is_active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn section(id: i64, title: &str, translations: serde_json::Value) -> UiSection {
        UiSection {
            id,
            key: format!("section-{id}"),
            section_type: "hero".into(),
            title: title.into(),
            data: json!({"subtitle": "base"}),
            sort_order: id as i32,
            is_active: true,
            translations,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn projection_applies_title_and_data_overrides() {
        let s = section(
            1,
            "여름 세일",
            json!({"en": {"title": "Summer Sale", "data": {"subtitle": "translated"}}}),
        );
        let out = project_section(&s, "en");
        assert_eq!(out.title, "Summer Sale");
        assert_eq!(out.data["subtitle"], "translated");
    }

    #[test]
    fn projection_falls_back_to_base_language() {
        let s = section(1, "여름 세일", json!({"en": {"title": "Summer Sale"}}));
        let out = project_section(&s, "ja");
        assert_eq!(out.title, "여름 세일");
        assert_eq!(out.data["subtitle"], "base");
    }

    #[test]
    fn snapshot_preserves_section_order() {
        let sections = vec![
            section(3, "c", json!({})),
            section(1, "a", json!({})),
            section(2, "b", json!({})),
        ];
        let snapshot = build_snapshot("ko", &sections, HashMap::new());
        assert_eq!(snapshot.section_order, vec![3, 1, 2]);
    }

    #[test]
    fn explicit_order_is_written_verbatim() {
        // id 7 is hidden and so absent from the active section list, but a
        // submitted reorder still records its place
        let sections = vec![section(1, "a", json!({})), section(2, "b", json!({}))];
        let snapshot =
            build_snapshot_with_order("ko", &sections, HashMap::new(), vec![2, 7, 1]);
        assert_eq!(snapshot.section_order, vec![2, 7, 1]);
        assert_eq!(snapshot.sections.len(), 2);
    }

    fn active(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn write_then_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path(), Duration::from_secs(3600));
        let snapshot = build_snapshot("ko", &[section(1, "메인", json!({}))], HashMap::new());
        cache.write(&snapshot).unwrap();

        let read = cache.read("ko").unwrap();
        assert_eq!(read.language, "ko");
        assert_eq!(read.sections.len(), 1);
        assert_eq!(read.sections[0].title, "메인");
    }

    #[test]
    fn missing_file_reads_none_and_invalidates() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path(), Duration::from_secs(3600));
        assert!(cache.read("ko").is_none());
        assert!(!cache.is_valid(&active(&["ko"])));
    }

    #[test]
    fn validity_requires_every_active_language() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path(), Duration::from_secs(3600));
        cache
            .write(&build_snapshot("ko", &[], HashMap::new()))
            .unwrap();

        assert!(cache.is_valid(&active(&["ko"])));
        assert!(!cache.is_valid(&active(&["ko", "en"])));
    }

    #[test]
    fn zero_max_age_means_always_stale() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path(), Duration::ZERO);
        cache
            .write(&build_snapshot("ko", &[], HashMap::new()))
            .unwrap();
        assert!(!cache.is_valid(&active(&["ko"])));
    }

    #[test]
    fn corrupt_file_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path(), Duration::from_secs(3600));
        fs::write(dir.path().join("ui-sections.ko.json"), b"not json").unwrap();
        assert!(cache.read("ko").is_none());
    }

    #[test]
    fn clear_removes_only_snapshot_files() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path(), Duration::from_secs(3600));
        cache
            .write(&build_snapshot("ko", &[], HashMap::new()))
            .unwrap();
        cache
            .write(&build_snapshot("en", &[], HashMap::new()))
            .unwrap();
        fs::write(dir.path().join("unrelated.txt"), b"keep me").unwrap();

        assert_eq!(cache.clear().unwrap(), 2);
        assert!(dir.path().join("unrelated.txt").exists());
        assert_eq!(cache.clear().unwrap(), 0);
    }

    #[test]
    fn status_reports_oldest_generation() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path(), Duration::from_secs(3600));
        let mut older = build_snapshot("ko", &[], HashMap::new());
        older.generated_at = 1_000;
        cache.write(&older).unwrap();
        let mut newer = build_snapshot("en", &[], HashMap::new());
        newer.generated_at = 2_000;
        cache.write(&newer).unwrap();

        let status = cache.status(&active(&["ko", "en"]));
        assert!(status.is_valid);
        assert_eq!(status.oldest_generated_at, Some(1_000));
    }
}
