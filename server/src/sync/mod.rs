//! Fans a single admin edit out across every active language's snapshot.
//!
//! Order and visibility changes are persisted once, then each language's
//! snapshot file is rebuilt independently. A language that fails to rebuild
//! is reported back instead of aborting the others; the caller maps a mixed
//! outcome to HTTP 207.

use std::collections::HashSet;

use sqlx::PgPool;

use hanmall_shared::error::AppError;
use hanmall_shared::models::{SyncError, SyncOutcome};

use crate::cache::{self, SnapshotCache};
use crate::db;
use crate::error::ServiceResult;

/// A reorder must mention every section (hidden ones included) exactly once.
fn order_covers_sections(ids: &[i64], section_ids: &[i64]) -> bool {
    let submitted: HashSet<i64> = ids.iter().copied().collect();
    submitted.len() == ids.len()
        && ids.len() == section_ids.len()
        && section_ids.iter().all(|id| submitted.contains(id))
}

/// Persist a new section display order, then resync all language snapshots.
/// The written snapshots carry `ids` verbatim as their section order.
pub async fn sync_section_order(
    pool: &PgPool,
    snapshots: &SnapshotCache,
    ids: &[i64],
    actor: &str,
) -> ServiceResult<SyncOutcome> {
    let all_sections = db::ui_sections::list_sections(pool, false).await?;
    let section_ids: Vec<i64> = all_sections.iter().map(|s| s.id).collect();
    if !order_covers_sections(ids, &section_ids) {
        return Err(AppError::validation("Order must list every section id exactly once")
            .with_detail("received", ids.len() as i64)
            .with_detail("sections", section_ids.len() as i64)
            .into());
    }

    db::ui_sections::update_section_order(pool, ids).await?;
    tracing::info!(%actor, sections = ids.len(), "section order changed");
    resync_languages(pool, snapshots, Some(ids)).await
}

/// Persist a section visibility flip, then resync all language snapshots.
pub async fn sync_section_visibility(
    pool: &PgPool,
    snapshots: &SnapshotCache,
    id: i64,
    is_active: bool,
    actor: &str,
) -> ServiceResult<SyncOutcome> {
    db::ui_sections::update_section_visibility(pool, id, is_active).await?;
    tracing::info!(%actor, section_id = id, is_active, "section visibility changed");
    resync_languages(pool, snapshots, None).await
}

async fn resync_languages(
    pool: &PgPool,
    snapshots: &SnapshotCache,
    order: Option<&[i64]>,
) -> ServiceResult<SyncOutcome> {
    let languages = db::languages::active_language_codes(pool).await?;
    let sections = db::ui_sections::list_sections(pool, true).await?;

    let mut outcome = SyncOutcome {
        updated_languages: Vec::new(),
        errors: Vec::new(),
    };
    for language in languages {
        let result: Result<(), crate::db::BoxError> = async {
            let strings = db::language_packs::translation_map(pool, &language).await?;
            let snapshot = match order {
                Some(order) => cache::build_snapshot_with_order(
                    &language,
                    &sections,
                    strings,
                    order.to_vec(),
                ),
                None => cache::build_snapshot(&language, &sections, strings),
            };
            snapshots.write(&snapshot)?;
            Ok(())
        }
        .await;
        match result {
            Ok(()) => outcome.updated_languages.push(language),
            Err(err) => {
                tracing::warn!(%language, %err, "language snapshot sync failed");
                outcome.errors.push(SyncError {
                    language,
                    error: err.to_string(),
                });
            }
        }
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_order_is_accepted() {
        assert!(order_covers_sections(&[3, 1, 2], &[1, 2, 3]));
    }

    #[test]
    fn missing_or_unknown_ids_are_rejected() {
        // omits section 3
        assert!(!order_covers_sections(&[1, 2], &[1, 2, 3]));
        // mentions an id that is not a section
        assert!(!order_covers_sections(&[1, 2, 9], &[1, 2, 3]));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        assert!(!order_covers_sections(&[1, 2, 2], &[1, 2, 3]));
    }
}
