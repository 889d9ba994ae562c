//! Retention policy deciding which versions survive a prune
//!
//! Versions referenced by an alias and the `$LATEST` marker are always kept.
//! On top of those, the `keep_count` most recently modified versions are kept.
//! Everything else the provider reported is deleted.

use crate::provider::{AliasRecord, VersionRecord, LATEST_VERSION};
use serde::Serialize;
use std::collections::BTreeSet;

/// Partition of version identifiers into survivors and victims
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RetentionDecision {
    pub keep: BTreeSet<String>,
    pub delete: BTreeSet<String>,
}

impl RetentionDecision {
    pub fn should_delete(&self, version: &str) -> bool {
        self.delete.contains(version)
    }
}

/// Decide which versions to keep and which to delete
///
/// Ties on `last_modified` keep the order the provider reported.
pub fn decide(
    versions: &[VersionRecord],
    aliases: &[AliasRecord],
    keep_count: usize,
) -> RetentionDecision {
    let mut keep: BTreeSet<String> = aliases
        .iter()
        .map(|alias| alias.function_version.clone())
        .collect();
    keep.insert(LATEST_VERSION.to_string());

    let mut newest_first: Vec<&VersionRecord> = versions.iter().collect();
    // sort_by is stable
    newest_first.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));

    let mut remaining = keep_count;
    for record in newest_first {
        if remaining == 0 {
            break;
        }
        if keep.insert(record.version.clone()) {
            remaining -= 1;
        }
    }

    let delete = versions
        .iter()
        .filter(|record| !keep.contains(&record.version))
        .map(|record| record.version.clone())
        .collect();

    RetentionDecision { keep, delete }
}
