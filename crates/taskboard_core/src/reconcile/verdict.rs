use serde::Serialize;

use super::change::ChangeEvent;
use super::diff::diff;
use crate::board::{BoardSnapshot, ColumnSet, Version};

/// Outcome of comparing a local edit against the latest stored board.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictVerdict {
    /// Whether the editor must be asked to resolve before saving
    pub has_conflict: bool,
    /// Changes made by this editor since the baseline
    pub local_changes: Vec<ChangeEvent>,
    /// Changes someone else stored since the baseline
    pub remote_changes: Vec<ChangeEvent>,
    /// The latest stored board, present whenever `has_conflict` is set
    #[serde(rename = "remoteData", skip_serializing_if = "Option::is_none")]
    pub remote: Option<BoardSnapshot>,
}

impl ConflictVerdict {
    /// A verdict with nothing to report.
    pub fn clear() -> Self {
        Self {
            has_conflict: false,
            local_changes: Vec::new(),
            remote_changes: Vec::new(),
            remote: None,
        }
    }
}

/// Decide whether saving `local` over `remote` needs human attention.
///
/// When `force_conflict` is false and `remote` still carries
/// `original_version`, the boards are assumed identical and no diff is run.
/// Otherwise the three snapshots are diffed and a conflict is reported if
/// `force_conflict` is set or anything changed remotely. Local-only changes are
/// just the edit being saved.
///
/// `force_conflict` is for callers whose write was rejected by the store: the
/// version read back may come from a stale cache, so it cannot be trusted.
pub fn evaluate(
    original: &ColumnSet,
    local: &ColumnSet,
    remote: &BoardSnapshot,
    original_version: Option<Version>,
    force_conflict: bool,
) -> ConflictVerdict {
    if !force_conflict && original_version == Some(remote.version) {
        log::debug!("Remote still at {}, skipping diff", remote.version);
        return ConflictVerdict::clear();
    }

    let changes = diff(original, local, &remote.columns);
    let has_conflict = force_conflict || !changes.remote.is_empty();

    if has_conflict {
        log::info!(
            "Conflict against remote {}: {} local / {} remote changes",
            remote.version,
            changes.local.len(),
            changes.remote.len()
        );
    }

    ConflictVerdict {
        has_conflict,
        local_changes: changes.local,
        remote_changes: changes.remote,
        remote: has_conflict.then(|| remote.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ColumnId;
    use crate::test_utils::{board, snapshot};

    #[test]
    fn test_matching_version_skips_diff() {
        let original = board(&[(ColumnId::Todo, &[1])]);
        let local = board(&[(ColumnId::Done, &[1])]);
        let remote = snapshot(board(&[(ColumnId::Cancelled, &[1, 2])]), 3);

        let verdict = evaluate(&original, &local, &remote, Some(Version(3)), false);
        assert_eq!(verdict, ConflictVerdict::clear());
    }

    #[test]
    fn test_local_only_changes_are_not_a_conflict() {
        let original = board(&[(ColumnId::Todo, &[1])]);
        let local = board(&[(ColumnId::Done, &[1])]);
        let remote = snapshot(original.clone(), 4);

        let verdict = evaluate(&original, &local, &remote, Some(Version(3)), false);
        assert!(!verdict.has_conflict);
        assert_eq!(verdict.local_changes.len(), 1);
        assert!(verdict.remote_changes.is_empty());
        assert!(verdict.remote.is_none());
    }

    #[test]
    fn test_remote_changes_attach_remote_board() {
        let original = board(&[(ColumnId::Todo, &[1])]);
        let remote = snapshot(board(&[(ColumnId::Todo, &[1, 2])]), 5);

        let verdict = evaluate(&original, &original, &remote, None, false);
        assert!(verdict.has_conflict);
        assert_eq!(verdict.remote_changes.len(), 1);
        assert_eq!(verdict.remote.as_ref().map(|r| r.version), Some(Version(5)));
    }

    #[test]
    fn test_forced_conflict_ignores_version() {
        let original = board(&[(ColumnId::Todo, &[1])]);
        let remote = snapshot(original.clone(), 2);

        let verdict = evaluate(&original, &original, &remote, Some(Version(2)), true);
        assert!(verdict.has_conflict);
        assert!(verdict.local_changes.is_empty());
        assert!(verdict.remote_changes.is_empty());
        assert!(verdict.remote.is_some());
    }

    #[test]
    fn test_verdict_json_shape() {
        let original = board(&[(ColumnId::Todo, &[1])]);
        let remote = snapshot(ColumnSet::empty(), 2);

        let verdict = evaluate(&original, &original, &remote, None, false);
        let value = serde_json::to_value(&verdict).unwrap();
        assert_eq!(value["hasConflict"], true);
        assert_eq!(value["remoteChanges"][0]["changeType"], "deleted");
        assert_eq!(value["remoteData"]["version"], 2);
        assert!(value["localChanges"].as_array().unwrap().is_empty());
    }
}
