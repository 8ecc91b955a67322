//! Conflict inspection and optimistic save

use std::path::{Path, PathBuf};
use std::str::FromStr;

use taskboard_core::reconcile::evaluate;
use taskboard_core::store::DEFAULT_SAVE_MESSAGE;
use taskboard_core::{BoardSession, ConflictResolution, ConflictVerdict, SaveOutcome, Version};

use crate::cli::util::{print_changes, print_json, read_snapshot, report_error};
use crate::cli::{CliBoardStore, block_on};

/// Arguments of the save command
pub struct SaveArgs {
    pub customer: String,
    pub local: PathBuf,
    pub baseline: PathBuf,
    pub revision: Option<String>,
    pub message: Option<String>,
    pub resolve: Option<String>,
}

/// Handle the diff command
pub fn handle_diff(
    original: &Path,
    local: &Path,
    remote: &Path,
    original_version: Option<u64>,
    force: bool,
    json: bool,
) -> bool {
    let snapshots = read_snapshot(original).and_then(|original| {
        let local = read_snapshot(local)?;
        let remote = read_snapshot(remote)?;
        Ok((original, local, remote))
    });
    let (original, local, remote) = match snapshots {
        Ok(snapshots) => snapshots,
        Err(e) => {
            report_error(&e, json);
            return false;
        }
    };

    let verdict = evaluate(
        &original.columns,
        &local.columns,
        &remote,
        original_version.map(Version),
        force,
    );

    if json {
        return print_json(&verdict);
    }
    print_verdict(&verdict);
    true
}

fn print_verdict(verdict: &ConflictVerdict) {
    if verdict.has_conflict {
        println!("✗ Conflict: the board was changed by someone else");
    } else {
        println!("✓ No conflict");
    }
    print_changes("Local changes", &verdict.local_changes);
    print_changes("Remote changes", &verdict.remote_changes);
}

/// Handle the save command
pub fn handle_save(store: &CliBoardStore, args: SaveArgs, json: bool) -> bool {
    let resolution = match args.resolve.as_deref().map(ConflictResolution::from_str) {
        None => None,
        Some(Ok(resolution)) => Some(resolution),
        Some(Err(())) => {
            eprintln!(
                "✗ Unknown resolution '{}' (expected 'local' or 'remote')",
                args.resolve.unwrap_or_default()
            );
            return false;
        }
    };
    let message = args.message.as_deref().unwrap_or(DEFAULT_SAVE_MESSAGE);

    let loaded = read_snapshot(&args.baseline)
        .and_then(|baseline| Ok((baseline, read_snapshot(&args.local)?)));
    let (mut baseline, local) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            report_error(&e, json);
            return false;
        }
    };

    baseline.revision = match args.revision {
        Some(revision) => Some(revision),
        None => stored_revision(store, &args.customer, baseline.version),
    };

    let mut session = BoardSession::resume(store, &args.customer, baseline);
    let outcome = match block_on(session.save(&local, message)) {
        Ok(outcome) => outcome,
        Err(e) => {
            report_error(&e, json);
            return false;
        }
    };

    let verdict = match outcome {
        SaveOutcome::Saved(saved) => return report_saved(&saved.revision, saved.version, json),
        SaveOutcome::Conflict(verdict) => verdict,
    };

    let (Some(resolution), Some(remote)) = (resolution, verdict.remote.as_ref()) else {
        if json {
            print_json(&verdict);
        } else {
            print_verdict(&verdict);
            println!();
            println!("Re-run with --resolve local to overwrite, or --resolve remote to discard.");
        }
        return false;
    };

    match block_on(session.resolve(&local, remote, resolution, message)) {
        Ok(Some(SaveOutcome::Saved(saved))) => report_saved(&saved.revision, saved.version, json),
        Ok(Some(SaveOutcome::Conflict(again))) => {
            if json {
                print_json(&again);
            } else {
                println!("✗ The board changed again while resolving");
                print_verdict(&again);
            }
            false
        }
        Ok(None) => {
            if json {
                return print_json(session.baseline());
            }
            println!(
                "✓ Kept the stored board ({}); local edits discarded",
                session.baseline().version
            );
            true
        }
        Err(e) => {
            report_error(&e, json);
            false
        }
    }
}

/// Revision of the stored board, if it still carries `version`.
///
/// A baseline file has no revision of its own. When the stored board has moved
/// past the baseline there is no revision to check against, and the save will
/// report a conflict.
fn stored_revision(store: &CliBoardStore, customer: &str, version: Version) -> Option<String> {
    match block_on(store.load_admin(customer)) {
        Ok(stored) if stored.version == version => stored.revision,
        Ok(stored) => {
            log::info!(
                "Stored board is at {}, baseline at {}",
                stored.version,
                version
            );
            None
        }
        Err(_) => None,
    }
}

fn report_saved(revision: &str, version: Version, json: bool) -> bool {
    if json {
        return print_json(&serde_json::json!({
            "version": version,
            "revision": revision,
        }));
    }
    println!("✓ Saved {} ({})", version, revision);
    true
}
