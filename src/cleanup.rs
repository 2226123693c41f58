//! Best-effort removal of orphaned backing files.
//!
//! Under normal operation a [`crate::container::Container`]'s backing files
//! are unlinked by `TempPath`'s `Drop` impl the moment the last clone is
//! dropped. `cleanup::run` exists for the abnormal case: a process killed
//! before that `Drop` ran leaves `{file_prefix}<random>` files behind in the
//! configured temp directory. It is safe to call at startup, on a timer, or
//! never.

use crate::config::Config;
use std::fs;
use std::io;

/// Scan `config.temp_dir()` for entries named `{config.file_prefix}*` and
/// remove them. Per-file errors (permission denied, file gone between scan
/// and remove, not a regular file) are logged and skipped rather than
/// aborting the sweep; only a failure to read the directory itself is
/// returned to the caller.
pub fn run(config: &Config) -> io::Result<CleanupReport> {
    let dir = config.temp_dir();
    let mut report = CleanupReport::default();

    let entries = fs::read_dir(&dir)?;
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!(target: "huge-container", "cleanup: failed to read a directory entry: {e}");
                report.errors += 1;
                continue;
            }
        };

        let name = entry.file_name();
        let name = match name.to_str() {
            Some(n) => n,
            None => continue,
        };
        if !name.starts_with(&config.file_prefix) {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                log::warn!(target: "huge-container", "cleanup: stat {name} failed: {e}");
                report.errors += 1;
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }

        match fs::remove_file(entry.path()) {
            Ok(()) => report.removed += 1,
            Err(e) => {
                log::warn!(target: "huge-container", "cleanup: remove {name} failed: {e}");
                report.errors += 1;
            }
        }
    }

    log::info!(
        target: "huge-container",
        "cleanup: removed {} orphaned file(s) under {:?}, {} error(s)",
        report.removed, dir, report.errors
    );
    Ok(report)
}

/// Summary of a [`run`] sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: u64,
    pub errors: u64,
}
