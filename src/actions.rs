//! The non-fixup actions: listings and backup.
//!
//! Listings return paths rather than printing them; the binary hands them to
//! [`output`](crate::output) so they go to stdout one per line.

use crate::naming::BACKUP_DIR;
use crate::report::{Event, Reporter};
use crate::scan::{ScanError, Snapshot};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActionError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Sources whose large artifact does not exist yet (raw photos not exported).
pub fn missing_large(snapshot: &Snapshot) -> Vec<PathBuf> {
    snapshot
        .missing_large()
        .into_iter()
        .map(|s| s.path.clone())
        .collect()
}

/// Preview links sitting directly in `<service>/`, i.e. distributed to the
/// service but not yet moved to `published/`. Sorted.
pub fn not_published(snapshot: &Snapshot, service: &str) -> Result<Vec<PathBuf>, ActionError> {
    let dir = snapshot.service_dir(service);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(&dir).map_err(|source| ActionError::Io {
        path: dir.clone(),
        source,
    })?;
    let mut links: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_symlink())
        .collect();
    links.sort();
    Ok(links)
}

/// Hard-link every source's original into `<workdir>/.backup/`.
///
/// The backup shares the inode of the file the source link resolves to, not
/// of the link. Existing backups are left alone. A source that cannot be
/// backed up (dangling link, other filesystem) is reported and skipped.
pub fn backup_sources(snapshot: &Snapshot, reporter: &mut dyn Reporter) -> Result<(), ActionError> {
    let backup_dir = snapshot.root().join(BACKUP_DIR);
    match fs::create_dir(&backup_dir) {
        Ok(()) => reporter.report(Event::DirectoryCreated {
            path: backup_dir.clone(),
        }),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
        Err(source) => {
            return Err(ActionError::Io {
                path: backup_dir,
                source,
            });
        }
    }

    for source in snapshot.sources() {
        let backup = backup_dir.join(source.name());
        if backup.symlink_metadata().is_ok() {
            continue;
        }
        match hard_link_target(&source.path, &backup) {
            Ok(()) => reporter.report(Event::BackupCreated {
                source: source.path.clone(),
                backup,
            }),
            Err(e) => reporter.report(Event::BackupFailed {
                source: source.path.clone(),
                reason: e.to_string(),
            }),
        }
    }
    Ok(())
}

/// `fs::hard_link` does not follow a symlink `src` on Linux, so resolve it first.
fn hard_link_target(link: &Path, backup: &Path) -> io::Result<()> {
    let original = fs::canonicalize(link)?;
    match fs::hard_link(original, backup) {
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        other => other,
    }
}
