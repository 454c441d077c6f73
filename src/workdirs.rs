//! Workdir discovery.
//!
//! Two archive layouts are supported. Folders marked `*` are date roots:
//!
//! ```text
//! flat:                      month-bucketed:
//!
//! 2022-01-01/ *              01/
//!     a/      *                  2022-01-01/ *
//!     b/      *                  2022-01-03/
//! 2022-01-02/ *                      a/      *
//! 2022-01-03/ *                      b/      *
//!                            02/
//!                                2022-02-02/ *
//! ```
//!
//! The month-bucketed layout wins as soon as any bucket `01`..`12` exists;
//! date folders next to the buckets are then ignored. A date folder split
//! into letter sub-roots `a`..`h` yields the sub-roots instead of itself.
//! Each root's `publish/` folder is its workdir; roots without one have not
//! been set up yet and are skipped.

use crate::naming::{self, LETTER_ROOTS, MONTH_BUCKETS, PUBLISH_DIR};
use crate::report::{Event, Reporter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Date roots (or their letter sub-roots) under `archive`, sorted.
pub fn date_roots(archive: &Path) -> Result<Vec<PathBuf>, DiscoverError> {
    let mut bases: Vec<PathBuf> = MONTH_BUCKETS
        .iter()
        .map(|month| archive.join(month))
        .filter(|p| p.is_dir())
        .collect();
    if bases.is_empty() {
        bases.push(archive.to_path_buf());
    }

    let mut dates = Vec::new();
    for base in &bases {
        let entries = fs::read_dir(base).map_err(|source| DiscoverError::Io {
            path: base.clone(),
            source,
        })?;
        dates.extend(
            entries
                .filter_map(|e| e.ok())
                .filter(|e| naming::is_date_name(&e.file_name().to_string_lossy()))
                .map(|e| e.path())
                .filter(|p| p.is_dir()),
        );
    }
    dates.sort();

    let mut roots = Vec::new();
    for date in dates {
        let letters: Vec<PathBuf> = LETTER_ROOTS
            .iter()
            .map(|letter| date.join(letter))
            .filter(|p| p.is_dir())
            .collect();
        if letters.is_empty() {
            roots.push(date);
        } else {
            roots.extend(letters);
        }
    }
    Ok(roots)
}

/// Workdirs (`<root>/publish`) to reconcile, in date/letter order.
pub fn discover(archive: &Path, reporter: &mut dyn Reporter) -> Result<Vec<PathBuf>, DiscoverError> {
    let mut workdirs = Vec::new();
    for root in date_roots(archive)? {
        let workdir = root.join(PUBLISH_DIR);
        if workdir.is_dir() {
            workdirs.push(workdir);
        } else {
            reporter.report(Event::WorkdirSkipped { root });
        }
    }
    Ok(workdirs)
}
