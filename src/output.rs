//! CLI output formatting.
//!
//! Fixup and backup narrate one line per change, through the log:
//!
//! ```text
//! Reconciling 2022-01-01/publish
//! Adding directory 2022-01-01/publish/web
//! Creating 2022-01-01/publish/DSC_0001_small.jpg from 2022-01-01/publish/DSC_0001.JPG
//! Adding link to DSC_0001_small.jpg in web
//! Replacing link 2022-01-01/publish/DSC_0002.NEF from /photos/DSC_0002.NEF to ../DSC_0002.NEF
//! Adding to git 2022-01-01/publish/web/DSC_0001_small.jpg
//! ```
//!
//! Listings (`missing`, `unpublished`) print bare paths to stdout, one per
//! line, so they can be piped.
//!
//! Each formatter is pure and returns strings; `print_*` wrappers do the I/O.

use crate::report::Event;
use std::path::{Path, PathBuf};

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn parent_name(path: &Path) -> String {
    path.parent().map(file_name).unwrap_or_default()
}

/// One log line for an event.
pub fn format_event(event: &Event) -> String {
    match event {
        Event::WorkdirSkipped { root } => {
            format!("Skipping {}: no publish folder", root.display())
        }
        Event::WorkdirStarted { workdir } => format!("Reconciling {}", workdir.display()),
        Event::DirectoryCreated { path } => format!("Adding directory {}", path.display()),
        Event::DirectoryFailed { path, reason } => {
            format!("Cannot create directory {}: {}", path.display(), reason)
        }
        Event::PreviewCreated { small, large } => {
            format!("Creating {} from {}", small.display(), large.display())
        }
        Event::PreviewUpdated { small, large } => {
            format!("Updating {} from {}", small.display(), large.display())
        }
        Event::PreviewFailed {
            small,
            large,
            reason,
        } => format!(
            "Cannot create {} from {}: {}",
            small.display(),
            large.display(),
            reason
        ),
        Event::LinkAdded { link, .. } => format!(
            "Adding link to {} in {}",
            file_name(link),
            parent_name(link)
        ),
        Event::LinkRepaired { link, from, to } => format!(
            "Replacing link {} from {} to {}",
            link.display(),
            from.display(),
            to.display()
        ),
        Event::LinkFailed { link, reason } => {
            format!("Cannot fix link {}: {}", link.display(), reason)
        }
        Event::ListingFailed { path, reason } => {
            format!("Cannot list {}: {}", path.display(), reason)
        }
        Event::FileStaged { path } => format!("Adding to git {}", path.display()),
        Event::BackupCreated { source, backup } => format!(
            "Adding hardlink to {} at {}",
            source.display(),
            backup.display()
        ),
        Event::BackupFailed { source, reason } => {
            format!("Cannot back up {}: {}", source.display(), reason)
        }
    }
}

/// Paths one per line, as given.
pub fn format_paths(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|p| p.display().to_string()).collect()
}

pub fn print_paths(paths: &[PathBuf]) {
    for line in format_paths(paths) {
        println!("{}", line);
    }
}
