//! Source photos and the artifacts derived from them.
//!
//! A source is a symlink inside a workdir pointing at an original photo kept
//! elsewhere in the archive. Two kinds exist:
//!
//! | Kind | Extensions | Large artifact | Preview |
//! |------|------------|----------------|---------|
//! | [`SourceKind::Raw`] | `.nef`, `.cr3` | sibling `.JPG` / `.jpg` export | `<stem>_small.jpg` |
//! | [`SourceKind::Jpeg`] | `.jpg`, `.jpeg` | `<stem>_processed.<ext>`, else the source itself | `<stem>_small.jpg` |
//!
//! Everything here computes paths only. Existence checks used to pick between
//! candidate names are read-only.

use crate::naming;
use std::path::{Path, PathBuf};

const RAW_EXTENSIONS: &[&str] = &["nef", "cr3"];
const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Candidate extensions for a raw source's exported JPEG, in preference order.
/// The first one is also the default when neither exists.
const RAW_LARGE_EXTENSIONS: &[&str] = &["JPG", "jpg"];

/// Candidate extensions for a JPEG source's processed variant, first match wins.
const PROCESSED_EXTENSIONS: &[&str] = &["jpg", "JPG", "jpeg", "JPEG"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SourceKind {
    Raw,
    Jpeg,
}

/// Classify one directory entry.
///
/// Only symlinks can be sources. Plain files, directories and symlinks to
/// directories return `None`; dangling symlinks are still sources. The
/// extension is compared case-insensitively, the rest of the name is left
/// alone.
pub fn classify(path: &Path) -> Option<SourceKind> {
    if !path.is_symlink() || path.is_dir() {
        return None;
    }
    kind_for_extension(path)
}

fn kind_for_extension(path: &Path) -> Option<SourceKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if RAW_EXTENSIONS.contains(&ext.as_str()) {
        Some(SourceKind::Raw)
    } else if JPEG_EXTENSIONS.contains(&ext.as_str()) {
        Some(SourceKind::Jpeg)
    } else {
        None
    }
}

/// One user-provided photo in a workdir.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceImage {
    pub path: PathBuf,
    pub kind: SourceKind,
}

impl SourceImage {
    pub fn new(path: PathBuf, kind: SourceKind) -> Self {
        Self { path, kind }
    }

    /// Build a source from a directory entry, if it classifies as one.
    pub fn from_entry(path: PathBuf) -> Option<Self> {
        classify(&path).map(|kind| Self::new(path, kind))
    }

    /// File name of the source link itself.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn sibling(&self, name: &str) -> PathBuf {
        match self.path.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        }
    }

    /// Full-resolution image the preview is generated from.
    pub fn large(&self) -> PathBuf {
        match self.kind {
            SourceKind::Raw => RAW_LARGE_EXTENSIONS
                .iter()
                .map(|ext| self.path.with_extension(ext))
                .find(|p| p.exists())
                .unwrap_or_else(|| self.path.with_extension(RAW_LARGE_EXTENSIONS[0])),
            SourceKind::Jpeg => {
                let stem = self.stem();
                PROCESSED_EXTENSIONS
                    .iter()
                    .map(|ext| self.sibling(&naming::processed_name(&stem, ext)))
                    .find(|p| p.exists())
                    .unwrap_or_else(|| self.path.clone())
            }
        }
    }

    /// Preview file living beside the source.
    pub fn small(&self) -> PathBuf {
        self.sibling(&naming::small_name(&self.stem()))
    }
}
