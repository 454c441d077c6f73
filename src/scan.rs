//! Directory snapshot: what one workdir currently contains.
//!
//! [`scan`] lists the immediate children of a workdir once and keeps the
//! sources it finds. The derived views on [`Snapshot`] (missing previews,
//! missing service folders, previews not yet distributed, ...) only stat the
//! handful of paths they are about, so the fixup steps can ask for them right
//! before they run and observe what the previous step produced without
//! re-listing the workdir.
//!
//! ## Workdir Layout
//!
//! ```text
//! publish/
//! ├── DSC_0001.NEF -> ../DSC_0001.NEF        # raw source
//! ├── DSC_0001.JPG                           # large artifact (export)
//! ├── DSC_0001_small.jpg                     # preview
//! ├── DSC_0002.JPG -> ../DSC_0002.JPG        # jpeg source
//! ├── DSC_0002_processed.JPG                 # optional large artifact
//! ├── DSC_0002_small.jpg
//! └── flickr/                                # one folder per service
//!     ├── DSC_0002_small.jpg -> ../DSC_0002_small.jpg
//!     └── published/
//!         └── DSC_0001_small.jpg -> ../../DSC_0001_small.jpg
//! ```

use crate::naming;
use crate::source::SourceImage;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Immutable view of one workdir, taken by [`scan`].
#[derive(Debug, Clone)]
pub struct Snapshot {
    root: PathBuf,
    services: Vec<String>,
    sources: Vec<SourceImage>,
}

/// A service folder together with the preview names it is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPreviews {
    pub service_dir: PathBuf,
    pub names: BTreeSet<String>,
}

/// Scan the immediate children of `root` for sources.
///
/// Sources are returned sorted by path. Subdirectories are not descended into.
pub fn scan(root: &Path, services: &[String]) -> Result<Snapshot, ScanError> {
    let entries = fs::read_dir(root).map_err(|source| ScanError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let mut sources: Vec<SourceImage> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter_map(SourceImage::from_entry)
        .collect();
    sources.sort();

    Ok(Snapshot {
        root: root.to_path_buf(),
        services: services.to_vec(),
        sources,
    })
}

impl Snapshot {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn services(&self) -> &[String] {
        &self.services
    }

    pub fn sources(&self) -> &[SourceImage] {
        &self.sources
    }

    pub fn service_dir(&self, service: &str) -> PathBuf {
        self.root.join(service)
    }

    pub fn published_dir(&self, service: &str) -> PathBuf {
        self.service_dir(service).join(naming::PUBLISHED_DIR)
    }

    /// Service folders (and their `published/` children) that do not exist,
    /// in service order, each folder before its `published/` child.
    pub fn missing_subdirs(&self) -> Vec<PathBuf> {
        let mut missing = Vec::new();
        for service in &self.services {
            let dir = self.service_dir(service);
            let published = self.published_dir(service);
            if !dir.exists() {
                missing.push(dir);
            }
            if !published.exists() {
                missing.push(published);
            }
        }
        missing
    }

    /// Sources whose large artifact does not exist.
    pub fn missing_large(&self) -> Vec<&SourceImage> {
        self.sources.iter().filter(|s| !s.large().exists()).collect()
    }

    /// `(large, small)` pairs where the large artifact exists but the preview does not.
    pub fn missing_small(&self) -> Vec<(PathBuf, PathBuf)> {
        self.sources
            .iter()
            .map(|s| (s.large(), s.small()))
            .filter(|(large, small)| large.exists() && !small.exists())
            .collect()
    }

    /// Previews that exist beside their source.
    pub fn existing_small(&self) -> Vec<PathBuf> {
        self.sources
            .iter()
            .map(|s| s.small())
            .filter(|small| small.exists())
            .collect()
    }

    /// Every `*_small*` entry in `<service>/published/`, sorted. Empty if the
    /// folder does not exist.
    pub fn published_small(&self, service: &str) -> Result<Vec<PathBuf>, ScanError> {
        small_entries(&self.published_dir(service))
    }

    /// Previews not yet linked anywhere under `service`'s folder, or `None`
    /// if the folder is absent or nothing is new.
    ///
    /// A preview counts as managed by a service if an entry of that name sits
    /// directly in the service folder or in its `published/` child.
    pub fn new_small_images(&self, service: &str) -> Result<Option<NewPreviews>, ScanError> {
        let service_dir = self.service_dir(service);
        if !service_dir.is_dir() {
            return Ok(None);
        }

        let all_small: BTreeSet<String> = self
            .existing_small()
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();

        let mut managed = small_names(&service_dir)?;
        managed.extend(small_names(&self.published_dir(service))?);

        let names = unmanaged(&all_small, &managed);
        if names.is_empty() {
            return Ok(None);
        }
        Ok(Some(NewPreviews { service_dir, names }))
    }
}

/// Preview names in `all` that are not already in `managed`.
pub fn unmanaged(all: &BTreeSet<String>, managed: &BTreeSet<String>) -> BTreeSet<String> {
    all.difference(managed).cloned().collect()
}

/// Sorted `*_small*` entries directly inside `dir`. A folder that vanished
/// since it was checked lists as empty.
fn small_entries(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(ScanError::Io {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter(|e| naming::is_small_name(&e.file_name().to_string_lossy()))
        .map(|e| e.path())
        .collect();
    paths.sort();
    Ok(paths)
}

fn small_names(dir: &Path) -> Result<BTreeSet<String>, ScanError> {
    Ok(small_entries(dir)?
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect())
}
