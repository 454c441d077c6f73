//! Version control staging for the links fixup creates.
//!
//! The archive root may be a git repository that tracks the symlinks (not
//! the photos). After a workdir is fixed, every symlink under it is offered
//! to [`Vcs::add_file`], which stages it unless it is already tracked.
//!
//! Any failure of the `git` command aborts the run: the index state cannot be
//! repaired locally, and the next run will offer the same files again.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VcsError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] io::Error),
    #[error("{command}: {stderr}")]
    CommandFailed { command: String, stderr: String },
}

/// Version control system the fixup registers new links with.
pub trait Vcs {
    /// Tracked paths, relative to the repository root.
    fn tracked_files(&mut self) -> Result<&BTreeSet<PathBuf>, VcsError>;

    /// Stage `path` unless it is already tracked. Returns whether anything
    /// was staged.
    fn add_file(&mut self, path: &Path) -> Result<bool, VcsError>;
}

/// Used when `git = false`: nothing is tracked and nothing is staged.
#[derive(Debug, Default)]
pub struct NoVcs {
    empty: BTreeSet<PathBuf>,
}

impl Vcs for NoVcs {
    fn tracked_files(&mut self) -> Result<&BTreeSet<PathBuf>, VcsError> {
        Ok(&self.empty)
    }

    fn add_file(&mut self, _path: &Path) -> Result<bool, VcsError> {
        Ok(false)
    }
}

/// Drives the `git` binary against the repository at `root`.
///
/// `git ls-files` runs once, on first use; files staged afterwards are added
/// to the cached set.
#[derive(Debug)]
pub struct GitCli {
    root: PathBuf,
    tracked: Option<BTreeSet<PathBuf>>,
}

impl GitCli {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            tracked: None,
        }
    }

    /// Run a git command against the repository and return its stdout.
    pub fn execute(&self, args: &[&str]) -> Result<String, VcsError> {
        let git_dir = format!("--git-dir={}", self.root.join(".git").display());
        let work_tree = format!("--work-tree={}", self.root.display());
        let output = Command::new("git")
            .arg(&git_dir)
            .arg(&work_tree)
            .args(args)
            .current_dir(&self.root)
            .output()?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(VcsError::CommandFailed {
                command: format!("git {} {} {}", git_dir, work_tree, args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    /// `path` relative to the repository root, as git lists it.
    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

impl Vcs for GitCli {
    fn tracked_files(&mut self) -> Result<&BTreeSet<PathBuf>, VcsError> {
        if self.tracked.is_none() {
            // NUL-separated output is never quoted, whatever `core.quotePath` says.
            let listing = self.execute(&["ls-files", "-z"])?;
            self.tracked = Some(
                listing
                    .split('\0')
                    .filter(|p| !p.is_empty())
                    .map(PathBuf::from)
                    .collect(),
            );
        }
        Ok(self.tracked.get_or_insert_with(BTreeSet::new))
    }

    fn add_file(&mut self, path: &Path) -> Result<bool, VcsError> {
        let relative = self.relative(path).to_path_buf();
        if self.tracked_files()?.contains(&relative) {
            return Ok(false);
        }

        let arg = relative.to_string_lossy().into_owned();
        self.execute(&["add", "-f", "--", &arg])?;
        self.tracked
            .get_or_insert_with(BTreeSet::new)
            .insert(relative);
        Ok(true)
    }
}
