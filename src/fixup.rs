//! Reconciliation of one workdir with its expected layout.
//!
//! [`Fixer::run`] applies six steps in order. Each step leaves alone anything
//! already in its target state, so running the sequence again right away
//! changes nothing:
//!
//! 1. create missing service folders and their `published/` children
//! 2. generate missing previews, regenerate previews older than their large artifact
//! 3. link previews into every service folder that does not have them yet
//! 4. rewrite absolute source links as `../<name>`
//! 5. rewrite published links that do not resolve as `../../<name>`
//! 6. stage every symlink with the version control system
//!
//! Step 3 consumes what step 2 wrote and step 6 stages what steps 3 to 5
//! produced; no step depends on a later one.
//!
//! ## Failures
//!
//! A failed mkdir, preview, link or folder listing only affects that item: it
//! is reported as an error event and the next run retries it. "Already
//! exists" means another process got there first and is not reported at all.
//! Version control failures end the run with [`FixupError::Vcs`].

use crate::imaging::{ImageBackend, PreviewConfig, create_preview};
use crate::report::{Event, Reporter};
use crate::scan::{ScanError, Snapshot};
use crate::vcs::{Vcs, VcsError};
use std::fs;
use std::io;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum FixupError {
    #[error("version control: {0}")]
    Vcs(#[from] VcsError),
}

/// What to do about one source's preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewAction {
    Create,
    Update,
}

/// Decide whether a preview needs to be written.
///
/// `small` is `None` when the preview does not exist. An existing preview
/// with the same mtime as the large artifact counts as fresh.
pub fn preview_action(large: SystemTime, small: Option<SystemTime>) -> Option<PreviewAction> {
    match small {
        None => Some(PreviewAction::Create),
        Some(small) if small < large => Some(PreviewAction::Update),
        Some(_) => None,
    }
}

/// Relative target of a link one level below the workdir: `../<name>`.
pub fn one_level_up(name: &str) -> PathBuf {
    Path::new("..").join(name)
}

/// Relative target of a link two levels below the workdir: `../../<name>`.
pub fn two_levels_up(name: &str) -> PathBuf {
    Path::new("..").join("..").join(name)
}

/// Collaborators and settings for reconciling workdirs.
pub struct Fixer<'a, B: ImageBackend> {
    pub backend: &'a B,
    pub vcs: &'a mut dyn Vcs,
    pub reporter: &'a mut dyn Reporter,
    pub preview: PreviewConfig,
}

impl<B: ImageBackend> Fixer<'_, B> {
    /// Run every step against `snapshot`'s workdir.
    pub fn run(&mut self, snapshot: &Snapshot) -> Result<(), FixupError> {
        self.reporter.report(Event::WorkdirStarted {
            workdir: snapshot.root().to_path_buf(),
        });
        self.add_missing_subdirs(snapshot);
        self.create_missing_small_images(snapshot);
        self.add_new_small_files(snapshot);
        self.fixup_source_links(snapshot);
        self.fixup_published_links(snapshot);
        self.add_files_to_repository(snapshot)?;
        Ok(())
    }

    /// Step 1.
    pub fn add_missing_subdirs(&mut self, snapshot: &Snapshot) {
        for path in snapshot.missing_subdirs() {
            match fs::create_dir(&path) {
                Ok(()) => self.reporter.report(Event::DirectoryCreated { path }),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
                Err(e) => self.reporter.report(Event::DirectoryFailed {
                    path,
                    reason: e.to_string(),
                }),
            }
        }
    }

    /// Step 2.
    pub fn create_missing_small_images(&mut self, snapshot: &Snapshot) {
        for source in snapshot.sources() {
            let large = source.large();
            let Some(large_mtime) = modified(&large) else {
                continue;
            };
            let small = source.small();

            let Some(action) = preview_action(large_mtime, modified(&small)) else {
                continue;
            };

            match create_preview(self.backend, &large, &small, &self.preview) {
                Ok(_) => self.reporter.report(match action {
                    PreviewAction::Create => Event::PreviewCreated { small, large },
                    PreviewAction::Update => Event::PreviewUpdated { small, large },
                }),
                Err(e) => self.reporter.report(Event::PreviewFailed {
                    small,
                    large,
                    reason: e.to_string(),
                }),
            }
        }
    }

    /// Step 3.
    pub fn add_new_small_files(&mut self, snapshot: &Snapshot) {
        for service in snapshot.services() {
            let new = match snapshot.new_small_images(service) {
                Ok(Some(new)) => new,
                Ok(None) => continue,
                Err(e) => {
                    self.listing_failed(e);
                    continue;
                }
            };
            for name in &new.names {
                let link = new.service_dir.join(name);
                let target = one_level_up(name);
                match symlink(&target, &link) {
                    Ok(()) => self.reporter.report(Event::LinkAdded { link, target }),
                    Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
                    Err(e) => self.reporter.report(Event::LinkFailed {
                        link,
                        reason: e.to_string(),
                    }),
                }
            }
        }
    }

    /// Step 4. Relative targets are left alone even if they look wrong.
    pub fn fixup_source_links(&mut self, snapshot: &Snapshot) {
        for source in snapshot.sources() {
            let current = match fs::read_link(&source.path) {
                Ok(target) => target,
                Err(e) => {
                    self.reporter.report(Event::LinkFailed {
                        link: source.path.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            if !current.is_absolute() {
                continue;
            }
            self.replace(&source.path, current, one_level_up(&source.name()));
        }
    }

    /// Step 5. A link is repaired only if it does not resolve; one that
    /// resolves to some other existing file is kept, and so is a dangling one
    /// that already has the expected target.
    pub fn fixup_published_links(&mut self, snapshot: &Snapshot) {
        for service in snapshot.services() {
            let links = match snapshot.published_small(service) {
                Ok(links) => links,
                Err(e) => {
                    self.listing_failed(e);
                    continue;
                }
            };
            for path in links {
                let Ok(current) = fs::read_link(&path) else {
                    continue;
                };
                let parent = path.parent().unwrap_or(Path::new(""));
                if parent.join(&current).exists() {
                    continue;
                }
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let expected = two_levels_up(&name);
                if current == expected {
                    continue;
                }
                self.replace(&path, current, expected);
            }
        }
    }

    /// Step 6. Folders that cannot be walked are reported and skipped.
    pub fn add_files_to_repository(&mut self, snapshot: &Snapshot) -> Result<(), FixupError> {
        for entry in WalkDir::new(snapshot.root()).min_depth(1).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.reporter.report(Event::ListingFailed {
                        path: e
                            .path()
                            .unwrap_or_else(|| snapshot.root())
                            .to_path_buf(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            if !is_stageable(&entry) {
                continue;
            }
            let path = entry.into_path();
            if self.vcs.add_file(&path)? {
                self.reporter.report(Event::FileStaged { path });
            }
        }
        Ok(())
    }

    fn listing_failed(&mut self, error: ScanError) {
        let ScanError::Io { path, source } = error;
        self.reporter.report(Event::ListingFailed {
            path,
            reason: source.to_string(),
        });
    }

    fn replace(&mut self, link: &Path, from: PathBuf, to: PathBuf) {
        match replace_link(link, &to) {
            Ok(()) => self.reporter.report(Event::LinkRepaired {
                link: link.to_path_buf(),
                from,
                to,
            }),
            Err(e) => self.reporter.report(Event::LinkFailed {
                link: link.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }
}

/// Point `link` at `target`, replacing whatever link is there.
fn replace_link(link: &Path, target: &Path) -> io::Result<()> {
    match fs::remove_file(link) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    match symlink(target, link) {
        Err(e) if e.kind() != io::ErrorKind::AlreadyExists => Err(e),
        _ => Ok(()),
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Symlinks with an extension in their name. Symlinked directories are
/// listed but not followed.
fn is_stageable(entry: &walkdir::DirEntry) -> bool {
    entry.path_is_symlink() && entry.file_name().to_string_lossy().contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::MockBackend;
    use crate::scan::scan;
    use crate::vcs::NoVcs;
    use crate::vcs::tests::RecordingVcs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn services() -> Vec<String> {
        vec!["test1".to_string(), "test2".to_string()]
    }

    fn set_mtime(path: &Path, time: SystemTime) {
        fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(time)
            .unwrap();
    }

    /// Run the whole fixup over `root`, returning recorded events.
    fn run_fixup(root: &Path, backend: &MockBackend, vcs: &mut dyn Vcs) -> Vec<Event> {
        let mut events: Vec<Event> = Vec::new();
        let snapshot = scan(root, &services()).unwrap();
        Fixer {
            backend,
            vcs,
            reporter: &mut events,
            preview: PreviewConfig::default(),
        }
        .run(&snapshot)
        .unwrap();
        events
    }

    fn mutations(events: &[Event]) -> Vec<&Event> {
        events.iter().filter(|e| e.is_mutation()).collect()
    }

    /// Workdir holding one jpeg source pointing at a real file one level up.
    fn setup_workdir() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let workdir = tmp.path().join("publish");
        fs::create_dir(&workdir).unwrap();
        fs::write(tmp.path().join("DSC_0001.JPG"), "jpeg").unwrap();
        symlink("../DSC_0001.JPG", workdir.join("DSC_0001.JPG")).unwrap();
        tmp
    }

    // =========================================================================
    // Pure decisions
    // =========================================================================

    #[test]
    fn preview_missing_is_created() {
        assert_eq!(
            preview_action(SystemTime::UNIX_EPOCH, None),
            Some(PreviewAction::Create)
        );
    }

    #[test]
    fn preview_older_than_large_is_updated() {
        let large = SystemTime::UNIX_EPOCH + Duration::from_secs(100);
        let small = SystemTime::UNIX_EPOCH + Duration::from_secs(99);
        assert_eq!(preview_action(large, Some(small)), Some(PreviewAction::Update));
    }

    #[test]
    fn preview_same_age_or_newer_is_kept() {
        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(100);
        assert_eq!(preview_action(t, Some(t)), None);
        assert_eq!(preview_action(t, Some(t + Duration::from_secs(1))), None);
    }

    #[test]
    fn relative_targets() {
        assert_eq!(one_level_up("a.NEF"), PathBuf::from("../a.NEF"));
        assert_eq!(two_levels_up("a_small.jpg"), PathBuf::from("../../a_small.jpg"));
    }

    // =========================================================================
    // Individual steps
    // =========================================================================

    #[test]
    fn creates_service_dirs() {
        let tmp = setup_workdir();
        let workdir = tmp.path().join("publish");
        let backend = MockBackend::writing();

        run_fixup(&workdir, &backend, &mut NoVcs::default());

        for service in services() {
            assert!(workdir.join(&service).is_dir());
            assert!(workdir.join(&service).join("published").is_dir());
        }
    }

    #[test]
    fn mkdir_failure_is_reported_and_run_continues() {
        let tmp = setup_workdir();
        let workdir = tmp.path().join("publish");
        // A plain file where a service folder should be: mkdir of its
        // `published/` child fails with NotADirectory.
        fs::write(workdir.join("test1"), "in the way").unwrap();
        let backend = MockBackend::writing();

        let events = run_fixup(&workdir, &backend, &mut NoVcs::default());

        assert!(events.iter().any(|e| matches!(
            e,
            Event::DirectoryFailed { path, .. } if path == &workdir.join("test1/published")
        )));
        assert!(workdir.join("test2/DSC_0001_small.jpg").is_symlink());
    }

    #[test]
    fn generates_preview_and_distributes_it() {
        let tmp = setup_workdir();
        let workdir = tmp.path().join("publish");
        let backend = MockBackend::writing();

        let events = run_fixup(&workdir, &backend, &mut NoVcs::default());

        assert!(workdir.join("DSC_0001_small.jpg").is_file());
        assert!(!workdir.join("DSC_0001_small.jpg").is_symlink());
        for service in services() {
            let link = workdir.join(&service).join("DSC_0001_small.jpg");
            assert_eq!(fs::read_link(&link).unwrap(), PathBuf::from("../DSC_0001_small.jpg"));
            assert!(link.exists());
        }
        assert!(events.iter().any(|e| matches!(e, Event::PreviewCreated { .. })));
    }

    #[test]
    fn preview_failure_does_not_stop_other_sources() {
        let tmp = setup_workdir();
        let workdir = tmp.path().join("publish");
        fs::write(tmp.path().join("DSC_0002.JPG"), "jpeg").unwrap();
        symlink("../DSC_0002.JPG", workdir.join("DSC_0002.JPG")).unwrap();
        let backend = MockBackend::failing_for(workdir.join("DSC_0001.JPG"));

        let events = run_fixup(&workdir, &backend, &mut NoVcs::default());

        assert!(!workdir.join("DSC_0001_small.jpg").exists());
        assert!(workdir.join("DSC_0002_small.jpg").is_file());
        assert!(events.iter().any(|e| matches!(
            e,
            Event::PreviewFailed { small, .. } if small == &workdir.join("DSC_0001_small.jpg")
        )));
        assert!(!workdir.join("test1/DSC_0001_small.jpg").is_symlink());
    }

    #[test]
    fn stale_preview_is_regenerated() {
        let tmp = setup_workdir();
        let workdir = tmp.path().join("publish");
        let small = workdir.join("DSC_0001_small.jpg");
        fs::write(&small, "old").unwrap();
        let now = SystemTime::now();
        set_mtime(&small, now - Duration::from_secs(3600));
        set_mtime(&tmp.path().join("DSC_0001.JPG"), now);
        let backend = MockBackend::writing();

        let events = run_fixup(&workdir, &backend, &mut NoVcs::default());

        assert!(events.iter().any(|e| matches!(e, Event::PreviewUpdated { .. })));
        assert_eq!(fs::read_to_string(&small).unwrap(), "preview");
    }

    #[test]
    fn fresh_preview_is_kept() {
        let tmp = setup_workdir();
        let workdir = tmp.path().join("publish");
        let small = workdir.join("DSC_0001_small.jpg");
        fs::write(&small, "mine").unwrap();
        let now = SystemTime::now();
        set_mtime(&tmp.path().join("DSC_0001.JPG"), now - Duration::from_secs(3600));
        set_mtime(&small, now);
        let backend = MockBackend::writing();

        run_fixup(&workdir, &backend, &mut NoVcs::default());

        assert!(backend.get_operations().is_empty());
        assert_eq!(fs::read_to_string(&small).unwrap(), "mine");
    }

    #[test]
    fn raw_without_export_gets_no_preview() {
        let tmp = TempDir::new().unwrap();
        let workdir = tmp.path().join("publish");
        fs::create_dir(&workdir).unwrap();
        symlink("../DSC_0005.NEF", workdir.join("DSC_0005.NEF")).unwrap();
        let backend = MockBackend::writing();

        run_fixup(&workdir, &backend, &mut NoVcs::default());

        assert!(backend.get_operations().is_empty());
        assert!(!workdir.join("DSC_0005_small.jpg").exists());
    }

    #[test]
    fn raw_preview_made_from_export() {
        let tmp = TempDir::new().unwrap();
        let workdir = tmp.path().join("publish");
        fs::create_dir(&workdir).unwrap();
        symlink("../DSC_0003.NEF", workdir.join("DSC_0003.NEF")).unwrap();
        fs::write(workdir.join("DSC_0003.JPG"), "export").unwrap();
        let backend = MockBackend::writing();

        run_fixup(&workdir, &backend, &mut NoVcs::default());

        assert_eq!(
            backend.resized_outputs(),
            vec![workdir.join("DSC_0003_small.jpg").to_string_lossy().to_string()]
        );
    }

    #[test]
    fn preview_already_in_service_is_not_relinked() {
        let tmp = setup_workdir();
        let workdir = tmp.path().join("publish");
        fs::write(workdir.join("DSC_0001_small.jpg"), "small").unwrap();
        fs::create_dir_all(workdir.join("test1/published")).unwrap();
        symlink(
            "../../DSC_0001_small.jpg",
            workdir.join("test1/published/DSC_0001_small.jpg"),
        )
        .unwrap();
        let backend = MockBackend::writing();

        run_fixup(&workdir, &backend, &mut NoVcs::default());

        assert!(!workdir.join("test1/DSC_0001_small.jpg").exists());
        assert!(workdir.join("test2/DSC_0001_small.jpg").is_symlink());
    }

    #[test]
    fn absolute_source_links_become_relative() {
        let tmp = TempDir::new().unwrap();
        let workdir = tmp.path().join("publish");
        fs::create_dir(&workdir).unwrap();
        let mount = Path::new("/mnt/arch/2022/01/2022-01-01");
        for name in ["DSC_0001.NEF", "DSC_0002.CR3", "DSC_0002.JPG"] {
            symlink(mount.join(name), workdir.join(name)).unwrap();
        }
        let backend = MockBackend::writing();

        run_fixup(&workdir, &backend, &mut NoVcs::default());

        for name in ["DSC_0001.NEF", "DSC_0002.CR3", "DSC_0002.JPG"] {
            assert_eq!(
                fs::read_link(workdir.join(name)).unwrap(),
                PathBuf::from(format!("../{name}"))
            );
        }
    }

    #[test]
    fn relative_source_links_are_untouched() {
        let tmp = TempDir::new().unwrap();
        let workdir = tmp.path().join("publish");
        fs::create_dir(&workdir).unwrap();
        symlink("../../elsewhere/DSC_0001.NEF", workdir.join("DSC_0001.NEF")).unwrap();
        let backend = MockBackend::writing();

        let events = run_fixup(&workdir, &backend, &mut NoVcs::default());

        assert_eq!(
            fs::read_link(workdir.join("DSC_0001.NEF")).unwrap(),
            PathBuf::from("../../elsewhere/DSC_0001.NEF")
        );
        assert!(!events.iter().any(|e| matches!(e, Event::LinkRepaired { .. })));
    }

    #[test]
    fn broken_published_links_are_repaired() {
        let tmp = setup_workdir();
        let workdir = tmp.path().join("publish");
        let backend = MockBackend::writing();
        run_fixup(&workdir, &backend, &mut NoVcs::default());

        let mount = Path::new("/mnt/arch/2022/01/2022-01-01/publish");
        for service in services() {
            let link = workdir.join(&service).join("published/DSC_0009_small.jpg");
            symlink(mount.join("DSC_0009_small.jpg"), &link).unwrap();
        }

        run_fixup(&workdir, &backend, &mut NoVcs::default());

        for service in services() {
            let link = workdir.join(&service).join("published/DSC_0009_small.jpg");
            assert_eq!(
                fs::read_link(&link).unwrap(),
                PathBuf::from("../../DSC_0009_small.jpg")
            );
        }

        // Still dangling, but already in the expected form.
        for _ in 0..2 {
            let events = run_fixup(&workdir, &backend, &mut NoVcs::default());
            assert!(mutations(&events).is_empty(), "{events:?}");
        }
    }

    #[test]
    fn absolute_published_link_is_rewritten_to_same_preview() {
        let tmp = setup_workdir();
        let workdir = tmp.path().join("publish");
        let backend = MockBackend::writing();
        run_fixup(&workdir, &backend, &mut NoVcs::default());

        let preview = workdir.join("DSC_0001_small.jpg");
        let link = workdir.join("test1/published/DSC_0001_small.jpg");
        fs::remove_file(workdir.join("test1/DSC_0001_small.jpg")).unwrap();
        symlink("/mnt/arch/2022/01/2022-01-01/publish/DSC_0001_small.jpg", &link).unwrap();

        let events = run_fixup(&workdir, &backend, &mut NoVcs::default());

        assert_eq!(
            fs::read_link(&link).unwrap(),
            PathBuf::from("../../DSC_0001_small.jpg")
        );
        assert_eq!(
            fs::canonicalize(&link).unwrap(),
            fs::canonicalize(&preview).unwrap()
        );
        assert!(events.iter().any(|e| matches!(
            e,
            Event::LinkRepaired { link: repaired, .. } if repaired == &link
        )));
        assert!(!workdir.join("test1/DSC_0001_small.jpg").is_symlink());
    }

    #[test]
    fn unlistable_published_folder_is_reported_and_run_continues() {
        let tmp = setup_workdir();
        let workdir = tmp.path().join("publish");
        fs::create_dir(workdir.join("test1")).unwrap();
        fs::write(workdir.join("test1/published"), "not a folder").unwrap();
        let backend = MockBackend::writing();

        let events = run_fixup(&workdir, &backend, &mut NoVcs::default());

        assert!(events.iter().any(|e| matches!(
            e,
            Event::ListingFailed { path, .. } if path == &workdir.join("test1/published")
        )));
        assert!(workdir.join("test2/DSC_0001_small.jpg").is_symlink());
        assert!(workdir.join("test2/published").is_dir());
    }

    #[test]
    fn resolving_published_links_are_kept_even_if_absolute() {
        let tmp = setup_workdir();
        let workdir = tmp.path().join("publish");
        let backend = MockBackend::writing();
        run_fixup(&workdir, &backend, &mut NoVcs::default());

        let link = workdir.join("test1/published/DSC_0001_small.jpg");
        let absolute = workdir.join("DSC_0001_small.jpg");
        symlink(&absolute, &link).unwrap();

        run_fixup(&workdir, &backend, &mut NoVcs::default());

        assert_eq!(fs::read_link(&link).unwrap(), absolute);
    }

    #[test]
    fn plain_files_in_published_are_ignored() {
        let tmp = setup_workdir();
        let workdir = tmp.path().join("publish");
        let backend = MockBackend::writing();
        run_fixup(&workdir, &backend, &mut NoVcs::default());

        let file = workdir.join("test1/published/notes_small.txt");
        fs::write(&file, "").unwrap();
        run_fixup(&workdir, &backend, &mut NoVcs::default());

        assert!(file.is_file());
        assert!(!file.is_symlink());
    }

    #[test]
    fn symlinks_are_staged_once() {
        let tmp = setup_workdir();
        let workdir = tmp.path().join("publish");
        let backend = MockBackend::writing();
        let mut vcs = RecordingVcs::default();

        run_fixup(&workdir, &backend, &mut vcs);

        assert_eq!(
            vcs.added,
            vec![
                workdir.join("DSC_0001.JPG"),
                workdir.join("test1/DSC_0001_small.jpg"),
                workdir.join("test2/DSC_0001_small.jpg"),
            ]
        );

        let events = run_fixup(&workdir, &backend, &mut vcs);
        assert_eq!(vcs.added.len(), 3);
        assert!(!events.iter().any(|e| matches!(e, Event::FileStaged { .. })));
    }

    #[test]
    fn vcs_failure_aborts() {
        let tmp = setup_workdir();
        let workdir = tmp.path().join("publish");
        let backend = MockBackend::writing();
        let mut vcs = RecordingVcs {
            fail: true,
            ..RecordingVcs::default()
        };

        let snapshot = scan(&workdir, &services()).unwrap();
        let mut events: Vec<Event> = Vec::new();
        let result = Fixer {
            backend: &backend,
            vcs: &mut vcs,
            reporter: &mut events,
            preview: PreviewConfig::default(),
        }
        .run(&snapshot);

        assert!(matches!(result, Err(FixupError::Vcs(_))));
    }

    // =========================================================================
    // Whole sequence
    // =========================================================================

    #[test]
    fn second_run_changes_nothing() {
        let tmp = setup_workdir();
        let workdir = tmp.path().join("publish");
        symlink("/mnt/arch/DSC_0002.NEF", workdir.join("DSC_0002.NEF")).unwrap();
        fs::write(workdir.join("DSC_0002.JPG"), "export").unwrap();
        let backend = MockBackend::writing();
        let mut vcs = RecordingVcs::default();

        let first = run_fixup(&workdir, &backend, &mut vcs);
        assert!(!mutations(&first).is_empty());

        let second = run_fixup(&workdir, &backend, &mut vcs);
        assert!(mutations(&second).is_empty(), "{second:?}");
    }

    #[test]
    fn preview_created_by_hand_is_distributed() {
        let tmp = setup_workdir();
        let workdir = tmp.path().join("publish");
        let backend = MockBackend::writing();
        run_fixup(&workdir, &backend, &mut NoVcs::default());

        for name in ["DSC_0011.NEF", "DSC_0012.CR3", "DSC_0013.JPG"] {
            symlink("picture", workdir.join(name)).unwrap();
        }
        for stem in ["DSC_0011", "DSC_0012", "DSC_0013"] {
            fs::write(workdir.join(format!("{stem}_small.jpg")), "small").unwrap();
        }
        run_fixup(&workdir, &backend, &mut NoVcs::default());

        for service in services() {
            for stem in ["DSC_0011", "DSC_0012", "DSC_0013"] {
                let link = workdir.join(&service).join(format!("{stem}_small.jpg"));
                assert!(link.is_symlink(), "{}", link.display());
            }
        }
    }
}
