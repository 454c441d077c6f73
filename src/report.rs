//! Reporting context threaded through discovery, fixup and backup.
//!
//! Nothing in the library logs directly. Each step emits an [`Event`] into the
//! [`Reporter`] it was handed; the binary uses [`LogReporter`], which renders
//! events with [`output::format_event`](crate::output::format_event) and
//! forwards them to `tracing`. Tests pass a `Vec<Event>` and assert on what
//! was recorded.

use std::path::PathBuf;

/// Something observable that happened while walking or fixing a workdir.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A date root was found but has no `publish/` folder yet.
    WorkdirSkipped { root: PathBuf },
    /// Reconciliation of a workdir is starting.
    WorkdirStarted { workdir: PathBuf },
    DirectoryCreated { path: PathBuf },
    DirectoryFailed { path: PathBuf, reason: String },
    PreviewCreated { small: PathBuf, large: PathBuf },
    PreviewUpdated { small: PathBuf, large: PathBuf },
    PreviewFailed { small: PathBuf, large: PathBuf, reason: String },
    /// A preview was distributed into a service directory.
    LinkAdded { link: PathBuf, target: PathBuf },
    /// A link's target was rewritten to its relative form.
    LinkRepaired { link: PathBuf, from: PathBuf, to: PathBuf },
    LinkFailed { link: PathBuf, reason: String },
    /// A folder inside the workdir could not be listed; the step skipped it.
    ListingFailed { path: PathBuf, reason: String },
    /// A symlink was staged with the version control system.
    FileStaged { path: PathBuf },
    BackupCreated { source: PathBuf, backup: PathBuf },
    BackupFailed { source: PathBuf, reason: String },
}

/// Severity an event is logged at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Error,
}

impl Event {
    pub fn level(&self) -> Level {
        match self {
            Event::WorkdirSkipped { .. } => Level::Debug,
            Event::DirectoryFailed { .. }
            | Event::PreviewFailed { .. }
            | Event::LinkFailed { .. }
            | Event::ListingFailed { .. }
            | Event::BackupFailed { .. } => Level::Error,
            _ => Level::Info,
        }
    }

    /// Whether this event records a change made to the filesystem or index.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Event::DirectoryCreated { .. }
                | Event::PreviewCreated { .. }
                | Event::PreviewUpdated { .. }
                | Event::LinkAdded { .. }
                | Event::LinkRepaired { .. }
                | Event::FileStaged { .. }
                | Event::BackupCreated { .. }
        )
    }
}

/// Sink for [`Event`]s.
pub trait Reporter {
    fn report(&mut self, event: Event);
}

impl Reporter for Vec<Event> {
    fn report(&mut self, event: Event) {
        self.push(event);
    }
}

/// Forwards events to `tracing` at their [`Level`].
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, event: Event) {
        let message = crate::output::format_event(&event);
        match event.level() {
            Level::Debug => tracing::debug!("{message}"),
            Level::Info => tracing::info!("{message}"),
            Level::Error => tracing::error!("{message}"),
        }
    }
}
