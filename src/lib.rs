//! # Photo Publish
//!
//! Keeps a date-organized photo archive ready for publishing. Each date
//! folder has a `publish/` workdir holding symlinks to the photos picked for
//! publication. For every such source the tool makes sure a 1024 px wide
//! `_small.jpg` preview exists and is up to date, and that every configured
//! service folder links to it. It also repairs symlinks that would break when
//! the archive moves, and optionally stages new links with git.
//!
//! # Workdir Layout
//!
//! ```text
//! 2022-01-01/
//! ├── DSC_0001.NEF
//! ├── DSC_0001.JPG
//! └── publish/
//!     ├── DSC_0001.NEF -> ../DSC_0001.NEF      # source (raw)
//!     ├── DSC_0001.JPG                          # large, exported by hand
//!     ├── DSC_0001_small.jpg                    # small, generated
//!     ├── flickr/
//!     │   ├── DSC_0001_small.jpg -> ../DSC_0001_small.jpg
//!     │   └── published/
//!     │       └── DSC_0002_small.jpg -> ../../DSC_0002_small.jpg
//!     └── instagram/
//!         └── published/
//! ```
//!
//! Running the fixup twice in a row is a no-op the second time; every step
//! compares what is on disk against what should be there and only acts on
//! the difference.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`workdirs`] | Finds `publish/` workdirs in flat or month-bucketed archives |
//! | [`source`] | Source classification (raw or JPEG) and derived large/small paths |
//! | [`scan`] | One listing of a workdir plus the views the fixup steps act on |
//! | [`fixup`] | The six reconciliation steps |
//! | [`actions`] | Listings of missing exports and unpublished links; hardlink backup |
//! | [`imaging`] | Preview generation behind the [`imaging::ImageBackend`] trait |
//! | [`vcs`] | Staging new links with git |
//! | [`report`] | Typed events emitted by every step |
//! | [`output`] | Rendering events and listings for the terminal |
//! | [`config`] | `settings.toml` loading and validation |
//! | [`naming`] | Folder and file naming conventions |

pub mod actions;
pub mod config;
pub mod fixup;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod report;
pub mod scan;
pub mod source;
pub mod vcs;
pub mod workdirs;
