//! Centralized naming conventions for the archive layout and derived files.
//!
//! The archive is organized by date, with an optional month level above and
//! optional single-letter splits below:
//!
//! ```text
//! 2022/                      # archive root (what `--root` points at)
//! ├── 01/                    # month bucket (optional level)
//! │   ├── 2022-01-01/        # date root
//! │   │   └── publish/       # workdir
//! │   └── 2022-01-03/
//! │       ├── a/             # letter sub-root
//! │       │   └── publish/
//! │       └── b/
//! │           └── publish/
//! └── 02/
//! ```
//!
//! Inside a workdir, derived artifacts are named after the source's stem:
//! - `DSC_0001.NEF` → large `DSC_0001.JPG`, preview `DSC_0001_small.jpg`
//! - `DSC_0002.JPG` → large `DSC_0002_processed.JPG` (if present), preview `DSC_0002_small.jpg`

/// Month bucket directory names, in calendar order.
pub const MONTH_BUCKETS: [&str; 12] = [
    "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12",
];

/// Letter sub-roots a date root may be split into.
pub const LETTER_ROOTS: [&str; 8] = ["a", "b", "c", "d", "e", "f", "g", "h"];

/// Name of the per-date working directory.
pub const PUBLISH_DIR: &str = "publish";

/// Name of the folder inside each service directory holding released previews.
pub const PUBLISHED_DIR: &str = "published";

/// Name of the folder inside a workdir holding hard-link backups of sources.
pub const BACKUP_DIR: &str = ".backup";

/// Marker every preview name contains (`*_small*`).
pub const SMALL_MARKER: &str = "_small";

/// Whether `name` has the `YYYY-MM-DD` shape of a date root.
///
/// Only the shape is checked (four digits, dash, two digits, dash, two
/// digits); `2022-13-40` is accepted.
pub fn is_date_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    if bytes.len() != 10 {
        return false;
    }
    bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    })
}

/// File name of the preview derived from a source stem.
pub fn small_name(stem: &str) -> String {
    format!("{stem}{SMALL_MARKER}.jpg")
}

/// File name of a post-processed variant of a source stem.
pub fn processed_name(stem: &str, ext: &str) -> String {
    format!("{stem}_processed.{ext}")
}

/// Whether a file name matches the `*_small*` preview glob.
pub fn is_small_name(name: &str) -> bool {
    name.contains(SMALL_MARKER)
}
