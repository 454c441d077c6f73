//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Dimensions of a preview scaled to `target_width`, preserving aspect ratio.
///
/// Images narrower than the target are scaled up, like ImageMagick's
/// `-resize 1024x`. The height never rounds down to zero.
///
/// ```
/// # use photo_publish::imaging::preview_dimensions;
/// assert_eq!(preview_dimensions((6000, 4000), 1024), (1024, 683));
/// assert_eq!(preview_dimensions((4000, 6000), 1024), (1024, 1536));
/// ```
pub fn preview_dimensions(source: (u32, u32), target_width: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    if src_w == 0 {
        return (target_width, src_h.max(1));
    }
    let h = (src_h as f64 * target_width as f64 / src_w as f64).round() as u32;
    (target_width, h.max(1))
}
