//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::preview_dimensions;
use super::params::{Quality, ResizeParams};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Width of every generated preview, in pixels.
pub const PREVIEW_WIDTH: u32 = 1024;

/// Configuration for preview generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewConfig {
    pub width: u32,
    pub quality: Quality,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: PREVIEW_WIDTH,
            quality: Quality::default(),
        }
    }
}

/// Write a preview of `large` to `small`, scaled to the configured width.
///
/// Returns the dimensions of the written preview.
pub fn create_preview(
    backend: &impl ImageBackend,
    large: &Path,
    small: &Path,
    config: &PreviewConfig,
) -> Result<(u32, u32)> {
    let dims = backend.identify(large)?;
    let (width, height) = preview_dimensions((dims.width, dims.height), config.width);

    backend.resize(&ResizeParams {
        source: large.to_path_buf(),
        output: small.to_path_buf(),
        width,
        height,
        quality: config.quality,
    })?;

    Ok((width, height))
}
