//! Preview thumbnails for the capture panel
//!
//! Decodes the pending image and shrinks it to fit a small square so the
//! drop area can show what is about to be saved.

use image::ImageResult;
use std::path::Path;
use tracing::debug;

/// Default edge length of the preview square, in pixels
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 100;

/// Decoded thumbnail, RGBA8, row-major
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Generate a thumbnail that fits in `size` x `size`, keeping aspect ratio.
///
/// Images already smaller than the box are not upscaled.
pub fn thumbnail(path: &Path, size: u32) -> ImageResult<Thumbnail> {
    let img = image::open(path)?;

    let img = if img.width() > size || img.height() > size {
        img.thumbnail(size, size)
    } else {
        img
    };

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    debug!("📸 preview for {}: {}x{}", path.display(), width, height);

    Ok(Thumbnail {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}
