use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::error::{Error, Result};
use super::store::{is_image_name, Store};

pub const INVALID_DROP: &str = "Invalid file dropped.";
pub const MISSING_INPUT: &str = "Please drop an image and enter some text.";

/// Capture flow: one pending image plus the caption being typed.
///
/// Both are cleared after a successful commit.
#[derive(Debug, Default)]
pub struct Capture {
    pending: Option<PathBuf>,
    caption: String,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a dropped (or picked) file as the pending image.
    ///
    /// Only checks that the path is an existing regular file; the previous
    /// pending image, if any, is replaced. On error the state is unchanged.
    pub fn accept_drop(&mut self, path: &Path) -> Result<()> {
        if !path.is_file() {
            debug!("rejected drop of {}", path.display());
            return Err(Error::invalid_input(INVALID_DROP));
        }

        if !is_image_name(&path.to_string_lossy()) {
            warn!(
                "{} has no recognized image extension; it will be saved but not listed",
                path.display()
            );
        }

        info!("pending image: {}", path.display());
        self.pending = Some(path.to_path_buf());
        Ok(())
    }

    pub fn pending(&self) -> Option<&Path> {
        self.pending.as_deref()
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn set_caption(&mut self, caption: String) {
        self.caption = caption;
    }

    /// Save the pending image with the current caption.
    ///
    /// Needs a pending image and a non-empty caption. The caption is taken
    /// verbatim, whitespace-only included. Nothing touches the disk when
    /// either is missing. On a store failure the caption is kept, and so is
    /// the pending image as long as its file still exists to retry with.
    pub fn commit(&mut self, store: &Store) -> Result<String> {
        let Some(pending) = self.pending.as_deref() else {
            return Err(Error::invalid_input(MISSING_INPUT));
        };
        if self.caption.is_empty() {
            return Err(Error::invalid_input(MISSING_INPUT));
        }

        match store.save_item(pending, &self.caption) {
            Ok(filename) => {
                self.clear();
                Ok(filename)
            }
            Err(e) => {
                if !pending.is_file() {
                    warn!("{} is gone, dropping it", pending.display());
                    self.pending = None;
                }
                Err(e)
            }
        }
    }

    /// Drop the pending image and caption
    pub fn clear(&mut self) {
        self.pending = None;
        self.caption.clear();
    }
}
