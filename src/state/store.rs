use chrono::Local;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::data::Captions;
use super::error::{Error, Result};

/// Name of the caption record inside the storage directory
pub const CAPTIONS_FILE: &str = "data.json";

/// Extensions that count as stored images (compared lowercase)
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

/// The Store owns the storage directory: the saved image files plus
/// one caption record mapping each generated filename to its caption.
///
/// Every caption mutation is a full read-modify-write of the record with
/// no locking. Only one writer is expected.
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Create a Store rooted at `dir`.
    ///
    /// Nothing is touched on disk until the first save; the directory is
    /// created lazily.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Store { dir: dir.into() }
    }

    /// Get the path to the storage directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of a stored image
    pub fn image_path(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    fn captions_path(&self) -> PathBuf {
        self.dir.join(CAPTIONS_FILE)
    }

    /// List stored image filenames.
    ///
    /// Derived from a directory scan, not from the caption record, so an
    /// entry without a backing file never shows up. Sorted, which orders
    /// items by their embedded save timestamp.
    pub fn list_items(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::io("read", &self.dir, e)),
        };

        let mut items = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io("read", &self.dir, e))?;

            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name == CAPTIONS_FILE || !is_image_name(&name) {
                continue;
            }
            if !entry.path().is_file() {
                continue;
            }
            items.push(name);
        }

        items.sort();
        debug!("listed {} stored images in {}", items.len(), self.dir.display());
        Ok(items)
    }

    /// Caption for a stored image, empty if the record has no entry
    pub fn get_caption(&self, filename: &str) -> Result<String> {
        let captions = self.load_captions()?;
        Ok(captions.get(filename).unwrap_or_default().to_string())
    }

    /// Move `source` into the storage directory under a freshly generated
    /// name and record its caption. Returns the generated filename.
    ///
    /// The record is read before the move, so an unreadable record leaves
    /// the source untouched. A failure between the move and the rewrite
    /// leaves an image with no caption entry, which readers treat as an
    /// empty caption.
    pub fn save_item(&self, source: &Path, caption: &str) -> Result<String> {
        let filename = generate_filename(source);
        let dest = self.image_path(&filename);

        let mut captions = self.load_captions()?;

        fs::create_dir_all(&self.dir).map_err(|e| Error::io("create", &self.dir, e))?;
        move_file(source, &dest)?;

        captions.insert(filename.clone(), caption.to_string());
        self.write_captions(&captions)?;

        info!("saved {} from {}", filename, source.display());
        Ok(filename)
    }

    /// Remove a stored image and its caption entry.
    ///
    /// An already-missing image is fine. If the filesystem refuses the
    /// removal the image stays on disk, its caption entry is kept and the
    /// call returns `Ok(false)`. `Ok(true)` means the image is gone.
    pub fn delete_item(&self, filename: &str) -> Result<bool> {
        let path = self.image_path(filename);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} already gone, dropping its caption only", filename);
            }
            Err(e) => {
                warn!("could not remove {}: {}", path.display(), e);
                return Ok(false);
            }
        }

        let mut captions = self.load_captions()?;
        captions.remove(filename);
        self.write_captions(&captions)?;

        info!("deleted {}", filename);
        Ok(true)
    }

    /// Load the caption record, or an empty one if it doesn't exist yet
    fn load_captions(&self) -> Result<Captions> {
        let path = self.captions_path();
        match fs::read_to_string(&path) {
            Ok(json) => Ok(Captions::from_json(&json)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Captions::new()),
            Err(e) => Err(Error::io("read", &path, e)),
        }
    }

    /// Replace the caption record on disk with `captions`
    fn write_captions(&self, captions: &Captions) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| Error::io("create", &self.dir, e))?;

        let path = self.captions_path();
        let json = captions.to_json()?;
        fs::write(&path, json).map_err(|e| Error::io("write", &path, e))?;

        debug!("rewrote {} ({} entries)", path.display(), captions.len());
        Ok(())
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("dir", &self.dir).finish()
    }
}

/// Check a filename against the recognized image extensions
pub fn is_image_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// `<YYYYMMDD_HHMMSS>_<32 hex chars><.ext>`, extension kept as given.
///
/// Not checked against existing files; two saves in the same second
/// only differ by the random part.
pub fn generate_filename(source: &Path) -> String {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let suffix = Uuid::new_v4().simple();
    let extension = source
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    format!("{}_{}{}", timestamp, suffix, extension)
}

/// Rename, falling back to copy + remove when the rename is refused but
/// the source is still there (e.g. dropped from another filesystem).
fn move_file(source: &Path, dest: &Path) -> Result<()> {
    let rename_err = match fs::rename(source, dest) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };

    if !source.is_file() {
        return Err(Error::io("move", source, rename_err));
    }

    debug!("rename of {} failed ({}), copying instead", source.display(), rename_err);
    if let Err(e) = fs::copy(source, dest) {
        let _ = fs::remove_file(dest);
        return Err(Error::io("copy", source, e));
    }
    if let Err(e) = fs::remove_file(source) {
        warn!("copied {} but could not remove the original: {}", source.display(), e);
    }

    Ok(())
}
