use tracing::{debug, info};

use super::data::CurrentItem;
use super::error::Result;
use super::store::Store;

pub const NO_IMAGES: &str = "No images found.";

/// Where the gallery is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryState {
    /// No gallery view open
    Closed,
    /// Open, nothing to show
    Empty,
    /// Open on the item at this 0-based index
    Browsing(usize),
}

/// Outcome of `Gallery::delete_current`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deleted {
    pub filename: String,
    /// False when the filesystem refused the removal; the file is still on
    /// disk and comes back on the next reload
    pub image_removed: bool,
}

/// Gallery flow: the loaded item list and a cursor into it.
///
/// Invariant: in `Browsing(index)`, `index < items.len()`. In `Empty` and
/// `Closed` nothing is selected.
#[derive(Debug)]
pub struct Gallery {
    state: GalleryState,
    items: Vec<String>,
}

impl Default for Gallery {
    fn default() -> Self {
        Self::new()
    }
}

impl Gallery {
    pub fn new() -> Self {
        Gallery {
            state: GalleryState::Closed,
            items: Vec::new(),
        }
    }

    pub fn state(&self) -> GalleryState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != GalleryState::Closed
    }

    /// Open the gallery and load the store's items.
    ///
    /// Does nothing if already open; use `refresh` to reload. If the load
    /// fails the gallery stays closed.
    pub fn open(&mut self, store: &Store) -> Result<()> {
        if self.is_open() {
            debug!("gallery already open");
            return Ok(());
        }

        self.items = store.list_items()?;
        self.state = if self.items.is_empty() {
            GalleryState::Empty
        } else {
            GalleryState::Browsing(0)
        };

        info!("gallery opened with {} items", self.items.len());
        Ok(())
    }

    pub fn close(&mut self) {
        self.state = GalleryState::Closed;
        self.items.clear();
    }

    /// Reload from the store, keeping the cursor where it was when possible.
    ///
    /// No-op while closed. On failure the previous list is kept.
    pub fn refresh(&mut self, store: &Store) -> Result<()> {
        if !self.is_open() {
            return Ok(());
        }

        self.items = store.list_items()?;
        self.state = match (self.state, self.items.len()) {
            (_, 0) => GalleryState::Empty,
            (GalleryState::Browsing(index), count) => GalleryState::Browsing(index.min(count - 1)),
            _ => GalleryState::Browsing(0),
        };

        debug!("gallery refreshed: {:?} of {}", self.state, self.items.len());
        Ok(())
    }

    /// Step forward, wrapping from the last item to the first
    pub fn next(&mut self) {
        if let GalleryState::Browsing(index) = self.state {
            self.state = GalleryState::Browsing((index + 1) % self.items.len());
        }
    }

    /// Step back, wrapping from the first item to the last
    pub fn previous(&mut self) {
        if let GalleryState::Browsing(index) = self.state {
            let count = self.items.len();
            self.state = GalleryState::Browsing((index + count - 1) % count);
        }
    }

    /// Delete the item under the cursor from the store and the list.
    ///
    /// The following item slides into view; deleting the last item moves
    /// the cursor back one. Returns None when nothing was selected. If the
    /// store fails the list is left as is.
    pub fn delete_current(&mut self, store: &Store) -> Result<Option<Deleted>> {
        let GalleryState::Browsing(index) = self.state else {
            return Ok(None);
        };

        let image_removed = store.delete_item(&self.items[index])?;
        let removed = self.items.remove(index);

        self.state = match self.items.len() {
            0 => GalleryState::Empty,
            count if index >= count => GalleryState::Browsing(count - 1),
            _ => GalleryState::Browsing(index),
        };

        info!("removed {} from gallery, now {:?}", removed, self.state);
        Ok(Some(Deleted {
            filename: removed,
            image_removed,
        }))
    }

    /// The item under the cursor, with its caption read from the store
    pub fn current(&self, store: &Store) -> Result<Option<CurrentItem>> {
        let GalleryState::Browsing(index) = self.state else {
            return Ok(None);
        };

        let filename = &self.items[index];
        Ok(Some(CurrentItem {
            image_path: store.image_path(filename),
            filename: filename.clone(),
            caption: store.get_caption(filename)?,
            index,
            count: self.items.len(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::Captions;
    use crate::state::store::CAPTIONS_FILE;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Store pre-filled with the given files, each captioned "caption <name>"
    fn store_with(names: &[&str]) -> (TempDir, Store) {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path().join("stored_images"));
        fs::create_dir_all(store.dir()).unwrap();

        let mut captions = Captions::new();
        for name in names {
            fs::write(store.image_path(name), b"x").unwrap();
            captions.insert(name.to_string(), format!("caption {}", name));
        }
        fs::write(store.dir().join(CAPTIONS_FILE), captions.to_json().unwrap()).unwrap();

        (tmp, store)
    }

    fn opened(names: &[&str]) -> (TempDir, Store, Gallery) {
        let (tmp, store) = store_with(names);
        let mut gallery = Gallery::new();
        gallery.open(&store).unwrap();
        (tmp, store, gallery)
    }

    fn current_name(gallery: &Gallery, store: &Store) -> String {
        gallery.current(store).unwrap().unwrap().filename
    }

    #[test]
    fn test_open_empty_store() {
        let (_tmp, _store, gallery) = opened(&[]);
        assert_eq!(gallery.state(), GalleryState::Empty);
        assert!(gallery.is_open());
    }

    #[test]
    fn test_open_starts_at_first_item() {
        let (_tmp, store, gallery) = opened(&["a.png", "b.png"]);
        assert_eq!(gallery.state(), GalleryState::Browsing(0));

        let item = gallery.current(&store).unwrap().unwrap();
        assert_eq!(item.filename, "a.png");
        assert_eq!(item.caption, "caption a.png");
        assert_eq!(item.image_path, store.dir().join("a.png"));
        assert_eq!((item.index, item.count), (0, 2));
    }

    #[test]
    fn test_open_twice_does_not_reload() {
        let (tmp, store, mut gallery) = opened(&["a.png"]);
        gallery.next();
        let source = tmp.path().join("late.png");
        fs::write(&source, b"x").unwrap();
        store.save_item(&source, "late").unwrap();

        gallery.open(&store).unwrap();
        assert_eq!(gallery.items.len(), 1);
    }

    #[test]
    fn test_next_and_previous_wrap() {
        let (_tmp, store, mut gallery) = opened(&["a.png", "b.png", "c.png"]);

        gallery.previous();
        assert_eq!(current_name(&gallery, &store), "c.png");
        gallery.next();
        assert_eq!(current_name(&gallery, &store), "a.png");
        gallery.next();
        gallery.next();
        gallery.next();
        assert_eq!(gallery.state(), GalleryState::Browsing(0));
    }

    #[test]
    fn test_next_then_previous_is_identity() {
        for count in 1..=4 {
            let names: Vec<String> = (0..count).map(|i| format!("{}.png", i)).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let (_tmp, _store, mut gallery) = opened(&refs);

            for start in 0..count {
                while gallery.state() != GalleryState::Browsing(start) {
                    gallery.next();
                }
                gallery.next();
                gallery.previous();
                assert_eq!(gallery.state(), GalleryState::Browsing(start));
            }
        }
    }

    #[test]
    fn test_navigation_noop_when_empty_or_closed() {
        let (_tmp, _store, mut gallery) = opened(&[]);
        gallery.next();
        gallery.previous();
        assert_eq!(gallery.state(), GalleryState::Empty);

        let mut closed = Gallery::new();
        closed.next();
        assert_eq!(closed.state(), GalleryState::Closed);
    }

    #[test]
    fn test_delete_middle_slides_next_into_view() {
        let (_tmp, store, mut gallery) = opened(&["a.png", "b.png", "c.png"]);
        gallery.next();

        let deleted = gallery.delete_current(&store).unwrap().unwrap();

        assert_eq!(deleted.filename, "b.png");
        assert!(deleted.image_removed);
        assert_eq!(gallery.state(), GalleryState::Browsing(1));
        let item = gallery.current(&store).unwrap().unwrap();
        assert_eq!(item.filename, "c.png");
        assert_eq!(item.caption, "caption c.png");
        assert_eq!(item.count, 2);
        assert!(!store.dir().join("b.png").exists());
    }

    #[test]
    fn test_delete_last_moves_back() {
        let (_tmp, store, mut gallery) = opened(&["a.png", "b.png", "c.png"]);
        gallery.previous();

        gallery.delete_current(&store).unwrap();

        assert_eq!(gallery.state(), GalleryState::Browsing(1));
        assert_eq!(current_name(&gallery, &store), "b.png");
    }

    #[test]
    fn test_delete_everything_ends_empty() {
        let (_tmp, store, mut gallery) = opened(&["a.png", "b.png"]);

        gallery.delete_current(&store).unwrap();
        gallery.delete_current(&store).unwrap();

        assert_eq!(gallery.state(), GalleryState::Empty);
        assert!(gallery.current(&store).unwrap().is_none());
        assert!(store.list_items().unwrap().is_empty());
        assert_eq!(fs::read_to_string(store.dir().join(CAPTIONS_FILE)).unwrap(), "{}");

        assert_eq!(gallery.delete_current(&store).unwrap(), None);
    }

    #[test]
    fn test_refused_delete_is_reported() {
        let (_tmp, store, mut gallery) = opened(&["a.png"]);
        fs::remove_file(store.image_path("a.png")).unwrap();
        fs::create_dir_all(store.image_path("a.png").join("inner")).unwrap();

        let deleted = gallery.delete_current(&store).unwrap().unwrap();

        assert_eq!(deleted.filename, "a.png");
        assert!(!deleted.image_removed);
        assert_eq!(gallery.state(), GalleryState::Empty);
        assert_eq!(store.get_caption("a.png").unwrap(), "caption a.png");
    }

    #[test]
    fn test_refresh_picks_up_new_save() {
        let (tmp, store, mut gallery) = opened(&[]);
        let source = tmp.path().join("new.gif");
        fs::write(&source, b"x").unwrap();
        let saved = store.save_item(&source, "fresh").unwrap();

        gallery.refresh(&store).unwrap();

        assert_eq!(gallery.state(), GalleryState::Browsing(0));
        let item = gallery.current(&store).unwrap().unwrap();
        assert_eq!(item.filename, saved);
        assert_eq!(item.caption, "fresh");
    }

    #[test]
    fn test_refresh_clamps_cursor() {
        let (_tmp, store, mut gallery) = opened(&["a.png", "b.png", "c.png"]);
        gallery.previous();
        fs::remove_file(store.dir().join("c.png")).unwrap();
        fs::remove_file(store.dir().join("b.png")).unwrap();

        gallery.refresh(&store).unwrap();
        assert_eq!(gallery.state(), GalleryState::Browsing(0));

        fs::remove_file(store.dir().join("a.png")).unwrap();
        gallery.refresh(&store).unwrap();
        assert_eq!(gallery.state(), GalleryState::Empty);
    }

    #[test]
    fn test_refresh_while_closed_stays_closed() {
        let (_tmp, store) = store_with(&["a.png"]);
        let mut gallery = Gallery::new();

        gallery.refresh(&store).unwrap();
        assert_eq!(gallery.state(), GalleryState::Closed);
    }

    #[test]
    fn test_close_then_reopen_reloads() {
        let (tmp, store, mut gallery) = opened(&["a.png"]);
        gallery.close();
        assert_eq!(gallery.state(), GalleryState::Closed);
        assert!(gallery.current(&store).unwrap().is_none());

        let source: PathBuf = tmp.path().join("z.png");
        fs::write(&source, b"x").unwrap();
        store.save_item(&source, "z").unwrap();

        gallery.open(&store).unwrap();
        assert_eq!(gallery.items.len(), 2);
        assert_eq!(gallery.state(), GalleryState::Browsing(0));
    }

    #[test]
    fn test_save_then_reopen_shows_caption() {
        let (tmp, store) = store_with(&[]);
        let source = tmp.path().join("photo.jpeg");
        fs::write(&source, b"x").unwrap();
        let saved = store.save_item(&source, "hello").unwrap();

        let mut gallery = Gallery::new();
        gallery.open(&store).unwrap();

        let item = gallery.current(&store).unwrap().unwrap();
        assert_eq!(item.filename, saved);
        assert_eq!(item.caption, "hello");
    }
}
