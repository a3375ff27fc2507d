/// State management module
///
/// This module handles all application state that lives outside the UI:
/// - The on-disk store of images and captions (store.rs)
/// - Shared data structures (data.rs)
/// - The capture flow: pending image + caption (capture.rs)
/// - The gallery flow: loaded items + cursor (gallery.rs)
/// - Errors surfaced to the status line (error.rs)

pub mod capture;
pub mod data;
pub mod error;
pub mod gallery;
pub mod store;

pub use capture::Capture;
pub use data::CurrentItem;
pub use error::Error;
pub use gallery::{Deleted, Gallery, GalleryState};
pub use store::Store;
