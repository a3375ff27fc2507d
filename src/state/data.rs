//! Shared data structures for the application state
//!
//! These structs represent the data model that flows between
//! the store on disk and the UI layer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The caption record: generated filename -> caption text.
///
/// Persisted as one flat JSON object, no version or schema field.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Captions(BTreeMap<String, String>);

impl Captions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert to JSON string for writing to disk
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from JSON string (from disk)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn get(&self, filename: &str) -> Option<&str> {
        self.0.get(filename).map(String::as_str)
    }

    pub fn insert(&mut self, filename: String, caption: String) {
        self.0.insert(filename, caption);
    }

    pub fn remove(&mut self, filename: &str) -> Option<String> {
        self.0.remove(filename)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// What the gallery is currently showing.
///
/// Rebuilt after every gallery mutation so the caption, counter and
/// image never drift apart.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentItem {
    /// Full path to the stored image
    pub image_path: PathBuf,
    /// Generated filename (key into the caption record)
    pub filename: String,
    /// Caption text, empty if the record has no entry
    pub caption: String,
    /// 0-based cursor
    pub index: usize,
    /// Number of items currently loaded
    pub count: usize,
}

impl CurrentItem {
    /// Counter text, e.g. "3 / 7"
    pub fn counter(&self) -> String {
        format!("{} / {}", self.index + 1, self.count)
    }
}
