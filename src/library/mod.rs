//! Hotspot libraries.
//!
//! A [`HotspotLibrary`] is the set of named rectangular UV regions that
//! islands are matched against, plus an optional texture reference for the
//! sheet they were authored on. Libraries are loaded once (see
//! [`crate::io::library`]) or captured from faces (see [`capture_hotspots`])
//! and are never mutated by the matching algorithms.

mod capture;

pub use capture::capture_hotspots;

use indexmap::IndexMap;

use crate::uv::{Rectangle, UvBounds};

/// Key prefix that marks a hotspot entry in a library file.
pub const HOTSPOT_PREFIX: &str = "hotspot_";

/// Key of the optional texture reference in a library file.
pub const TEXTURE_PATH_KEY: &str = "texture_path";

/// A named rectangular UV region.
#[derive(Debug, Clone, PartialEq)]
pub struct Hotspot {
    id: String,
    rect: Rectangle,
    face: Option<String>,
}

impl Hotspot {
    /// Create a hotspot from a validated rectangle.
    pub fn new(id: impl Into<String>, rect: Rectangle) -> Self {
        Self {
            id: id.into(),
            rect,
            face: None,
        }
    }

    /// Record the face the hotspot was captured from.
    pub fn with_face(mut self, face: impl Into<String>) -> Self {
        self.face = Some(face.into());
        self
    }

    /// Hotspot identifier (library key).
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The hotspot rectangle.
    #[inline]
    pub fn rect(&self) -> &Rectangle {
        &self.rect
    }

    /// Bounding box of the hotspot.
    #[inline]
    pub fn bounds(&self) -> UvBounds {
        self.rect.bounds()
    }

    /// Face the hotspot was captured from, if recorded.
    pub fn face(&self) -> Option<&str> {
        self.face.as_deref()
    }
}

/// One top-level entry of a library file, classified once at load time.
#[derive(Debug, Clone, PartialEq)]
pub enum LibraryEntry {
    /// The sheet's texture reference.
    TexturePath(String),
    /// A well-formed hotspot.
    Hotspot(Hotspot),
    /// Any key that is neither a hotspot nor the texture path.
    Unknown(String),
}

/// A read-only collection of hotspots in stable (insertion) order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotspotLibrary {
    hotspots: IndexMap<String, Hotspot>,
    texture_path: Option<String>,
}

impl HotspotLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a library from classified entries.
    ///
    /// Unknown entries are dropped with a warning. A later hotspot with an
    /// id already present replaces the earlier one in place.
    pub fn from_entries(entries: impl IntoIterator<Item = LibraryEntry>) -> Self {
        let mut library = Self::new();
        for entry in entries {
            match entry {
                LibraryEntry::TexturePath(path) => {
                    library.texture_path = Some(path).filter(|p| !p.is_empty());
                }
                LibraryEntry::Hotspot(hotspot) => library.insert(hotspot),
                LibraryEntry::Unknown(key) => {
                    log::warn!("ignoring unknown library entry '{}'", key);
                }
            }
        }
        library
    }

    /// Attach or replace the texture reference.
    pub fn with_texture_path(mut self, texture_path: Option<String>) -> Self {
        self.texture_path = texture_path.filter(|p| !p.is_empty());
        self
    }

    /// Add a hotspot, replacing any existing hotspot with the same id.
    pub fn insert(&mut self, hotspot: Hotspot) {
        self.hotspots.insert(hotspot.id.clone(), hotspot);
    }

    /// Look up a hotspot by id.
    pub fn get(&self, id: &str) -> Option<&Hotspot> {
        self.hotspots.get(id)
    }

    /// Iterate over hotspots in library order.
    pub fn iter(&self) -> impl Iterator<Item = &Hotspot> + '_ {
        self.hotspots.values()
    }

    /// The texture reference, if any.
    pub fn texture_path(&self) -> Option<&str> {
        self.texture_path.as_deref()
    }

    /// Number of hotspots.
    pub fn len(&self) -> usize {
        self.hotspots.len()
    }

    /// True if the library holds no hotspots.
    pub fn is_empty(&self) -> bool {
        self.hotspots.is_empty()
    }
}
