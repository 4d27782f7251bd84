//! Hotspot library files.
//!
//! A library file is a JSON object:
//!
//! ```json
//! {
//!     "texture_path": "textures/trim.png",
//!     "hotspot_1": { "face": "sheet.f[0]", "uv_coords": [[0.0, 0.0], [0.5, 0.0], [0.5, 0.25], [0.0, 0.25]] }
//! }
//! ```
//!
//! Every key is classified once into a [`LibraryEntry`]. Malformed hotspot
//! entries are skipped with a warning and reported in
//! [`LoadReport::skipped`]; the rest of the library still loads. Entry order
//! follows the file.

use std::path::Path;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{read_text, to_pretty_json, write_text};
use crate::error::{HotspotError, Result};
use crate::library::{Hotspot, HotspotLibrary, LibraryEntry, HOTSPOT_PREFIX, TEXTURE_PATH_KEY};
use crate::uv::{validate_rectangle, UvPoint};

/// On-disk shape of a hotspot entry.
#[derive(Debug, Serialize, Deserialize)]
struct HotspotRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    face: Option<String>,
    uv_coords: Vec<[f64; 2]>,
}

/// A loaded library plus the entries that had to be skipped.
#[derive(Debug)]
pub struct LoadReport {
    /// The usable hotspots.
    pub library: HotspotLibrary,
    /// One [`HotspotError::MalformedLibraryEntry`] per skipped entry.
    pub skipped: Vec<HotspotError>,
    /// Keys that are neither `texture_path` nor a hotspot.
    pub unknown: Vec<String>,
}

/// Load a library from a JSON file.
///
/// # Example
///
/// ```no_run
/// use hotspot_uv::io::library;
///
/// let loaded = library::load("hotspots/trim_hotspots.json").unwrap();
/// println!("{} hotspots", loaded.library.len());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<LoadReport> {
    let path = path.as_ref();
    let text = read_text(path)?;
    from_json_str(&text).map_err(|e| match e {
        HotspotError::Json(e) => HotspotError::LoadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
        other => other,
    })
}

/// Save a library to a JSON file, creating parent directories.
pub fn save<P: AsRef<Path>>(library: &HotspotLibrary, path: P) -> Result<()> {
    let path = path.as_ref();
    let text = to_json_string(library)?;
    write_text(path, &text)?;
    log::info!("hotspots saved to {}", path.display());
    Ok(())
}

/// Parse a library from JSON text.
pub fn from_json_str(text: &str) -> Result<LoadReport> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Object(map) = value else {
        return Err(HotspotError::MalformedLibraryEntry {
            key: "<root>".to_string(),
            reason: "expected a JSON object".to_string(),
        });
    };

    let mut entries = Vec::with_capacity(map.len());
    let mut skipped = Vec::new();
    let mut unknown = Vec::new();
    for (key, value) in map {
        match classify_entry(&key, value) {
            Ok(LibraryEntry::Unknown(key)) => {
                log::warn!("ignoring unknown library entry '{}'", key);
                unknown.push(key);
            }
            Ok(entry) => entries.push(entry),
            Err(err) => {
                log::warn!("skipping library entry: {}", err);
                skipped.push(err);
            }
        }
    }

    Ok(LoadReport {
        library: HotspotLibrary::from_entries(entries),
        skipped,
        unknown,
    })
}

/// Classify one top-level key of a library file.
pub fn classify_entry(key: &str, value: Value) -> Result<LibraryEntry> {
    let malformed = |reason: String| HotspotError::MalformedLibraryEntry {
        key: key.to_string(),
        reason,
    };

    if key == TEXTURE_PATH_KEY {
        return match value {
            Value::String(path) => Ok(LibraryEntry::TexturePath(path)),
            Value::Null => Ok(LibraryEntry::TexturePath(String::new())),
            _ => Err(malformed("texture path must be a string".to_string())),
        };
    }
    if !key.starts_with(HOTSPOT_PREFIX) {
        return Ok(LibraryEntry::Unknown(key.to_string()));
    }

    let record: HotspotRecord =
        serde_json::from_value(value).map_err(|e| malformed(e.to_string()))?;
    if record.uv_coords.len() != 4 {
        return Err(malformed(format!(
            "expected 4 uv pairs, found {}",
            record.uv_coords.len()
        )));
    }

    let points: Vec<UvPoint> = record
        .uv_coords
        .iter()
        .map(|&[u, v]| Point2::new(u, v))
        .collect();
    let rect = validate_rectangle(&points).map_err(|e| malformed(e.to_string()))?;
    if rect.corners()[..] != points[..] {
        log::debug!("{}: uv_coords not in canonical order; reordered", key);
    }

    let hotspot = Hotspot::new(key, rect);
    Ok(LibraryEntry::Hotspot(match record.face {
        Some(face) => hotspot.with_face(face),
        None => hotspot,
    }))
}

/// Serialize a library to pretty-printed JSON.
///
/// The texture path comes first when present, followed by hotspots in
/// library order with their corners in canonical order.
pub fn to_json_string(library: &HotspotLibrary) -> Result<String> {
    let mut map = Map::new();
    if let Some(path) = library.texture_path() {
        map.insert(TEXTURE_PATH_KEY.to_string(), Value::String(path.to_string()));
    }
    for hotspot in library.iter() {
        let record = HotspotRecord {
            face: hotspot.face().map(str::to_string),
            uv_coords: hotspot.rect().to_pairs().to_vec(),
        };
        map.insert(hotspot.id().to_string(), serde_json::to_value(record)?);
    }
    to_pretty_json(&Value::Object(map))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIBRARY: &str = r#"{
        "hotspot_2": { "uv_coords": [[0.5, 0.5], [0.75, 0.5], [0.75, 0.75], [0.5, 0.75]] },
        "texture_path": "textures/trim.png",
        "hotspot_1": { "face": "sheet.f[0]", "uv_coords": [[0.5, 0.25], [0.0, 0.0], [0.5, 0.0], [0.0, 0.25]] },
        "notes": "authored by hand"
    }"#;

    #[test]
    fn test_parse_library() {
        let loaded = from_json_str(LIBRARY).unwrap();
        assert!(loaded.skipped.is_empty());
        assert_eq!(loaded.unknown, vec!["notes"]);

        let library = loaded.library;
        assert_eq!(library.texture_path(), Some("textures/trim.png"));
        let ids: Vec<_> = library.iter().map(|h| h.id()).collect();
        assert_eq!(ids, vec!["hotspot_2", "hotspot_1"]);

        let first = library.get("hotspot_1").unwrap();
        assert_eq!(first.face(), Some("sheet.f[0]"));
        assert_eq!(first.rect().lower_left(), Point2::new(0.0, 0.0));
        assert_eq!(first.rect().upper_right(), Point2::new(0.5, 0.25));
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let text = r#"{
            "hotspot_1": { "face": "a.f[0]" },
            "hotspot_2": { "uv_coords": [[0, 0], [1, 0], [1, 1]] },
            "hotspot_3": { "uv_coords": [[0, 0], [1, 0], [0.5, 1], [0, 1]] },
            "hotspot_4": "not an object",
            "hotspot_5": { "uv_coords": [[0, 0], [1, 0], [1, 1], [0, 1]] }
        }"#;
        let loaded = from_json_str(text).unwrap();

        assert_eq!(loaded.library.len(), 1);
        assert!(loaded.library.get("hotspot_5").is_some());
        assert_eq!(loaded.skipped.len(), 4);
        for err in &loaded.skipped {
            assert_eq!(err.reason_tag(), "malformed-library-entry");
        }
    }

    #[test]
    fn test_null_texture_path_is_absent() {
        let loaded = from_json_str(r#"{ "texture_path": null, "legacy_scale": 2 }"#).unwrap();
        assert_eq!(loaded.library.texture_path(), None);
        assert!(loaded.skipped.is_empty());
        assert_eq!(loaded.unknown, vec!["legacy_scale"]);
    }

    #[test]
    fn test_texture_path_must_be_string() {
        let loaded = from_json_str(r#"{ "texture_path": 3 }"#).unwrap();
        assert!(loaded.library.is_empty());
        assert_eq!(loaded.skipped.len(), 1);
    }

    #[test]
    fn test_root_must_be_object() {
        assert!(matches!(
            from_json_str("[1, 2]"),
            Err(HotspotError::MalformedLibraryEntry { .. })
        ));
        assert!(matches!(
            from_json_str("{ nope"),
            Err(HotspotError::Json(_))
        ));
    }

    #[test]
    fn test_serialized_layout() {
        let library = from_json_str(LIBRARY).unwrap().library;
        let text = to_json_string(&library).unwrap();

        // texture_path first, unknown keys dropped, hotspots in library order
        let keys: Vec<String> = match serde_json::from_str::<Value>(&text).unwrap() {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => panic!("expected object"),
        };
        assert_eq!(keys, vec!["texture_path", "hotspot_2", "hotspot_1"]);
        assert!(text.contains("\"face\": \"sheet.f[0]\""));
        assert!(!text.contains("notes"));

        let reloaded = from_json_str(&text).unwrap();
        assert_eq!(reloaded.library, library);
    }
}
