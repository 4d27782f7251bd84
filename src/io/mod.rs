//! File I/O.
//!
//! This module reads and writes the two JSON documents the engine works
//! with:
//!
//! | Document | Module | Load | Save | Notes |
//! |----------|--------|------|------|-------|
//! | Hotspot library | [`library`] | ✓ | ✓ | `texture_path` + `hotspot_N` entries |
//! | UV scene snapshot | [`scene`] | ✓ | ✓ | Meshes, UVs and faces from a host |
//!
//! # Usage
//!
//! ```no_run
//! use hotspot_uv::algo::{map_to_hotspot, MapOptions};
//! use hotspot_uv::io::{library, scene};
//!
//! let loaded = library::load("trim_hotspots.json").unwrap();
//! let mut uv_scene = scene::load("scene.json").unwrap();
//!
//! let selection = uv_scene.all_components();
//! let host = uv_scene.host();
//! let report = map_to_hotspot(&host, &selection, &loaded.library, &MapOptions::default()).unwrap();
//!
//! uv_scene.apply(&report.result);
//! scene::save(&uv_scene, "scene_mapped.json").unwrap();
//! ```

pub mod library;
pub mod scene;

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{HotspotError, Result};

/// Read a whole file to a string, tagging failures with the path.
pub(crate) fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| HotspotError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Write a string to a file, creating parent directories as needed.
pub(crate) fn write_text(path: &Path, text: &str) -> Result<()> {
    let save_error = |e: std::io::Error| HotspotError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(save_error)?;
    }
    fs::write(path, text).map_err(save_error)
}

/// Serialize to JSON with four-space indentation.
pub(crate) fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    // serde_json only emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_json_indent() {
        let text = to_pretty_json(&serde_json::json!({ "a": [1, 2] })).unwrap();
        assert_eq!(text, "{\n    \"a\": [\n        1,\n        2\n    ]\n}");
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_text(Path::new("/nonexistent/hotspots.json")).unwrap_err();
        assert!(matches!(err, HotspotError::LoadError { .. }));
    }
}
