//! # hotspot-uv
//!
//! A UV hotspot matching and alignment engine for texture trim sheets.
//!
//! A *hotspot* is an axis-aligned rectangle on a texture. Given a library of
//! hotspots and a selection of UV geometry, the engine picks the best-fit
//! hotspot for each island and computes new UV positions that place the
//! island inside it.
//!
//! ## Features
//!
//! - **Capture**: build a hotspot library from rectangular UV faces
//! - **Shape matching**: closest width/height, ties broken by location
//! - **Trim matching**: closest vertical center for horizontal trim strips
//! - **Three alignments**: bounding-box fit, corner-relative remap, trim scale
//! - **Host-neutral**: geometry comes in through [`algo::UvHost`], results go
//!   out as [`uv::AlignmentResult`]
//! - **Batch processing**: islands are mapped in parallel with per-item
//!   failure reports
//!
//! ## Quick Start
//!
//! ```
//! use hotspot_uv::prelude::*;
//!
//! let mut scene = UvScene::from_json_str(r#"{
//!     "meshes": [
//!         { "name": "sheet",
//!           "uvs": [[0, 0], [0.5, 0], [0.5, 0.25], [0, 0.25],
//!                   [0, 0.5], [0.25, 0.5], [0.25, 0.75], [0, 0.75]],
//!           "faces": [[0, 1, 2, 3], [4, 5, 6, 7]] },
//!         { "name": "plank",
//!           "uvs": [[0.1, 0.3], [0.6, 0.3], [0.6, 0.55], [0.1, 0.55]],
//!           "faces": [[0, 1, 2, 3]] }
//!     ]
//! }"#).unwrap();
//!
//! // Capture hotspots from the sheet's faces
//! let library = capture_hotspots(scene.face_points(Some("sheet")).unwrap(), None).unwrap();
//! assert_eq!(library.len(), 2);
//!
//! // Map the plank onto the best-fit hotspot
//! let selection = scene.components(Some("plank")).unwrap();
//! let report = map_to_hotspot(&scene.host(), &selection, &library, &MapOptions::default()).unwrap();
//! assert!(report.is_complete());
//! assert_eq!(report.matches[0].hotspot, "hotspot_1");
//!
//! scene.apply(&report.result);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod library;
pub mod uv;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use hotspot_uv::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::{
        map_faces, map_to_hotspot, map_to_trim, FaceSelection, FailurePolicy, MapOptions,
        MappingReport, Progress, UvHost,
    };
    pub use crate::error::{HotspotError, Result};
    pub use crate::io::scene::{UvRef, UvScene};
    pub use crate::library::{capture_hotspots, Hotspot, HotspotLibrary};
    pub use crate::uv::{validate_rectangle, AlignmentResult, Rectangle, UvBounds, UvPoint};
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use crate::io::library;
    use nalgebra::Point2;

    const SCENE: &str = r#"{
        "meshes": [
            { "name": "sheet",
              "uvs": [[0, 0], [0.5, 0], [0.5, 0.25], [0, 0.25],
                      [0, 0.5], [0.25, 0.5], [0.25, 0.75], [0, 0.75]],
              "faces": [[0, 1, 2, 3], [4, 5, 6, 7]] },
            { "name": "plank",
              "uvs": [[0.1, 0.3], [0.6, 0.3], [0.6, 0.55], [0.1, 0.55],
                      [2.0, 2.0], [2.5, 2.0], [2.5, 2.5], [2.0, 2.5]],
              "faces": [[0, 1, 2, 3], [4, 5, 6, 7]] }
        ]
    }"#;

    fn assert_near(a: UvPoint, b: UvPoint) {
        assert!(nalgebra::distance(&a, &b) < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_capture_save_load_map() {
        let mut scene = UvScene::from_json_str(SCENE).unwrap();

        let captured = capture_hotspots(
            scene.face_points(Some("sheet")).unwrap(),
            Some("textures/trim.png".to_string()),
        )
        .unwrap();
        let text = library::to_json_string(&captured).unwrap();
        let loaded = library::from_json_str(&text).unwrap();
        assert!(loaded.skipped.is_empty());
        assert_eq!(loaded.library, captured);

        let selection = scene.components(Some("plank")).unwrap();
        let report =
            map_to_hotspot(&scene.host(), &selection, &loaded.library, &MapOptions::default())
                .unwrap();
        assert_eq!(report.attempted, 2);
        assert!(report.is_complete(), "{}", report);

        // 0.5 x 0.25 plank onto hotspot_1, 0.5 x 0.5 square onto hotspot_1
        // as well (closer in size than the 0.25 square)
        assert_eq!(report.matches[0].hotspot, "hotspot_1");

        assert_eq!(scene.apply(&report.result), 8);
        let plank = scene.mesh_index("plank").unwrap();
        assert_near(scene.point(UvRef::new(plank, 0)).unwrap(), Point2::new(0.0, 0.0));
        assert_near(scene.point(UvRef::new(plank, 2)).unwrap(), Point2::new(0.5, 0.25));

        // The sheet is untouched.
        assert_eq!(scene.point(UvRef::new(0, 1)), Some(Point2::new(0.5, 0.0)));
    }

    #[test]
    fn test_face_mapping_over_scene() {
        let mut scene = UvScene::from_json_str(SCENE).unwrap();
        let library = capture_hotspots(scene.face_points(Some("sheet")).unwrap(), None).unwrap();

        let faces = scene.face_selections(Some("plank")).unwrap();
        let options = MapOptions::default().sequential().with_require_rectangles(true);
        let report = map_faces(&scene.host(), &faces, &library, &options).unwrap();
        assert!(report.is_complete());

        scene.apply(&report.result);
        let plank = scene.mesh_index("plank").unwrap();
        assert_near(scene.point(UvRef::new(plank, 6)).unwrap(), Point2::new(0.5, 0.25));
    }
}
