//! Capturing hotspots from rectangular faces.

use super::{Hotspot, HotspotLibrary, HOTSPOT_PREFIX};
use crate::error::{HotspotError, Result};
use crate::uv::{validate_rectangle, UvPoint};

/// Build a hotspot library from a face selection.
///
/// Each `(face label, UV points)` pair must form an axis-aligned rectangle.
/// Faces are keyed `hotspot_1`, `hotspot_2`, ... in selection order. Capture
/// is all-or-nothing: if any face fails validation, every failing face is
/// reported in [`HotspotError::CaptureFailed`] and no library is produced.
///
/// The texture reference is stored only when it is present and non-empty.
///
/// # Example
///
/// ```
/// use hotspot_uv::library::capture_hotspots;
/// use nalgebra::Point2;
///
/// let faces = vec![(
///     "sheet.f[0]".to_string(),
///     vec![
///         Point2::new(0.0, 0.0),
///         Point2::new(0.5, 0.0),
///         Point2::new(0.5, 0.25),
///         Point2::new(0.0, 0.25),
///     ],
/// )];
/// let library = capture_hotspots(faces, Some("trim.png".to_string())).unwrap();
/// assert_eq!(library.get("hotspot_1").unwrap().face(), Some("sheet.f[0]"));
/// ```
pub fn capture_hotspots<I>(faces: I, texture_path: Option<String>) -> Result<HotspotLibrary>
where
    I: IntoIterator<Item = (String, Vec<UvPoint>)>,
{
    let mut library = HotspotLibrary::new();
    let mut failed = Vec::new();
    let mut count = 0;

    for (i, (face, points)) in faces.into_iter().enumerate() {
        count += 1;
        match validate_rectangle(&points) {
            Ok(rect) => {
                let id = format!("{}{}", HOTSPOT_PREFIX, i + 1);
                log::debug!("{} captured as {}", face, id);
                library.insert(Hotspot::new(id, rect).with_face(face));
            }
            Err(reason) => {
                log::warn!("{} failed validation: {}", face, reason);
                failed.push(face);
            }
        }
    }

    if count == 0 {
        return Err(HotspotError::EmptyInput { what: "faces" });
    }
    if !failed.is_empty() {
        return Err(HotspotError::CaptureFailed { faces: failed });
    }
    if texture_path.as_deref().map_or(true, str::is_empty) {
        log::warn!("no texture path found; library will not reference a texture");
    }

    Ok(library.with_texture_path(texture_path))
}
