//! Alignment transforms.
//!
//! Each transform maps island points onto a hotspot rectangle:
//!
//! - [`align_bbox`]: independent per-axis scale so the island's bounding box
//!   lands exactly on the hotspot
//! - [`align_relative`]: the same fit, but measured against the bounds of
//!   four extracted corners so interior points keep their proportional
//!   position inside a deformed quad
//! - [`align_trim`]: uniform scale to the hotspot's height and a vertical
//!   shift only, for horizontally tiling trims
//!
//! A transform that would divide by a zero span returns
//! [`HotspotError::DegenerateSpan`] and the caller keeps the original points.

use nalgebra::Point2;

use super::corners::Corners;
use crate::error::{HotspotError, Result};
use crate::uv::{normalize, normalize_point, Rectangle, UvBounds, UvPoint};

/// Alignment strategy applied after a hotspot has been selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignStrategy {
    /// Exact bounding-box fit.
    BoundingBox,
    /// Corner-relative remap.
    Relative,
    /// Uniform scale with vertical placement only.
    Trim,
}

fn degenerate(bounds: &UvBounds) -> HotspotError {
    HotspotError::DegenerateSpan {
        item: "island".to_string(),
        width: bounds.width(),
        height: bounds.height(),
    }
}

/// Fit the island's bounding box onto the hotspot rectangle.
///
/// Every point is mapped by `hotspot_min + (p - island_min) * scale` with
/// `scale = hotspot_extent / island_extent` computed per axis.
///
/// # Example
///
/// ```
/// use hotspot_uv::algo::align_bbox;
/// use hotspot_uv::uv::validate_rectangle;
/// use nalgebra::Point2;
///
/// let hotspot = validate_rectangle(&[
///     Point2::new(0.5, 0.5),
///     Point2::new(0.75, 0.5),
///     Point2::new(0.75, 0.75),
///     Point2::new(0.5, 0.75),
/// ])
/// .unwrap();
/// let island = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)];
///
/// let aligned = align_bbox(&island, &hotspot).unwrap();
/// assert_eq!(aligned, vec![Point2::new(0.5, 0.5), Point2::new(0.75, 0.75)]);
/// ```
pub fn align_bbox(points: &[UvPoint], hotspot: &Rectangle) -> Result<Vec<UvPoint>> {
    let points = normalize(points);
    let island = UvBounds::of(&points)?;
    if island.is_degenerate() {
        return Err(degenerate(&island));
    }

    let target = hotspot.bounds();
    let scale_u = target.width() / island.width();
    let scale_v = target.height() / island.height();

    Ok(points
        .iter()
        .map(|p| {
            normalize_point(Point2::new(
                target.min.x + (p.x - island.min.x) * scale_u,
                target.min.y + (p.y - island.min.y) * scale_v,
            ))
        })
        .collect())
}

/// Remap points relative to the bounds of four extracted corners.
///
/// Each point is expressed as `rel = (p - corner_min) / corner_extent` and
/// placed at `hotspot_min + rel * hotspot_extent`. Points outside the
/// corner box keep fractions outside `[0, 1]`.
pub fn align_relative(
    points: &[UvPoint],
    corners: &Corners,
    hotspot: &Rectangle,
) -> Result<Vec<UvPoint>> {
    let points = normalize(points);
    let relative = relative_positions(&points, &corners.bounds())?;
    Ok(remap_relative(&relative, hotspot))
}

/// Position of every point as a fraction of `reference`.
pub fn relative_positions(points: &[UvPoint], reference: &UvBounds) -> Result<Vec<UvPoint>> {
    if reference.is_degenerate() {
        return Err(degenerate(reference));
    }
    let (w, h) = (reference.width(), reference.height());
    Ok(points
        .iter()
        .map(|p| Point2::new((p.x - reference.min.x) / w, (p.y - reference.min.y) / h))
        .collect())
}

/// Place relative positions inside a hotspot rectangle.
pub fn remap_relative(relative: &[UvPoint], hotspot: &Rectangle) -> Vec<UvPoint> {
    let target = hotspot.bounds();
    let (w, h) = (target.width(), target.height());
    relative
        .iter()
        .map(|r| normalize_point(Point2::new(target.min.x + r.x * w, target.min.y + r.y * h)))
        .collect()
}

/// Scale uniformly to the hotspot's height and shift vertically onto it.
///
/// The scale factor is `hotspot_height / island_height`, applied on both
/// axes around the island's mean U and vertical center. Only V receives a
/// translation, so the island keeps its horizontal placement on the trim.
///
/// # Example
///
/// ```
/// use hotspot_uv::algo::align_trim;
/// use hotspot_uv::uv::validate_rectangle;
/// use nalgebra::Point2;
///
/// let trim = validate_rectangle(&[
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(1.0, 2.0),
///     Point2::new(0.0, 2.0),
/// ])
/// .unwrap();
/// let island = vec![Point2::new(2.0, 0.0), Point2::new(2.0, 4.0)];
///
/// let aligned = align_trim(&island, &trim).unwrap();
/// assert_eq!(aligned, vec![Point2::new(2.0, 0.0), Point2::new(2.0, 2.0)]);
/// ```
pub fn align_trim(points: &[UvPoint], hotspot: &Rectangle) -> Result<Vec<UvPoint>> {
    let points = normalize(points);
    let island = UvBounds::of(&points)?;
    let island_height = island.height();
    if island_height == 0.0 {
        return Err(degenerate(&island));
    }

    let scale = hotspot.height() / island_height;
    let centroid_u = points.iter().map(|p| p.x).sum::<f64>() / points.len() as f64;
    let center_v = island.center().y;
    let target_v = hotspot.bounds().center().y;

    Ok(points
        .iter()
        .map(|p| {
            normalize_point(Point2::new(
                centroid_u + (p.x - centroid_u) * scale,
                target_v + (p.y - center_v) * scale,
            ))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::find_corners;
    use crate::uv::validate_rectangle;

    fn rect(u0: f64, v0: f64, u1: f64, v1: f64) -> Rectangle {
        validate_rectangle(&[
            Point2::new(u0, v0),
            Point2::new(u1, v0),
            Point2::new(u1, v1),
            Point2::new(u0, v1),
        ])
        .unwrap()
    }

    fn assert_points_eq(actual: &[UvPoint], expected: &[UvPoint]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!(
                (a.x - e.x).abs() < 1e-10 && (a.y - e.y).abs() < 1e-10,
                "expected {:?}, got {:?}",
                e,
                a
            );
        }
    }

    #[test]
    fn test_bbox_collapses_onto_hotspot() {
        let island = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let aligned = align_bbox(&island, &rect(0.5, 0.5, 0.75, 0.75)).unwrap();
        assert_eq!(
            aligned,
            vec![
                Point2::new(0.5, 0.5),
                Point2::new(0.75, 0.5),
                Point2::new(0.75, 0.75),
                Point2::new(0.5, 0.75),
            ]
        );
    }

    #[test]
    fn test_bbox_identity() {
        let island = vec![
            Point2::new(0.125, 0.25),
            Point2::new(0.625, 0.25),
            Point2::new(0.625, 0.5),
            Point2::new(0.125, 0.5),
        ];
        let aligned = align_bbox(&island, &rect(0.125, 0.25, 0.625, 0.5)).unwrap();
        assert_eq!(aligned, island);
    }

    #[test]
    fn test_bbox_non_uniform_scale() {
        let island = vec![
            Point2::new(2.0, 2.0),
            Point2::new(6.0, 2.0),
            Point2::new(4.0, 3.0),
        ];
        let aligned = align_bbox(&island, &rect(0.0, 0.0, 1.0, 0.5)).unwrap();
        assert_points_eq(
            &aligned,
            &[
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(0.5, 0.5),
            ],
        );
    }

    #[test]
    fn test_bbox_zero_width_rejected() {
        let island = vec![Point2::new(0.3, 0.0), Point2::new(0.3, 1.0)];
        let err = align_bbox(&island, &rect(0.0, 0.0, 1.0, 1.0)).unwrap_err();
        match err {
            HotspotError::DegenerateSpan { width, height, .. } => {
                assert_eq!(width, 0.0);
                assert_eq!(height, 1.0);
            }
            other => panic!("expected DegenerateSpan, got {:?}", other),
        }
    }

    #[test]
    fn test_relative_keeps_interior_proportions() {
        let shell = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.5, 0.25),
        ];
        let corners = find_corners(&shell).unwrap();
        let aligned = align_relative(&shell, &corners, &rect(0.0, 0.5, 0.5, 0.75)).unwrap();
        assert_points_eq(
            &aligned,
            &[
                Point2::new(0.0, 0.5),
                Point2::new(0.5, 0.5),
                Point2::new(0.5, 0.75),
                Point2::new(0.0, 0.75),
                Point2::new(0.125, 0.5625),
            ],
        );
    }

    #[test]
    fn test_relative_uses_corner_bounds() {
        // The bulge above the top edge is not a corner, so it maps above the hotspot
        let shell = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.5),
            Point2::new(0.0, 1.0),
        ];
        let corners = find_corners(&shell).unwrap();
        let aligned = align_relative(&shell, &corners, &rect(0.0, 0.0, 1.0, 1.0)).unwrap();
        assert_points_eq(&aligned[3..4], &[Point2::new(0.5, 1.5)]);
        assert_points_eq(&aligned[2..3], &[Point2::new(1.0, 1.0)]);
    }

    #[test]
    fn test_relative_degenerate_corners() {
        let shell = vec![Point2::new(0.0, 0.0), Point2::new(0.0, 1.0)];
        let corners = find_corners(&shell).unwrap();
        assert!(matches!(
            align_relative(&shell, &corners, &rect(0.0, 0.0, 1.0, 1.0)),
            Err(HotspotError::DegenerateSpan { .. })
        ));
    }

    #[test]
    fn test_trim_preserves_u() {
        let island = vec![Point2::new(2.0, 0.0), Point2::new(2.0, 4.0)];
        let aligned = align_trim(&island, &rect(0.0, 0.0, 1.0, 2.0)).unwrap();
        assert_eq!(aligned, vec![Point2::new(2.0, 0.0), Point2::new(2.0, 2.0)]);
    }

    #[test]
    fn test_trim_scales_around_centroid() {
        // Height 2 onto a trim of height 0.5: factor 0.25
        let island = vec![
            Point2::new(1.0, 1.0),
            Point2::new(5.0, 1.0),
            Point2::new(5.0, 3.0),
            Point2::new(1.0, 3.0),
        ];
        let aligned = align_trim(&island, &rect(0.0, 0.25, 1.0, 0.75)).unwrap();
        assert_points_eq(
            &aligned,
            &[
                Point2::new(2.5, 0.25),
                Point2::new(3.5, 0.25),
                Point2::new(3.5, 0.75),
                Point2::new(2.5, 0.75),
            ],
        );
    }

    #[test]
    fn test_trim_zero_height_rejected() {
        let island = vec![Point2::new(0.0, 0.5), Point2::new(1.0, 0.5)];
        assert!(matches!(
            align_trim(&island, &rect(0.0, 0.0, 1.0, 1.0)),
            Err(HotspotError::DegenerateSpan { .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            align_bbox(&[], &rect(0.0, 0.0, 1.0, 1.0)),
            Err(HotspotError::EmptyInput { .. })
        ));
        assert!(matches!(
            align_trim(&[], &rect(0.0, 0.0, 1.0, 1.0)),
            Err(HotspotError::EmptyInput { .. })
        ));
    }
}
