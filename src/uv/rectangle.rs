//! Axis-aligned rectangle validation.
//!
//! A [`Rectangle`] can only be produced by [`validate_rectangle`]: four points
//! that take exactly two distinct U values and two distinct V values once
//! rounded to [`RECT_DECIMALS`] decimal places. Corners are stored in a
//! canonical order so two rectangles built from the same corners compare
//! equal regardless of input order.

use nalgebra::Point2;
use thiserror::Error;

use super::geometry::{normalize_zero, UvBounds, UvPoint};
use crate::error::HotspotError;

/// Decimal places kept when deduplicating corner coordinates.
pub const RECT_DECIMALS: i32 = 4;

/// Round to [`RECT_DECIMALS`] places, normalizing negative zero.
#[inline]
pub fn round_coord(x: f64) -> f64 {
    let scale = 10f64.powi(RECT_DECIMALS);
    normalize_zero((x * scale).round() / scale)
}

/// A set of UV points that failed rectangle validation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{points} point(s) with {distinct_u} distinct U and {distinct_v} distinct V values")]
pub struct NotARectangle {
    /// Number of points received.
    pub points: usize,
    /// Distinct rounded U values (0 if the point count was wrong).
    pub distinct_u: usize,
    /// Distinct rounded V values (0 if the point count was wrong).
    pub distinct_v: usize,
}

impl NotARectangle {
    /// Attach the offending item's identifier.
    pub fn for_item(self, item: impl Into<String>) -> HotspotError {
        HotspotError::NotARectangle { item: item.into() }
    }
}

/// An axis-aligned UV rectangle in canonical corner order.
///
/// Corners are ordered lower-left, lower-right, upper-right, upper-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    corners: [UvPoint; 4],
}

impl Rectangle {
    /// Corners in canonical order.
    #[inline]
    pub fn corners(&self) -> &[UvPoint; 4] {
        &self.corners
    }

    /// Lower-left corner `(min_u, min_v)`.
    #[inline]
    pub fn lower_left(&self) -> UvPoint {
        self.corners[0]
    }

    /// Upper-right corner `(max_u, max_v)`.
    #[inline]
    pub fn upper_right(&self) -> UvPoint {
        self.corners[2]
    }

    /// Bounding box of the rectangle.
    pub fn bounds(&self) -> UvBounds {
        UvBounds {
            min: self.lower_left(),
            max: self.upper_right(),
        }
    }

    /// Extent along U.
    pub fn width(&self) -> f64 {
        self.bounds().width()
    }

    /// Extent along V.
    pub fn height(&self) -> f64 {
        self.bounds().height()
    }

    /// Corners as `[u, v]` pairs, for serialization.
    pub fn to_pairs(&self) -> [[f64; 2]; 4] {
        self.corners.map(|p| [p.x, p.y])
    }
}

/// Validate that four UV points form an axis-aligned rectangle.
///
/// Coordinates are rounded to four decimal places before deduplication.
/// Exactly two distinct U and two distinct V values are required. On success
/// the corners are returned in canonical order regardless of input order.
///
/// # Example
///
/// ```
/// use hotspot_uv::uv::validate_rectangle;
/// use nalgebra::Point2;
///
/// let rect = validate_rectangle(&[
///     Point2::new(1.0, 1.0),
///     Point2::new(0.0, 0.0),
///     Point2::new(0.0, 1.0),
///     Point2::new(1.0, 0.0),
/// ])
/// .unwrap();
/// assert_eq!(rect.lower_left(), Point2::new(0.0, 0.0));
/// assert_eq!(rect.upper_right(), Point2::new(1.0, 1.0));
/// ```
pub fn validate_rectangle(points: &[UvPoint]) -> Result<Rectangle, NotARectangle> {
    if points.len() != 4 {
        return Err(NotARectangle {
            points: points.len(),
            distinct_u: 0,
            distinct_v: 0,
        });
    }

    let us = distinct_sorted(points.iter().map(|p| round_coord(p.x)));
    let vs = distinct_sorted(points.iter().map(|p| round_coord(p.y)));

    if us.len() != 2 || vs.len() != 2 {
        return Err(NotARectangle {
            points: 4,
            distinct_u: us.len(),
            distinct_v: vs.len(),
        });
    }

    Ok(Rectangle {
        corners: [
            Point2::new(us[0], vs[0]),
            Point2::new(us[1], vs[0]),
            Point2::new(us[1], vs[1]),
            Point2::new(us[0], vs[1]),
        ],
    })
}

fn distinct_sorted(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<UvPoint> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_canonical_order() {
        let rect = validate_rectangle(&unit_square()).unwrap();
        assert_eq!(rect.corners(), &unit_square()[..]);
        assert_eq!(rect.width(), 1.0);
        assert_eq!(rect.height(), 1.0);
    }

    #[test]
    fn test_order_invariant() {
        let square = unit_square();
        let expected = validate_rectangle(&square).unwrap();

        // Every permutation of the four corners
        let mut indices = [0usize, 1, 2, 3];
        let mut count = 0;
        permute(&mut indices, 0, &mut |perm: &[usize; 4]| {
            let points: Vec<UvPoint> = perm.iter().map(|&i| square[i]).collect();
            assert_eq!(validate_rectangle(&points).unwrap(), expected);
            count += 1;
        });
        assert_eq!(count, 24);
    }

    fn permute(items: &mut [usize; 4], k: usize, f: &mut dyn FnMut(&[usize; 4])) {
        if k == items.len() {
            f(items);
            return;
        }
        for i in k..items.len() {
            items.swap(k, i);
            permute(items, k + 1, f);
            items.swap(k, i);
        }
    }

    #[test]
    fn test_rounding_tolerance() {
        let rect = validate_rectangle(&[
            Point2::new(0.25000001, 0.5),
            Point2::new(0.75, 0.49999998),
            Point2::new(0.74999999, 0.75),
            Point2::new(0.25, 0.75000002),
        ])
        .unwrap();
        assert_eq!(rect.lower_left(), Point2::new(0.25, 0.5));
        assert_eq!(rect.upper_right(), Point2::new(0.75, 0.75));
    }

    #[test]
    fn test_rounding_never_yields_negative_zero() {
        let rect = validate_rectangle(&[
            Point2::new(-0.00001, -0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(-0.0, 1.0),
        ])
        .unwrap();
        assert!(rect.lower_left().x.is_sign_positive());
        assert!(rect.lower_left().y.is_sign_positive());
    }

    #[test]
    fn test_wrong_point_count() {
        let err = validate_rectangle(&unit_square()[..3]).unwrap_err();
        assert_eq!(err.points, 3);

        let mut five = unit_square();
        five.push(Point2::new(0.5, 0.5));
        assert!(validate_rectangle(&five).is_err());
    }

    #[test]
    fn test_rejects_non_rectangle() {
        // Trapezoid: three distinct U values
        let err = validate_rectangle(&[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.8, 1.0),
            Point2::new(0.0, 1.0),
        ])
        .unwrap_err();
        assert_eq!(err.distinct_u, 3);
        assert_eq!(err.distinct_v, 2);
    }

    #[test]
    fn test_rejects_collapsed() {
        // All four points on one vertical line
        let err = validate_rectangle(&[
            Point2::new(0.5, 0.0),
            Point2::new(0.5, 1.0),
            Point2::new(0.5, 0.0),
            Point2::new(0.5, 1.0),
        ])
        .unwrap_err();
        assert_eq!(err.distinct_u, 1);

        let tagged = err.for_item("plane.f[2]");
        assert!(matches!(tagged, HotspotError::NotARectangle { item } if item == "plane.f[2]"));
    }
}
