//! UV point primitives.
//!
//! Negative-zero normalization, flattened coordinate conversion and
//! axis-aligned bounds. Everything else in the crate builds on these.

use nalgebra::Point2;

use crate::error::{HotspotError, Result};

/// A 2D texture-space coordinate `(u, v)`.
pub type UvPoint = Point2<f64>;

/// Map `-0.0` to `0.0`, leaving every other value untouched.
#[inline]
pub fn normalize_zero(x: f64) -> f64 {
    // -0.0 == 0.0, so this also rewrites +0.0 to itself
    if x == 0.0 {
        0.0
    } else {
        x
    }
}

/// Normalize a single point so neither coordinate is negative zero.
#[inline]
pub fn normalize_point(p: UvPoint) -> UvPoint {
    Point2::new(normalize_zero(p.x), normalize_zero(p.y))
}

/// Normalize every point in a sequence.
///
/// # Example
///
/// ```
/// use hotspot_uv::uv::normalize;
/// use nalgebra::Point2;
///
/// let points = normalize(&[Point2::new(-0.0, 1.0)]);
/// assert!(points[0].x.is_sign_positive());
/// ```
pub fn normalize(points: &[UvPoint]) -> Vec<UvPoint> {
    points.iter().copied().map(normalize_point).collect()
}

/// Convert a flattened `(u0, v0, u1, v1, ...)` list into normalized points.
pub fn points_from_flat(flat: &[f64]) -> Result<Vec<UvPoint>> {
    if flat.len() % 2 != 0 {
        return Err(HotspotError::OddCoordinateCount { count: flat.len() });
    }
    Ok(flat
        .chunks_exact(2)
        .map(|uv| normalize_point(Point2::new(uv[0], uv[1])))
        .collect())
}

/// Flatten points back into a `(u0, v0, u1, v1, ...)` list.
pub fn points_to_flat(points: &[UvPoint]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x, p.y]).collect()
}

/// Axis-aligned bounding box in UV space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvBounds {
    /// Minimum corner `(min_u, min_v)`.
    pub min: UvPoint,
    /// Maximum corner `(max_u, max_v)`.
    pub max: UvPoint,
}

impl UvBounds {
    /// Create bounds from explicit extents.
    pub fn new(min_u: f64, max_u: f64, min_v: f64, max_v: f64) -> Self {
        Self {
            min: Point2::new(min_u, min_v),
            max: Point2::new(max_u, max_v),
        }
    }

    /// Compute the bounds of a point set.
    ///
    /// Returns [`HotspotError::EmptyInput`] for an empty slice. Callers must
    /// still check [`width`](Self::width) and [`height`](Self::height) before
    /// dividing by them.
    pub fn of(points: &[UvPoint]) -> Result<Self> {
        let (first, rest) = points
            .split_first()
            .ok_or(HotspotError::EmptyInput { what: "UV points" })?;
        let first = normalize_point(*first);

        let mut min = first;
        let mut max = first;
        for p in rest.iter().copied().map(normalize_point) {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }

        Ok(Self { min, max })
    }

    /// The bounds as `(min_u, max_u, min_v, max_v)`.
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.min.x, self.max.x, self.min.y, self.max.y)
    }

    /// Extent along U.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Extent along V.
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Center of the box.
    #[inline]
    pub fn center(&self) -> UvPoint {
        Point2::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    /// True if the box has zero width or zero height.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }
}

/// Compute `(min_u, max_u, min_v, max_v)` of a point set.
pub fn bounds(points: &[UvPoint]) -> Result<(f64, f64, f64, f64)> {
    UvBounds::of(points).map(|b| b.as_tuple())
}
