//! Corner extraction for arbitrary UV point sets.
//!
//! The four target corners are the corners of the point set's bounding box.
//! For each target the nearest actual point is chosen, so this works for
//! shells that are not perfect rectangles.

use crate::error::Result;
use crate::uv::{UvBounds, UvPoint};

/// A corner point and its index in the input sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    /// Index of the point in the input.
    pub index: usize,
    /// The point itself.
    pub point: UvPoint,
}

/// The four extremal corners of a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corners {
    /// Nearest point to `(min_u, max_v)`.
    pub top_left: Corner,
    /// Nearest point to `(max_u, max_v)`.
    pub top_right: Corner,
    /// Nearest point to `(min_u, min_v)`.
    pub bottom_left: Corner,
    /// Nearest point to `(max_u, min_v)`.
    pub bottom_right: Corner,
}

impl Corners {
    /// The corners as an array: bottom-left, bottom-right, top-right, top-left.
    pub fn as_array(&self) -> [Corner; 4] {
        [
            self.bottom_left,
            self.bottom_right,
            self.top_right,
            self.top_left,
        ]
    }

    /// Bounding box spanned by the four corner points.
    ///
    /// This can be smaller than the bounds of the full point set when the
    /// nearest points are not the true extremes.
    pub fn bounds(&self) -> UvBounds {
        let points = self.as_array().map(|c| c.point);
        let mut min = points[0];
        let mut max = points[0];
        for p in &points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        UvBounds { min, max }
    }
}

/// Find the points nearest to the four corners of the bounding box.
///
/// Distances are Euclidean; ties go to the point that appears first.
/// Returns [`HotspotError::EmptyInput`](crate::error::HotspotError::EmptyInput)
/// if `points` is empty.
///
/// # Example
///
/// ```
/// use hotspot_uv::algo::find_corners;
/// use nalgebra::Point2;
///
/// let points = vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(0.5, 0.1),
///     Point2::new(1.0, 0.0),
///     Point2::new(1.0, 1.0),
///     Point2::new(0.0, 1.0),
/// ];
/// let corners = find_corners(&points).unwrap();
/// assert_eq!(corners.top_right.index, 3);
/// ```
pub fn find_corners(points: &[UvPoint]) -> Result<Corners> {
    let bounds = UvBounds::of(points)?;
    let (min_u, max_u, min_v, max_v) = bounds.as_tuple();

    Ok(Corners {
        top_left: nearest(points, UvPoint::new(min_u, max_v)),
        top_right: nearest(points, UvPoint::new(max_u, max_v)),
        bottom_left: nearest(points, UvPoint::new(min_u, min_v)),
        bottom_right: nearest(points, UvPoint::new(max_u, min_v)),
    })
}

/// Nearest point to `target`; `points` must be non-empty.
fn nearest(points: &[UvPoint], target: UvPoint) -> Corner {
    let mut best = Corner {
        index: 0,
        point: points[0],
    };
    let mut best_dist = f64::INFINITY;

    for (index, &point) in points.iter().enumerate() {
        let dist = nalgebra::distance_squared(&point, &target);
        if dist < best_dist {
            best_dist = dist;
            best = Corner { index, point };
        }
    }

    best
}
