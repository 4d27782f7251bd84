//! Hotspot selection strategies.
//!
//! Two strategies pick the best-fit hotspot for an island's bounding box:
//!
//! - [`MatchStrategy::Shape`]: smallest `|Δwidth| + |Δheight|`, ties broken
//!   by the distance between bounding-box centers
//! - [`MatchStrategy::Trim`]: closest vertical center, size ignored
//!
//! Both return the first-encountered hotspot when candidates remain tied,
//! and `None` only for an empty library.

use crate::library::{Hotspot, HotspotLibrary};
use crate::uv::UvBounds;

/// Relative tolerance for treating two shape differences as equal.
pub const SHAPE_REL_TOL: f64 = 1e-6;

/// Absolute tolerance for treating two shape differences as equal.
pub const SHAPE_ABS_TOL: f64 = 1e-9;

/// Hotspot selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Match on width and height, then on location.
    Shape,
    /// Match on vertical placement only.
    Trim,
}

impl MatchStrategy {
    /// Select a hotspot for the given island bounds.
    pub fn select<'a>(&self, island: &UvBounds, library: &'a HotspotLibrary) -> Option<&'a Hotspot> {
        match self {
            MatchStrategy::Shape => match_by_shape(island, library),
            MatchStrategy::Trim => match_by_trim(island, library),
        }
    }
}

/// Shape and location scores of one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeScore {
    /// `|Δwidth| + |Δheight|`.
    pub scale_diff: f64,
    /// Euclidean distance between bounding-box centers.
    pub location_diff: f64,
}

impl ShapeScore {
    /// Score a hotspot's bounds against an island's bounds.
    pub fn between(island: &UvBounds, hotspot: &UvBounds) -> Self {
        let scale_diff =
            (island.width() - hotspot.width()).abs() + (island.height() - hotspot.height()).abs();
        let location_diff = nalgebra::distance(&island.center(), &hotspot.center());
        Self {
            scale_diff,
            location_diff,
        }
    }
}

/// `|a - b| <= max(rel * max(|a|, |b|), abs)`.
#[inline]
pub fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= (SHAPE_REL_TOL * a.abs().max(b.abs())).max(SHAPE_ABS_TOL)
}

/// Pick the hotspot whose size is closest to the island's.
///
/// # Example
///
/// ```
/// use hotspot_uv::algo::match_by_shape;
/// use hotspot_uv::library::{Hotspot, HotspotLibrary};
/// use hotspot_uv::uv::{validate_rectangle, UvBounds};
/// use nalgebra::Point2;
///
/// let rect = validate_rectangle(&[
///     Point2::new(0.5, 0.5),
///     Point2::new(0.75, 0.5),
///     Point2::new(0.75, 0.75),
///     Point2::new(0.5, 0.75),
/// ])
/// .unwrap();
/// let mut library = HotspotLibrary::new();
/// library.insert(Hotspot::new("hotspot_1", rect));
///
/// let island = UvBounds::new(0.0, 1.0, 0.0, 1.0);
/// assert_eq!(match_by_shape(&island, &library).unwrap().id(), "hotspot_1");
/// ```
pub fn match_by_shape<'a>(island: &UvBounds, library: &'a HotspotLibrary) -> Option<&'a Hotspot> {
    let scored: Vec<(&Hotspot, ShapeScore)> = library
        .iter()
        .map(|hotspot| (hotspot, ShapeScore::between(island, &hotspot.bounds())))
        .collect();
    let min_scale = scored
        .iter()
        .map(|(_, score)| score.scale_diff)
        .fold(f64::INFINITY, f64::min);

    // Location only decides among candidates tied with the true minimum.
    let mut best: Option<(&Hotspot, ShapeScore)> = None;
    for &(hotspot, score) in &scored {
        if !is_close(score.scale_diff, min_scale) {
            continue;
        }
        if best.map_or(true, |(_, b)| score.location_diff < b.location_diff) {
            best = Some((hotspot, score));
        }
    }

    best.map(|(hotspot, score)| {
        log::debug!(
            "shape match {} (scale diff {:.6}, location diff {:.6})",
            hotspot.id(),
            score.scale_diff,
            score.location_diff
        );
        hotspot
    })
}

/// Pick the hotspot whose vertical center is closest to the island's.
pub fn match_by_trim<'a>(island: &UvBounds, library: &'a HotspotLibrary) -> Option<&'a Hotspot> {
    let island_center = island.center().y;
    let mut best: Option<(&Hotspot, f64)> = None;

    for hotspot in library.iter() {
        let diff = (hotspot.bounds().center().y - island_center).abs();
        if best.map_or(true, |(_, best_diff)| diff < best_diff) {
            best = Some((hotspot, diff));
        }
    }

    best.map(|(hotspot, diff)| {
        log::debug!("trim match {} (vertical diff {:.6})", hotspot.id(), diff);
        hotspot
    })
}
