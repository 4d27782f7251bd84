//! UV islands and alignment results.

use std::fmt::Debug;
use std::hash::Hash;

use super::geometry::{normalize, points_from_flat, UvBounds, UvPoint};
use crate::error::{HotspotError, Result};

/// Trait for opaque UV-component identifiers supplied by the host.
///
/// Implemented automatically for any type that is cheap to clone, hashable,
/// totally ordered and thread-safe (`String`, integer ids, small structs).
pub trait ComponentId: Clone + Eq + Ord + Hash + Debug + Send + Sync {}

impl<T> ComponentId for T where T: Clone + Eq + Ord + Hash + Debug + Send + Sync {}

/// An ordered set of UV points paired with the components they belong to.
///
/// `components[i]` corresponds to `points[i]`. Points are normalized on
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct UvIsland<C> {
    components: Vec<C>,
    points: Vec<UvPoint>,
}

impl<C: ComponentId> UvIsland<C> {
    /// Build an island from matching component and point lists.
    pub fn new(components: Vec<C>, points: Vec<UvPoint>) -> Result<Self> {
        if components.len() != points.len() {
            return Err(HotspotError::ComponentCountMismatch {
                components: components.len(),
                points: points.len(),
            });
        }
        Ok(Self {
            components,
            points: normalize(&points),
        })
    }

    /// Build an island from a flattened `(u0, v0, u1, v1, ...)` list as
    /// returned by a host geometry query.
    pub fn from_flat(components: Vec<C>, flat: &[f64]) -> Result<Self> {
        let points = points_from_flat(flat)?;
        Self::new(components, points)
    }

    /// Component identifiers, in point order.
    pub fn components(&self) -> &[C] {
        &self.components
    }

    /// UV points, in component order.
    pub fn points(&self) -> &[UvPoint] {
        &self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box of the island's points.
    pub fn bounds(&self) -> Result<UvBounds> {
        UvBounds::of(&self.points)
    }

    /// Pair every component with a new position.
    ///
    /// `new_points` must have the same length as the island.
    pub fn with_points(&self, new_points: Vec<UvPoint>) -> Result<AlignmentResult<C>> {
        if new_points.len() != self.components.len() {
            return Err(HotspotError::ComponentCountMismatch {
                components: self.components.len(),
                points: new_points.len(),
            });
        }
        Ok(AlignmentResult {
            entries: self.components.iter().cloned().zip(new_points).collect(),
        })
    }
}

/// New absolute UV positions, keyed by component.
///
/// This is the only output of the engine. Applying it is up to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentResult<C> {
    entries: Vec<(C, UvPoint)>,
}

impl<C> Default for AlignmentResult<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<C> FromIterator<(C, UvPoint)> for AlignmentResult<C> {
    fn from_iter<I: IntoIterator<Item = (C, UvPoint)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<C> AlignmentResult<C> {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the entries of another result.
    pub fn extend(&mut self, other: AlignmentResult<C>) {
        self.entries.extend(other.entries);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(component, new position)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&C, UvPoint)> + '_ {
        self.entries.iter().map(|(c, p)| (c, *p))
    }

    /// Consume into the raw pair list.
    pub fn into_entries(self) -> Vec<(C, UvPoint)> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    #[test]
    fn test_island_from_flat() {
        let island = UvIsland::from_flat(vec![3u32, 7], &[0.0, -0.0, 1.0, 0.5]).unwrap();
        assert_eq!(island.len(), 2);
        assert_eq!(island.components(), &[3, 7]);
        assert!(island.points()[0].y.is_sign_positive());

        let b = island.bounds().unwrap();
        assert_eq!(b.width(), 1.0);
        assert_eq!(b.height(), 0.5);
    }

    #[test]
    fn test_island_length_mismatch() {
        let err = UvIsland::from_flat(vec![1u32, 2, 3], &[0.0, 0.0, 1.0, 1.0]).unwrap_err();
        assert!(matches!(
            err,
            HotspotError::ComponentCountMismatch {
                components: 3,
                points: 2
            }
        ));
    }

    #[test]
    fn test_with_points() {
        let island = UvIsland::new(
            vec!["a".to_string(), "b".to_string()],
            vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)],
        )
        .unwrap();

        let result = island
            .with_points(vec![Point2::new(0.5, 0.5), Point2::new(0.75, 0.75)])
            .unwrap();
        let pairs: Vec<_> = result.iter().collect();
        assert_eq!(pairs[0], (&"a".to_string(), Point2::new(0.5, 0.5)));
        assert_eq!(pairs[1], (&"b".to_string(), Point2::new(0.75, 0.75)));

        assert!(island.with_points(vec![Point2::origin()]).is_err());
    }
}
