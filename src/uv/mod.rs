//! UV-space data types.
//!
//! This module holds the value types the matching and alignment algorithms
//! operate on:
//!
//! - [`UvPoint`] and [`UvBounds`]: points and axis-aligned bounds, with
//!   negative-zero normalization applied before any comparison
//! - [`Rectangle`]: a validated, canonically ordered axis-aligned rectangle
//! - [`UvIsland`]: points paired with the host's UV-component identifiers
//! - [`AlignmentResult`]: the new absolute positions produced by the engine
//!
//! # Example
//!
//! ```
//! use hotspot_uv::uv::{UvBounds, UvIsland};
//! use nalgebra::Point2;
//!
//! let island = UvIsland::from_flat(vec![0u32, 1, 2], &[0.0, 0.0, 2.0, 0.0, 2.0, 1.0]).unwrap();
//! let bounds: UvBounds = island.bounds().unwrap();
//! assert_eq!(bounds.width(), 2.0);
//! assert_eq!(bounds.center(), Point2::new(1.0, 0.5));
//! ```

mod geometry;
mod island;
mod rectangle;

pub use geometry::{
    bounds, normalize, normalize_point, normalize_zero, points_from_flat, points_to_flat,
    UvBounds, UvPoint,
};
pub use island::{AlignmentResult, ComponentId, UvIsland};
pub use rectangle::{round_coord, validate_rectangle, NotARectangle, Rectangle, RECT_DECIMALS};
