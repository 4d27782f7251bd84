//! Hotspot matching and alignment algorithms.
//!
//! This module contains the pieces of the mapping engine, leaves first:
//!
//! - **Shells**: expand a component selection to whole UV shells
//! - **Corners**: find the four extremal corners of an arbitrary point set
//! - **Matching**: pick a hotspot by shape or by trim placement
//! - **Alignment**: bounding-box fit, corner-relative remap, trim alignment
//! - **Mapping**: the batch operations that compose all of the above
//!
//! Every function here is a pure computation over its inputs. The host
//! application supplies geometry through [`UvHost`] and applies the returned
//! [`AlignmentResult`](crate::uv::AlignmentResult) itself.

pub mod align;
pub mod corners;
pub mod mapping;
pub mod matching;
pub mod progress;
pub mod shells;

pub use align::{align_bbox, align_relative, align_trim, relative_positions, remap_relative, AlignStrategy};
pub use corners::{find_corners, Corner, Corners};
pub use mapping::{
    map_faces, map_faces_with_progress, map_to_hotspot, map_to_hotspot_with_progress, map_to_trim,
    map_to_trim_with_progress, FaceSelection, FailurePolicy, ItemFailure, ItemMatch, MapOptions,
    MappingReport, UvHost,
};
pub use matching::{match_by_shape, match_by_trim, MatchStrategy, ShapeScore};
pub use progress::Progress;
pub use shells::{group_by_shells, ShellInfo, UvShell};
