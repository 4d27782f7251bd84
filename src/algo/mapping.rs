//! End-to-end hotspot mapping.
//!
//! The orchestrator composes shell grouping, corner extraction, hotspot
//! matching and alignment into three batch operations:
//!
//! - [`map_to_hotspot`]: per shell, shape matching and corner-relative remap
//! - [`map_to_trim`]: per shell, trim matching and trim alignment
//! - [`map_faces`]: per face, shape matching and bounding-box alignment
//!
//! Items are independent. A failing shell or face is recorded in the
//! [`MappingReport`] and the batch moves on (or stops, under
//! [`FailurePolicy::Abort`]); results of earlier items always stand. Only an
//! empty library or an empty selection fails the whole call.

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use super::align::{align_bbox, align_trim, relative_positions, remap_relative, AlignStrategy};
use super::corners::find_corners;
use super::matching::MatchStrategy;
use super::shells::{group_by_shells, ShellInfo, UvShell};
use super::Progress;
use crate::error::{HotspotError, Result};
use crate::library::{Hotspot, HotspotLibrary};
use crate::uv::{validate_rectangle, AlignmentResult, ComponentId, UvBounds, UvIsland};

/// Geometry queries the engine needs from the host application.
///
/// The host owns meshes and UV sets; the engine only reads through this
/// trait and hands back an [`AlignmentResult`] for the host to apply.
pub trait UvHost: Sync {
    /// Opaque UV-component identifier.
    type Component: ComponentId;
    /// Mesh identifier.
    type Mesh: Clone + Ord + Debug + Send + Sync;

    /// Owning mesh, shell id and full shell membership of a component.
    fn shell_of(
        &self,
        component: &Self::Component,
    ) -> Option<ShellInfo<Self::Component, Self::Mesh>>;

    /// Flattened `(u0, v0, u1, v1, ...)` coordinates, in component order.
    fn uv_coords(&self, components: &[Self::Component]) -> Vec<f64>;
}

/// What to do when one item in a batch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record the failure and continue with the next item.
    #[default]
    Continue,
    /// Stop at the first item whose preconditions fail (no UV components,
    /// no corners, no matching hotspot); later items are not attempted.
    /// Degenerate spans and non-rectangular faces only skip their own item.
    Abort,
}

impl FailurePolicy {
    /// True if the batch must stop after this failure.
    pub fn stops_on(&self, error: &HotspotError) -> bool {
        match self {
            FailurePolicy::Continue => false,
            FailurePolicy::Abort => matches!(
                error,
                HotspotError::EmptyInput { .. } | HotspotError::NoMatchFound { .. }
            ),
        }
    }
}

/// Options for the mapping operations.
#[derive(Debug, Clone)]
pub struct MapOptions {
    /// Whether to use parallel execution (default: true).
    ///
    /// Output order always follows input order.
    pub parallel: bool,

    /// Behaviour on per-item failure.
    pub failure_policy: FailurePolicy,

    /// Reject faces that are not axis-aligned rectangles ([`map_faces`] only).
    pub require_rectangles: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            failure_policy: FailurePolicy::Continue,
            require_rectangles: false,
        }
    }
}

impl MapOptions {
    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the per-item failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Require faces to be rectangles before mapping.
    pub fn with_require_rectangles(mut self, require: bool) -> Self {
        self.require_rectangles = require;
        self
    }
}

/// A face and the UV components it uses.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceSelection<C> {
    /// Face label, used in reports.
    pub face: String,
    /// UV components of the face, in winding order.
    pub components: Vec<C>,
}

/// A successful item and the hotspot it was mapped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemMatch {
    /// Shell or face label.
    pub item: String,
    /// Chosen hotspot id.
    pub hotspot: String,
}

/// A failed item and why it failed.
#[derive(Debug)]
pub struct ItemFailure {
    /// Shell or face label.
    pub item: String,
    /// The failure.
    pub error: HotspotError,
}

/// Outcome of a batch mapping call.
#[derive(Debug)]
pub struct MappingReport<C> {
    /// New UV positions for every successful item, in item order.
    pub result: AlignmentResult<C>,
    /// Items attempted.
    pub attempted: usize,
    /// Items mapped successfully.
    pub succeeded: usize,
    /// Hotspot chosen for each successful item.
    pub matches: Vec<ItemMatch>,
    /// Every failed item.
    pub failures: Vec<ItemFailure>,
}

impl<C> MappingReport<C> {
    fn new() -> Self {
        Self {
            result: AlignmentResult::new(),
            attempted: 0,
            succeeded: 0,
            matches: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// True if every attempted item succeeded.
    pub fn is_complete(&self) -> bool {
        self.succeeded == self.attempted
    }
}

impl<C> fmt::Display for MappingReport<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} mapped", self.succeeded, self.attempted)?;
        for failure in &self.failures {
            write!(
                f,
                "\n  {}: {} ({})",
                failure.item,
                failure.error,
                failure.error.reason_tag()
            )?;
        }
        Ok(())
    }
}

/// Hotspot selection and alignment applied to each item.
#[derive(Debug, Clone, Copy)]
struct Pipeline {
    matcher: MatchStrategy,
    align: AlignStrategy,
}

impl Pipeline {
    const HOTSPOT: Pipeline = Pipeline {
        matcher: MatchStrategy::Shape,
        align: AlignStrategy::Relative,
    };
    const TRIM: Pipeline = Pipeline {
        matcher: MatchStrategy::Trim,
        align: AlignStrategy::Trim,
    };
    const FACE: Pipeline = Pipeline {
        matcher: MatchStrategy::Shape,
        align: AlignStrategy::BoundingBox,
    };

    /// Match and align one island.
    fn run<'a, C: ComponentId>(
        &self,
        island: &UvIsland<C>,
        library: &'a HotspotLibrary,
    ) -> Result<(&'a Hotspot, AlignmentResult<C>)> {
        let points = island.points();
        let (hotspot, aligned) = match self.align {
            AlignStrategy::Relative => {
                let corners = find_corners(points)?;
                let reference = corners.bounds();
                let relative = relative_positions(points, &reference)?;
                let hotspot = self.select(&reference, library)?;
                (hotspot, remap_relative(&relative, hotspot.rect()))
            }
            AlignStrategy::BoundingBox => {
                let hotspot = self.select(&island.bounds()?, library)?;
                (hotspot, align_bbox(points, hotspot.rect())?)
            }
            AlignStrategy::Trim => {
                let hotspot = self.select(&island.bounds()?, library)?;
                (hotspot, align_trim(points, hotspot.rect())?)
            }
        };
        Ok((hotspot, island.with_points(aligned)?))
    }

    fn select<'a>(
        &self,
        bounds: &UvBounds,
        library: &'a HotspotLibrary,
    ) -> Result<&'a Hotspot> {
        self.matcher
            .select(bounds, library)
            .ok_or_else(|| HotspotError::NoMatchFound {
                item: "island".to_string(),
            })
    }
}

/// Map selected shells onto hotspots.
///
/// The selection is expanded to whole UV shells. For each shell the four
/// corners are extracted, every point is expressed relative to the corner
/// bounds, a hotspot is chosen by shape and the points are remapped into it.
///
/// Fails as a whole only when the library is empty or the selection touches
/// no shell.
pub fn map_to_hotspot<H: UvHost>(
    host: &H,
    selection: &[H::Component],
    library: &HotspotLibrary,
    options: &MapOptions,
) -> Result<MappingReport<H::Component>> {
    map_to_hotspot_with_progress(host, selection, library, options, &Progress::none())
}

/// Map selected shells onto hotspots with progress reporting.
pub fn map_to_hotspot_with_progress<H: UvHost>(
    host: &H,
    selection: &[H::Component],
    library: &HotspotLibrary,
    options: &MapOptions,
    progress: &Progress,
) -> Result<MappingReport<H::Component>> {
    map_shells(host, selection, library, options, progress, Pipeline::HOTSPOT)
}

/// Map selected shells onto a trim sheet.
///
/// For each shell the hotspot with the closest vertical center is chosen
/// and the shell is scaled uniformly to its height and moved vertically
/// onto it. Horizontal placement is kept.
pub fn map_to_trim<H: UvHost>(
    host: &H,
    selection: &[H::Component],
    library: &HotspotLibrary,
    options: &MapOptions,
) -> Result<MappingReport<H::Component>> {
    map_to_trim_with_progress(host, selection, library, options, &Progress::none())
}

/// Map selected shells onto a trim sheet with progress reporting.
pub fn map_to_trim_with_progress<H: UvHost>(
    host: &H,
    selection: &[H::Component],
    library: &HotspotLibrary,
    options: &MapOptions,
    progress: &Progress,
) -> Result<MappingReport<H::Component>> {
    map_shells(host, selection, library, options, progress, Pipeline::TRIM)
}

/// Map individual faces onto hotspots by bounding-box fit.
///
/// No shell grouping takes place: every face is treated as its own island.
/// With [`MapOptions::require_rectangles`] faces that are not axis-aligned
/// rectangles fail with [`HotspotError::NotARectangle`].
pub fn map_faces<H: UvHost>(
    host: &H,
    faces: &[FaceSelection<H::Component>],
    library: &HotspotLibrary,
    options: &MapOptions,
) -> Result<MappingReport<H::Component>> {
    map_faces_with_progress(host, faces, library, options, &Progress::none())
}

/// Map individual faces onto hotspots with progress reporting.
pub fn map_faces_with_progress<H: UvHost>(
    host: &H,
    faces: &[FaceSelection<H::Component>],
    library: &HotspotLibrary,
    options: &MapOptions,
    progress: &Progress,
) -> Result<MappingReport<H::Component>> {
    if library.is_empty() {
        return Err(HotspotError::NoUsableHotspots);
    }
    if faces.is_empty() {
        return Err(HotspotError::EmptyInput { what: "faces" });
    }

    let process = |face: &FaceSelection<H::Component>| {
        let island = load_island(host, &face.components)?;
        if options.require_rectangles {
            validate_rectangle(island.points()).map_err(|e| e.for_item(face.face.as_str()))?;
        }
        Pipeline::FACE.run(&island, library)
    };

    Ok(run_batch(
        faces,
        |face| face.face.clone(),
        process,
        options,
        progress,
        "Mapping faces",
    ))
}

fn map_shells<H: UvHost>(
    host: &H,
    selection: &[H::Component],
    library: &HotspotLibrary,
    options: &MapOptions,
    progress: &Progress,
    pipeline: Pipeline,
) -> Result<MappingReport<H::Component>> {
    if library.is_empty() {
        return Err(HotspotError::NoUsableHotspots);
    }

    let shells = group_by_shells(selection, |c| host.shell_of(c));
    if shells.is_empty() {
        return Err(HotspotError::EmptyInput { what: "UV shells" });
    }
    log::info!("mapping {} shell(s) with {:?}", shells.len(), pipeline);

    let process = |shell: &UvShell<H::Component, H::Mesh>| {
        let island = load_island(host, &shell.components)?;
        pipeline.run(&island, library)
    };

    Ok(run_batch(
        &shells,
        UvShell::label,
        process,
        options,
        progress,
        "Mapping shells",
    ))
}

/// Query the host for the coordinates of an item's components.
fn load_island<H: UvHost>(host: &H, components: &[H::Component]) -> Result<UvIsland<H::Component>> {
    if components.is_empty() {
        return Err(HotspotError::EmptyInput {
            what: "UV components",
        });
    }
    let flat = host.uv_coords(components);
    UvIsland::from_flat(components.to_vec(), &flat)
}

type ItemOutcome<'a, C> = Result<(&'a Hotspot, AlignmentResult<C>)>;

/// Process items independently and fold the outcomes in input order.
fn run_batch<'a, T, C, L, P>(
    items: &[T],
    label: L,
    process: P,
    options: &MapOptions,
    progress: &Progress,
    message: &str,
) -> MappingReport<C>
where
    T: Sync,
    C: ComponentId,
    L: Fn(&T) -> String,
    P: Fn(&T) -> ItemOutcome<'a, C> + Sync,
{
    let total = items.len();
    let done = AtomicUsize::new(0);
    let step = |item: &T| {
        let outcome = process(item);
        let current = done.fetch_add(1, Ordering::Relaxed) + 1;
        progress.report(current, total, message);
        outcome
    };

    let mut report = MappingReport::new();

    if options.parallel {
        let outcomes: Vec<ItemOutcome<'a, C>> = items.par_iter().map(step).collect();
        for (item, outcome) in items.iter().zip(outcomes) {
            if !record(&mut report, label(item), outcome, options.failure_policy) {
                break;
            }
        }
    } else {
        for item in items {
            if !record(&mut report, label(item), step(item), options.failure_policy) {
                break;
            }
        }
    }

    report
}

/// Fold one outcome into the report; returns false when the batch must stop.
fn record<C>(
    report: &mut MappingReport<C>,
    item: String,
    outcome: ItemOutcome<'_, C>,
    policy: FailurePolicy,
) -> bool {
    report.attempted += 1;
    match outcome {
        Ok((hotspot, aligned)) => {
            log::info!("mapped {} to {}", item, hotspot.id());
            report.succeeded += 1;
            report.result.extend(aligned);
            report.matches.push(ItemMatch {
                item,
                hotspot: hotspot.id().to_string(),
            });
            true
        }
        Err(error) => {
            let error = error.with_item(item.as_str());
            log::warn!("failed to map {}: {}", item, error);
            let stop = policy.stops_on(&error);
            report.failures.push(ItemFailure { item, error });
            !stop
        }
    }
}
