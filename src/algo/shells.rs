//! UV shell grouping.
//!
//! Alignment has to act on a shell's full boundary to find its true corners,
//! so a selection that touches any component of a shell is expanded to the
//! whole shell.

use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::uv::ComponentId;

/// Shell membership of a single UV component, as reported by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellInfo<C, M> {
    /// Mesh that owns the component.
    pub mesh: M,
    /// Shell id within the mesh's current UV set.
    pub shell: usize,
    /// Every component in that shell.
    pub members: Vec<C>,
}

/// A maximal set of UV-contiguous components on one mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct UvShell<C, M> {
    /// Owning mesh.
    pub mesh: M,
    /// Shell id within the mesh.
    pub shell: usize,
    /// Member components, each listed once.
    pub components: Vec<C>,
}

impl<C, M: Debug> UvShell<C, M> {
    /// Human-readable label used in reports and diagnostics.
    pub fn label(&self) -> String {
        format!("{:?} shell {}", self.mesh, self.shell)
    }
}

/// Partition a selection into whole UV shells.
///
/// `lookup` resolves a component to its mesh, shell id and the full shell
/// membership. Components it cannot resolve are skipped with a warning.
/// Every touched shell is returned once with all of its members, ordered by
/// mesh and then by ascending shell id. Empty input yields an empty vector.
///
/// # Example
///
/// ```
/// use hotspot_uv::algo::{group_by_shells, ShellInfo};
///
/// // Components 0..5 form shell 0, 5..8 form shell 1.
/// let lookup = |c: &u32| {
///     let shell = if *c < 5 { 0 } else { 1 };
///     let members: Vec<u32> = if shell == 0 { (0..5).collect() } else { (5..8).collect() };
///     Some(ShellInfo { mesh: "cube", shell, members })
/// };
///
/// let shells = group_by_shells(&[2u32], lookup);
/// assert_eq!(shells.len(), 1);
/// assert_eq!(shells[0].components, vec![0, 1, 2, 3, 4]);
/// ```
pub fn group_by_shells<C, M, F>(selected: &[C], lookup: F) -> Vec<UvShell<C, M>>
where
    C: ComponentId,
    M: Clone + Ord + Debug,
    F: Fn(&C) -> Option<ShellInfo<C, M>>,
{
    let mut touched: BTreeMap<M, BTreeMap<usize, Vec<C>>> = BTreeMap::new();

    for component in selected {
        let Some(info) = lookup(component) else {
            log::warn!("{:?} has no UV shell; skipping", component);
            continue;
        };

        let shells = touched.entry(info.mesh).or_default();
        shells
            .entry(info.shell)
            .or_insert_with(|| dedup_in_order(info.members));
    }

    touched
        .into_iter()
        .flat_map(|(mesh, shells)| {
            shells.into_iter().map(move |(shell, components)| UvShell {
                mesh: mesh.clone(),
                shell,
                components,
            })
        })
        .collect()
}

fn dedup_in_order<C: ComponentId>(members: Vec<C>) -> Vec<C> {
    let mut seen = std::collections::HashSet::with_capacity(members.len());
    members.into_iter().filter(|c| seen.insert(c.clone())).collect()
}
