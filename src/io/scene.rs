//! UV scene snapshots.
//!
//! A scene is a host-neutral dump of the meshes a DCC tool would hand the
//! engine: per mesh, a list of UV positions and the faces that reference
//! them by index.
//!
//! ```json
//! {
//!     "meshes": [
//!         { "name": "plank", "uvs": [[0.1, 0.1], [0.3, 0.1], [0.3, 0.2], [0.1, 0.2]], "faces": [[0, 1, 2, 3]] }
//!     ]
//! }
//! ```
//!
//! Faces that share a UV index are UV-contiguous, so shells are the
//! connected components of that relation. [`UvScene::host`] builds the shell
//! table once and exposes the scene through [`UvHost`].

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use super::{read_text, to_pretty_json, write_text};
use crate::algo::{FaceSelection, ShellInfo, UvHost};
use crate::error::{HotspotError, Result};
use crate::uv::{AlignmentResult, UvPoint};

/// One mesh with a single active UV set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneMesh {
    /// Mesh name, used in labels.
    pub name: String,
    /// UV positions.
    pub uvs: Vec<[f64; 2]>,
    /// Faces as lists of UV indices in winding order.
    #[serde(default)]
    pub faces: Vec<Vec<usize>>,
}

/// A snapshot of UV data from a host application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UvScene {
    /// Meshes in the scene.
    pub meshes: Vec<SceneMesh>,
}

/// A single UV component: mesh index plus UV index within that mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UvRef {
    /// Index into [`UvScene::meshes`].
    pub mesh: usize,
    /// Index into the mesh's `uvs`.
    pub index: usize,
}

impl UvRef {
    /// Create a new reference.
    pub fn new(mesh: usize, index: usize) -> Self {
        Self { mesh, index }
    }
}

/// Load a scene from a JSON file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<UvScene> {
    let path = path.as_ref();
    let text = read_text(path)?;
    let scene: UvScene = serde_json::from_str(&text).map_err(|e| HotspotError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    scene.validate()?;
    log::debug!("loaded {} meshes from {}", scene.meshes.len(), path.display());
    Ok(scene)
}

/// Save a scene to a JSON file, creating parent directories.
pub fn save<P: AsRef<Path>>(scene: &UvScene, path: P) -> Result<()> {
    write_text(path.as_ref(), &to_pretty_json(scene)?)
}

impl UvScene {
    /// Parse a scene from JSON text and check its face indices.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let scene: UvScene = serde_json::from_str(text)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Check that every face index points at an existing UV.
    pub fn validate(&self) -> Result<()> {
        for mesh in &self.meshes {
            for (f, face) in mesh.faces.iter().enumerate() {
                if face.iter().any(|&i| i >= mesh.uvs.len()) {
                    return Err(HotspotError::invalid_param(
                        "faces",
                        format!("{}.f[{}]", mesh.name, f),
                        "references a uv index past the end of the uv list",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Index of the first mesh with the given name.
    pub fn mesh_index(&self, name: &str) -> Option<usize> {
        self.meshes.iter().position(|m| m.name == name)
    }

    /// Label of a UV component, in `mesh.map[i]` form.
    pub fn uv_label(&self, uv: UvRef) -> String {
        match self.meshes.get(uv.mesh) {
            Some(mesh) => format!("{}.map[{}]", mesh.name, uv.index),
            None => format!("<mesh {}>.map[{}]", uv.mesh, uv.index),
        }
    }

    /// Label of a face, in `mesh.f[i]` form.
    pub fn face_label(&self, mesh: usize, face: usize) -> String {
        match self.meshes.get(mesh) {
            Some(m) => format!("{}.f[{}]", m.name, face),
            None => format!("<mesh {}>.f[{}]", mesh, face),
        }
    }

    /// Every UV component in the scene.
    pub fn all_components(&self) -> Vec<UvRef> {
        self.meshes
            .iter()
            .enumerate()
            .flat_map(|(m, mesh)| (0..mesh.uvs.len()).map(move |i| UvRef::new(m, i)))
            .collect()
    }

    /// UV components of one named mesh, or of the whole scene.
    pub fn components(&self, mesh: Option<&str>) -> Result<Vec<UvRef>> {
        match mesh {
            None => Ok(self.all_components()),
            Some(name) => {
                let m = self.require_mesh(name)?;
                Ok((0..self.meshes[m].uvs.len()).map(|i| UvRef::new(m, i)).collect())
            }
        }
    }

    /// Faces of one named mesh, or of the whole scene, with their UV
    /// components deduplicated in winding order.
    pub fn face_selections(&self, mesh: Option<&str>) -> Result<Vec<FaceSelection<UvRef>>> {
        let meshes = self.mesh_range(mesh)?;
        let mut selections = Vec::new();
        for m in meshes {
            for (f, face) in self.meshes[m].faces.iter().enumerate() {
                let mut seen = HashSet::new();
                let components = face
                    .iter()
                    .filter(|&&i| seen.insert(i))
                    .map(|&i| UvRef::new(m, i))
                    .collect();
                selections.push(FaceSelection {
                    face: self.face_label(m, f),
                    components,
                });
            }
        }
        Ok(selections)
    }

    /// Face labels and corner positions, ready for hotspot capture.
    pub fn face_points(&self, mesh: Option<&str>) -> Result<Vec<(String, Vec<UvPoint>)>> {
        Ok(self
            .face_selections(mesh)?
            .into_iter()
            .map(|sel| {
                let points = sel.components.iter().filter_map(|&uv| self.point(uv)).collect();
                (sel.face, points)
            })
            .collect())
    }

    /// Current position of a UV component.
    pub fn point(&self, uv: UvRef) -> Option<UvPoint> {
        let [u, v] = *self.meshes.get(uv.mesh)?.uvs.get(uv.index)?;
        Some(Point2::new(u, v))
    }

    /// Write new positions back into the scene.
    ///
    /// Returns the number of components updated. Components that do not
    /// exist in this scene are skipped with a warning.
    pub fn apply(&mut self, result: &AlignmentResult<UvRef>) -> usize {
        let mut applied = 0;
        for (uv, point) in result.iter() {
            match self.meshes.get_mut(uv.mesh).and_then(|m| m.uvs.get_mut(uv.index)) {
                Some(slot) => {
                    *slot = [point.x, point.y];
                    applied += 1;
                }
                None => log::warn!("cannot apply position to missing component {:?}", uv),
            }
        }
        applied
    }

    /// Build the read-only host view with shell membership resolved.
    pub fn host(&self) -> SceneHost<'_> {
        let shells = self.meshes.iter().map(MeshShells::build).collect();
        SceneHost { scene: self, shells }
    }

    fn require_mesh(&self, name: &str) -> Result<usize> {
        self.mesh_index(name)
            .ok_or_else(|| HotspotError::invalid_param("mesh", name, "no mesh with this name"))
    }

    fn mesh_range(&self, mesh: Option<&str>) -> Result<std::ops::Range<usize>> {
        match mesh {
            None => Ok(0..self.meshes.len()),
            Some(name) => {
                let m = self.require_mesh(name)?;
                Ok(m..m + 1)
            }
        }
    }
}

/// Shell table of one mesh.
#[derive(Debug, Clone)]
struct MeshShells {
    /// Shell id of each UV.
    shell_of: Vec<usize>,
    /// UV indices of each shell, ascending.
    members: Vec<Vec<usize>>,
}

impl MeshShells {
    fn build(mesh: &SceneMesh) -> Self {
        let mut parent: Vec<usize> = (0..mesh.uvs.len()).collect();

        fn find(parent: &mut [usize], i: usize) -> usize {
            if parent[i] != i {
                parent[i] = find(parent, parent[i]);
            }
            parent[i]
        }

        fn union(parent: &mut [usize], i: usize, j: usize) {
            let pi = find(parent, i);
            let pj = find(parent, j);
            if pi != pj {
                parent[pi] = pj;
            }
        }

        for face in &mesh.faces {
            if let Some((&first, rest)) = face.split_first() {
                for &i in rest {
                    union(&mut parent, first, i);
                }
            }
        }

        // Number shells by the first UV index that reaches them.
        let mut root_to_shell = vec![usize::MAX; parent.len()];
        let mut shell_of = Vec::with_capacity(parent.len());
        let mut members: Vec<Vec<usize>> = Vec::new();
        for i in 0..parent.len() {
            let root = find(&mut parent, i);
            if root_to_shell[root] == usize::MAX {
                root_to_shell[root] = members.len();
                members.push(Vec::new());
            }
            let shell = root_to_shell[root];
            shell_of.push(shell);
            members[shell].push(i);
        }

        Self { shell_of, members }
    }
}

/// Mesh identity used for shell grouping.
///
/// Mesh names need not be unique, so meshes are keyed by index and the name
/// only shows up in labels.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeshKey {
    /// Index into [`UvScene::meshes`].
    pub index: usize,
    /// Mesh name.
    pub name: String,
}

impl fmt::Debug for MeshKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.index)
    }
}

/// A [`UvHost`] over a [`UvScene`].
#[derive(Debug, Clone)]
pub struct SceneHost<'a> {
    scene: &'a UvScene,
    shells: Vec<MeshShells>,
}

impl SceneHost<'_> {
    /// Number of shells on a mesh.
    pub fn shell_count(&self, mesh: usize) -> usize {
        self.shells.get(mesh).map_or(0, |s| s.members.len())
    }
}

impl UvHost for SceneHost<'_> {
    type Component = UvRef;
    type Mesh = MeshKey;

    fn shell_of(&self, component: &UvRef) -> Option<ShellInfo<UvRef, MeshKey>> {
        let mesh = self.scene.meshes.get(component.mesh)?;
        let table = self.shells.get(component.mesh)?;
        let shell = *table.shell_of.get(component.index)?;
        let members = table.members[shell]
            .iter()
            .map(|&i| UvRef::new(component.mesh, i))
            .collect();
        Some(ShellInfo {
            mesh: MeshKey {
                index: component.mesh,
                name: mesh.name.clone(),
            },
            shell,
            members,
        })
    }

    fn uv_coords(&self, components: &[UvRef]) -> Vec<f64> {
        components
            .iter()
            .filter_map(|&uv| self.scene.point(uv))
            .flat_map(|p| [p.x, p.y])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two quads sharing an edge (one shell) plus a detached quad.
    fn scene() -> UvScene {
        UvScene::from_json_str(
            r#"{
                "meshes": [
                    {
                        "name": "plank",
                        "uvs": [
                            [0.0, 0.0], [0.1, 0.0], [0.2, 0.0],
                            [0.0, 0.1], [0.1, 0.1], [0.2, 0.1],
                            [0.5, 0.5], [0.6, 0.5], [0.6, 0.6], [0.5, 0.6]
                        ],
                        "faces": [[0, 1, 4, 3], [1, 2, 5, 4], [6, 7, 8, 9]]
                    },
                    { "name": "bolt", "uvs": [[0.0, 0.0]] }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_shells_from_shared_uvs() {
        let scene = scene();
        let host = scene.host();
        assert_eq!(host.shell_count(0), 2);
        assert_eq!(host.shell_count(1), 1);

        let info = host.shell_of(&UvRef::new(0, 5)).unwrap();
        assert_eq!(info.mesh.index, 0);
        assert_eq!(info.mesh.name, "plank");
        assert_eq!(info.shell, 0);
        assert_eq!(info.members.len(), 6);

        let info = host.shell_of(&UvRef::new(0, 8)).unwrap();
        assert_eq!(info.shell, 1);
        assert_eq!(
            info.members,
            (6..10).map(|i| UvRef::new(0, i)).collect::<Vec<_>>()
        );

        assert!(host.shell_of(&UvRef::new(0, 10)).is_none());
        assert!(host.shell_of(&UvRef::new(2, 0)).is_none());
    }

    #[test]
    fn test_uv_coords_flattened_in_order() {
        let scene = scene();
        let host = scene.host();
        let coords = host.uv_coords(&[UvRef::new(0, 7), UvRef::new(0, 0)]);
        assert_eq!(coords, vec![0.6, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_labels() {
        let scene = scene();
        assert_eq!(scene.uv_label(UvRef::new(0, 3)), "plank.map[3]");
        assert_eq!(scene.face_label(1, 0), "bolt.f[0]");
    }

    #[test]
    fn test_face_selections() {
        let scene = scene();
        let faces = scene.face_selections(Some("plank")).unwrap();
        assert_eq!(faces.len(), 3);
        assert_eq!(faces[2].face, "plank.f[2]");
        assert_eq!(faces[2].components[0], UvRef::new(0, 6));

        assert!(scene.face_selections(Some("missing")).is_err());
        assert_eq!(scene.face_selections(None).unwrap().len(), 3);
    }

    #[test]
    fn test_face_points() {
        let scene = scene();
        let faces = scene.face_points(None).unwrap();
        assert_eq!(faces[2].0, "plank.f[2]");
        assert_eq!(faces[2].1[2], Point2::new(0.6, 0.6));
    }

    #[test]
    fn test_apply_updates_positions() {
        let mut scene = scene();
        let result: AlignmentResult<UvRef> = vec![
            (UvRef::new(0, 0), Point2::new(0.25, 0.75)),
            (UvRef::new(3, 0), Point2::new(1.0, 1.0)),
        ]
        .into_iter()
        .collect();

        assert_eq!(scene.apply(&result), 1);
        assert_eq!(scene.point(UvRef::new(0, 0)), Some(Point2::new(0.25, 0.75)));
    }

    #[test]
    fn test_meshes_with_same_name_keep_their_shells() {
        use crate::algo::{group_by_shells, map_to_hotspot, MapOptions};
        use crate::library::{Hotspot, HotspotLibrary};
        use crate::uv::validate_rectangle;

        let mut scene = UvScene::from_json_str(
            r#"{
                "meshes": [
                    { "name": "cube", "uvs": [[0, 0], [1, 0], [1, 1], [0, 1]], "faces": [[0, 1, 2, 3]] },
                    { "name": "cube", "uvs": [[2, 2], [3, 2], [3, 3], [2, 3]], "faces": [[0, 1, 2, 3]] }
                ]
            }"#,
        )
        .unwrap();
        let selection = scene.all_components();

        let host = scene.host();
        let shells = group_by_shells(&selection, |uv| host.shell_of(uv));
        assert_eq!(shells.len(), 2);
        assert_eq!(shells[0].label(), "cube[0] shell 0");
        assert_eq!(shells[1].label(), "cube[1] shell 0");

        let rect = validate_rectangle(&[
            Point2::new(0.5, 0.5),
            Point2::new(0.75, 0.5),
            Point2::new(0.75, 0.75),
            Point2::new(0.5, 0.75),
        ])
        .unwrap();
        let mut library = HotspotLibrary::new();
        library.insert(Hotspot::new("hotspot_1", rect));

        let options = MapOptions::default().sequential();
        let report = map_to_hotspot(&host, &selection, &library, &options).unwrap();
        assert_eq!(report.attempted, 2);
        assert!(report.is_complete());

        assert_eq!(scene.apply(&report.result), 8);
        assert_eq!(scene.point(UvRef::new(1, 2)), Some(Point2::new(0.75, 0.75)));
    }

    #[test]
    fn test_rejects_out_of_range_face() {
        let err = UvScene::from_json_str(
            r#"{ "meshes": [ { "name": "m", "uvs": [[0, 0]], "faces": [[0, 1]] } ] }"#,
        )
        .unwrap_err();
        assert_eq!(err.reason_tag(), "invalid-parameter");
    }
}
