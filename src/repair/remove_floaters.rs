use hashbrown::HashMap;

use serde::{Deserialize, Serialize};

use crate::topology::{find_connected_components, EdgeMap};
use crate::types::geometry::{compute_normals, Mesh};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Params {
    pub threshold_percent: f32,
    pub keep_only_largest: bool,
}

impl Default for Params {
    fn default() -> Self {
        Params { threshold_percent: 5.0, keep_only_largest: false }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub success: bool,
    pub new_mesh_id: Option<String>,
    pub triangles_removed: usize,
    pub vertices_removed: usize,
    pub components_removed: usize,
}

fn zero_stats() -> Stats {
    Stats { success: true, new_mesh_id: None, triangles_removed: 0, vertices_removed: 0, components_removed: 0 }
}

/// Drop every face belonging to a removed component, compact the vertex
/// buffer to only those still referenced, and recompute normals/bbox.
pub fn run(mesh: &Mesh, params: &Params) -> (Mesh, Stats) {
    let edge_map = EdgeMap::build(mesh.indices());
    let analysis = find_connected_components(mesh.triangle_count(), &edge_map, params.threshold_percent);

    let removed_component_ids: Vec<u32> = if params.keep_only_largest {
        analysis.components.iter().filter(|c| !c.is_main).map(|c| c.id).collect()
    } else {
        analysis.floaters().iter().map(|c| c.id).collect()
    };

    if removed_component_ids.is_empty() {
        return (mesh.clone(), zero_stats());
    }

    let removed: hashbrown::HashSet<u32> = removed_component_ids.into_iter().collect();
    let kept_faces: Vec<u32> = analysis
        .components
        .iter()
        .filter(|c| !removed.contains(&c.id))
        .flat_map(|c| c.faces.iter().copied())
        .collect();
    let mut kept_faces = kept_faces;
    kept_faces.sort_unstable();

    let mut referenced: Vec<u32> = kept_faces.iter().flat_map(|&f| mesh.face(f as usize)).collect();
    referenced.sort_unstable();
    referenced.dedup();

    let mut old_to_new: HashMap<u32, u32> = HashMap::with_capacity(referenced.len());
    let mut new_positions = Vec::with_capacity(referenced.len() * 3);
    for (new_idx, &old_idx) in referenced.iter().enumerate() {
        old_to_new.insert(old_idx, new_idx as u32);
        let v = mesh.vertex(old_idx as usize);
        new_positions.extend_from_slice(&[v.x, v.y, v.z]);
    }

    let mut new_indices = Vec::with_capacity(kept_faces.len() * 3);
    for face_id in &kept_faces {
        for old_idx in mesh.face(*face_id as usize) {
            new_indices.push(old_to_new[&old_idx]);
        }
    }

    let original_vertex_count = mesh.vertex_count();
    let new_normals = compute_normals(&new_positions, &new_indices);
    let new_mesh_id = format!("{}-remove_floaters", mesh.id);
    let new_mesh = Mesh::new(new_mesh_id.clone(), mesh.name.clone(), new_positions, new_indices, Some(new_normals));

    let stats = Stats {
        success: true,
        new_mesh_id: Some(new_mesh_id),
        triangles_removed: mesh.triangle_count() - kept_faces.len(),
        vertices_removed: original_vertex_count - new_mesh.vertex_count(),
        components_removed: removed.len(),
    };

    (new_mesh, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_floaters_is_unchanged() {
        let mesh = Mesh::new("m", "strip", vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0], vec![0, 1, 2], None);
        let (out, stats) = run(&mesh, &Params::default());
        assert!(stats.success);
        assert_eq!(stats.triangles_removed, 0);
        assert_eq!(out.triangle_count(), mesh.triangle_count());
    }

    #[test]
    fn test_strip_plus_floater_removes_isolated_face() {
        // A 10-face connected strip plus one isolated far-away triangle.
        let mut indices = Vec::new();
        for i in 0..10u32 {
            indices.extend_from_slice(&[i, i + 1, i + 2]);
        }
        let mut positions = Vec::new();
        for i in 0..13u32 {
            positions.extend_from_slice(&[i as f32, (i % 2) as f32, 0.0]);
        }
        indices.extend_from_slice(&[1000, 1001, 1002]);
        positions.extend_from_slice(&[100.0, 100.0, 100.0, 101.0, 100.0, 100.0, 100.0, 101.0, 100.0]);
        // Remap the floater indices down to valid bounds relative to our small buffer.
        let floater_base = (positions.len() / 3 - 3) as u32;
        let len = indices.len();
        indices[len - 3] = floater_base;
        indices[len - 2] = floater_base + 1;
        indices[len - 1] = floater_base + 2;

        let mesh = Mesh::new("m", "strip+floater", positions, indices, None);
        let params = Params { threshold_percent: 10.0, keep_only_largest: false };
        let (out, stats) = run(&mesh, &params);
        assert!(stats.success);
        assert_eq!(out.triangle_count(), 10);
        assert_eq!(out.vertex_count(), 12);
    }
}
