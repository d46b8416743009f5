use hashbrown::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::geometry::{compute_normals, Mesh, Vec3};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Params {
    pub area_threshold: f32,
    pub merge_epsilon: f32,
    pub recompute_normals: bool,
}

impl Default for Params {
    fn default() -> Self {
        Params { area_threshold: 1e-10, merge_epsilon: 1e-6, recompute_normals: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub success: bool,
    pub new_mesh_id: Option<String>,
    pub triangles_removed: usize,
    pub vertices_removed: usize,
}

type LatticeKey = (i64, i64, i64);

fn lattice_key(v: Vec3, epsilon: f32) -> LatticeKey {
    (
        (v.x / epsilon).round() as i64,
        (v.y / epsilon).round() as i64,
        (v.z / epsilon).round() as i64,
    )
}

fn triangle_area(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    (b - a).cross(&(c - a)).magnitude() * 0.5
}

/// Merge near-duplicate vertices to an exact rounded lattice key, drop
/// degenerate or collapsed faces, then compact the vertex buffer.
pub fn run(mesh: &Mesh, params: &Params) -> (Mesh, Stats) {
    let original_vertex_count = mesh.vertex_count();

    // Step 1: vertex merge. First vertex seen at a lattice key wins; the
    // winner's own coordinates are kept, never an average.
    let mut seen: HashMap<LatticeKey, u32> = HashMap::new();
    let mut merge_map: Vec<u32> = Vec::with_capacity(original_vertex_count);
    for i in 0..original_vertex_count {
        let v = mesh.vertex(i);
        let key = lattice_key(v, params.merge_epsilon);
        let winner = *seen.entry(key).or_insert(i as u32);
        merge_map.push(winner);
    }

    // Step 2: face filter over merged indices.
    let mut kept_faces_remapped: Vec<[u32; 3]> = Vec::new();
    let mut triangles_removed = 0usize;
    for f in 0..mesh.triangle_count() {
        let face = mesh.face(f);
        let remapped = [merge_map[face[0] as usize], merge_map[face[1] as usize], merge_map[face[2] as usize]];

        let collapsed = remapped[0] == remapped[1] || remapped[1] == remapped[2] || remapped[2] == remapped[0];
        let degenerate = if collapsed {
            true
        } else {
            let a = mesh.vertex(remapped[0] as usize);
            let b = mesh.vertex(remapped[1] as usize);
            let c = mesh.vertex(remapped[2] as usize);
            triangle_area(a, b, c) < params.area_threshold
        };

        if degenerate {
            triangles_removed += 1;
        } else {
            kept_faces_remapped.push(remapped);
        }
    }

    // Step 3: compaction to only vertices still referenced.
    let mut compact_map: HashMap<u32, u32> = HashMap::new();
    let mut new_positions = Vec::new();
    let mut new_indices = Vec::with_capacity(kept_faces_remapped.len() * 3);

    for face in &kept_faces_remapped {
        for &old_idx in face {
            let new_idx = *compact_map.entry(old_idx).or_insert_with(|| {
                let id = (new_positions.len() / 3) as u32;
                let v = mesh.vertex(old_idx as usize);
                new_positions.extend_from_slice(&[v.x, v.y, v.z]);
                id
            });
            new_indices.push(new_idx);
        }
    }

    let new_vertex_count = new_positions.len() / 3;
    let new_normals = if params.recompute_normals {
        compute_normals(&new_positions, &new_indices)
    } else {
        vec![0.0; new_positions.len()]
    };

    let new_mesh_id = format!("{}-mesh_cleanup", mesh.id);
    let new_mesh = Mesh::new(new_mesh_id.clone(), mesh.name.clone(), new_positions, new_indices, Some(new_normals));

    let stats = Stats {
        success: true,
        new_mesh_id: Some(new_mesh_id),
        triangles_removed,
        vertices_removed: original_vertex_count - new_vertex_count,
    };

    (new_mesh, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_mesh_round_trips() {
        let mesh = Mesh::new(
            "m",
            "tri",
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![0, 1, 2],
            None,
        );
        let (out, stats) = run(&mesh, &Params::default());
        assert_eq!(stats.triangles_removed, 0);
        assert_eq!(stats.vertices_removed, 0);
        assert_eq!(out.positions(), mesh.positions());
        assert_eq!(out.indices(), mesh.indices());
    }

    #[test]
    fn test_duplicate_vertex_is_merged_without_collapsing_valid_faces() {
        // Two adjacent triangles sharing a corner; one of them references a
        // second vertex duplicated at that corner's coordinates instead of
        // the original. Merging drops the duplicate but both faces stay valid.
        let positions = vec![
            0.0, 0.0, 0.0, // 0
            1.0, 0.0, 0.0, // 1
            1.0, 1.0, 0.0, // 2
            1.0, 1.0, 0.0, // 3 duplicate of 2
            0.0, 1.0, 0.0, // 4
        ];
        let indices = vec![0, 1, 2, 0, 3, 4];
        let mesh = Mesh::new("m", "dup", positions, indices, None);
        let (out, stats) = run(&mesh, &Params::default());
        assert_eq!(stats.vertices_removed, 1);
        assert_eq!(stats.triangles_removed, 0);
        assert_eq!(out.triangle_count(), 2);
        assert_eq!(out.vertex_count(), 4);
    }

    #[test]
    fn test_face_collapsing_after_merge_is_removed() {
        // A face whose own two corners merge to the same vertex becomes
        // degenerate and is dropped.
        let positions = vec![
            0.0, 0.0, 0.0, // 0
            1.0, 0.0, 0.0, // 1
            0.0, 0.0, 0.0, // 2 duplicate of 0
        ];
        let indices = vec![0, 1, 2];
        let mesh = Mesh::new("m", "collapse", positions, indices, None);
        let (out, stats) = run(&mesh, &Params::default());
        assert_eq!(stats.triangles_removed, 1);
        assert_eq!(out.triangle_count(), 0);
    }
}
