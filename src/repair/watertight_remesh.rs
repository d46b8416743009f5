use hashbrown::HashMap;

use serde::{Deserialize, Serialize};

use crate::topology::EdgeMap;
use crate::types::geometry::{Mesh, Vec3};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Params {
    pub max_hole_size: usize,
}

impl Default for Params {
    fn default() -> Self {
        Params { max_hole_size: 100 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub success: bool,
    pub new_mesh_id: Option<String>,
    pub holes_filled: usize,
    pub holes_skipped: usize,
    pub triangles_added: usize,
    pub vertices_added: usize,
    pub boundary_edges_before: usize,
    pub boundary_edges_after: usize,
    pub error: Option<String>,
}

/// Walk the boundary-edge adjacency starting from each unvisited edge,
/// closing a loop whenever the walk returns to its start vertex; dead-end
/// walks (no unvisited continuation) are discarded.
fn extract_boundary_loops(boundary: &[(u32, u32)]) -> Vec<Vec<u32>> {
    let mut adjacency: HashMap<u32, Vec<(u32, usize)>> = HashMap::new();
    for (i, &(a, b)) in boundary.iter().enumerate() {
        adjacency.entry(a).or_default().push((b, i));
        adjacency.entry(b).or_default().push((a, i));
    }

    let mut visited = vec![false; boundary.len()];
    let mut loops = Vec::new();

    for start_idx in 0..boundary.len() {
        if visited[start_idx] {
            continue;
        }
        let (start, mut current) = boundary[start_idx];
        visited[start_idx] = true;
        let mut loop_vertices = vec![start, current];
        let mut prev = start;

        let closed = loop {
            if current == start {
                break true;
            }
            let next_step = adjacency
                .get(&current)
                .and_then(|neighbours| neighbours.iter().find(|&&(nbr, edge_idx)| !visited[edge_idx] && nbr != prev));

            match next_step {
                Some(&(nbr, edge_idx)) => {
                    visited[edge_idx] = true;
                    prev = current;
                    current = nbr;
                    if current != start {
                        loop_vertices.push(current);
                    }
                }
                None => break false,
            }
        };

        if closed {
            loops.push(loop_vertices);
        }
    }

    loops
}

fn newell_normal(mesh: &Mesh, loop_vertices: &[u32]) -> Vec3 {
    let n = loop_vertices.len();
    let mut normal = Vec3::origin();
    for i in 0..n {
        let a = mesh.vertex(loop_vertices[i] as usize);
        let b = mesh.vertex(loop_vertices[(i + 1) % n] as usize);
        normal = Vec3::new(
            normal.x + (a.y - b.y) * (a.z + b.z),
            normal.y + (a.z - b.z) * (a.x + b.x),
            normal.z + (a.x - b.x) * (a.y + b.y),
        );
    }
    let normalized = normal.normalize();
    if normalized.magnitude() < 1e-10 {
        Vec3::y_axis()
    } else {
        normalized
    }
}

/// Fill every boundary hole under `max_hole_size` with a centroid fan,
/// recomputing normals and bounding box over the enlarged mesh.
pub fn run(mesh: &Mesh, params: &Params) -> (Mesh, Stats) {
    let edge_map = EdgeMap::build(mesh.indices());
    let boundary: Vec<(u32, u32)> = edge_map.boundary_edges().iter().map(|e| e.key).collect();
    let boundary_edges_before = boundary.len();

    if boundary.is_empty() {
        return (
            mesh.clone(),
            Stats {
                success: true,
                new_mesh_id: None,
                holes_filled: 0,
                holes_skipped: 0,
                triangles_added: 0,
                vertices_added: 0,
                boundary_edges_before: 0,
                boundary_edges_after: 0,
                error: None,
            },
        );
    }

    let loops = extract_boundary_loops(&boundary);
    let accepted: Vec<&Vec<u32>> = loops.iter().filter(|l| l.len() <= params.max_hole_size).collect();
    let holes_skipped = loops.len() - accepted.len();

    if accepted.is_empty() {
        return (
            mesh.clone(),
            Stats {
                success: false,
                new_mesh_id: None,
                holes_filled: 0,
                holes_skipped,
                triangles_added: 0,
                vertices_added: 0,
                boundary_edges_before,
                boundary_edges_after: boundary_edges_before,
                error: Some("every hole exceeds max_hole_size".to_string()),
            },
        );
    }

    let mut new_positions = mesh.positions().to_vec();
    let mut new_indices = mesh.indices().to_vec();
    let mut triangles_added = 0usize;

    for loop_vertices in &accepted {
        let loop_normal = newell_normal(mesh, loop_vertices);

        let mut centroid = Vec3::origin();
        for &v in loop_vertices.iter() {
            centroid = centroid + mesh.vertex(v as usize);
        }
        centroid = centroid / loop_vertices.len() as f32;
        let centroid_idx = (new_positions.len() / 3) as u32;
        new_positions.extend_from_slice(&[centroid.x, centroid.y, centroid.z]);

        let n = loop_vertices.len();
        for i in 0..n {
            let v0 = loop_vertices[i];
            let v1 = loop_vertices[(i + 1) % n];
            let p0 = mesh.vertex(v0 as usize);
            let p1 = mesh.vertex(v1 as usize);
            let face_normal = (p0 - centroid).cross(&(p1 - centroid));
            let (a, b) = if face_normal.dot(&loop_normal) < 0.0 { (v1, v0) } else { (v0, v1) };
            new_indices.extend_from_slice(&[centroid_idx, a, b]);
            triangles_added += 1;
        }
    }

    let vertices_added = accepted.len();
    let new_normals = crate::types::geometry::compute_normals(&new_positions, &new_indices);
    let new_mesh_id = format!("{}-watertight_remesh", mesh.id);
    let new_mesh = Mesh::new(new_mesh_id.clone(), mesh.name.clone(), new_positions, new_indices, Some(new_normals));

    let after_edge_map = EdgeMap::build(new_mesh.indices());
    let boundary_edges_after = after_edge_map.boundary_edges().len();

    let stats = Stats {
        success: true,
        new_mesh_id: Some(new_mesh_id),
        holes_filled: accepted.len(),
        holes_skipped,
        triangles_added,
        vertices_added,
        boundary_edges_before,
        boundary_edges_after,
        error: None,
    };

    (new_mesh, stats)
}
