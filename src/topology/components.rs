use super::edge_map::EdgeMap;

/// Flat union-find over face ids, with path compression and union by rank.
struct UnionFind {
    parent: Vec<u32>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        UnionFind { parent: (0..n as u32).collect(), rank: vec![0; n] }
    }

    fn find(&mut self, x: u32) -> u32 {
        if self.parent[x as usize] != x {
            let root = self.find(self.parent[x as usize]);
            self.parent[x as usize] = root;
        }
        self.parent[x as usize]
    }

    fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        let (ra, rb) = if self.rank[ra as usize] < self.rank[rb as usize] { (rb, ra) } else { (ra, rb) };
        self.parent[rb as usize] = ra;
        if self.rank[ra as usize] == self.rank[rb as usize] {
            self.rank[ra as usize] += 1;
        }
    }
}

/// One connected component of faces, classified against the main body.
#[derive(Debug, Clone)]
pub struct Component {
    /// Id of this component, assigned in order of first appearance among
    /// the faces (0-based, scanning face ids in ascending order).
    pub id: u32,
    /// Faces belonging to this component, in ascending face-id order.
    pub faces: Vec<u32>,
    /// True for the single largest-by-face-count component (ties broken by
    /// lowest component id).
    pub is_main: bool,
    /// True when this component's face count is strictly below the
    /// floater cutoff derived from `floater_threshold_percent`.
    pub is_floater: bool,
}

/// Result of partitioning a mesh's faces into connected components via
/// shared manifold/boundary edges (an edge with 3+ incident faces does not
/// itself connect components beyond its first two recorded faces; all
/// incident faces still share it and are unioned together).
pub struct ComponentAnalysis {
    pub components: Vec<Component>,
}

impl ComponentAnalysis {
    pub fn main_component(&self) -> Option<&Component> {
        self.components.iter().find(|c| c.is_main)
    }

    pub fn floaters(&self) -> Vec<&Component> {
        self.components.iter().filter(|c| c.is_floater).collect()
    }
}

/// Partition the mesh's faces into connected components using the edge map's
/// adjacency, then classify the largest as `main` and any component whose
/// face count is strictly below `ceil(floater_threshold_percent / 100 * F)`
/// (`F` = total face count) as a `floater`.
///
/// Ties for `main` are broken by lowest component id (equivalently, the
/// component whose faces were first encountered during the scan).
pub fn find_connected_components(
    face_count: usize,
    edge_map: &EdgeMap,
    floater_threshold_percent: f32,
) -> ComponentAnalysis {
    let mut uf = UnionFind::new(face_count.max(1));
    if face_count == 0 {
        return ComponentAnalysis { components: Vec::new() };
    }

    for edge in edge_map.edges() {
        for pair in edge.faces.windows(2) {
            uf.union(pair[0], pair[1]);
        }
        // An edge shared by 3+ faces connects all of them, not just adjacent
        // pairs in insertion order; union the first face with every other.
        if edge.faces.len() > 2 {
            for &f in &edge.faces[1..] {
                uf.union(edge.faces[0], f);
            }
        }
    }

    // Assign component ids in order of first appearance, scanning faces
    // ascending.
    let mut root_to_id: hashbrown::HashMap<u32, u32> = hashbrown::HashMap::new();
    let mut components: Vec<Component> = Vec::new();
    for face in 0..face_count as u32 {
        let root = uf.find(face);
        let id = *root_to_id.entry(root).or_insert_with(|| {
            let id = components.len() as u32;
            components.push(Component { id, faces: Vec::new(), is_main: false, is_floater: false });
            id
        });
        components[id as usize].faces.push(face);
    }

    let total_faces = face_count as f32;
    let cutoff = (floater_threshold_percent / 100.0 * total_faces).ceil() as usize;

    let main_id = components
        .iter()
        .enumerate()
        .max_by_key(|(idx, c)| (c.faces.len(), std::cmp::Reverse(*idx)))
        .map(|(idx, _)| idx);

    if let Some(main_id) = main_id {
        components[main_id].is_main = true;
    }

    for c in components.iter_mut() {
        if !c.is_main {
            c.is_floater = c.faces.len() < cutoff;
        }
    }

    ComponentAnalysis { components }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::edge_map::EdgeMap;

    #[test]
    fn test_single_component_for_connected_mesh() {
        let indices = [0, 1, 2, 1, 3, 2];
        let edge_map = EdgeMap::build(&indices);
        let analysis = find_connected_components(2, &edge_map, 5.0);
        assert_eq!(analysis.components.len(), 1);
        assert!(analysis.components[0].is_main);
    }

    #[test]
    fn test_disjoint_triangles_are_separate_components() {
        let indices = [0, 1, 2, 3, 4, 5];
        let edge_map = EdgeMap::build(&indices);
        let analysis = find_connected_components(2, &edge_map, 100.0);
        assert_eq!(analysis.components.len(), 2);
        // Tie on face count (1 vs 1): lowest id wins main.
        assert!(analysis.components[0].is_main);
        assert!(!analysis.components[1].is_main);
    }

    #[test]
    fn test_small_disjoint_component_is_a_floater() {
        // Big body: 10 faces sharing edges as a strip. Floater: 1 isolated face.
        let mut indices = Vec::new();
        for i in 0..10u32 {
            let base = i * 3;
            indices.extend_from_slice(&[base, base + 1, base + 2]);
        }
        // Connect faces 0..10 into one strip by sharing vertices via a quick
        // hack: reuse vertex ids so all 10 triangles share an edge chain.
        let mut strip_indices = Vec::new();
        for i in 0..10u32 {
            strip_indices.extend_from_slice(&[i, i + 1, i + 2]);
        }
        strip_indices.extend_from_slice(&[1000, 1001, 1002]); // isolated floater face
        let edge_map = EdgeMap::build(&strip_indices);
        let analysis = find_connected_components(11, &edge_map, 5.0);

        let main = analysis.main_component().unwrap();
        assert_eq!(main.faces.len(), 10);
        let floaters = analysis.floaters();
        assert_eq!(floaters.len(), 1);
        assert_eq!(floaters[0].faces.len(), 1);
        let _ = indices;
    }

    #[test]
    fn test_empty_mesh_has_no_components() {
        let edge_map = EdgeMap::build(&[]);
        let analysis = find_connected_components(0, &edge_map, 5.0);
        assert!(analysis.components.is_empty());
    }
}
