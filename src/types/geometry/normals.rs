use super::Vec3;

/// Compute per-vertex normals for an indexed triangle mesh.
///
/// Accumulates the unnormalised cross product `(v1-v0) x (v2-v0)` of every
/// face onto each of its three vertices (area-weighted averaging, since the
/// cross product magnitude scales with twice the triangle area), then
/// normalises each vertex's accumulator. A vertex with no non-degenerate
/// incident face is left as the zero vector.
///
/// Returns a buffer the same length as `positions`.
pub fn compute_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let vertex_count = positions.len() / 3;
    let mut accum = vec![Vec3::origin(); vertex_count];

    for face in indices.chunks_exact(3) {
        let i0 = face[0] as usize;
        let i1 = face[1] as usize;
        let i2 = face[2] as usize;

        let v0 = Vec3::new(positions[3 * i0], positions[3 * i0 + 1], positions[3 * i0 + 2]);
        let v1 = Vec3::new(positions[3 * i1], positions[3 * i1 + 1], positions[3 * i1 + 2]);
        let v2 = Vec3::new(positions[3 * i2], positions[3 * i2 + 1], positions[3 * i2 + 2]);

        let face_normal = (v1 - v0).cross(&(v2 - v0));

        accum[i0] = accum[i0] + face_normal;
        accum[i1] = accum[i1] + face_normal;
        accum[i2] = accum[i2] + face_normal;
    }

    let mut normals = Vec::with_capacity(positions.len());
    for n in accum {
        let unit = n.normalize();
        normals.push(unit.x);
        normals.push(unit.y);
        normals.push(unit.z);
    }
    normals
}
