use crate::types::geometry::{Mesh, Vec3};

/// Result of the overhang check.
#[derive(Debug, Clone)]
pub struct OverhangCheck {
    /// Per-face angle, in degrees, between the face normal and the build
    /// direction, in `[0, 180]`.
    pub face_angles: Vec<f32>,
    /// Per-face overhang flag (1 = overhang, 0 = not), parallel to `face_angles`.
    pub face_mask: Vec<u8>,
    pub overhang_face_count: usize,
    pub overhang_percentage: f32,
    pub max_angle: f32,
}

/// Angle, in degrees, beyond which a face counts as overhanging: faces whose
/// normal points further than this from straight up.
fn overhang_cutoff(threshold_deg: f32) -> f32 {
    90.0 + threshold_deg
}

/// Run the overhang check against `mesh`'s faces, measuring each face's
/// normal against `build_direction` (typically `Vec3::y_axis()`).
pub fn check_overhang(mesh: &Mesh, build_direction: Vec3, threshold_deg: f32) -> OverhangCheck {
    check_overhang_positions(mesh.positions(), mesh.indices(), build_direction, threshold_deg)
}

/// Same check as [`check_overhang`], but run directly against a position and
/// index buffer instead of a [`Mesh`]. Lets a caller score a rotated
/// candidate orientation from a rotated position buffer alone, without
/// allocating a new `Mesh` or recomputing normals for every candidate.
pub fn check_overhang_positions(
    positions: &[f32],
    indices: &[u32],
    build_direction: Vec3,
    threshold_deg: f32,
) -> OverhangCheck {
    let build_direction = build_direction.normalize();
    let cutoff = overhang_cutoff(threshold_deg);
    let triangle_count = indices.len() / 3;

    let vertex = |i: u32| Vec3::new(positions[3 * i as usize], positions[3 * i as usize + 1], positions[3 * i as usize + 2]);

    let mut face_angles = Vec::with_capacity(triangle_count);
    let mut face_mask = Vec::with_capacity(triangle_count);
    let mut overhang_face_count = 0usize;
    let mut max_angle = 0.0f32;

    for f in 0..triangle_count {
        let v0 = vertex(indices[3 * f]);
        let v1 = vertex(indices[3 * f + 1]);
        let v2 = vertex(indices[3 * f + 2]);
        let raw_normal = (v1 - v0).cross(&(v2 - v0));
        let normal = if raw_normal.magnitude() < 1e-10 { build_direction } else { raw_normal.normalize() };

        let angle_deg = normal.angle(&build_direction).to_degrees();
        let is_overhang = angle_deg > cutoff;

        if is_overhang {
            overhang_face_count += 1;
        }
        if angle_deg > max_angle {
            max_angle = angle_deg;
        }

        face_angles.push(angle_deg);
        face_mask.push(is_overhang as u8);
    }

    let overhang_percentage =
        if triangle_count == 0 { 0.0 } else { (overhang_face_count as f32 / triangle_count as f32) * 100.0 };

    OverhangCheck { face_angles, face_mask, overhang_face_count, overhang_percentage, max_angle }
}

/// Display heat value in `[0, 1]` for a given face angle, used to drive
/// overlay colour ramps: 0 at the overhang cutoff, 1 at a straight-down face.
pub fn heat(angle_deg: f32, threshold_deg: f32) -> f32 {
    let cutoff = overhang_cutoff(threshold_deg);
    crate::utils::math_helper::normalize(angle_deg, cutoff, 180.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upward_face_has_zero_angle() {
        let mesh = Mesh::new(
            "m",
            "up",
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            vec![0, 1, 2],
            None,
        );
        let result = check_overhang(&mesh, Vec3::y_axis(), 45.0);
        assert_eq!(result.overhang_face_count, 0);
        assert!(result.face_angles[0] < 1.0);
    }

    #[test]
    fn test_downward_face_is_overhang() {
        // Winding gives a normal pointing -Y.
        let mesh = Mesh::new(
            "m",
            "down",
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0],
            vec![0, 1, 2],
            None,
        );
        let result = check_overhang(&mesh, Vec3::y_axis(), 45.0);
        assert_eq!(result.overhang_face_count, 1);
        assert!((result.face_angles[0] - 180.0).abs() < 1.0);
    }

    #[test]
    fn test_heat_is_zero_at_cutoff_and_one_at_straight_down() {
        assert!((heat(135.0, 45.0) - 0.0).abs() < 1e-6);
        assert!((heat(180.0, 45.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_mesh_has_zero_percentage() {
        let mesh = Mesh::empty("m");
        let result = check_overhang(&mesh, Vec3::y_axis(), 45.0);
        assert_eq!(result.overhang_percentage, 0.0);
    }

    #[test]
    fn test_check_overhang_positions_matches_check_overhang() {
        let mesh = Mesh::new(
            "m",
            "down",
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0],
            vec![0, 1, 2],
            None,
        );
        let via_mesh = check_overhang(&mesh, Vec3::y_axis(), 45.0);
        let via_positions = check_overhang_positions(mesh.positions(), mesh.indices(), Vec3::y_axis(), 45.0);
        assert_eq!(via_mesh.overhang_face_count, via_positions.overhang_face_count);
        assert_eq!(via_mesh.face_angles, via_positions.face_angles);
    }
}
