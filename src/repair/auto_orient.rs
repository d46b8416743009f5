use rayon::iter::ParallelIterator;
use rayon::slice::ParallelSliceMut;
use serde::{Deserialize, Serialize};

use crate::checks::check_overhang_positions;
use crate::types::geometry::{Mesh, Vec3};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Params {
    pub overhang_threshold_deg: f32,
    pub yaw_candidates_deg: Vec<f32>,
    pub pitch_candidates_deg: Vec<f32>,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            overhang_threshold_deg: 45.0,
            yaw_candidates_deg: vec![0.0, 90.0, 180.0, 270.0],
            pitch_candidates_deg: vec![0.0, 90.0],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrientationCandidate {
    pub yaw_deg: f32,
    pub pitch_deg: f32,
    pub overhang_percent: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub success: bool,
    pub new_mesh_id: Option<String>,
    pub best: OrientationCandidate,
    pub current: OrientationCandidate,
    pub candidates: Vec<OrientationCandidate>,
}

fn rotate_yaw_pitch(v: Vec3, yaw_rad: f32, pitch_rad: f32) -> Vec3 {
    // Yaw about the up (Y) axis.
    let (sy, cy) = yaw_rad.sin_cos();
    let yawed = Vec3::new(v.x * cy + v.z * sy, v.y, -v.x * sy + v.z * cy);
    // Pitch about the lateral (X) axis.
    let (sp, cp) = pitch_rad.sin_cos();
    Vec3::new(yawed.x, yawed.y * cp - yawed.z * sp, yawed.y * sp + yawed.z * cp)
}

/// Rotate a copy of `mesh` by yaw about the up axis then pitch about the
/// lateral axis, recomputing normals over the rotated positions. Only called
/// once, for the winning candidate, since only the materialized output mesh
/// needs valid normals.
fn rotate_copy(mesh: &Mesh, yaw_deg: f32, pitch_deg: f32) -> Mesh {
    let yaw_rad = yaw_deg.to_radians();
    let pitch_rad = pitch_deg.to_radians();
    let mut rotated = mesh.clone();
    rotated.rotate_vertices_par(|v| rotate_yaw_pitch(v, yaw_rad, pitch_rad));
    rotated.recompute_normals();
    rotated
}

/// Rotate a copy of a position buffer by yaw then pitch, without allocating
/// a `Mesh` or touching normals. Used to score candidates cheaply.
fn rotate_positions(positions: &[f32], yaw_rad: f32, pitch_rad: f32) -> Vec<f32> {
    let mut rotated = positions.to_vec();
    rotated.par_chunks_mut(3).for_each(|chunk| {
        let v = Vec3::new(chunk[0], chunk[1], chunk[2]);
        let r = rotate_yaw_pitch(v, yaw_rad, pitch_rad);
        chunk[0] = r.x;
        chunk[1] = r.y;
        chunk[2] = r.z;
    });
    rotated
}

fn overhang_percent_for(mesh: &Mesh, yaw_deg: f32, pitch_deg: f32, threshold_deg: f32) -> f32 {
    let rotated_positions = rotate_positions(mesh.positions(), yaw_deg.to_radians(), pitch_deg.to_radians());
    check_overhang_positions(&rotated_positions, mesh.indices(), Vec3::y_axis(), threshold_deg).overhang_percentage
}

/// Enumerate `yaw x pitch` orientation candidates, measure each candidate's
/// overhang percentage, and rotate the mesh to the best one if it differs
/// from the input orientation.
pub fn run(mesh: &Mesh, params: &Params) -> (Mesh, Stats) {
    let current_percent = overhang_percent_for(mesh, 0.0, 0.0, params.overhang_threshold_deg);
    let current = OrientationCandidate { yaw_deg: 0.0, pitch_deg: 0.0, overhang_percent: current_percent };

    let mut candidates = Vec::new();
    for &yaw in &params.yaw_candidates_deg {
        for &pitch in &params.pitch_candidates_deg {
            let percent = overhang_percent_for(mesh, yaw, pitch, params.overhang_threshold_deg);
            candidates.push(OrientationCandidate { yaw_deg: yaw, pitch_deg: pitch, overhang_percent: percent });
        }
    }

    let best = candidates
        .iter()
        .cloned()
        .min_by(|a, b| a.overhang_percent.partial_cmp(&b.overhang_percent).unwrap())
        .unwrap_or_else(|| current.clone());

    if best.yaw_deg == 0.0 && best.pitch_deg == 0.0 {
        let stats = Stats { success: true, new_mesh_id: None, best, current, candidates };
        return (mesh.clone(), stats);
    }

    let new_mesh_id = format!("{}-auto_orient", mesh.id);
    let mut new_mesh = rotate_copy(mesh, best.yaw_deg, best.pitch_deg);
    new_mesh.id = new_mesh_id.clone();

    let stats = Stats { success: true, new_mesh_id: Some(new_mesh_id), best, current, candidates };
    (new_mesh, stats)
}
