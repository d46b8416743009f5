//! Aggregates the five analysis checks into a single versioned [`Report`].

use hashbrown::HashMap;

use serde::{Deserialize, Serialize};

use crate::checks::{check_non_manifold, check_overhang, check_scale, check_watertight};
use crate::profile::PrinterProfile;
use crate::topology::{find_connected_components, EdgeMap};
use crate::types::geometry::{BoundingBox, Mesh, Vec3};
use crate::utils::lcg::Lcg;
use crate::MESH_DOCTOR_VERSION;

const SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Blocker,
    Risk,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Warn,
    Fail,
}

/// A single synthesised defect record, referencing overlay arrays by key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: usize,
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    pub title: String,
    pub summary: String,
    pub details: HashMap<String, serde_json::Value>,
    pub overlay_keys: Vec<String>,
}

/// The crate's compile-time version stamp embedded in every report.
///
/// `three` and `reactFlow` describe viewer/graph-UI dependencies this
/// headless kernel does not carry; they are always `None` here and exist so
/// the field is present for hosts that embed this kernel behind a viewer
/// that does use those libraries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolVersions {
    pub app: String,
    pub three: Option<String>,
    pub react_flow: Option<String>,
}

pub fn tool_versions() -> ToolVersions {
    ToolVersions { app: MESH_DOCTOR_VERSION.to_string(), three: None, react_flow: None }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshStats {
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub edge_count: usize,
    pub component_count: usize,
    pub bounding_box: BoundingBox,
    pub analysis_decimated: bool,
    pub original_triangle_count: Option<usize>,
}

/// Overlay payload: the raw arrays that a renderer would use to highlight
/// defects over the source geometry. Fields are omitted on the wire when not
/// produced by any issue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundary_edges: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_manifold_edges: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id_per_face: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_component_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floater_indices: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overhang_face_mask: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_angles: Option<Vec<f32>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub schema_version: String,
    pub created_at: String,
    pub tool_versions: ToolVersions,
    pub mesh_stats: MeshStats,
    pub printer_profile: PrinterProfile,
    pub status: Status,
    pub issues: Vec<Issue>,
    pub overlay_data: OverlayData,
}

/// Deterministically subsample `mesh` to `target` faces, seeded from the
/// original triangle count, then compact vertices to only those referenced.
fn decimate(mesh: &Mesh, target: usize) -> Mesh {
    let face_count = mesh.triangle_count();
    let mut face_ids: Vec<u32> = (0..face_count as u32).collect();
    let mut lcg = Lcg::new(face_count as u64);
    lcg.shuffle(&mut face_ids);
    let mut kept: Vec<u32> = face_ids.into_iter().take(target).collect();
    kept.sort_unstable();

    let mut old_to_new: HashMap<u32, u32> = HashMap::new();
    let mut new_positions = Vec::new();
    let mut new_normals = Vec::new();
    let mut new_indices = Vec::with_capacity(kept.len() * 3);

    for face_id in kept {
        let face = mesh.face(face_id as usize);
        for old_idx in face {
            let new_idx = *old_to_new.entry(old_idx).or_insert_with(|| {
                let id = (new_positions.len() / 3) as u32;
                let v = mesh.vertex(old_idx as usize);
                new_positions.extend_from_slice(&[v.x, v.y, v.z]);
                let n = mesh.normal(old_idx as usize);
                new_normals.extend_from_slice(&[n.x, n.y, n.z]);
                id
            });
            new_indices.push(new_idx);
        }
    }

    Mesh::new(format!("{}-decimated", mesh.id), mesh.name.clone(), new_positions, new_indices, Some(new_normals))
}

fn detail(pairs: &[(&str, serde_json::Value)]) -> HashMap<String, serde_json::Value> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

/// Run all five analysis checks over `mesh` with `profile`, decimating first
/// if the mesh exceeds `profile.max_triangles_for_analysis`, and assemble the
/// resulting [`Report`].
pub fn generate_report(mesh: &Mesh, profile: &PrinterProfile) -> Report {
    let original_triangle_count = mesh.triangle_count();
    let original_vertex_count = mesh.vertex_count();
    let original_bbox = mesh.bounding_box();

    let decimated = original_triangle_count > profile.max_triangles_for_analysis;
    let owned_subsample;
    let analysis_mesh: &Mesh = if decimated {
        log::info!(
            "decimating mesh {} from {} to {} triangles for analysis",
            mesh.id,
            original_triangle_count,
            profile.max_triangles_for_analysis
        );
        owned_subsample = decimate(mesh, profile.max_triangles_for_analysis);
        &owned_subsample
    } else {
        mesh
    };

    let edge_map = EdgeMap::build(analysis_mesh.indices());
    let watertight = check_watertight(&edge_map);
    let non_manifold = check_non_manifold(&edge_map);
    let components = find_connected_components(
        analysis_mesh.triangle_count(),
        &edge_map,
        profile.floater_threshold_percent,
    );
    let overhang = check_overhang(analysis_mesh, Vec3::y_axis(), profile.overhang_threshold_deg);
    let scale = check_scale(&original_bbox, 1.0, profile.max_print_dimension_mm);

    let component_count = components.components.len();
    let floaters = components.floaters();
    let floater_face_count: usize = floaters.iter().map(|c| c.faces.len()).sum();

    let mut issues = Vec::new();
    let mut next_id = 0usize;
    let mut push_issue =
        |kind: &str, severity: Severity, title: &str, summary: &str, details: HashMap<String, serde_json::Value>, overlay_keys: &[&str]| {
            issues.push(Issue {
                id: next_id,
                kind: kind.to_string(),
                severity,
                title: title.to_string(),
                summary: summary.to_string(),
                details,
                overlay_keys: overlay_keys.iter().map(|s| s.to_string()).collect(),
            });
            next_id += 1;
        };

    if !watertight.is_watertight {
        push_issue(
            "boundary_edges",
            Severity::Blocker,
            "Mesh is not watertight",
            "The mesh has boundary edges that leave gaps in the surface.",
            detail(&[("boundaryEdgeCount", watertight.boundary_edge_count.into())]),
            &["boundaryEdges"],
        );
    }

    if non_manifold.has_non_manifold {
        push_issue(
            "non_manifold_edges",
            Severity::Blocker,
            "Non-manifold geometry detected",
            "Some edges are shared by three or more faces.",
            detail(&[("nonManifoldEdgeCount", non_manifold.non_manifold_edge_count.into())]),
            &["nonManifoldEdges"],
        );
    }

    if !floaters.is_empty() || component_count > 1 {
        push_issue(
            "floater_components",
            Severity::Risk,
            "Disconnected geometry detected",
            "The mesh contains separate pieces that are not the main body.",
            detail(&[
                ("floaterCount", floaters.len().into()),
                ("floaterFaceCount", floater_face_count.into()),
                ("componentCount", component_count.into()),
            ]),
            &["componentIdPerFace", "mainComponentIndex", "floaterIndices"],
        );
    }

    if overhang.overhang_percentage > 20.0 {
        push_issue(
            "overhang",
            Severity::Risk,
            "Significant overhangs present",
            "A large fraction of faces require support material at the current orientation.",
            detail(&[
                ("overhangPercentage", overhang.overhang_percentage.into()),
                ("overhangFaceCount", overhang.overhang_face_count.into()),
                ("maxOverhangAngle", overhang.max_angle.into()),
            ]),
            &["overhangFaceMask", "faceAngles"],
        );
    }

    match scale.severity {
        crate::checks::ScaleSeverity::Error => push_issue(
            "scale_error",
            Severity::Blocker,
            "Mesh dimensions are out of printable range",
            "The model's size falls outside the printer's hard bounds.",
            detail(&[
                ("maxDimensionMm", scale.max_dimension_mm.into()),
                ("minDimensionMm", scale.min_dimension_mm.into()),
                ("suggestedScaleFactor", scale.suggested_scale_factor.into()),
            ]),
            &[],
        ),
        crate::checks::ScaleSeverity::Warning => push_issue(
            "scale_warning",
            Severity::Risk,
            "Mesh dimensions are outside the ideal range",
            "The model's size is printable but outside the recommended range.",
            detail(&[
                ("maxDimensionMm", scale.max_dimension_mm.into()),
                ("minDimensionMm", scale.min_dimension_mm.into()),
                ("suggestedScaleFactor", scale.suggested_scale_factor.into()),
            ]),
            &[],
        ),
        crate::checks::ScaleSeverity::None => {}
    }

    issues.sort_by_key(|issue| issue.severity);

    let status = if issues.iter().any(|i| i.severity == Severity::Blocker) {
        Status::Fail
    } else if issues.iter().any(|i| i.severity == Severity::Risk) {
        Status::Warn
    } else {
        Status::Pass
    };

    let overlay_data = OverlayData {
        boundary_edges: if watertight.boundary_edges.is_empty() { None } else { Some(watertight.boundary_edges) },
        non_manifold_edges: if non_manifold.non_manifold_edges.is_empty() {
            None
        } else {
            Some(non_manifold.non_manifold_edges)
        },
        component_id_per_face: if component_count > 1 {
            let mut per_face = vec![0u32; analysis_mesh.triangle_count()];
            for component in &components.components {
                for &f in &component.faces {
                    per_face[f as usize] = component.id;
                }
            }
            Some(per_face)
        } else {
            None
        },
        main_component_index: components.main_component().map(|c| c.id as i64).or(if component_count == 0 {
            Some(-1)
        } else {
            None
        }),
        floater_indices: if !floaters.is_empty() || component_count > 1 {
            Some(floaters.iter().map(|c| c.id).collect())
        } else {
            None
        },
        overhang_face_mask: if overhang.overhang_face_count > 0 { Some(overhang.face_mask.clone()) } else { None },
        face_angles: if overhang.overhang_face_count > 0 { Some(overhang.face_angles.clone()) } else { None },
    };

    Report {
        schema_version: SCHEMA_VERSION.to_string(),
        created_at: crate::utils::time::now_iso8601(),
        tool_versions: tool_versions(),
        mesh_stats: MeshStats {
            vertex_count: original_vertex_count,
            triangle_count: original_triangle_count,
            edge_count: edge_map.len(),
            component_count,
            bounding_box: original_bbox,
            analysis_decimated: decimated,
            original_triangle_count: if decimated { Some(original_triangle_count) } else { None },
        },
        printer_profile: profile.clone(),
        status,
        issues,
        overlay_data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube() -> Mesh {
        let positions = vec![
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0,
            0.0, 1.0, 1.0,
        ];
        let indices = vec![
            0, 1, 2, 0, 2, 3, 4, 6, 5, 4, 7, 6, 0, 4, 5, 0, 5, 1, 1, 5, 6, 1, 6, 2, 2, 6, 7, 2, 7, 3, 3, 7, 4, 3, 4, 0,
        ];
        Mesh::new("cube", "cube", positions, indices, None)
    }

    #[test]
    fn test_closed_cube_passes() {
        let mesh = cube();
        let report = generate_report(&mesh, &PrinterProfile::default());
        assert_eq!(report.status, Status::Pass);
        assert_eq!(report.mesh_stats.component_count, 1);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_open_triangle_fails_watertight() {
        let mesh = Mesh::new("m", "open", vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], vec![0, 1, 2], None);
        let report = generate_report(&mesh, &PrinterProfile::default());
        assert_eq!(report.status, Status::Fail);
        assert!(report.issues.iter().any(|i| i.kind == "boundary_edges"));
    }

    #[test]
    fn test_issues_sorted_blocker_first() {
        let mesh = Mesh::new("m", "open", vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], vec![0, 1, 2], None);
        let report = generate_report(&mesh, &PrinterProfile::default());
        let severities: Vec<_> = report.issues.iter().map(|i| i.severity).collect();
        let mut sorted = severities.clone();
        sorted.sort();
        assert_eq!(severities, sorted);
    }

    #[test]
    fn test_issue_ids_sequential() {
        let mesh = cube();
        let report = generate_report(&mesh, &PrinterProfile::default());
        for (i, issue) in report.issues.iter().enumerate() {
            assert_eq!(issue.id, i);
        }
    }
}
