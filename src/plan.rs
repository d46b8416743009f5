//! Maps a [`crate::report::Report`]'s issues to an ordered plan of
//! candidate repairs.

use serde::{Deserialize, Serialize};

use crate::report::Report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Risk {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShapeImpact {
    None,
    Local,
    Global,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub op: String,
    pub params: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixRecipe {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    pub target_issues: Vec<usize>,
    pub risk: Risk,
    pub shape_impact: ShapeImpact,
    pub deterministic: bool,
    pub implemented: bool,
    pub steps: Vec<Step>,
    pub warnings: Vec<String>,
    pub expected_effect: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixPlan {
    pub schema_version: String,
    pub mesh_id: String,
    pub report_id: String,
    pub recommended: Vec<FixRecipe>,
    pub advisory: Vec<FixRecipe>,
}

fn targets(report: &Report, kind: &str) -> Vec<usize> {
    report.issues.iter().filter(|i| i.kind == kind).map(|i| i.id).collect()
}

/// Synthesise a [`FixPlan`] for `report`: one recipe per matching issue
/// pattern, sorted `(risk, impact)` ascending.
pub fn generate_fix_plan(report: &Report, mesh_id: &str) -> FixPlan {
    let mut recommended = Vec::new();

    let floater_targets = targets(report, "floater_components");
    if !floater_targets.is_empty() {
        recommended.push(FixRecipe {
            id: "remove_floaters".to_string(),
            kind: "remove_floaters".to_string(),
            title: "Remove floating geometry".to_string(),
            description: "Deletes disconnected components below the floater size threshold.".to_string(),
            target_issues: floater_targets,
            risk: Risk::Low,
            shape_impact: ShapeImpact::Local,
            deterministic: true,
            implemented: true,
            steps: vec![Step {
                op: "remove_floaters".to_string(),
                params: serde_json::json!({ "thresholdPercent": 5 }),
            }],
            warnings: Vec::new(),
            expected_effect: "Floating fragments are removed; the main body is unaffected.".to_string(),
        });
    }

    if !report.issues.is_empty() {
        recommended.push(FixRecipe {
            id: "mesh_cleanup".to_string(),
            kind: "mesh_cleanup".to_string(),
            title: "Clean up mesh geometry".to_string(),
            description: "Merges near-duplicate vertices and drops degenerate faces.".to_string(),
            target_issues: report.issues.iter().map(|i| i.id).collect(),
            risk: Risk::Low,
            shape_impact: ShapeImpact::None,
            deterministic: true,
            implemented: true,
            steps: vec![Step {
                op: "mesh_cleanup".to_string(),
                params: serde_json::json!({ "areaThreshold": 1e-10, "mergeEpsilon": 1e-6 }),
            }],
            warnings: Vec::new(),
            expected_effect: "Coincident vertices are merged and degenerate faces are dropped.".to_string(),
        });
    }

    let overhang_targets = targets(report, "overhang");
    if !overhang_targets.is_empty() {
        recommended.push(FixRecipe {
            id: "auto_orient".to_string(),
            kind: "auto_orient".to_string(),
            title: "Reorient for printability".to_string(),
            description: "Searches yaw/pitch candidates for the orientation with the least overhang.".to_string(),
            target_issues: overhang_targets,
            risk: Risk::Low,
            shape_impact: ShapeImpact::None,
            deterministic: true,
            implemented: true,
            steps: vec![Step {
                op: "auto_orient".to_string(),
                params: serde_json::json!({ "overhangThresholdDeg": 45 }),
            }],
            warnings: Vec::new(),
            expected_effect: "The mesh is rotated in place; no vertices are added or removed.".to_string(),
        });
    }

    let boundary_targets = targets(report, "boundary_edges");
    if !boundary_targets.is_empty() {
        recommended.push(FixRecipe {
            id: "watertight_remesh".to_string(),
            kind: "watertight_remesh".to_string(),
            title: "Fill holes to close the mesh".to_string(),
            description: "Fills boundary loops under the hole-size cap with a centroid fan.".to_string(),
            target_issues: boundary_targets,
            risk: Risk::High,
            shape_impact: ShapeImpact::Global,
            deterministic: true,
            implemented: true,
            steps: vec![Step {
                op: "watertight_remesh".to_string(),
                params: serde_json::json!({ "maxHoleSize": 100 }),
            }],
            warnings: vec!["Adds new geometry; large or irregular holes may fill poorly.".to_string()],
            expected_effect: "Boundary edges are closed with flat centroid-fan caps.".to_string(),
        });
    }

    recommended.sort_by(|a, b| (a.risk, a.shape_impact).cmp(&(b.risk, b.shape_impact)));

    FixPlan {
        schema_version: "1.0".to_string(),
        mesh_id: mesh_id.to_string(),
        report_id: format!("{}-report", mesh_id),
        recommended,
        advisory: Vec::new(),
    }
}
