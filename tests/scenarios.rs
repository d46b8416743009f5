//! End-to-end scenarios spanning the whole analyze/plan/repair pipeline.

use mesh_doctor::api::{handle_analyze, handle_repair};
use mesh_doctor::plan::generate_fix_plan;
use mesh_doctor::profile::PrinterProfile;
use mesh_doctor::report::{generate_report, Status};
use mesh_doctor::types::geometry::Mesh;
use serde_json::json;

fn closed_cube() -> Mesh {
    let positions = vec![
        0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0,
        1.0, 1.0,
    ];
    let indices = vec![
        0, 1, 2, 0, 2, 3, // bottom
        4, 6, 5, 4, 7, 6, // top
        0, 4, 5, 0, 5, 1, // side
        1, 5, 6, 1, 6, 2, // side
        2, 6, 7, 2, 7, 3, // side
        3, 7, 4, 3, 4, 0, // side
    ];
    Mesh::new("cube", "closed-cube", positions, indices, None)
}

fn open_box() -> Mesh {
    let positions = vec![
        0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0,
        1.0, 1.0,
    ];
    let indices = vec![0, 1, 2, 0, 2, 3, 0, 4, 5, 0, 5, 1, 1, 5, 6, 1, 6, 2, 2, 6, 7, 2, 7, 3, 3, 7, 4, 3, 4, 0];
    Mesh::new("box", "open-box", positions, indices, None)
}

#[test]
fn scenario_1_closed_cube_passes_with_two_overhang_faces() {
    let mesh = closed_cube();
    let report = generate_report(&mesh, &PrinterProfile::default());

    assert_eq!(report.status, Status::Pass);
    assert_eq!(report.mesh_stats.edge_count, 18);
    assert_eq!(report.mesh_stats.component_count, 1);
    assert!(report.issues.is_empty());

    let overhang =
        mesh_doctor::checks::check_overhang(&mesh, mesh_doctor::types::geometry::Vec3::y_axis(), 45.0);
    assert_eq!(overhang.overhang_face_count, 2);
    assert!((overhang.overhang_percentage - 16.666_666).abs() < 0.01);
}

#[test]
fn scenario_2_open_box_fails_and_watertight_remesh_closes_it() {
    let mesh = open_box();
    let report = generate_report(&mesh, &PrinterProfile::default());

    assert_eq!(report.status, Status::Fail);
    let boundary_issue = report.issues.iter().find(|i| i.kind == "boundary_edges").expect("boundary issue present");
    assert_eq!(boundary_issue.details["boundaryEdgeCount"], 4);
    assert_eq!(report.overlay_data.boundary_edges.as_ref().unwrap().len(), 8);

    let (_, stats) = mesh_doctor::repair::watertight_remesh::run(&mesh, &Default::default());
    assert_eq!(stats.holes_filled, 1);
    assert_eq!(stats.triangles_added, 4);
    assert_eq!(stats.vertices_added, 1);
    assert_eq!(stats.boundary_edges_after, 0);
}

#[test]
fn scenario_3_strip_with_floater_is_removed() {
    let mut indices: Vec<u32> = Vec::new();
    for i in 0..10u32 {
        indices.extend_from_slice(&[i, i + 1, i + 2]);
    }
    let mut positions = Vec::new();
    for i in 0..12u32 {
        positions.extend_from_slice(&[i as f32, (i % 2) as f32, 0.0]);
    }
    positions.extend_from_slice(&[500.0, 500.0, 500.0, 501.0, 500.0, 500.0, 500.0, 501.0, 500.0]);
    indices.extend_from_slice(&[12, 13, 14]);

    let mesh = Mesh::new("strip", "strip+floater", positions, indices, None);
    let report = generate_report(
        &mesh,
        &PrinterProfile { floater_threshold_percent: 10.0, ..PrinterProfile::default() },
    );
    assert_eq!(report.mesh_stats.component_count, 2);

    let params = mesh_doctor::repair::remove_floaters::Params { threshold_percent: 10.0, keep_only_largest: false };
    let (repaired, _) = mesh_doctor::repair::remove_floaters::run(&mesh, &params);
    assert_eq!(repaired.triangle_count(), 10);
    assert_eq!(repaired.vertex_count(), 12);
}

#[test]
fn scenario_4_shared_vertex_duplicate_is_merged() {
    // Two adjacent triangles sharing corner (1,1,0); one references a vertex
    // duplicated at that coordinate instead of reusing the original.
    let positions = vec![
        0.0, 0.0, 0.0, // 0
        1.0, 0.0, 0.0, // 1
        1.0, 1.0, 0.0, // 2
        1.0, 1.0, 0.0, // 3 duplicate of 2
        0.0, 1.0, 0.0, // 4
    ];
    let indices = vec![0, 1, 2, 0, 3, 4];
    let mesh = Mesh::new("dup", "shared-vertex-dup", positions, indices, None);

    let (repaired, stats) = mesh_doctor::repair::cleanup::run(&mesh, &Default::default());
    assert_eq!(stats.vertices_removed, 1);
    assert_eq!(repaired.triangle_count(), 2);
}

#[test]
fn scenario_5_request_validation_rejects_malformed_bodies() {
    let (status, body) = handle_analyze(&json!({}));
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("mesh"));

    let (status, body) = handle_analyze(&json!({ "mesh": { "positions": [0,0,0,1], "indices": [0,1,2] } }));
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("divisible by 3"));

    let (status, body) =
        handle_analyze(&json!({ "mesh": { "positions": [0,0,0, 1,0,0, 0,1,0], "indices": [0,1,5] } }));
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("exceeds"));
}

#[test]
fn scenario_6_repair_recipe_dispatch() {
    let clean_triangle = json!({ "positions": [0,0,0, 1,0,0, 0,1,0], "indices": [0,1,2] });

    let (status, _) = handle_repair(&json!({ "mesh": clean_triangle, "recipeType": "invalid_type" }));
    assert_eq!(status, 400);

    let (status, body) = handle_repair(&json!({ "mesh": clean_triangle, "recipeType": "mesh_cleanup" }));
    assert_eq!(status, 200);
    assert_eq!(body["mesh"]["positions"], clean_triangle["positions"]);
    assert_eq!(body["mesh"]["indices"], clean_triangle["indices"]);
}

#[test]
fn fix_plan_prioritizes_low_risk_fixes_before_watertight_remesh() {
    let mesh = open_box();
    let report = generate_report(&mesh, &PrinterProfile::default());
    let plan = generate_fix_plan(&report, "box");

    assert_eq!(plan.recommended.last().unwrap().kind, "watertight_remesh");
    assert!(plan.recommended.iter().any(|r| r.kind == "mesh_cleanup"));
}
