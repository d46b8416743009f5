//! Stateless JSON request/response surface for `analyze` and `repair`.
//!
//! No web framework is introduced here; a host process maps its own HTTP (or
//! other transport) handler onto [`handle_analyze`] and [`handle_repair`],
//! which are plain, synchronous functions: parse, validate, dispatch, encode.

use std::panic::AssertUnwindSafe;

use serde_json::{json, Value};

use crate::plan::generate_fix_plan;
use crate::profile::PrinterProfile;
use crate::report::generate_report;
use crate::repair::{auto_orient, cleanup, remove_floaters, watertight_remesh};
use crate::types::geometry::Mesh;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    MissingField(&'static str),
    NotAnObject(&'static str),
    NotAnArray(&'static str),
    LengthNotDivisibleByThree { array: &'static str },
    EmptyArray { array: &'static str },
    NonFiniteCoordinate,
    NegativeIndex,
    IndexOutOfBounds { index: u32, vertex_count: usize },
    NormalsLengthMismatch,
    UnknownRecipeType(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingField(name) => write!(f, "request is missing required field `{name}`"),
            ValidationError::NotAnObject(name) => write!(f, "field `{name}` must be a JSON object"),
            ValidationError::NotAnArray(name) => write!(f, "field `{name}` must be a JSON array"),
            ValidationError::LengthNotDivisibleByThree { array } => {
                write!(f, "`{array}` length must be divisible by 3")
            }
            ValidationError::EmptyArray { array } => write!(f, "`{array}` must not be empty"),
            ValidationError::NonFiniteCoordinate => write!(f, "`positions` contains a non-finite coordinate"),
            ValidationError::NegativeIndex => write!(f, "`indices` must contain only non-negative integers"),
            ValidationError::IndexOutOfBounds { index, vertex_count } => {
                write!(f, "index {index} exceeds vertex count {vertex_count}")
            }
            ValidationError::NormalsLengthMismatch => write!(f, "`normals` length must equal `positions` length"),
            ValidationError::UnknownRecipeType(kind) => write!(f, "unknown recipe type `{kind}`"),
        }
    }
}

impl std::error::Error for ValidationError {}

struct ParsedMesh {
    positions: Vec<f32>,
    indices: Vec<u32>,
    normals: Option<Vec<f32>>,
}

fn parse_number_array(value: &Value, field: &'static str) -> Result<Vec<f64>, ValidationError> {
    let arr = value.as_array().ok_or(ValidationError::NotAnArray(field))?;
    arr.iter().map(|v| v.as_f64().ok_or(ValidationError::NonFiniteCoordinate)).collect()
}

fn parse_index_array(value: &Value, field: &'static str) -> Result<Vec<u32>, ValidationError> {
    let arr = value.as_array().ok_or(ValidationError::NotAnArray(field))?;
    arr.iter()
        .map(|v| {
            let n = v.as_i64().ok_or(ValidationError::NegativeIndex)?;
            u32::try_from(n).map_err(|_| ValidationError::NegativeIndex)
        })
        .collect()
}

fn parse_and_validate_mesh(value: &Value) -> Result<ParsedMesh, ValidationError> {
    let obj = value.as_object().ok_or(ValidationError::NotAnObject("mesh"))?;

    let positions_value = obj.get("positions").ok_or(ValidationError::MissingField("positions"))?;
    let positions_f64 = parse_number_array(positions_value, "positions")?;
    if positions_f64.is_empty() {
        return Err(ValidationError::EmptyArray { array: "positions" });
    }
    if positions_f64.len() % 3 != 0 {
        return Err(ValidationError::LengthNotDivisibleByThree { array: "positions" });
    }
    if positions_f64.iter().any(|v| !v.is_finite()) {
        return Err(ValidationError::NonFiniteCoordinate);
    }
    let positions: Vec<f32> = positions_f64.iter().map(|&v| v as f32).collect();
    let vertex_count = positions.len() / 3;

    let indices_value = obj.get("indices").ok_or(ValidationError::MissingField("indices"))?;
    let indices = parse_index_array(indices_value, "indices")?;
    if indices.is_empty() {
        return Err(ValidationError::EmptyArray { array: "indices" });
    }
    if indices.len() % 3 != 0 {
        return Err(ValidationError::LengthNotDivisibleByThree { array: "indices" });
    }
    for &idx in &indices {
        if idx as usize >= vertex_count {
            return Err(ValidationError::IndexOutOfBounds { index: idx, vertex_count });
        }
    }

    let normals = match obj.get("normals") {
        None | Some(Value::Null) => None,
        Some(v) => {
            let normals_f64 = parse_number_array(v, "normals")?;
            if normals_f64.len() != positions.len() {
                return Err(ValidationError::NormalsLengthMismatch);
            }
            Some(normals_f64.iter().map(|&v| v as f32).collect())
        }
    };

    Ok(ParsedMesh { positions, indices, normals })
}

fn mesh_to_wire(mesh: &Mesh) -> Value {
    json!({
        "positions": mesh.positions().iter().map(|&v| v as f64).collect::<Vec<_>>(),
        "indices": mesh.indices(),
        "normals": mesh.normals().iter().map(|&v| v as f64).collect::<Vec<_>>(),
    })
}

fn error_response(message: impl std::fmt::Display) -> (u16, Value) {
    (400, json!({ "success": false, "error": message.to_string() }))
}

fn internal_error_response() -> (u16, Value) {
    log::error!("internal error handling request");
    (500, json!({ "success": false, "error": "internal error" }))
}

/// Parse, validate and analyse a `{ mesh, printerProfile? }` request body.
pub fn handle_analyze(body: &Value) -> (u16, Value) {
    let mesh_value = match body.get("mesh") {
        Some(v) => v,
        None => return error_response(ValidationError::MissingField("mesh")),
    };

    let parsed = match parse_and_validate_mesh(mesh_value) {
        Ok(p) => p,
        Err(e) => return error_response(e),
    };

    let profile: PrinterProfile = match body.get("printerProfile") {
        Some(v) => match serde_json::from_value(v.clone()) {
            Ok(p) => p,
            Err(_) => PrinterProfile::default(),
        },
        None => PrinterProfile::default(),
    };

    let mesh = Mesh::new("request", "request", parsed.positions, parsed.indices, parsed.normals);

    let result = std::panic::catch_unwind(AssertUnwindSafe(|| generate_report(&mesh, &profile)));
    match result {
        Ok(report) => (200, json!({ "success": true, "report": report })),
        Err(_) => internal_error_response(),
    }
}

/// Parse, validate and execute a `{ mesh, recipeId, recipeType, params? }`
/// repair request.
pub fn handle_repair(body: &Value) -> (u16, Value) {
    let mesh_value = match body.get("mesh") {
        Some(v) => v,
        None => return error_response(ValidationError::MissingField("mesh")),
    };

    let parsed = match parse_and_validate_mesh(mesh_value) {
        Ok(p) => p,
        Err(e) => return error_response(e),
    };

    let recipe_type = match body.get("recipeType").and_then(Value::as_str) {
        Some(s) => s.to_string(),
        None => return error_response(ValidationError::MissingField("recipeType")),
    };

    let params_override = body.get("params").cloned();
    let mesh = Mesh::new("request", "request", parsed.positions, parsed.indices, parsed.normals);

    let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
        dispatch_repair(&mesh, &recipe_type, params_override.clone())
    }));

    match result {
        Ok(Ok((repaired, stats))) => (
            200,
            json!({
                "success": true,
                "mesh": mesh_to_wire(&repaired),
                "result": stats,
            }),
        ),
        Ok(Err(e)) => error_response(e),
        Err(_) => internal_error_response(),
    }
}

fn merge_params(default: Value, overrides: Option<Value>) -> Value {
    let mut merged = default;
    if let (Some(Value::Object(over)), Value::Object(base)) = (overrides, &mut merged) {
        for (k, v) in over {
            base.insert(k, v);
        }
    }
    merged
}

fn dispatch_repair(mesh: &Mesh, recipe_type: &str, params_override: Option<Value>) -> Result<(Mesh, Value), ValidationError> {
    match recipe_type {
        "remove_floaters" => {
            let params_json = merge_params(serde_json::to_value(remove_floaters::Params::default()).unwrap(), params_override);
            let params: remove_floaters::Params = serde_json::from_value(params_json).unwrap_or_default();
            let (mesh, stats) = remove_floaters::run(mesh, &params);
            Ok((mesh, serde_json::to_value(stats).unwrap()))
        }
        "mesh_cleanup" => {
            let params_json = merge_params(serde_json::to_value(cleanup::Params::default()).unwrap(), params_override);
            let params: cleanup::Params = serde_json::from_value(params_json).unwrap_or_default();
            let (mesh, stats) = cleanup::run(mesh, &params);
            Ok((mesh, serde_json::to_value(stats).unwrap()))
        }
        "auto_orient" => {
            let params_json = merge_params(serde_json::to_value(auto_orient::Params::default()).unwrap(), params_override);
            let params: auto_orient::Params = serde_json::from_value(params_json).unwrap_or_default();
            let (mesh, stats) = auto_orient::run(mesh, &params);
            Ok((mesh, serde_json::to_value(stats).unwrap()))
        }
        "watertight_remesh" => {
            let params_json = merge_params(serde_json::to_value(watertight_remesh::Params::default()).unwrap(), params_override);
            let params: watertight_remesh::Params = serde_json::from_value(params_json).unwrap_or_default();
            let (mesh, stats) = watertight_remesh::run(mesh, &params);
            Ok((mesh, serde_json::to_value(stats).unwrap()))
        }
        other => Err(ValidationError::UnknownRecipeType(other.to_string())),
    }
}

/// Synthesise a fix plan from a freshly generated report; a thin wrapper so
/// a host can offer `/plan` alongside `/analyze` and `/repair` without
/// duplicating validation.
pub fn handle_plan(body: &Value) -> (u16, Value) {
    let (status, analyzed) = handle_analyze(body);
    if status != 200 {
        return (status, analyzed);
    }
    let report: crate::report::Report = serde_json::from_value(analyzed["report"].clone()).expect("round-trips");
    let mesh_id = body.get("mesh").and_then(|m| m.get("id")).and_then(Value::as_str).unwrap_or("request");
    let plan = generate_fix_plan(&report, mesh_id);
    (200, json!({ "success": true, "plan": plan }))
}
