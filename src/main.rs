use std::fs;
use std::process::ExitCode;

use mesh_doctor::{api, utils::logging};

/// `mesh-doctor <mesh.json>` — reads a raw mesh wire document (`{positions,
/// indices, normals?}`) from disk, runs `analyze`, and prints the resulting
/// report as JSON on stdout.
fn main() -> ExitCode {
    logging::init_info();

    let args: Vec<String> = std::env::args().collect();
    let path = match args.get(1) {
        Some(p) => p,
        None => {
            eprintln!("usage: mesh-doctor <mesh.json>");
            return ExitCode::from(2);
        }
    };

    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to read {path}: {e}");
            return ExitCode::from(2);
        }
    };

    let mesh_value: serde_json::Value = match serde_json::from_str(&contents) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("invalid JSON in {path}: {e}");
            return ExitCode::from(2);
        }
    };

    let body = serde_json::json!({ "mesh": mesh_value });
    let (status, response) = api::handle_analyze(&body);

    match status {
        200 => {
            println!("{}", serde_json::to_string_pretty(&response).expect("report serializes"));
            ExitCode::SUCCESS
        }
        400 => {
            eprintln!("invalid mesh: {}", response["error"]);
            ExitCode::from(3)
        }
        _ => {
            eprintln!("internal error: {}", response["error"]);
            ExitCode::from(4)
        }
    }
}
