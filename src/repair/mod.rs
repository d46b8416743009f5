//! Pure mesh-rewriting repair operators. Each submodule exposes a `run`
//! function and a `Params` struct with a spec-matching `Default` impl,
//! following the `run(mesh, params) -> (Mesh, Stats)` shape throughout.

pub mod auto_orient;
pub mod cleanup;
pub mod remove_floaters;
pub mod watertight_remesh;
