//! # mesh-doctor
//!
//! A mesh-processing kernel that analyses a triangulated surface mesh for
//! defects that would prevent successful fused-deposition 3-D printing,
//! reports those defects with machine-readable overlay data, synthesises a
//! prioritised plan of candidate repairs, and executes the repairs to
//! produce corrected meshes.
//!
//! ## Overview
//!
//! The crate is organised in the same layers the design follows, leaves
//! first:
//!
//! - [`types::geometry`] — the canonical [`types::geometry::Mesh`], its
//!   bounding box and invariant checks.
//! - [`topology`] — the edge-adjacency index and connected-component
//!   analysis that every check and repair operator builds on.
//! - [`checks`] — the five independent analysis passes (watertightness,
//!   non-manifold edges, components/floaters, overhang, scale).
//! - [`report`] — aggregates check output into a versioned, immutable
//!   [`report::Report`].
//! - [`repair`] — the four pure mesh-rewriting operators.
//! - [`plan`] — maps report issues to an ordered [`plan::FixPlan`] of
//!   candidate repairs.
//! - [`api`] — the stateless JSON request/response surface (`analyze`,
//!   `repair`) that a host process exposes over HTTP or any other
//!   transport.
//!
//! ## Example
//!
//! ```rust
//! use mesh_doctor::types::geometry::Mesh;
//! use mesh_doctor::profile::PrinterProfile;
//! use mesh_doctor::report;
//!
//! // A single, unclosed triangle: three boundary edges.
//! let mesh = Mesh::new(
//!     "m0",
//!     "open-triangle",
//!     vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
//!     vec![0, 1, 2],
//!     None,
//! );
//!
//! let rep = report::generate_report(&mesh, &PrinterProfile::default());
//! assert_eq!(rep.mesh_stats.edge_count, 3);
//! ```

/// The current version of this crate, embedded in every report's
/// tool-version stamp.
pub const MESH_DOCTOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core geometric types: [`types::geometry::Mesh`], [`types::geometry::Vec3`]
/// and [`types::geometry::BoundingBox`].
pub mod types {
    /// General geometry types for spatial operations and representations.
    pub mod geometry;
}

/// Edge-adjacency index and connected-component analysis (layer B).
pub mod topology;

/// The five independent analysis checks (layer C).
pub mod checks;

/// Printer configuration used to parameterise analysis and repair.
pub mod profile;

/// Report synthesis: aggregates checks into a versioned [`report::Report`]
/// (layer D).
pub mod report;

/// Pure mesh-rewriting repair operators (layer E).
pub mod repair;

/// Fix-plan generation from a report's issues (layer F, part one).
pub mod plan;

/// Stateless JSON request/response surface for `analyze` and `repair`
/// (layer F, part two).
pub mod api;

/// Utility modules for logging and small math/PRNG helpers.
pub mod utils {
    /// Logging initialisation for binaries embedding this crate.
    pub mod logging;
    /// Deterministic linear-congruential generator used by the decimation
    /// gate.
    pub mod lcg;
    /// Small numeric helpers (clamped remap, integer formatting).
    pub mod math_helper;
    /// Dependency-free ISO-8601 UTC timestamp formatting for report stamps.
    pub mod time;
}
