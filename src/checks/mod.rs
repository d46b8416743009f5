pub mod non_manifold;
pub mod overhang;
pub mod scale;
pub mod watertight;

pub use non_manifold::{check_non_manifold, NonManifoldCheck};
pub use overhang::{check_overhang, check_overhang_positions, heat, OverhangCheck};
pub use scale::{check_scale, detect_units, DetectedUnit, ScaleCheck, ScaleSeverity};
pub use watertight::{check_watertight, WatertightCheck};
