use crate::types::geometry::BoundingBox;

const HARD_MIN_MM: f32 = 5.0;
const HARD_MAX_MM: f32 = 2000.0;
const IDEAL_MIN_MM: f32 = 10.0;
const IDEAL_MAX_MM: f32 = 300.0;

/// Severity of a scale deviation, ordered none < warning < error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleSeverity {
    None,
    Warning,
    Error,
}

/// Result of the scale check.
#[derive(Debug, Clone)]
pub struct ScaleCheck {
    pub max_dimension_mm: f32,
    pub min_dimension_mm: f32,
    pub severity: ScaleSeverity,
    /// Present when `severity != None`: the factor that would bring
    /// `max_dimension_mm` to the nearest ideal bound.
    pub suggested_scale_factor: Option<f32>,
    pub message: Option<String>,
}

/// Evaluate a mesh's bounding box (already multiplied by `unit_scale`)
/// against the hard and ideal print-dimension bounds.
pub fn check_scale(bbox: &BoundingBox, unit_scale: f32, max_print_dimension_mm: f32) -> ScaleCheck {
    let dims = bbox.dimensions();
    let scaled = [dims.x * unit_scale, dims.y * unit_scale, dims.z * unit_scale];
    let max_dimension_mm = scaled.iter().cloned().fold(f32::MIN, f32::max).max(0.0);
    let min_dimension_mm = scaled.iter().cloned().fold(f32::MAX, f32::min).max(0.0);

    let ideal_max = max_print_dimension_mm;
    let ideal_min = IDEAL_MIN_MM;

    if max_dimension_mm <= 0.0 {
        return ScaleCheck {
            max_dimension_mm,
            min_dimension_mm,
            severity: ScaleSeverity::Error,
            suggested_scale_factor: None,
            message: Some("zero dimensions".to_string()),
        };
    }

    if max_dimension_mm < HARD_MIN_MM || max_dimension_mm > HARD_MAX_MM {
        let target = if max_dimension_mm > HARD_MAX_MM { ideal_max } else { ideal_min };
        return ScaleCheck {
            max_dimension_mm,
            min_dimension_mm,
            severity: ScaleSeverity::Error,
            suggested_scale_factor: Some(target / max_dimension_mm),
            message: None,
        };
    }

    if max_dimension_mm < ideal_min || max_dimension_mm > ideal_max {
        let target = if max_dimension_mm > ideal_max { ideal_max } else { ideal_min };
        return ScaleCheck {
            max_dimension_mm,
            min_dimension_mm,
            severity: ScaleSeverity::Warning,
            suggested_scale_factor: Some(target / max_dimension_mm),
            message: None,
        };
    }

    ScaleCheck {
        max_dimension_mm,
        min_dimension_mm,
        severity: ScaleSeverity::None,
        suggested_scale_factor: None,
        message: None,
    }
}

/// Suggested input unit, inferred purely from the magnitude of the
/// unscaled largest dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedUnit {
    Millimeters,
    Meters,
    Inches,
}

impl DetectedUnit {
    pub fn label(&self) -> &'static str {
        match self {
            DetectedUnit::Millimeters => "mm",
            DetectedUnit::Meters => "meters",
            DetectedUnit::Inches => "inches",
        }
    }
}

/// Guess the unit a mesh's raw coordinates were authored in from the
/// magnitude of its largest unscaled dimension, returning the guessed unit
/// and the scale factor that converts it to millimeters.
pub fn detect_units(max_dim_raw: f32) -> (DetectedUnit, f32) {
    if (1.0..=2000.0).contains(&max_dim_raw) {
        return (DetectedUnit::Millimeters, 1.0);
    }
    if (0.001..1.0).contains(&max_dim_raw) {
        return (DetectedUnit::Meters, 1000.0);
    }
    let inches_scale = 25.4;
    let scaled = max_dim_raw * inches_scale;
    if (HARD_MIN_MM..=HARD_MAX_MM).contains(&scaled) {
        return (DetectedUnit::Inches, inches_scale);
    }
    (DetectedUnit::Millimeters, 1.0)
}
