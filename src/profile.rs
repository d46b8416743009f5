use serde::{Deserialize, Serialize};

/// Printer configuration that parameterises analysis and repair: the
/// overhang angle, acceptable print volume, floater cutoff and the
/// triangle-count ceiling above which analysis decimates its input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterProfile {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_overhang_threshold_deg")]
    pub overhang_threshold_deg: f32,
    #[serde(default = "default_max_print_dimension_mm")]
    pub max_print_dimension_mm: f32,
    #[serde(default = "default_floater_threshold_percent")]
    pub floater_threshold_percent: f32,
    #[serde(default = "default_max_triangles_for_analysis")]
    pub max_triangles_for_analysis: usize,
}

fn default_name() -> String {
    "default".to_string()
}

fn default_overhang_threshold_deg() -> f32 {
    45.0
}

fn default_max_print_dimension_mm() -> f32 {
    300.0
}

fn default_floater_threshold_percent() -> f32 {
    5.0
}

fn default_max_triangles_for_analysis() -> usize {
    200_000
}

impl Default for PrinterProfile {
    fn default() -> Self {
        PrinterProfile {
            name: default_name(),
            overhang_threshold_deg: default_overhang_threshold_deg(),
            max_print_dimension_mm: default_max_print_dimension_mm(),
            floater_threshold_percent: default_floater_threshold_percent(),
            max_triangles_for_analysis: default_max_triangles_for_analysis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_matches_spec_defaults() {
        let profile = PrinterProfile::default();
        assert_eq!(profile.overhang_threshold_deg, 45.0);
        assert_eq!(profile.max_print_dimension_mm, 300.0);
        assert_eq!(profile.floater_threshold_percent, 5.0);
        assert_eq!(profile.max_triangles_for_analysis, 200_000);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let partial: PrinterProfile = serde_json::from_str(r#"{"overhangThresholdDeg": 30.0}"#).unwrap();
        assert_eq!(partial.overhang_threshold_deg, 30.0);
        assert_eq!(partial.max_print_dimension_mm, 300.0);
    }
}
