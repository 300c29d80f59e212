//! # Tower Geometry
//!
//! Decomposes a lattice tower into stacked segments. The lower
//! `variable_segments` taper linearly from the base width to the top width;
//! the upper `constant_segments` keep the top width.
//!
//! ## Example
//!
//! ```rust
//! use tower_core::calculations::geometry::{calculate_segments, TowerSpec};
//! use tower_core::tables::CrossSection;
//!
//! let spec = TowerSpec::new(3.6, 2.0, 29.3, 8, 2, CrossSection::Square).unwrap();
//! let segments = calculate_segments(&spec);
//!
//! assert_eq!(segments.len(), 10);
//! assert_eq!(segments[0].base_width, 3.6);
//! assert_eq!(segments[9].top_width, 2.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::project::ProjectSettings;
use crate::tables::{tia_ref, CrossSection, ExposureCategory};

/// Validated tower input.
///
/// Construction (directly or from JSON) fails unless
/// `base_width > top_width > 0`, `height > 0` and there is at least one
/// segment.
///
/// ## JSON Example
///
/// ```json
/// {
///   "base_width": 3.6,
///   "top_width": 2.0,
///   "height": 29.3,
///   "variable_segments": 8,
///   "constant_segments": 2,
///   "cross_section": "square"
/// }
/// ```
///
/// Stored tower records using `"Tower Base Width"`, `"Top Width"`,
/// `"Variable Segments"`, ... (or their underscore forms) are accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TowerSpecRecord")]
pub struct TowerSpec {
    base_width: f64,
    top_width: f64,
    height: f64,
    variable_segments: u32,
    constant_segments: u32,
    cross_section: CrossSection,
}

impl TowerSpec {
    /// Create a validated tower specification.
    pub fn new(
        base_width: f64,
        top_width: f64,
        height: f64,
        variable_segments: u32,
        constant_segments: u32,
        cross_section: CrossSection,
    ) -> CalcResult<Self> {
        let spec = TowerSpec {
            base_width,
            top_width,
            height,
            variable_segments,
            constant_segments,
            cross_section,
        };
        spec.validate()?;
        Ok(spec)
    }

    fn validate(&self) -> CalcResult<()> {
        for (field, value) in [
            ("base_width", self.base_width),
            ("top_width", self.top_width),
            ("height", self.height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Dimensions must be positive numbers",
                ));
            }
        }
        if self.total_segments() == 0 {
            return Err(CalcError::invalid_input(
                "variable_segments + constant_segments",
                "0",
                "Tower needs at least one segment",
            ));
        }
        if self.base_width <= self.top_width {
            return Err(CalcError::invalid_input(
                "base_width",
                format!("{} (top_width = {})", self.base_width, self.top_width),
                "Base width must be greater than top width",
            ));
        }
        Ok(())
    }

    /// Width at ground level (m)
    pub fn base_width(&self) -> f64 {
        self.base_width
    }

    /// Width of the constant-width top portion (m)
    pub fn top_width(&self) -> f64 {
        self.top_width
    }

    /// Total tower height (m)
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Number of tapered segments
    pub fn variable_segments(&self) -> u32 {
        self.variable_segments
    }

    /// Number of constant-width segments
    pub fn constant_segments(&self) -> u32 {
        self.constant_segments
    }

    /// Tower cross-section
    pub fn cross_section(&self) -> CrossSection {
        self.cross_section
    }

    /// Total number of segments
    pub fn total_segments(&self) -> u32 {
        self.variable_segments + self.constant_segments
    }

    /// Height of every segment (m)
    pub fn segment_height(&self) -> f64 {
        self.height / f64::from(self.total_segments())
    }
}

/// Raw tower record as it arrives from callers, before validation.
#[derive(Debug, Clone, Deserialize)]
struct TowerSpecRecord {
    #[serde(alias = "Tower Base Width", alias = "Tower_Base_Width", alias = "tower_base_width")]
    base_width: f64,
    #[serde(alias = "Top Width", alias = "Top_Width")]
    top_width: f64,
    #[serde(alias = "Height")]
    height: f64,
    #[serde(alias = "Variable Segments", alias = "Variable_Segments")]
    variable_segments: u32,
    #[serde(alias = "Constant Segments", alias = "Constant_Segments")]
    constant_segments: u32,
    #[serde(default, alias = "Cross Section", alias = "Cross_Section")]
    cross_section: Option<String>,
}

impl TryFrom<TowerSpecRecord> for TowerSpec {
    type Error = CalcError;

    fn try_from(record: TowerSpecRecord) -> CalcResult<Self> {
        let cross_section = match record.cross_section.as_deref() {
            Some(name) => CrossSection::from_str_flexible(name)?,
            None => CrossSection::default(),
        };
        TowerSpec::new(
            record.base_width,
            record.top_width,
            record.height,
            record.variable_segments,
            record.constant_segments,
            cross_section,
        )
    }
}

/// One vertical slice of the tower.
///
/// ## JSON Example
///
/// ```json
/// {
///   "index": 1,
///   "bottom_elevation": 0.0,
///   "top_elevation": 2.93,
///   "base_width": 3.6,
///   "top_width": 3.4,
///   "mid_width": 3.5,
///   "height": 2.93,
///   "area": 10.255,
///   "rwidth": 0.1,
///   "z_height": 1.465,
///   "cross_section": "square"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Segment {
    /// 1-based position, counted from the ground
    pub index: u32,
    /// Elevation of the segment bottom (m)
    pub bottom_elevation: f64,
    /// Elevation of the segment top (m)
    pub top_elevation: f64,
    /// Width at the bottom (m)
    pub base_width: f64,
    /// Width at the top (m)
    pub top_width: f64,
    /// Width at mid-height (m)
    pub mid_width: f64,
    /// Segment height (m)
    pub height: f64,
    /// Gross face area (m²): trapezoid for tapered, rectangle for constant
    pub area: f64,
    /// Width reduction per side (m), 0 for constant segments
    pub rwidth: f64,
    /// Elevation of the segment midpoint (m)
    pub z_height: f64,
    /// Cross-section inherited from the tower
    pub cross_section: CrossSection,
}

impl Segment {
    /// Whether this segment tapers
    pub fn is_tapered(&self) -> bool {
        self.rwidth > 0.0
    }
}

/// Split a tower into its ordered segments, bottom to top.
pub fn calculate_segments(spec: &TowerSpec) -> Vec<Segment> {
    let segment_height = spec.segment_height();
    let mut segments = Vec::with_capacity(spec.total_segments() as usize);

    // No taper step to interpolate when the tower has no variable segments
    let taper_step = if spec.variable_segments > 0 {
        (spec.base_width - spec.top_width) / f64::from(spec.variable_segments)
    } else {
        0.0
    };

    for i in 0..spec.variable_segments {
        let base_width = spec.base_width - f64::from(i) * taper_step;
        let top_width = spec.base_width - f64::from(i + 1) * taper_step;
        segments.push(build_segment(
            spec,
            i,
            segment_height,
            base_width,
            top_width,
            (base_width + top_width) * segment_height / 2.0,
        ));
    }

    for j in 0..spec.constant_segments {
        let i = spec.variable_segments + j;
        segments.push(build_segment(
            spec,
            i,
            segment_height,
            spec.top_width,
            spec.top_width,
            spec.top_width * segment_height,
        ));
    }

    tracing::debug!(
        segments = segments.len(),
        segment_height,
        cross_section = %spec.cross_section,
        "tower decomposed into segments"
    );

    segments
}

fn build_segment(spec: &TowerSpec, i: u32, segment_height: f64, base_width: f64, top_width: f64, area: f64) -> Segment {
    let bottom_elevation = f64::from(i) * segment_height;
    Segment {
        index: i + 1,
        bottom_elevation,
        top_elevation: bottom_elevation + segment_height,
        base_width,
        top_width,
        mid_width: (base_width + top_width) / 2.0,
        height: segment_height,
        area,
        rwidth: (base_width - top_width) / 2.0,
        z_height: bottom_elevation + segment_height / 2.0,
        cross_section: spec.cross_section,
    }
}

/// Gust effect factor Gh for self-supporting lattice structures.
///
/// `Gh = 0.85 + 0.15·(h/45.7 − 3.0)`, bounded to [0.85, 1.0].
pub fn gust_effect_factor(height: f64) -> CalcResult<f64> {
    if !height.is_finite() || height <= 0.0 {
        return Err(CalcError::precondition_failed(
            format!("Gh ({})", tia_ref::GH),
            "height",
            height.to_string(),
            "Height must be a positive number",
        ));
    }
    let gh = 0.85 + 0.15 * ((height / 45.7) - 3.0);
    Ok(gh.clamp(0.85, 1.0))
}

/// Tower-level wind design record: the validated input, the site-wide
/// design values and the segment list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerData {
    pub tower: TowerSpec,
    /// Wind importance factor from the risk category
    pub importance_factor: f64,
    pub exposure_category: ExposureCategory,
    /// m/s
    pub basic_wind_speed_service: f64,
    /// m/s
    pub basic_wind_speed_ultimate: f64,
    pub gust_effect_factor: f64,
    #[serde(alias = "segment_list")]
    pub segments: Vec<Segment>,
}

impl TowerData {
    /// Decompose the tower and attach the project's design values
    pub fn initiate(spec: &TowerSpec, settings: &ProjectSettings) -> CalcResult<Self> {
        let data = TowerData {
            tower: spec.clone(),
            importance_factor: settings.risk_category.wind_importance(),
            exposure_category: settings.exposure_category,
            basic_wind_speed_service: settings.basic_wind_speed_service,
            basic_wind_speed_ultimate: settings.basic_wind_speed_ultimate,
            gust_effect_factor: gust_effect_factor(spec.height())?,
            segments: calculate_segments(spec),
        };
        tracing::info!(
            height = spec.height(),
            segments = data.segments.len(),
            gh = data.gust_effect_factor,
            "tower data initiated"
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_tower() -> TowerSpec {
        TowerSpec::new(3.6, 2.0, 29.3, 8, 2, CrossSection::Square).unwrap()
    }

    #[test]
    fn test_segment_count_and_total_height() {
        let spec = reference_tower();
        let segments = calculate_segments(&spec);
        assert_eq!(segments.len(), 10);

        let total: f64 = segments.iter().map(|s| s.height).sum();
        assert!((total - 29.3).abs() < 1e-9);
    }

    #[test]
    fn test_continuous_taper() {
        let segments = calculate_segments(&reference_tower());
        for pair in segments[..8].windows(2) {
            assert!((pair[0].top_width - pair[1].base_width).abs() < 1e-12);
            assert!(pair[1].base_width < pair[0].base_width);
        }
        assert!((segments[7].top_width - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_segments() {
        let segments = calculate_segments(&reference_tower());
        for seg in &segments[8..] {
            assert_eq!(seg.base_width, 2.0);
            assert_eq!(seg.top_width, 2.0);
            assert_eq!(seg.rwidth, 0.0);
            assert!(!seg.is_tapered());
            assert!((seg.area - 2.0 * seg.height).abs() < 1e-12);
        }
    }

    #[test]
    fn test_z_height_monotonic_midpoints() {
        let segments = calculate_segments(&reference_tower());
        let h = 29.3 / 10.0;
        for (i, seg) in segments.iter().enumerate() {
            assert_eq!(seg.index, i as u32 + 1);
            assert!((seg.z_height - (i as f64 * h + h / 2.0)).abs() < 1e-9);
            assert!((seg.top_elevation - seg.bottom_elevation - h).abs() < 1e-9);
        }
    }

    #[test]
    fn test_trapezoid_area_and_rwidth() {
        let spec = TowerSpec::new(3.0, 2.5, 3.0, 1, 0, CrossSection::Square).unwrap();
        let seg = &calculate_segments(&spec)[0];
        assert!((seg.rwidth - 0.25).abs() < 1e-12);
        assert!((seg.area - 8.25).abs() < 1e-12);
        assert!((seg.mid_width - 2.75).abs() < 1e-12);
    }

    #[test]
    fn test_no_variable_segments() {
        let spec = TowerSpec::new(3.0, 2.0, 12.0, 0, 3, CrossSection::Triangular).unwrap();
        let segments = calculate_segments(&spec);
        assert_eq!(segments.len(), 3);
        assert!(segments.iter().all(|s| s.base_width == 2.0 && s.area.is_finite()));
        assert!(segments.iter().all(|s| s.cross_section == CrossSection::Triangular));
    }

    #[test]
    fn test_validation_errors() {
        assert!(TowerSpec::new(-1.0, 2.0, 10.0, 1, 1, CrossSection::Square).is_err());
        assert!(TowerSpec::new(3.0, 0.0, 10.0, 1, 1, CrossSection::Square).is_err());
        assert!(TowerSpec::new(3.0, 2.0, 0.0, 1, 1, CrossSection::Square).is_err());
        assert!(TowerSpec::new(3.0, 2.0, 10.0, 0, 0, CrossSection::Square).is_err());

        let err = TowerSpec::new(2.0, 3.0, 10.0, 1, 1, CrossSection::Square).unwrap_err();
        match err {
            CalcError::InvalidInput { field, .. } => assert_eq!(field, "base_width"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_deserialize_legacy_record() {
        let json = r#"{
            "Tower Base Width": 3.6,
            "Top Width": 2,
            "Height": 29.3,
            "Variable Segments": 8,
            "Constant Segments": 2,
            "Cross Section": "Square"
        }"#;
        let spec: TowerSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec, reference_tower());
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let base_not_wider = r#"{"base_width": 2.0, "top_width": 2.0, "height": 10.0,
            "variable_segments": 1, "constant_segments": 1}"#;
        assert!(serde_json::from_str::<TowerSpec>(base_not_wider).is_err());

        let negative_count = r#"{"base_width": 3.0, "top_width": 2.0, "height": 10.0,
            "variable_segments": -1, "constant_segments": 1}"#;
        assert!(serde_json::from_str::<TowerSpec>(negative_count).is_err());

        let bad_shape = r#"{"base_width": 3.0, "top_width": 2.0, "height": 10.0,
            "variable_segments": 1, "constant_segments": 1, "cross_section": "hexagonal"}"#;
        assert!(serde_json::from_str::<TowerSpec>(bad_shape).is_err());
    }

    #[test]
    fn test_segment_rejects_missing_fields() {
        let json = r#"{"index": 1, "base_width": 3.0, "height": 3.0}"#;
        assert!(serde_json::from_str::<Segment>(json).is_err());
    }

    #[test]
    fn test_gust_effect_factor() {
        assert_eq!(gust_effect_factor(30.0).unwrap(), 0.85);
        assert_eq!(gust_effect_factor(500.0).unwrap(), 1.0);
        let mid = gust_effect_factor(150.0).unwrap();
        assert!((mid - (0.85 + 0.15 * (150.0 / 45.7 - 3.0))).abs() < 1e-12);
        assert!(gust_effect_factor(0.0).is_err());
        assert!(gust_effect_factor(-10.0).is_err());
    }

    #[test]
    fn test_tower_data_initiate() {
        let spec = reference_tower();
        let settings = ProjectSettings {
            risk_category: crate::tables::RiskCategory::III,
            ..ProjectSettings::default()
        };
        let data = TowerData::initiate(&spec, &settings).unwrap();

        assert_eq!(data.importance_factor, 1.15);
        assert_eq!(data.exposure_category, ExposureCategory::C);
        assert_eq!(data.basic_wind_speed_service, 33.33);
        assert_eq!(data.basic_wind_speed_ultimate, 44.44);
        assert_eq!(data.gust_effect_factor, 0.85);
        assert_eq!(data.segments.len(), 10);

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["exposure_category"], "Exposure C");
        assert_eq!(json["tower"]["variable_segments"], 8);
    }
}
