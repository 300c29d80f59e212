//! # Panel Aerodynamics
//!
//! Wind-load coefficients for one tower face panel (a segment plus its leg,
//! diagonal and main-belt bars), per TIA-222 2.6.11.2.
//!
//! ## Quantities
//!
//! - projected area `Af`/`Ar`: member length × bar width, both faces,
//!   split into flat (angle) and round members
//! - solidity ratio `ε = (Af + Ar) / Ag`
//! - force coefficient `Cf`
//!   - square: `4.0ε² − 5.9ε + 4.0`
//!   - triangular: `3.4ε² − 4.7ε + 3.4`
//! - round member reduction `Rr = min(0.57 − 0.14ε + 0.86ε² − 0.24ε³, 1.0)`
//! - wind direction factor `Df` per wind angle (Table 2-6)
//! - effective projected area `EPA = Cf · Df · (Af + Ar·Rr)` per wind angle
//!
//! ## Example
//!
//! ```rust
//! use tower_core::bars::{BarCatalog, BarSelection, UnitSystem};
//! use tower_core::calculations::geometry::{calculate_segments, TowerSpec};
//! use tower_core::calculations::panel::{Panel, PanelBars, SiteConditions};
//! use tower_core::tables::CrossSection;
//!
//! let spec = TowerSpec::new(3.0, 2.5, 3.0, 1, 0, CrossSection::Square).unwrap();
//! let segment = &calculate_segments(&spec)[0];
//!
//! let bars = PanelBars {
//!     leg: BarSelection::angle("L75x75x6"),
//!     diagonal: BarSelection::angle("L50x50x4"),
//!     main_belt: BarSelection::round("R25.4x2"),
//! };
//! let catalog = BarCatalog::new(UnitSystem::Si);
//! let panel = Panel::new(segment, &bars, &SiteConditions::default(), &catalog).unwrap();
//!
//! let epa = panel.effective_projected_area().unwrap();
//! assert!(epa.contains_key("epa_0°"));
//! assert!(epa.contains_key("epa_45°"));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bars::{BarCatalog, BarKind, BarSelection, BarSpec};
use crate::calculations::geometry::Segment;
use crate::calculations::k_factors::{calculate_ke, calculate_kz, calculate_kzt, KFactors};
use crate::calculations::toolkit::{MemberLengths, Toolkit};
use crate::errors::{CalcError, CalcResult};
use crate::tables::{self, tia_ref, CrossSection, ExposureCategory, TopographicCategory};
use crate::units::round_to;

// ============================================================================
// Inputs
// ============================================================================

fn default_crest_height() -> f64 {
    10.0
}

/// Site context a panel is evaluated in.
///
/// ## JSON Example
///
/// ```json
/// {
///   "exposure_category": "Exposure C",
///   "topographic_category": "2",
///   "crest_height": 10.0,
///   "ground_elevation": 0.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConditions {
    /// Overrides the segment's cross-section when set
    #[serde(default)]
    pub cross_section: Option<CrossSection>,
    #[serde(default)]
    pub exposure_category: ExposureCategory,
    #[serde(default)]
    pub topographic_category: TopographicCategory,
    /// Height used for Kz/Kzt (m); the segment midpoint when unset
    #[serde(default)]
    pub height_above_ground: Option<f64>,
    /// Height of the topographic feature (m)
    #[serde(default = "default_crest_height")]
    pub crest_height: f64,
    /// Site elevation above sea level (m)
    #[serde(default)]
    pub ground_elevation: f64,
}

impl Default for SiteConditions {
    fn default() -> Self {
        Self {
            cross_section: None,
            exposure_category: ExposureCategory::default(),
            topographic_category: TopographicCategory::default(),
            height_above_ground: None,
            crest_height: default_crest_height(),
            ground_elevation: 0.0,
        }
    }
}

/// Bar choice for each member role of a panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelBars {
    pub leg: BarSelection,
    pub diagonal: BarSelection,
    pub main_belt: BarSelection,
}

/// Member role within a panel face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Leg,
    Diagonal,
    MainBelt,
}

impl MemberRole {
    pub const ALL: [MemberRole; 3] = [MemberRole::Leg, MemberRole::Diagonal, MemberRole::MainBelt];
}

// ============================================================================
// Outputs
// ============================================================================

/// Geometry of one member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberGeometry {
    /// Member length (m)
    pub length: f64,
    /// Projected width (m)
    pub width: f64,
    /// Projected area of one member, `length × width` (m²)
    pub area: f64,
    pub bar_kind: BarKind,
    pub bar_key: String,
    /// Self-weight of one member (kg)
    pub weight: f64,
}

/// Projected member area of a panel, both faces (m²)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedArea {
    /// Round members (Ar)
    pub round_area: f64,
    /// Flat (angle) members (Af)
    pub angle_area: f64,
    pub total: f64,
}

/// Everything computed for one panel.
///
/// ## JSON Example
///
/// ```json
/// {
///   "section_number": 1,
///   "cross_section": "square",
///   "height_above_ground": 1.5,
///   "leg_geometry": { "length": 3.0104, "width": 0.075, "area": 0.2258, "bar_kind": "angle", "bar_key": "L75x75x6", "weight": 20.3 },
///   "solidity_ratio": 0.1531,
///   "cf": 3.1904,
///   "rr": 0.5679,
///   "wind_direction_factors": { "df_0°": 1.0, "df_45°": 1.1148 },
///   "effective_projected_area": { "epa_0°": 3.9621, "epa_45°": 4.4170 },
///   "kz": 0.85,
///   "kzt": 1.7034,
///   "ke": 1.0,
///   "panel_weight": 65.2
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSummary {
    pub section_number: u32,
    pub cross_section: CrossSection,
    /// Height the K-factors were evaluated at (m)
    pub height_above_ground: f64,
    pub leg_geometry: MemberGeometry,
    pub diagonal_geometry: MemberGeometry,
    pub main_belt_geometry: MemberGeometry,
    pub projected_area: ProjectedArea,
    pub solidity_ratio: f64,
    pub cf: f64,
    pub rr: f64,
    pub wind_direction_factors: BTreeMap<String, f64>,
    pub kz: f64,
    pub kzt: f64,
    pub ke: f64,
    pub effective_projected_area: BTreeMap<String, f64>,
    /// Self-weight of the members counted in the projected area (kg)
    pub panel_weight: f64,
}

// ============================================================================
// Coefficient formulas
// ============================================================================

/// Force coefficient Cf for a solidity ratio, rounded to 4 decimals
pub fn force_coefficient(cross_section: CrossSection, solidity_ratio: f64) -> f64 {
    let e = solidity_ratio;
    let cf = match cross_section {
        CrossSection::Square => 4.0 * e.powi(2) - 5.9 * e + 4.0,
        CrossSection::Triangular => 3.4 * e.powi(2) - 4.7 * e + 3.4,
    };
    round_to(cf, 4)
}

/// Reduction factor Rr for round members, rounded to 4 decimals
pub fn reduction_round_factor(solidity_ratio: f64) -> f64 {
    let e = solidity_ratio;
    let rr = 0.57 - 0.14 * e + 0.86 * e.powi(2) - 0.24 * e.powi(3);
    round_to(rr.min(1.0), 4)
}

fn angle_key(prefix: &str, angle: u32) -> String {
    format!("{prefix}_{angle}°")
}

// ============================================================================
// Panel
// ============================================================================

/// One face panel with resolved bars. Every operation is a pure function of
/// the construction inputs.
#[derive(Debug, Clone)]
pub struct Panel {
    segment: Segment,
    cross_section: CrossSection,
    site: SiteConditions,
    lengths: MemberLengths,
    leg: &'static BarSpec,
    diagonal: &'static BarSpec,
    main_belt: &'static BarSpec,
}

impl Panel {
    /// Build a panel, resolving every bar against `catalog`.
    ///
    /// Fails when a bar key is not in the catalog or the segment is degenerate.
    pub fn new(
        segment: &Segment,
        bars: &PanelBars,
        site: &SiteConditions,
        catalog: &BarCatalog,
    ) -> CalcResult<Self> {
        let lengths = Toolkit::new(segment)?.member_lengths();
        Ok(Self {
            segment: segment.clone(),
            cross_section: site.cross_section.unwrap_or(segment.cross_section),
            site: site.clone(),
            lengths,
            leg: catalog.resolve_selection(&bars.leg)?,
            diagonal: catalog.resolve_selection(&bars.diagonal)?,
            main_belt: catalog.resolve_selection(&bars.main_belt)?,
        })
    }

    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    pub fn cross_section(&self) -> CrossSection {
        self.cross_section
    }

    /// Height the K-factors are evaluated at (m)
    pub fn height_above_ground(&self) -> f64 {
        self.site.height_above_ground.unwrap_or(self.segment.z_height)
    }

    fn member(&self, role: MemberRole) -> (f64, &'static BarSpec) {
        match role {
            MemberRole::Leg => (self.lengths.leg, self.leg),
            MemberRole::Diagonal => (self.lengths.diagonal, self.diagonal),
            MemberRole::MainBelt => (self.lengths.main_belt, self.main_belt),
        }
    }

    /// Geometry of one member role
    pub fn member_geometry(&self, role: MemberRole) -> MemberGeometry {
        let (length, bar) = self.member(role);
        let width = bar.projected_width_m();
        MemberGeometry {
            length,
            width,
            area: round_to(length * width, 4),
            bar_kind: bar.kind,
            bar_key: bar.key.clone(),
            weight: round_to(length * bar.weight_per_meter, 4),
        }
    }

    /// Projected area, bucketed by round and flat members
    pub fn projected_area(&self) -> ProjectedArea {
        let mut round_area = 0.0;
        let mut angle_area = 0.0;
        for role in MemberRole::ALL {
            let geometry = self.member_geometry(role);
            let both_faces = 2.0 * geometry.area;
            match geometry.bar_kind {
                BarKind::Round => round_area += both_faces,
                BarKind::Angle => angle_area += both_faces,
            }
        }
        ProjectedArea {
            round_area: round_to(round_area, 4),
            angle_area: round_to(angle_area, 4),
            total: round_to(round_area + angle_area, 4),
        }
    }

    /// Solidity ratio ε, rounded to 4 decimals
    pub fn solidity_ratio(&self) -> CalcResult<f64> {
        let gross = self.segment.area;
        if !gross.is_finite() || gross <= 0.0 {
            return Err(CalcError::precondition_failed(
                format!("solidity ratio ({})", tia_ref::CF),
                format!("segment {}.area", self.segment.index),
                gross.to_string(),
                "Gross panel area must be positive",
            ));
        }
        Ok(round_to(self.projected_area().total / gross, 4))
    }

    /// Force coefficient Cf
    pub fn cf(&self) -> CalcResult<f64> {
        Ok(force_coefficient(self.cross_section, self.solidity_ratio()?))
    }

    /// Round member reduction factor Rr
    pub fn reduction_round_factor(&self) -> CalcResult<f64> {
        Ok(reduction_round_factor(self.solidity_ratio()?))
    }

    /// Wind direction factor Df for one wind angle (degrees)
    pub fn wind_direction_factor(&self, angle_deg: u32) -> CalcResult<f64> {
        let df = tables::wind_direction_factor(self.cross_section, angle_deg, self.solidity_ratio()?)?;
        Ok(round_to(df, 4))
    }

    /// Df for every tabulated angle, keyed `"df_0°"`, `"df_45°"`, ...
    pub fn wind_direction_factors(&self) -> CalcResult<BTreeMap<String, f64>> {
        self.cross_section
            .wind_angles()
            .iter()
            .map(|&angle| Ok((angle_key("df", angle), self.wind_direction_factor(angle)?)))
            .collect()
    }

    pub fn kz(&self) -> CalcResult<f64> {
        calculate_kz(self.site.exposure_category, self.height_above_ground())
    }

    pub fn kzt(&self) -> CalcResult<f64> {
        calculate_kzt(
            self.site.exposure_category,
            self.site.topographic_category,
            self.height_above_ground(),
            self.site.crest_height,
        )
    }

    pub fn ke(&self) -> CalcResult<f64> {
        calculate_ke(self.site.ground_elevation)
    }

    /// Kz, Kzt and Ke at the panel height
    pub fn k_factors(&self) -> CalcResult<KFactors> {
        KFactors::evaluate(
            self.site.exposure_category,
            self.site.topographic_category,
            self.height_above_ground(),
            self.site.crest_height,
            self.site.ground_elevation,
        )
    }

    /// EPA for every tabulated wind angle, keyed `"epa_0°"`, `"epa_45°"`, ...
    pub fn effective_projected_area(&self) -> CalcResult<BTreeMap<String, f64>> {
        let area = self.projected_area();
        let cf = self.cf()?;
        let total = area.angle_area + area.round_area * self.reduction_round_factor()?;

        self.cross_section
            .wind_angles()
            .iter()
            .map(|&angle| {
                let df = self.wind_direction_factor(angle)?;
                Ok((angle_key("epa", angle), round_to(cf * df * total, 4)))
            })
            .collect()
    }

    /// Total member self-weight, both faces (kg)
    pub fn panel_weight(&self) -> f64 {
        let one_face: f64 = MemberRole::ALL
            .iter()
            .map(|&role| self.member_geometry(role).weight)
            .sum();
        round_to(2.0 * one_face, 4)
    }

    /// Aggregate every quantity into one record
    pub fn summary(&self) -> CalcResult<PanelSummary> {
        let k = self.k_factors()?;
        let summary = PanelSummary {
            section_number: self.segment.index,
            cross_section: self.cross_section,
            height_above_ground: self.height_above_ground(),
            leg_geometry: self.member_geometry(MemberRole::Leg),
            diagonal_geometry: self.member_geometry(MemberRole::Diagonal),
            main_belt_geometry: self.member_geometry(MemberRole::MainBelt),
            projected_area: self.projected_area(),
            solidity_ratio: self.solidity_ratio()?,
            cf: self.cf()?,
            rr: self.reduction_round_factor()?,
            wind_direction_factors: self.wind_direction_factors()?,
            kz: k.kz,
            kzt: k.kzt,
            ke: k.ke,
            effective_projected_area: self.effective_projected_area()?,
            panel_weight: self.panel_weight(),
        };

        tracing::debug!(
            section = summary.section_number,
            solidity_ratio = summary.solidity_ratio,
            cf = summary.cf,
            kz = summary.kz,
            "panel evaluated"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bars::UnitSystem;
    use crate::calculations::geometry::{calculate_segments, TowerSpec};

    fn tapered_segment(cross_section: CrossSection) -> Segment {
        let spec = TowerSpec::new(3.0, 2.5, 3.0, 1, 0, cross_section).unwrap();
        calculate_segments(&spec).remove(0)
    }

    fn all_angle_bars() -> PanelBars {
        PanelBars {
            leg: BarSelection::angle("L50x50x4"),
            diagonal: BarSelection::angle("L50x50x4"),
            main_belt: BarSelection::angle("L50x50x4"),
        }
    }

    fn si() -> BarCatalog {
        BarCatalog::new(UnitSystem::Si)
    }

    #[test]
    fn test_member_geometry() {
        let seg = tapered_segment(CrossSection::Square);
        let panel = Panel::new(&seg, &all_angle_bars(), &SiteConditions::default(), &si()).unwrap();

        let leg = panel.member_geometry(MemberRole::Leg);
        assert_eq!(leg.length, 3.0104);
        assert!((leg.width - 0.05).abs() < 1e-12);
        assert!((leg.area - 0.1505).abs() < 1e-9);
        assert_eq!(leg.bar_key, "L50x50x4");
    }

    #[test]
    fn test_projected_area_buckets() {
        let seg = tapered_segment(CrossSection::Square);
        let bars = PanelBars {
            leg: BarSelection::angle("L50x50x4"),
            diagonal: BarSelection::round("R50.8x2"),
            main_belt: BarSelection::round("R25.4x2"),
        };
        let panel = Panel::new(&seg, &bars, &SiteConditions::default(), &si()).unwrap();
        let area = panel.projected_area();

        let leg = panel.member_geometry(MemberRole::Leg).area;
        let diagonal = panel.member_geometry(MemberRole::Diagonal).area;
        let belt = panel.member_geometry(MemberRole::MainBelt).area;

        assert!((area.angle_area - 2.0 * leg).abs() < 1e-4);
        assert!((area.round_area - 2.0 * (diagonal + belt)).abs() < 1e-4);
        assert!((area.total - area.angle_area - area.round_area).abs() < 1e-4);
    }

    #[test]
    fn test_solidity_ratio() {
        let seg = tapered_segment(CrossSection::Square);
        let panel = Panel::new(&seg, &all_angle_bars(), &SiteConditions::default(), &si()).unwrap();
        let eps = panel.solidity_ratio().unwrap();
        let expected = panel.projected_area().total / seg.area;
        assert!((eps - expected).abs() < 1e-4);
        assert!(eps > 0.0 && eps < 1.0);
    }

    #[test]
    fn test_zero_gross_area_is_precondition_error() {
        let mut seg = tapered_segment(CrossSection::Square);
        seg.area = 0.0;
        let panel = Panel::new(&seg, &all_angle_bars(), &SiteConditions::default(), &si()).unwrap();
        let err = panel.solidity_ratio().unwrap_err();
        assert_eq!(err.error_code(), "PRECONDITION_FAILED");
        assert!(panel.summary().is_err());
    }

    #[test]
    fn test_cf_at_zero_solidity() {
        assert_eq!(force_coefficient(CrossSection::Square, 0.0), 4.0);
        assert_eq!(force_coefficient(CrossSection::Triangular, 0.0), 3.4);
    }

    #[test]
    fn test_cf_positive_with_minimum_near_074() {
        let samples: Vec<(f64, f64)> = (0..=100)
            .map(|i| {
                let e = i as f64 / 100.0;
                (e, 4.0 * e * e - 5.9 * e + 4.0)
            })
            .collect();
        assert!(samples.iter().all(|&(e, _)| force_coefficient(CrossSection::Square, e) > 0.0));
        assert!(samples.iter().all(|&(e, _)| force_coefficient(CrossSection::Triangular, e) > 0.0));

        let (e_min, _) = samples
            .iter()
            .copied()
            .fold((0.0, f64::MAX), |acc, s| if s.1 < acc.1 { s } else { acc });
        assert!((e_min - 0.74).abs() <= 0.01);
    }

    #[test]
    fn test_reduction_round_factor() {
        assert_eq!(reduction_round_factor(0.0), 0.57);
        for i in 0..=20 {
            assert!(reduction_round_factor(i as f64 * 0.25) <= 1.0);
        }
    }

    #[test]
    fn test_effective_projected_area_square() {
        let seg = tapered_segment(CrossSection::Square);
        let panel = Panel::new(&seg, &all_angle_bars(), &SiteConditions::default(), &si()).unwrap();
        let epa = panel.effective_projected_area().unwrap();

        assert_eq!(epa.len(), 2);
        let cf = panel.cf().unwrap();
        let total = panel.projected_area().angle_area;
        let eps = panel.solidity_ratio().unwrap();

        assert!((epa["epa_0°"] - cf * total).abs() < 1e-3);
        assert!((epa["epa_45°"] - cf * (1.0 + 0.75 * eps).min(1.2) * total).abs() < 1e-3);
    }

    #[test]
    fn test_effective_projected_area_triangular_keys() {
        let seg = tapered_segment(CrossSection::Triangular);
        let panel = Panel::new(&seg, &all_angle_bars(), &SiteConditions::default(), &si()).unwrap();
        let epa = panel.effective_projected_area().unwrap();
        let keys: Vec<&str> = epa.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["epa_0°", "epa_60°", "epa_90°"]);
        assert_eq!(panel.wind_direction_factor(90).unwrap(), 0.85);
    }

    #[test]
    fn test_cross_section_override() {
        let seg = tapered_segment(CrossSection::Square);
        let site = SiteConditions {
            cross_section: Some(CrossSection::Triangular),
            ..SiteConditions::default()
        };
        let panel = Panel::new(&seg, &all_angle_bars(), &site, &si()).unwrap();
        assert_eq!(panel.cross_section(), CrossSection::Triangular);
        assert!(panel.wind_direction_factor(45).is_err());
    }

    #[test]
    fn test_unknown_bar_fails_at_construction() {
        let seg = tapered_segment(CrossSection::Square);
        let bars = PanelBars {
            leg: BarSelection::angle("L2x2x1/4"),
            ..all_angle_bars()
        };
        let err = Panel::new(&seg, &bars, &SiteConditions::default(), &si()).unwrap_err();
        assert_eq!(err.error_code(), "BAR_NOT_FOUND");

        let imperial_bars = PanelBars {
            leg: BarSelection::angle("L2x2x1/4"),
            diagonal: BarSelection::angle("L2x2x1/8"),
            main_belt: BarSelection::round("R1x1/8"),
        };
        let imperial = BarCatalog::new(UnitSystem::Imperial);
        assert!(Panel::new(&seg, &imperial_bars, &SiteConditions::default(), &imperial).is_ok());
    }

    #[test]
    fn test_k_factors_use_segment_midpoint() {
        let seg = tapered_segment(CrossSection::Square);
        let panel = Panel::new(&seg, &all_angle_bars(), &SiteConditions::default(), &si()).unwrap();
        assert_eq!(panel.height_above_ground(), 1.5);
        assert_eq!(panel.kz().unwrap(), 0.85);
        assert_eq!(panel.ke().unwrap(), 1.0);
        assert!(panel.kzt().unwrap() > 1.0);

        let site = SiteConditions {
            height_above_ground: Some(40.0),
            topographic_category: TopographicCategory::Category1,
            ..SiteConditions::default()
        };
        let panel = Panel::new(&seg, &all_angle_bars(), &site, &si()).unwrap();
        assert!(panel.kz().unwrap() > 0.85);
        assert_eq!(panel.kzt().unwrap(), 1.0);
    }

    #[test]
    fn test_summary_serialization() {
        let seg = tapered_segment(CrossSection::Square);
        let panel = Panel::new(&seg, &all_angle_bars(), &SiteConditions::default(), &si()).unwrap();
        let summary = panel.summary().unwrap();
        assert_eq!(summary.section_number, 1);
        assert!(summary.panel_weight > 0.0);

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["effective_projected_area"]["epa_0°"].is_number());
        assert!(json["wind_direction_factors"]["df_45°"].is_number());
        assert_eq!(json["leg_geometry"]["bar_kind"], "angle");
    }

    #[test]
    fn test_summary_k_factors_match_single_factors() {
        let seg = tapered_segment(CrossSection::Square);
        let site = SiteConditions {
            height_above_ground: Some(25.0),
            ground_elevation: 800.0,
            ..SiteConditions::default()
        };
        let panel = Panel::new(&seg, &all_angle_bars(), &site, &si()).unwrap();
        let k = panel.k_factors().unwrap();
        assert_eq!(k.kz, panel.kz().unwrap());
        assert_eq!(k.kzt, panel.kzt().unwrap());
        assert_eq!(k.ke, panel.ke().unwrap());

        let summary = panel.summary().unwrap();
        assert_eq!((summary.kz, summary.kzt, summary.ke), (k.kz, k.kzt, k.ke));
    }
}
