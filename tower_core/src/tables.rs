//! # TIA-222 Lookup Tables
//!
//! Static coefficient tables for wind loads on lattice structures.
//!
//! ## Table Summary
//!
//! | Table     | Keyed by             | Values                          |
//! |-----------|----------------------|---------------------------------|
//! | 2-3       | Risk category        | Importance factors (wind/ice/seismic) |
//! | 2-4       | Exposure category    | zg, α, Kzmin, Ke                |
//! | 2-5       | Topographic category | Kt, f                           |
//! | 2-6       | Cross-section, angle | Wind direction factor Df        |
//!
//! All tables are read-only data and may be shared freely between threads.
//!
//! ## Example
//!
//! ```rust
//! use tower_core::tables::{ExposureCategory, CrossSection, wind_direction_factor};
//!
//! let exposure = ExposureCategory::from_str_flexible("Exposure C").unwrap();
//! assert_eq!(exposure.kz_min(), 0.85);
//!
//! // Square towers at 45° depend on the solidity ratio
//! let df = wind_direction_factor(CrossSection::Square, 45, 0.2).unwrap();
//! assert!((df - 1.15).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// TIA-222 code references for the tables and formulas in this crate.
pub mod tia_ref {
    /// Risk categories and importance factors
    pub const TABLE_2_3: &str = "TIA-222 Table 2-3";
    /// Exposure category coefficients
    pub const TABLE_2_4: &str = "TIA-222 Table 2-4";
    /// Topographic category coefficients
    pub const TABLE_2_5: &str = "TIA-222 Table 2-5";
    /// Wind direction factors
    pub const TABLE_2_6: &str = "TIA-222 Table 2-6";

    /// Velocity pressure coefficient Kz
    pub const KZ: &str = "TIA-222 2.6.5.2";
    /// Topographic factor Kzt
    pub const KZT: &str = "TIA-222 2.6.6";
    /// Gust effect factor Gh
    pub const GH: &str = "TIA-222 2.6.7";
    /// Ground elevation factor Ke
    pub const KE: &str = "TIA-222 2.6.8";
    /// Solidity ratio and force coefficient
    pub const CF: &str = "TIA-222 2.6.11.2";
}

// ============================================================================
// Cross Section
// ============================================================================

/// Tower cross-section shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CrossSection {
    /// Four-legged tower
    #[default]
    Square,
    /// Three-legged tower
    Triangular,
}

impl CrossSection {
    /// All cross-section variants
    pub const ALL: [CrossSection; 2] = [CrossSection::Square, CrossSection::Triangular];

    /// Parse a cross-section name, case-insensitive
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "square" => Ok(CrossSection::Square),
            "triangular" | "triangle" => Ok(CrossSection::Triangular),
            _ => Err(CalcError::invalid_input(
                "cross_section",
                s,
                "Cross section must be one of 'square', 'triangular'",
            )),
        }
    }

    /// Wind angles (degrees) defined for this cross-section in Table 2-6
    pub fn wind_angles(&self) -> &'static [u32] {
        match self {
            CrossSection::Square => &[0, 45],
            CrossSection::Triangular => &[0, 60, 90],
        }
    }

    /// Lowercase name, as used in stored records
    pub fn name(&self) -> &'static str {
        match self {
            CrossSection::Square => "square",
            CrossSection::Triangular => "triangular",
        }
    }
}

impl std::fmt::Display for CrossSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Table 2-4: Exposure Category
// ============================================================================

/// Exposure category per TIA-222 Table 2-4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ExposureCategory {
    /// Urban and suburban areas, wooded areas
    #[serde(rename = "Exposure B", alias = "B")]
    B,
    /// Open terrain with scattered obstructions
    #[default]
    #[serde(rename = "Exposure C", alias = "C")]
    C,
    /// Flat, unobstructed areas and water surfaces
    #[serde(rename = "Exposure D", alias = "D")]
    D,
}

impl ExposureCategory {
    /// All exposure categories for selection
    pub const ALL: [ExposureCategory; 3] = [ExposureCategory::B, ExposureCategory::C, ExposureCategory::D];

    /// Parse "Exposure C", "exposure c" or "C"
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let normalized = s.trim().to_uppercase();
        let code = normalized.strip_prefix("EXPOSURE").unwrap_or(normalized.as_str()).trim();
        match code {
            "B" => Ok(ExposureCategory::B),
            "C" => Ok(ExposureCategory::C),
            "D" => Ok(ExposureCategory::D),
            _ => Err(CalcError::lookup_failed(tia_ref::TABLE_2_4, s)),
        }
    }

    /// Nominal height of the atmospheric boundary layer zg (m)
    pub fn zg(&self) -> f64 {
        match self {
            ExposureCategory::B => 366.0,
            ExposureCategory::C => 274.0,
            ExposureCategory::D => 213.0,
        }
    }

    /// Exponent α of the velocity pressure profile
    pub fn alpha(&self) -> f64 {
        match self {
            ExposureCategory::B => 7.0,
            ExposureCategory::C => 9.5,
            ExposureCategory::D => 11.5,
        }
    }

    /// Minimum velocity pressure coefficient Kzmin
    pub fn kz_min(&self) -> f64 {
        match self {
            ExposureCategory::B => 0.70,
            ExposureCategory::C => 0.85,
            ExposureCategory::D => 1.03,
        }
    }

    /// Terrain constant Ke used by the topographic factor
    pub fn terrain_constant(&self) -> f64 {
        match self {
            ExposureCategory::B => 0.90,
            ExposureCategory::C => 1.00,
            ExposureCategory::D => 1.10,
        }
    }

    /// Display name, matching the stored record spelling
    pub fn display_name(&self) -> &'static str {
        match self {
            ExposureCategory::B => "Exposure B",
            ExposureCategory::C => "Exposure C",
            ExposureCategory::D => "Exposure D",
        }
    }
}

impl std::fmt::Display for ExposureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Table 2-5: Topographic Category
// ============================================================================

/// Topographic category per TIA-222 Table 2-5
///
/// Category 5 (site-specific investigation) has no tabulated constants and is
/// not represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TopographicCategory {
    /// No abrupt changes in general topography: Kzt = 1.0
    #[serde(rename = "1")]
    Category1,
    /// Structure at or near the crest of an escarpment
    #[default]
    #[serde(rename = "2")]
    Category2,
    /// Structure in the upper half of a hill
    #[serde(rename = "3")]
    Category3,
    /// Structure in the upper half of a ridge
    #[serde(rename = "4")]
    Category4,
}

impl TopographicCategory {
    /// All supported categories
    pub const ALL: [TopographicCategory; 4] = [
        TopographicCategory::Category1,
        TopographicCategory::Category2,
        TopographicCategory::Category3,
        TopographicCategory::Category4,
    ];

    /// Parse "2", "Category 2"
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let normalized = s.trim().to_lowercase();
        let code = normalized.strip_prefix("category").unwrap_or(normalized.as_str()).trim();
        match code {
            "1" => Ok(TopographicCategory::Category1),
            "2" => Ok(TopographicCategory::Category2),
            "3" => Ok(TopographicCategory::Category3),
            "4" => Ok(TopographicCategory::Category4),
            _ => Err(CalcError::lookup_failed(tia_ref::TABLE_2_5, s)),
        }
    }

    /// Topographic constants (Kt, f); `None` for Category 1 where Kzt = 1.0
    pub fn constants(&self) -> Option<(f64, f64)> {
        match self {
            TopographicCategory::Category1 => None,
            TopographicCategory::Category2 => Some((0.43, 1.25)),
            TopographicCategory::Category3 => Some((0.53, 2.0)),
            TopographicCategory::Category4 => Some((0.72, 1.5)),
        }
    }
}

// ============================================================================
// Table 2-3: Risk Category
// ============================================================================

/// Risk category per TIA-222 Table 2-3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RiskCategory {
    /// Low hazard to human life in the event of failure
    I,
    /// Structures not included in Categories I, III or IV
    #[default]
    II,
    /// Substantial hazard to human life in the event of failure
    III,
    /// Essential facilities and critical infrastructure
    IV,
}

impl RiskCategory {
    /// All risk categories
    pub const ALL: [RiskCategory; 4] = [RiskCategory::I, RiskCategory::II, RiskCategory::III, RiskCategory::IV];

    /// Parse "I".."IV"
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_uppercase().as_str() {
            "I" | "1" => Ok(RiskCategory::I),
            "II" | "2" => Ok(RiskCategory::II),
            "III" | "3" => Ok(RiskCategory::III),
            "IV" | "4" => Ok(RiskCategory::IV),
            _ => Err(CalcError::lookup_failed(tia_ref::TABLE_2_3, s)),
        }
    }

    /// Importance factor for wind loads
    pub fn wind_importance(&self) -> f64 {
        match self {
            RiskCategory::I => 0.87,
            RiskCategory::II => 1.0,
            RiskCategory::III | RiskCategory::IV => 1.15,
        }
    }

    /// Importance factor for ice loads
    pub fn ice_importance(&self) -> f64 {
        match self {
            RiskCategory::I => 0.80,
            RiskCategory::II => 1.0,
            RiskCategory::III | RiskCategory::IV => 1.25,
        }
    }

    /// Importance factor for seismic loads
    pub fn seismic_importance(&self) -> f64 {
        match self {
            RiskCategory::I | RiskCategory::II => 1.0,
            RiskCategory::III => 1.25,
            RiskCategory::IV => 1.5,
        }
    }
}

// ============================================================================
// Table 2-6: Wind Direction Factor
// ============================================================================

/// A Df table entry. Some entries depend on the solidity ratio and are
/// evaluated on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
enum DirectionFactor {
    Fixed(f64),
    /// `min(base + slope·ε, max)`
    Solidity { base: f64, slope: f64, max: f64 },
}

impl DirectionFactor {
    fn evaluate(&self, solidity_ratio: f64) -> f64 {
        match *self {
            DirectionFactor::Fixed(df) => df,
            DirectionFactor::Solidity { base, slope, max } => (base + slope * solidity_ratio).min(max),
        }
    }
}

fn direction_factor_entry(cross_section: CrossSection, angle_deg: u32) -> Option<DirectionFactor> {
    match (cross_section, angle_deg) {
        (CrossSection::Square, 0) => Some(DirectionFactor::Fixed(1.0)),
        (CrossSection::Square, 45) => Some(DirectionFactor::Solidity {
            base: 1.0,
            slope: 0.75,
            max: 1.2,
        }),
        (CrossSection::Triangular, 0) => Some(DirectionFactor::Fixed(1.0)),
        (CrossSection::Triangular, 60) => Some(DirectionFactor::Fixed(0.80)),
        (CrossSection::Triangular, 90) => Some(DirectionFactor::Fixed(0.85)),
        _ => None,
    }
}

/// Wind direction factor Df for a cross-section and wind angle.
///
/// Fails with a lookup error when the angle is not tabulated for the
/// cross-section.
pub fn wind_direction_factor(cross_section: CrossSection, angle_deg: u32, solidity_ratio: f64) -> CalcResult<f64> {
    direction_factor_entry(cross_section, angle_deg)
        .map(|entry| entry.evaluate(solidity_ratio))
        .ok_or_else(|| CalcError::lookup_failed(tia_ref::TABLE_2_6, format!("{} at {}°", cross_section, angle_deg)))
}
