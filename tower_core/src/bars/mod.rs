//! # Bar Catalog
//!
//! Standard structural bar cross-sections used for lattice tower members.
//!
//! ## Catalogs
//!
//! Four read-only catalogs, one per (kind, unit system) pair:
//!
//! | Kind  | SI keys            | Imperial keys       |
//! |-------|--------------------|---------------------|
//! | Angle | `L50x50x4`         | `L2x2x1/4`          |
//! | Round | `R50.8x2`          | `R2x1/8`            |
//!
//! Every entry stores its profile dimension `pa` and thickness `t` in
//! millimetres (imperial entries are converted at 25.4 mm/in) and its linear
//! weight in kg/m. The projected width seen by the wind is `pa`.
//!
//! ## Example
//!
//! ```rust
//! use tower_core::bars::{BarCatalog, BarKind, UnitSystem};
//!
//! let catalog = BarCatalog::new(UnitSystem::Si);
//! let bar = catalog.resolve(BarKind::Angle, "L50x50x4").unwrap();
//! assert_eq!(bar.pa, 50.0);
//! assert!((bar.projected_width_m() - 0.05).abs() < 1e-12);
//!
//! // Unknown keys are rejected, not defaulted
//! assert!(catalog.resolve(BarKind::Round, "R50.8x9").is_err());
//! ```

pub mod angle;
pub mod round;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{round_to, Inches, Meters, Millimeters};

/// Density of structural steel (kg/m³)
pub const STEEL_DENSITY: f64 = 7850.0;

/// A catalog table, keyed by bar designation
pub type BarTable = BTreeMap<String, BarSpec>;

/// Bar cross-section family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarKind {
    /// Equal-leg angle
    #[serde(alias = "Angle Bar")]
    Angle,
    /// Round (circular hollow) bar
    #[serde(alias = "Round Bar")]
    Round,
}

impl BarKind {
    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            BarKind::Angle => "Angle Bar",
            BarKind::Round => "Round Bar",
        }
    }
}

impl std::fmt::Display for BarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Unit system a catalog is published in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UnitSystem {
    /// Metric designations (mm)
    #[default]
    #[serde(rename = "SI", alias = "SI (Metric)")]
    Si,
    /// Imperial designations (in)
    #[serde(rename = "Imperial")]
    Imperial,
}

impl UnitSystem {
    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            UnitSystem::Si => "SI",
            UnitSystem::Imperial => "Imperial",
        }
    }
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSpec {
    /// Designation, e.g. "L50x50x4" or "R1/2x1/8"
    pub key: String,
    /// Cross-section family
    pub kind: BarKind,
    /// Profile dimension: leg width for angles, outside diameter for rounds (mm)
    pub pa: f64,
    /// Wall / leg thickness (mm)
    pub t: f64,
    /// Linear weight (kg/m)
    pub weight_per_meter: f64,
}

impl BarSpec {
    /// Width projected onto the wind face (m)
    pub fn projected_width_m(&self) -> f64 {
        Meters::from(Millimeters(self.pa)).value()
    }
}

/// Linear weight of an equal-leg angle (kg/m) from millimetre dimensions.
///
/// Area = 2·pa·t − t², times steel density, rounded to 4 decimals.
pub fn calculate_linear_weight(pa: f64, t: f64) -> f64 {
    let pa_m = Meters::from(Millimeters(pa)).value();
    let t_m = Meters::from(Millimeters(t)).value();
    let area = 2.0 * pa_m * t_m - t_m.powi(2);
    round_to(area * STEEL_DENSITY, 4)
}

/// Linear weight of an equal-leg angle (kg/m) from inch dimensions.
pub fn calculate_linear_weight_imperial(pa: f64, t: f64) -> f64 {
    calculate_linear_weight(Millimeters::from(Inches(pa)).value(), Millimeters::from(Inches(t)).value())
}

/// Linear weight of a circular hollow bar (kg/m) from millimetre dimensions.
///
/// Area = π·t·(d − t), times steel density, rounded to 4 decimals.
pub fn calculate_round_linear_weight(diameter: f64, t: f64) -> f64 {
    let d_m = Meters::from(Millimeters(diameter)).value();
    let t_m = Meters::from(Millimeters(t)).value();
    let area = std::f64::consts::PI * t_m * (d_m - t_m);
    round_to(area * STEEL_DENSITY, 4)
}

/// Typed view over the four catalogs, bound to one unit system.
///
/// Passed explicitly into every panel construction; there is no
/// process-wide selected catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BarCatalog {
    /// Unit system of the designations this catalog resolves
    pub unit_system: UnitSystem,
}

impl BarCatalog {
    /// Catalog for the given unit system
    pub fn new(unit_system: UnitSystem) -> Self {
        Self { unit_system }
    }

    /// The underlying table for a bar kind
    pub fn table(&self, kind: BarKind) -> &'static BarTable {
        match (kind, self.unit_system) {
            (BarKind::Angle, UnitSystem::Si) => &angle::ANGLE_BARS_SI,
            (BarKind::Angle, UnitSystem::Imperial) => &angle::ANGLE_BARS_IMPERIAL,
            (BarKind::Round, UnitSystem::Si) => &round::ROUND_BARS_SI,
            (BarKind::Round, UnitSystem::Imperial) => &round::ROUND_BARS_IMPERIAL,
        }
    }

    /// Human-readable catalog name, e.g. "angle (SI)"
    pub fn catalog_name(&self, kind: BarKind) -> String {
        let kind_name = match kind {
            BarKind::Angle => "angle",
            BarKind::Round => "round",
        };
        format!("{} ({})", kind_name, self.unit_system.display_name())
    }

    /// Resolve a bar designation
    pub fn resolve(&self, kind: BarKind, key: &str) -> CalcResult<&'static BarSpec> {
        self.table(kind)
            .get(key)
            .ok_or_else(|| CalcError::bar_not_found(self.catalog_name(kind), key))
    }

    /// Resolve a caller's selection
    pub fn resolve_selection(&self, selection: &BarSelection) -> CalcResult<&'static BarSpec> {
        self.resolve(selection.kind, &selection.key)
    }

    /// All designations of one kind, sorted by designation
    pub fn keys(&self, kind: BarKind) -> Vec<&'static str> {
        self.table(kind).keys().map(String::as_str).collect()
    }
}

/// A caller's choice of bar for one panel member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarSelection {
    /// Angle or round
    pub kind: BarKind,
    /// Catalog designation
    pub key: String,
}

impl BarSelection {
    /// Select an angle bar
    pub fn angle(key: impl Into<String>) -> Self {
        Self {
            kind: BarKind::Angle,
            key: key.into(),
        }
    }

    /// Select a round bar
    pub fn round(key: impl Into<String>) -> Self {
        Self {
            kind: BarKind::Round,
            key: key.into(),
        }
    }
}
