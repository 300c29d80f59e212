//! # Tower Project
//!
//! `TowerProject` is the root container for one tower design: metadata,
//! site settings, the tower geometry, bar selections per section and the
//! mesh section assignments. It serializes to human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! TowerProject
//! ├── meta: ProjectMetadata (id, name, engineer, timestamps)
//! ├── settings: ProjectSettings (unit system, exposure, topography, risk, wind speeds)
//! ├── tower: TowerSpec
//! ├── panels: PanelSelections (bars per section, optional default)
//! ├── element_sections: ElementSections (mesh assignments)
//! └── section_library: SectionLibrary
//! ```
//!
//! ## Example
//!
//! ```rust
//! use tower_core::bars::BarSelection;
//! use tower_core::calculations::{PanelBars, TowerSpec};
//! use tower_core::project::TowerProject;
//! use tower_core::tables::CrossSection;
//!
//! let tower = TowerSpec::new(3.6, 2.0, 29.3, 8, 2, CrossSection::Square).unwrap();
//! let mut project = TowerProject::new("Site 42", "Jane Engineer", tower);
//! project.panels.default = Some(PanelBars {
//!     leg: BarSelection::angle("L75x75x8"),
//!     diagonal: BarSelection::angle("L50x50x4"),
//!     main_belt: BarSelection::angle("L50x50x4"),
//! });
//!
//! let report = project.run().unwrap();
//! assert_eq!(report.panels.len(), 10);
//! assert_eq!(report.mesh.coordinates.len(), 10);
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bars::{BarCatalog, UnitSystem};
use crate::calculations::geometry::{TowerData, TowerSpec};
use crate::calculations::panel::{Panel, PanelBars, PanelSummary, SiteConditions};
use crate::errors::{CalcError, CalcResult};
use crate::mesh::{ElementSections, SectionLibrary, SectionMesh, SectionMesher};
use crate::tables::{ExposureCategory, RiskCategory, TopographicCategory};

/// Current schema version for project files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerProject {
    pub meta: ProjectMetadata,

    #[serde(default)]
    pub settings: ProjectSettings,

    pub tower: TowerSpec,

    #[serde(default)]
    pub panels: PanelSelections,

    /// Mesh element assignments (section → element → section name)
    #[serde(default)]
    pub element_sections: ElementSections,

    #[serde(default)]
    pub section_library: SectionLibrary,
}

impl TowerProject {
    /// Create a project with default settings and no bar selections.
    pub fn new(name: impl Into<String>, engineer: impl Into<String>, tower: TowerSpec) -> Self {
        let now = Utc::now();
        TowerProject {
            meta: ProjectMetadata {
                id: Uuid::new_v4(),
                version: SCHEMA_VERSION.to_string(),
                name: name.into(),
                engineer: engineer.into(),
                created: now,
                modified: now,
            },
            settings: ProjectSettings::default(),
            tower,
            panels: PanelSelections::default(),
            element_sections: ElementSections::default(),
            section_library: SectionLibrary::default(),
        }
    }

    /// Parse a project from JSON
    pub fn from_json(json: &str) -> CalcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Run geometry, every panel and the mesh.
    ///
    /// Any failure aborts the whole run; no partial report is returned.
    pub fn run(&self) -> CalcResult<TowerReport> {
        let tower_data = TowerData::initiate(&self.tower, &self.settings)?;
        let catalog = self.settings.bar_catalog();
        let site = self.settings.site_conditions();

        let panels = tower_data
            .segments
            .iter()
            .map(|segment| {
                let bars = self.panels.bars_for(segment.index)?;
                Panel::new(segment, bars, &site, &catalog)?.summary()
            })
            .collect::<CalcResult<Vec<_>>>()?;

        let mesh = SectionMesher::new(&self.tower)
            .with_element_sections(&self.element_sections)
            .with_section_library(&self.section_library)
            .build();

        tracing::info!(
            project = %self.meta.name,
            panels = panels.len(),
            "tower report complete"
        );

        Ok(TowerReport {
            project_id: self.meta.id,
            tower_data,
            panels,
            mesh,
        })
    }
}

/// Project metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub id: Uuid,

    /// Schema version (for migration compatibility)
    pub version: String,

    /// Site or tower name
    pub name: String,

    /// Name of the responsible engineer
    pub engineer: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

fn default_crest_height() -> f64 {
    10.0
}

fn default_wind_speed_service() -> f64 {
    33.33
}

fn default_wind_speed_ultimate() -> f64 {
    44.44
}

/// Site-wide design settings.
///
/// Every field has a default, so `{}` is a valid settings record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Unit system of the bar designations
    #[serde(default)]
    pub unit_system: UnitSystem,

    #[serde(default)]
    pub exposure_category: ExposureCategory,

    #[serde(default)]
    pub topographic_category: TopographicCategory,

    #[serde(default)]
    pub risk_category: RiskCategory,

    /// Site elevation above sea level (m)
    #[serde(default)]
    pub ground_elevation: f64,

    /// Height of the topographic feature (m)
    #[serde(default = "default_crest_height")]
    pub crest_height: f64,

    /// Basic wind speed for service checks (m/s)
    #[serde(default = "default_wind_speed_service")]
    pub basic_wind_speed_service: f64,

    /// Basic wind speed for strength checks (m/s)
    #[serde(default = "default_wind_speed_ultimate")]
    pub basic_wind_speed_ultimate: f64,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        ProjectSettings {
            unit_system: UnitSystem::default(),
            exposure_category: ExposureCategory::default(),
            topographic_category: TopographicCategory::default(),
            risk_category: RiskCategory::default(),
            ground_elevation: 0.0,
            crest_height: default_crest_height(),
            basic_wind_speed_service: default_wind_speed_service(),
            basic_wind_speed_ultimate: default_wind_speed_ultimate(),
        }
    }
}

impl ProjectSettings {
    /// Bar catalog for the configured unit system
    pub fn bar_catalog(&self) -> BarCatalog {
        BarCatalog::new(self.unit_system)
    }

    /// Site conditions shared by every panel of the tower
    pub fn site_conditions(&self) -> SiteConditions {
        SiteConditions {
            cross_section: None,
            exposure_category: self.exposure_category,
            topographic_category: self.topographic_category,
            height_above_ground: None,
            crest_height: self.crest_height,
            ground_elevation: self.ground_elevation,
        }
    }
}

/// Bar selections per tower section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSelections {
    /// Used by every section without its own entry
    #[serde(default)]
    pub default: Option<PanelBars>,

    /// Section number → bars
    #[serde(default)]
    pub sections: BTreeMap<u32, PanelBars>,
}

impl PanelSelections {
    /// Bars for a section, falling back to the default selection
    pub fn bars_for(&self, section: u32) -> CalcResult<&PanelBars> {
        self.sections
            .get(&section)
            .or(self.default.as_ref())
            .ok_or_else(|| CalcError::missing_field(format!("panels.sections.{section}")))
    }
}

/// Output of [`TowerProject::run`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerReport {
    pub project_id: Uuid,
    pub tower_data: TowerData,
    pub panels: Vec<PanelSummary>,
    pub mesh: SectionMesh,
}

impl TowerReport {
    /// Largest EPA of each panel over all wind angles (m²), bottom to top
    pub fn governing_epa(&self) -> Vec<(u32, f64)> {
        self.panels
            .iter()
            .map(|p| {
                let max = p.effective_projected_area.values().copied().fold(0.0, f64::max);
                (p.section_number, max)
            })
            .collect()
    }
}
