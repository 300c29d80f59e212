//! Cross-section properties for mesh elements.
//!
//! A [`SectionLibrary`] holds named round and angular sections. An
//! [`ElementSections`] map assigns a section name to individual elements of
//! individual tower sections. Names starting with `RD` are looked up among
//! the round sections, all others among the angular ones.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "round": [
//!     { "name": "RD50", "cross_area": 1963.5, "projected_width": 0.05,
//!       "density": 7850.0, "young_modulus": 200000.0, "moment_of_inertia": 306796.0 }
//!   ],
//!   "angular": [
//!     { "name": "L75x75x6", "cross_area": 864.0, "projected_width": 0.075,
//!       "density": 7850.0, "young_modulus": 200000.0, "moment_of_inertia": 459000.0 }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bars::STEEL_DENSITY;

/// Prefix marking a round section name
pub const ROUND_PREFIX: &str = "RD";

/// Section family of a mesh element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Round,
    Angular,
}

impl SectionType {
    /// Family implied by an assigned section name
    pub fn from_section_name(name: &str) -> Self {
        if name.starts_with(ROUND_PREFIX) {
            SectionType::Round
        } else {
            SectionType::Angular
        }
    }
}

fn default_density() -> f64 {
    STEEL_DENSITY
}

/// Properties of one named cross-section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionProperties {
    #[serde(default)]
    pub name: String,
    /// Cross-sectional area (mm²)
    pub cross_area: f64,
    /// Width projected onto the wind face (m)
    pub projected_width: f64,
    /// kg/m³
    #[serde(default = "default_density")]
    pub density: f64,
    /// MPa
    #[serde(default)]
    pub young_modulus: f64,
    /// mm⁴
    #[serde(default)]
    pub moment_of_inertia: f64,
}

/// Section family used when an element has no usable assignment
pub const DEFAULT_SECTION_TYPE: SectionType = SectionType::Round;

/// Properties used when an element has no usable assignment
pub static DEFAULT_ELEMENT_PROPERTIES: SectionProperties = SectionProperties {
    name: String::new(),
    cross_area: 1222.6,
    projected_width: 0.0508,
    density: STEEL_DENSITY,
    young_modulus: 200_000.0,
    moment_of_inertia: 275_000.0,
};

/// Named sections, grouped by family
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionLibrary {
    #[serde(default)]
    pub round: Vec<SectionProperties>,
    #[serde(default)]
    pub angular: Vec<SectionProperties>,
}

impl SectionLibrary {
    /// Sections of one family
    pub fn entries(&self, section_type: SectionType) -> &[SectionProperties] {
        match section_type {
            SectionType::Round => &self.round,
            SectionType::Angular => &self.angular,
        }
    }

    /// Find a section by family and name
    pub fn lookup(&self, section_type: SectionType, name: &str) -> Option<&SectionProperties> {
        self.entries(section_type).iter().find(|entry| entry.name == name)
    }
}

/// Section name assignments: tower section number → element name → section name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementSections(pub BTreeMap<u32, BTreeMap<String, String>>);

impl ElementSections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `section_name` to `element` of tower section `section`
    pub fn assign(&mut self, section: u32, element: impl Into<String>, section_name: impl Into<String>) {
        self.0
            .entry(section)
            .or_default()
            .insert(element.into(), section_name.into());
    }

    /// Assigned section name, if any
    pub fn assigned(&self, section: u32, element: &str) -> Option<&str> {
        self.0
            .get(&section)
            .and_then(|elements| elements.get(element))
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> SectionLibrary {
        serde_json::from_str(
            r#"{
                "round": [{"name": "RD50", "cross_area": 1963.5, "projected_width": 0.05}],
                "angular": [{"name": "L75x75x6", "cross_area": 864.0, "projected_width": 0.075,
                             "young_modulus": 200000.0, "moment_of_inertia": 459000.0}]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_section_type_from_name() {
        assert_eq!(SectionType::from_section_name("RD50"), SectionType::Round);
        assert_eq!(SectionType::from_section_name("L75x75x6"), SectionType::Angular);
        assert_eq!(SectionType::from_section_name("rd50"), SectionType::Angular);
    }

    #[test]
    fn test_lookup() {
        let lib = library();
        assert_eq!(lib.lookup(SectionType::Round, "RD50").unwrap().cross_area, 1963.5);
        assert_eq!(lib.lookup(SectionType::Round, "RD50").unwrap().density, 7850.0);
        assert!(lib.lookup(SectionType::Angular, "RD50").is_none());
    }

    #[test]
    fn test_element_sections_json() {
        let sections: ElementSections = serde_json::from_str(r#"{"1": {"M1": "RD50", "D1": ""}}"#).unwrap();
        assert_eq!(sections.assigned(1, "M1"), Some("RD50"));
        assert_eq!(sections.assigned(1, "D1"), None);
        assert_eq!(sections.assigned(2, "M1"), None);

        let mut built = ElementSections::new();
        built.assign(1, "M1", "RD50");
        built.assign(1, "D1", "");
        assert_eq!(built, sections);
    }

    #[test]
    fn test_default_properties() {
        assert_eq!(DEFAULT_SECTION_TYPE, SectionType::Round);
        assert_eq!(DEFAULT_ELEMENT_PROPERTIES.cross_area, 1222.6);
        assert_eq!(DEFAULT_ELEMENT_PROPERTIES.projected_width, 0.0508);
    }
}
