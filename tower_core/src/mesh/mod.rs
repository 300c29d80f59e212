//! # Section Mesh
//!
//! Node/element model of the tower faces, one record per tower section, for
//! downstream analysis or plotting.
//!
//! ## Point Labels
//!
//! Each section carries lettered points with a fixed meaning:
//!
//! | Label | Point                                              |
//! |-------|----------------------------------------------------|
//! | a, b  | bottom of front legs 1 and 2                       |
//! | c, d  | top of front legs 1 and 2                          |
//! | e, f  | front legs 1 and 2 at the diagonal crossing height |
//! | g     | diagonal crossing of the front face                |
//! | h, l  | bottom and top of the third leg (triangular only)  |
//! | m     | third leg at the crossing height (triangular only) |
//! | n, o  | crossings of the two rear faces (triangular only)  |
//!
//! Square towers produce planar `[x, y]` points; triangular towers produce
//! `[x, y, z]` points with `y` vertical. Coordinates are rounded to 3 decimals.
//!
//! ## Example
//!
//! ```rust
//! use tower_core::calculations::geometry::TowerSpec;
//! use tower_core::mesh::SectionMesher;
//! use tower_core::tables::CrossSection;
//!
//! let spec = TowerSpec::new(3.6, 2.0, 29.3, 8, 2, CrossSection::Square).unwrap();
//! let mesh = SectionMesher::new(&spec).build();
//!
//! assert_eq!(mesh.coordinates.len(), 10);
//! assert_eq!(mesh.elements[0].elements.len(), 10);
//! assert!(mesh.coordinates[0].point("g").is_some());
//! ```

pub mod library;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calculations::geometry::TowerSpec;
use crate::tables::CrossSection;
use crate::units::round_to;

pub use library::{
    ElementSections, SectionLibrary, SectionProperties, SectionType, DEFAULT_ELEMENT_PROPERTIES,
    DEFAULT_SECTION_TYPE,
};

const SIN_60: f64 = 0.866_025_403_784_438_6;
const TAN_30: f64 = 0.577_350_269_189_625_8;

// ============================================================================
// Output records
// ============================================================================

/// A mesh node, planar or spatial
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeshPoint {
    Planar([f64; 2]),
    Spatial([f64; 3]),
}

impl MeshPoint {
    fn components(&self) -> [f64; 3] {
        match *self {
            MeshPoint::Planar([x, y]) => [x, y, 0.0],
            MeshPoint::Spatial(p) => p,
        }
    }

    pub fn x(&self) -> f64 {
        self.components()[0]
    }

    pub fn y(&self) -> f64 {
        self.components()[1]
    }

    /// Depth; 0 for planar points
    pub fn z(&self) -> f64 {
        self.components()[2]
    }

    /// Euclidean distance
    pub fn distance(&self, other: &MeshPoint) -> f64 {
        let [x1, y1, z1] = self.components();
        let [x2, y2, z2] = other.components();
        ((x2 - x1).powi(2) + (y2 - y1).powi(2) + (z2 - z1).powi(2)).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.components().iter().all(|c| c.is_finite())
    }
}

/// Lettered points of one tower section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionCoordinates {
    pub section: u32,
    #[serde(flatten)]
    pub points: BTreeMap<String, MeshPoint>,
}

impl SectionCoordinates {
    pub fn point(&self, label: &str) -> Option<&MeshPoint> {
        self.points.get(label)
    }
}

/// A member connecting two points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshElement {
    /// Element name, e.g. "M1" or "D3"
    pub element: String,
    pub node_i: MeshPoint,
    pub node_j: MeshPoint,
    /// m, 3 decimals
    #[serde(alias = "lenght")]
    pub length: f64,
    #[serde(alias = "secction_type")]
    pub section_type: SectionType,
    /// mm²
    pub cross_area: f64,
    /// m
    pub projected_width: f64,
    /// m², 3 decimals
    pub projected_area: f64,
}

/// Elements of one tower section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionElements {
    pub section: u32,
    pub elements: Vec<MeshElement>,
}

impl SectionElements {
    /// Sum of the element projected areas (m²)
    pub fn total_projected_area(&self) -> f64 {
        round_to(self.elements.iter().map(|e| e.projected_area).sum(), 3)
    }

    pub fn element(&self, name: &str) -> Option<&MeshElement> {
        self.elements.iter().find(|e| e.element == name)
    }
}

/// Complete mesh of a tower
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionMesh {
    pub coordinates: Vec<SectionCoordinates>,
    pub elements: Vec<SectionElements>,
}

// ============================================================================
// Point and element topology
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PointLabel {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    L,
    M,
    N,
    O,
}

impl PointLabel {
    fn as_str(self) -> &'static str {
        match self {
            PointLabel::A => "a",
            PointLabel::B => "b",
            PointLabel::C => "c",
            PointLabel::D => "d",
            PointLabel::E => "e",
            PointLabel::F => "f",
            PointLabel::G => "g",
            PointLabel::H => "h",
            PointLabel::L => "l",
            PointLabel::M => "m",
            PointLabel::N => "n",
            PointLabel::O => "o",
        }
    }
}

use PointLabel::*;

const FRONT_LABELS: [PointLabel; 7] = [A, B, C, D, E, F, G];
const APEX_LABELS: [PointLabel; 5] = [H, L, M, N, O];

/// Front face: legs, diagonals and crossing belts
const FRONT_ELEMENTS: [(&str, PointLabel, PointLabel); 10] = [
    ("M1", A, E),
    ("M2", E, C),
    ("M3", B, F),
    ("M4", F, D),
    ("D1", A, G),
    ("D2", G, D),
    ("D3", G, B),
    ("D4", G, C),
    ("C1", G, E),
    ("C2", G, F),
];

/// Third leg and the two rear faces of a triangular tower
const APEX_ELEMENTS: [(&str, PointLabel, PointLabel); 14] = [
    ("T1", H, M),
    ("T2", M, L),
    ("S1", B, N),
    ("S2", N, L),
    ("S3", H, N),
    ("S4", N, D),
    ("S5", N, F),
    ("S6", N, M),
    ("S7", H, O),
    ("S8", O, C),
    ("S9", A, O),
    ("S10", O, L),
    ("S11", O, M),
    ("S12", O, E),
];

/// Local geometry of one section, before rounding
#[derive(Debug, Clone, Copy)]
struct SectionFrame {
    section: u32,
    /// Front-left corner at the section bottom
    origin: [f64; 3],
    /// Face width at the section bottom
    width: f64,
    height: f64,
    /// Inward taper per side over the section
    delta: f64,
    /// Height of the diagonal crossing above the section bottom
    g_height: f64,
    /// Inward taper per side at the crossing height
    delta_g: f64,
}

impl SectionFrame {
    /// Front-face corner at height `rise` with inward offset `inset`
    fn front(&self, inset: f64, rise: f64, right: bool) -> [f64; 3] {
        let [ox, oy, oz] = self.origin;
        let x = if right { ox + self.width - inset } else { ox + inset };
        [x, oy + rise, oz + inset * TAN_30]
    }

    /// Third-leg point at height `rise` with inward offset `inset`
    fn apex(&self, inset: f64, rise: f64) -> [f64; 3] {
        let [ox, oy, oz] = self.origin;
        let width = self.width - 2.0 * inset;
        [ox + self.width / 2.0, oy + rise, oz + inset * TAN_30 + SIN_60 * width]
    }

    fn point(&self, label: PointLabel) -> [f64; 3] {
        let (h, gh, dg) = (self.height, self.g_height, self.delta_g);
        match label {
            A => self.front(0.0, 0.0, false),
            B => self.front(0.0, 0.0, true),
            C => self.front(self.delta, h, false),
            D => self.front(self.delta, h, true),
            E => self.front(dg, gh, false),
            F => self.front(dg, gh, true),
            G => {
                let [_, y, z] = self.front(dg, gh, false);
                [self.origin[0] + self.width / 2.0, y, z]
            }
            H => self.apex(0.0, 0.0),
            L => self.apex(self.delta, h),
            M => self.apex(dg, gh),
            N => midpoint(self.point(F), self.point(M)),
            O => midpoint(self.point(E), self.point(M)),
        }
    }

    fn mesh_point(&self, label: PointLabel, spatial: bool) -> MeshPoint {
        let [x, y, z] = self.point(label);
        if spatial {
            MeshPoint::Spatial([round_to(x, 3), round_to(y, 3), round_to(z, 3)])
        } else {
            MeshPoint::Planar([round_to(x, 3), round_to(y, 3)])
        }
    }
}

fn midpoint(p: [f64; 3], q: [f64; 3]) -> [f64; 3] {
    [(p[0] + q[0]) / 2.0, (p[1] + q[1]) / 2.0, (p[2] + q[2]) / 2.0]
}

// ============================================================================
// Builder
// ============================================================================

/// Builds the section mesh of a tower.
///
/// Element properties come from the optional assignments and library;
/// elements without a usable assignment get [`DEFAULT_ELEMENT_PROPERTIES`].
#[derive(Debug, Clone, Copy)]
pub struct SectionMesher<'a> {
    spec: &'a TowerSpec,
    element_sections: Option<&'a ElementSections>,
    library: Option<&'a SectionLibrary>,
}

impl<'a> SectionMesher<'a> {
    pub fn new(spec: &'a TowerSpec) -> Self {
        Self {
            spec,
            element_sections: None,
            library: None,
        }
    }

    pub fn with_element_sections(mut self, element_sections: &'a ElementSections) -> Self {
        self.element_sections = Some(element_sections);
        self
    }

    pub fn with_section_library(mut self, library: &'a SectionLibrary) -> Self {
        self.library = Some(library);
        self
    }

    fn spatial(&self) -> bool {
        self.spec.cross_section() == CrossSection::Triangular
    }

    fn labels(&self) -> Vec<PointLabel> {
        let mut labels = FRONT_LABELS.to_vec();
        if self.spatial() {
            labels.extend(APEX_LABELS);
        }
        labels
    }

    fn topology(&self) -> Vec<(&'static str, PointLabel, PointLabel)> {
        let mut elements = FRONT_ELEMENTS.to_vec();
        if self.spatial() {
            elements.extend(APEX_ELEMENTS);
        }
        elements
    }

    /// Walk the sections bottom-up, accumulating the origin offset
    fn frames(&self) -> Vec<SectionFrame> {
        let spec = self.spec;
        let height = spec.segment_height();
        let variable = spec.variable_segments();

        let taper_delta = (spec.base_width() - spec.top_width()) / 2.0;
        let alpha = if variable > 0 {
            (taper_delta / (f64::from(variable) * height)).atan()
        } else {
            0.0
        };

        let mut frames = Vec::with_capacity(spec.total_segments() as usize);
        let mut origin = [0.0, 0.0, 0.0];
        let mut width = spec.base_width();

        for i in 0..spec.total_segments() {
            // Constant segments sit at the top width and carry the x/z offsets forward
            if i >= variable {
                width = spec.top_width();
            }
            let delta = if i < variable { alpha.tan() * height } else { 0.0 };
            let phi = (height / (width - delta)).atan();
            let g_height = phi.tan() * width / 2.0;
            let delta_g = if i < variable { g_height * alpha.tan() } else { 0.0 };

            frames.push(SectionFrame {
                section: i + 1,
                origin,
                width,
                height,
                delta,
                g_height,
                delta_g,
            });

            width -= 2.0 * delta;
            origin[0] += delta;
            origin[1] += height;
            origin[2] += delta * TAN_30;
        }
        frames
    }

    fn section_properties(&self, section: u32, element: &str) -> (SectionType, &'a SectionProperties) {
        let Some(name) = self.element_sections.and_then(|s| s.assigned(section, element)) else {
            return (DEFAULT_SECTION_TYPE, &DEFAULT_ELEMENT_PROPERTIES);
        };
        let section_type = SectionType::from_section_name(name);
        match self.library.and_then(|lib| lib.lookup(section_type, name)) {
            Some(props) => (section_type, props),
            None => {
                tracing::warn!(
                    section,
                    element,
                    section_name = name,
                    "section not in library, using default element properties"
                );
                (section_type, &DEFAULT_ELEMENT_PROPERTIES)
            }
        }
    }

    fn section_elements(&self, frame: &SectionFrame) -> SectionElements {
        let spatial = self.spatial();
        let elements = self
            .topology()
            .into_iter()
            .map(|(name, i, j)| {
                let node_i = frame.mesh_point(i, spatial);
                let node_j = frame.mesh_point(j, spatial);
                let length = round_to(node_i.distance(&node_j), 3);
                let (section_type, props) = self.section_properties(frame.section, name);
                MeshElement {
                    element: name.to_string(),
                    node_i,
                    node_j,
                    length,
                    section_type,
                    cross_area: props.cross_area,
                    projected_width: props.projected_width,
                    projected_area: round_to(props.projected_width * length, 3),
                }
            })
            .collect();
        SectionElements {
            section: frame.section,
            elements,
        }
    }

    fn section_coordinates(&self, frame: &SectionFrame) -> SectionCoordinates {
        let spatial = self.spatial();
        let points = self
            .labels()
            .into_iter()
            .map(|label| (label.as_str().to_string(), frame.mesh_point(label, spatial)))
            .collect();
        SectionCoordinates {
            section: frame.section,
            points,
        }
    }

    /// Lettered points per section
    pub fn coordinates(&self) -> Vec<SectionCoordinates> {
        self.frames().iter().map(|f| self.section_coordinates(f)).collect()
    }

    /// Elements per section
    pub fn elements(&self) -> Vec<SectionElements> {
        self.frames().iter().map(|f| self.section_elements(f)).collect()
    }

    /// Coordinates and elements together
    pub fn build(&self) -> SectionMesh {
        let frames = self.frames();
        let mut coordinates = Vec::with_capacity(frames.len());
        let mut elements = Vec::with_capacity(frames.len());

        for frame in &frames {
            coordinates.push(self.section_coordinates(frame));
            let section = self.section_elements(frame);
            tracing::debug!(
                section = frame.section,
                width = frame.width,
                projected_area = section.total_projected_area(),
                "mesh section built"
            );
            elements.push(section);
        }

        tracing::info!(
            sections = coordinates.len(),
            cross_section = %self.spec.cross_section(),
            "section mesh built"
        );

        SectionMesh { coordinates, elements }
    }
}
