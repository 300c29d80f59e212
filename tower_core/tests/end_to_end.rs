//! Full pipeline on the reference tower: geometry, panels, mesh and report JSON.

use approx::assert_relative_eq;

use tower_core::bars::{calculate_linear_weight, BarCatalog, BarSelection, UnitSystem};
use tower_core::calculations::panel::force_coefficient;
use tower_core::calculations::{
    calculate_kz, calculate_segments, Panel, PanelBars, SiteConditions, Toolkit, TowerSpec,
};
use tower_core::mesh::SectionMesher;
use tower_core::tables::{wind_direction_factor, CrossSection, ExposureCategory};
use tower_core::TowerProject;

fn reference_tower(cross_section: CrossSection) -> TowerSpec {
    TowerSpec::new(3.6, 2.0, 29.3, 8, 2, cross_section).unwrap()
}

fn default_bars() -> PanelBars {
    PanelBars {
        leg: BarSelection::angle("L75x75x8"),
        diagonal: BarSelection::angle("L50x50x4"),
        main_belt: BarSelection::round("R25.4x2"),
    }
}

#[test]
fn reference_tower_segments() {
    let spec = reference_tower(CrossSection::Square);
    let segments = calculate_segments(&spec);

    assert_eq!(segments.len(), 10);
    let total: f64 = segments.iter().map(|s| s.height).sum();
    assert_relative_eq!(total, 29.3, epsilon = 1e-9);

    for pair in segments[..8].windows(2) {
        assert!(pair[1].base_width < pair[0].base_width);
        assert_relative_eq!(pair[0].top_width, pair[1].base_width, epsilon = 1e-12);
    }
    for seg in &segments[8..] {
        assert_eq!(seg.base_width, 2.0);
        assert_eq!(seg.top_width, 2.0);
        assert_eq!(seg.rwidth, 0.0);
    }
}

#[test]
fn reference_tower_mesh() {
    let spec = reference_tower(CrossSection::Square);
    let mesh = SectionMesher::new(&spec).build();

    assert_eq!(mesh.coordinates.len(), 10);
    for section in &mesh.coordinates {
        for label in ["a", "b", "c", "d", "e", "f", "g"] {
            let point = section.point(label).unwrap();
            assert!(point.is_finite(), "section {} point {}", section.section, label);
        }
        let a = section.point("a").unwrap();
        let b = section.point("b").unwrap();
        let g = section.point("g").unwrap();
        assert_relative_eq!(g.x(), (a.x() + b.x()) / 2.0, epsilon = 1e-3);
    }
}

#[test]
fn known_segment_leg_length() {
    let spec = TowerSpec::new(3.0, 2.5, 3.0, 1, 0, CrossSection::Square).unwrap();
    let segment = &calculate_segments(&spec)[0];
    assert_relative_eq!(segment.rwidth, 0.25, epsilon = 1e-12);

    assert_eq!(Toolkit::new(segment).unwrap().leg_length(), 3.0104);

    let catalog = BarCatalog::new(UnitSystem::Si);
    let panel = Panel::new(segment, &default_bars(), &SiteConditions::default(), &catalog).unwrap();
    let summary = panel.summary().unwrap();
    assert_eq!(summary.leg_geometry.length, 3.0104);
    assert_relative_eq!(summary.leg_geometry.width, 0.075, epsilon = 1e-12);
}

#[test]
fn coefficient_properties() {
    assert_eq!(
        calculate_linear_weight(25.0, 2.0),
        ((2.0 * 0.025 * 0.002 - 0.002f64.powi(2)) * 7850.0 * 10_000.0).round() / 10_000.0
    );

    assert_eq!(force_coefficient(CrossSection::Square, 0.0), 4.0);
    assert_eq!(force_coefficient(CrossSection::Triangular, 0.0), 3.4);

    for i in 0..=40 {
        let eps = i as f64 * 0.05;
        let df = wind_direction_factor(CrossSection::Square, 45, eps).unwrap();
        assert!(df <= 1.2);
        assert_relative_eq!(df, (1.0 + 0.75 * eps).min(1.2), epsilon = 1e-12);
    }
    assert_eq!(wind_direction_factor(CrossSection::Triangular, 90, 0.3).unwrap(), 0.85);

    assert_eq!(calculate_kz(ExposureCategory::C, 1e6).unwrap(), 2.01);
    assert_eq!(calculate_kz(ExposureCategory::C, 1e-3).unwrap(), 0.85);
}

#[test]
fn project_report_json() {
    let mut project = TowerProject::new("Reference", "Engineer", reference_tower(CrossSection::Triangular));
    project.panels.default = Some(default_bars());

    let report = project.run().unwrap();
    assert_eq!(report.panels.len(), 10);
    assert_eq!(report.mesh.elements[0].elements.len(), 24);

    let json = serde_json::to_value(&report).unwrap();
    let epa = &json["panels"][0]["effective_projected_area"];
    for key in ["epa_0°", "epa_60°", "epa_90°"] {
        assert!(epa[key].as_f64().unwrap() > 0.0, "missing {key}");
    }
    assert_eq!(json["mesh"]["coordinates"][0]["h"].as_array().unwrap().len(), 3);

    // Report from a stored project record gives identical numbers
    let reloaded = TowerProject::from_json(&project.to_json().unwrap()).unwrap();
    assert_eq!(reloaded.run().unwrap(), report);
}
