//! # Tower Wind-Load CLI
//!
//! Runs the wind-load pipeline on a project file and prints a summary
//! followed by the full report as JSON.
//!
//! ```text
//! tower_cli [project.json]
//! ```
//!
//! Without an argument a built-in demo tower is run. Logs go to stderr and
//! are controlled with `RUST_LOG` (default `info`).

use std::process::ExitCode;

use tower_core::bars::BarSelection;
use tower_core::calculations::{PanelBars, TowerSpec};
use tower_core::tables::CrossSection;
use tower_core::{CalcError, CalcResult, TowerProject, TowerReport};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tower_cli=info,tower_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_project(path: &str) -> CalcResult<TowerProject> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| CalcError::invalid_input("project_path", path, e.to_string()))?;
    TowerProject::from_json(&json)
}

fn demo_project() -> CalcResult<TowerProject> {
    let tower = TowerSpec::new(3.6, 2.0, 29.3, 8, 2, CrossSection::Square)?;
    let mut project = TowerProject::new("Demo Tower", "", tower);
    project.panels.default = Some(PanelBars {
        leg: BarSelection::angle("L75x75x8"),
        diagonal: BarSelection::angle("L50x50x4"),
        main_belt: BarSelection::angle("L50x50x4"),
    });
    project.panels.sections.insert(
        1,
        PanelBars {
            leg: BarSelection::angle("L100x100x10"),
            diagonal: BarSelection::angle("L50x50x5"),
            main_belt: BarSelection::round("R50.8x2"),
        },
    );
    Ok(project)
}

fn print_summary(project: &TowerProject, report: &TowerReport) {
    let tower = &report.tower_data;
    println!("═══════════════════════════════════════════════════════════════");
    println!("  TOWER WIND-LOAD REPORT: {}", project.meta.name);
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("Tower:");
    println!(
        "  Base / top width: {:.3} m / {:.3} m",
        tower.tower.base_width(),
        tower.tower.top_width()
    );
    println!(
        "  Height:           {:.2} m ({} segments)",
        tower.tower.height(),
        tower.segments.len()
    );
    println!("  Cross section:    {}", tower.tower.cross_section());
    println!(
        "  {}, Gh = {:.3}, I = {:.2}",
        tower.exposure_category, tower.gust_effect_factor, tower.importance_factor
    );
    println!();
    println!("  Sec   z (m)      ε       Cf      Kz     Kzt    EPA max (m²)");
    for (panel, (_, epa)) in report.panels.iter().zip(report.governing_epa()) {
        println!(
            "  {:>3}  {:>6.2}  {:>6.4}  {:>6.4}  {:>6.4}  {:>6.4}  {:>8.4}",
            panel.section_number,
            panel.height_above_ground,
            panel.solidity_ratio,
            panel.cf,
            panel.kz,
            panel.kzt,
            epa
        );
    }
    let element_count: usize = report.mesh.elements.iter().map(|s| s.elements.len()).sum();
    println!();
    println!("Mesh: {} sections, {} elements", report.mesh.coordinates.len(), element_count);
    println!("═══════════════════════════════════════════════════════════════");
}

fn run() -> CalcResult<()> {
    let project = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(path = %path, "loading project");
            load_project(&path)?
        }
        None => {
            tracing::info!("no project file given, running demo tower");
            demo_project()?
        }
    };

    let report = project.run()?;
    print_summary(&project, &report);

    println!();
    println!("JSON Output:");
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}
