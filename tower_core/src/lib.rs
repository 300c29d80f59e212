//! # tower_core - Lattice Tower Wind-Load Engine
//!
//! `tower_core` computes wind-load design parameters for lattice towers per
//! TIA-222: segment geometry, member lengths, solidity ratio, force
//! coefficient, wind direction factors, Kz/Kzt/Ke and effective projected
//! areas, plus a node/element mesh of the tower faces. All inputs and outputs
//! are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Explicit configuration**: catalogs and site settings are values passed in
//!
//! ## Quick Start
//!
//! ```rust
//! use tower_core::calculations::{calculate_segments, TowerSpec};
//! use tower_core::tables::CrossSection;
//!
//! let spec = TowerSpec::new(3.6, 2.0, 29.3, 8, 2, CrossSection::Square).unwrap();
//! let segments = calculate_segments(&spec);
//!
//! // Serialize to JSON for storage or transmission
//! let json = serde_json::to_string_pretty(&segments).unwrap();
//! assert!(json.contains("z_height"));
//! ```
//!
//! ## Modules
//!
//! - [`project`] - Project container, settings and the end-to-end report
//! - [`calculations`] - Geometry, member lengths, K-factors and panel aerodynamics
//! - [`mesh`] - Section node/element mesh
//! - [`bars`] - Angle and round bar catalogs
//! - [`tables`] - TIA-222 lookup tables
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod bars;
pub mod calculations;
pub mod errors;
pub mod mesh;
pub mod project;
pub mod tables;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{CalcError, CalcResult};
pub use project::{ProjectSettings, TowerProject, TowerReport};
