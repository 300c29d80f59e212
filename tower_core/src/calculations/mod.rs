//! # Wind-Load Calculations
//!
//! The geometry-to-load pipeline. Each stage is a pure function of its
//! inputs and follows the same pattern:
//!
//! - validated input types (JSON-serializable)
//! - result records (JSON-serializable)
//! - `CalcResult` returns for anything that can fail on bad input
//!
//! ## Pipeline
//!
//! ```text
//! TowerSpec ──► geometry::calculate_segments ──► Vec<Segment>
//!                                                   │
//!                        toolkit (member lengths) ◄─┤
//!                                                   ▼
//!        BarCatalog + SiteConditions ──► panel::Panel ──► PanelSummary
//!                                           │
//!                                           └─► k_factors (Kz, Kzt, Ke)
//! ```
//!
//! ## Available Calculations
//!
//! - [`geometry`] - Tower segment decomposition and gust effect factor
//! - [`toolkit`] - Leg, diagonal and main-belt member lengths
//! - [`k_factors`] - Velocity pressure, topographic and ground elevation factors
//! - [`panel`] - Solidity ratio, force coefficient and effective projected area

pub mod geometry;
pub mod k_factors;
pub mod panel;
pub mod toolkit;

// Re-export commonly used types
pub use geometry::{calculate_segments, gust_effect_factor, Segment, TowerData, TowerSpec};
pub use k_factors::{calculate_ke, calculate_kz, calculate_kzt, KFactors};
pub use panel::{Panel, PanelBars, PanelSummary, SiteConditions};
pub use toolkit::{MemberLengths, Toolkit};
