//! # Member Lengths
//!
//! Lengths of the three member roles of a segment face: the sloped leg, the
//! full-face diagonal and the main belt running from the leg to the diagonal
//! crossing.
//!
//! ## Example
//!
//! ```rust
//! use tower_core::calculations::geometry::{calculate_segments, TowerSpec};
//! use tower_core::calculations::toolkit::Toolkit;
//! use tower_core::tables::CrossSection;
//!
//! let spec = TowerSpec::new(3.0, 2.5, 3.0, 1, 0, CrossSection::Square).unwrap();
//! let segment = &calculate_segments(&spec)[0];
//!
//! let toolkit = Toolkit::new(segment).unwrap();
//! assert_eq!(toolkit.leg_length(), 3.0104);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::geometry::Segment;
use crate::errors::{CalcError, CalcResult};
use crate::units::round_to;

/// All three member lengths of a segment (m, 4 decimals)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemberLengths {
    pub leg: f64,
    pub diagonal: f64,
    pub main_belt: f64,
}

/// Member length calculator bound to one validated segment
#[derive(Debug, Clone, Copy)]
pub struct Toolkit<'a> {
    segment: &'a Segment,
}

impl<'a> Toolkit<'a> {
    /// Bind to a segment, rejecting non-positive height or width
    pub fn new(segment: &'a Segment) -> CalcResult<Self> {
        for (field, value) in [("height", segment.height), ("base_width", segment.base_width)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::invalid_input(
                    format!("segment {}.{}", segment.index, field),
                    value.to_string(),
                    "Segment dimensions must be positive numbers",
                ));
            }
        }
        if !segment.rwidth.is_finite() || segment.rwidth < 0.0 {
            return Err(CalcError::invalid_input(
                format!("segment {}.rwidth", segment.index),
                segment.rwidth.to_string(),
                "Width reduction cannot be negative",
            ));
        }
        Ok(Self { segment })
    }

    /// `√(rwidth² + h²)`
    pub fn leg_length(&self) -> f64 {
        let s = self.segment;
        round_to(s.rwidth.hypot(s.height), 4)
    }

    /// `√((base − rwidth)² + h²)`
    pub fn diagonal_length(&self) -> f64 {
        let s = self.segment;
        round_to((s.base_width - s.rwidth).hypot(s.height), 4)
    }

    /// Leg-to-crossing belt: `base/2 − rc`, where `rc` is the taper
    /// offset at the diagonal crossing height `hc`.
    pub fn main_belt_length(&self) -> f64 {
        let s = self.segment;
        // asin domain guard against the rounded diagonal
        let ratio = (s.height / self.diagonal_length()).min(1.0);
        let phi = ratio.asin();
        let hc = phi.tan() * s.base_width / 2.0;
        let rc = s.rwidth * hc / s.height;
        round_to(s.base_width / 2.0 - rc, 4)
    }

    /// All three lengths at once
    pub fn member_lengths(&self) -> MemberLengths {
        MemberLengths {
            leg: self.leg_length(),
            diagonal: self.diagonal_length(),
            main_belt: self.main_belt_length(),
        }
    }
}
