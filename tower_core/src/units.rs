//! # Unit Types
//!
//! Type-safe wrappers for the length units the engine deals with. These are
//! plain f64 newtypes that serialize as bare numbers.
//!
//! ## Conventions
//!
//! - Tower geometry (widths, heights, elevations) is in metres
//! - Bar catalog dimensions (profile `pa`, thickness `t`) are in millimetres
//! - Imperial catalog entries are entered in inches and converted to
//!   millimetres (1 in = 25.4 mm) before any formula applies
//!
//! ## Example
//!
//! ```rust
//! use tower_core::units::{Inches, Meters, Millimeters};
//!
//! let flange = Inches(2.0);
//! let flange_mm: Millimeters = flange.into();
//! assert!((flange_mm.0 - 50.8).abs() < 1e-12);
//!
//! let flange_m: Meters = flange_mm.into();
//! assert!((flange_m.0 - 0.0508).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

/// Millimetres per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Inches> for Millimeters {
    fn from(inches: Inches) -> Self {
        Millimeters(inches.0 * MM_PER_INCH)
    }
}

impl From<Millimeters> for Inches {
    fn from(mm: Millimeters) -> Self {
        Inches(mm.0 / MM_PER_INCH)
    }
}

/// Round to a fixed number of decimal places.
///
/// Every reported quantity in the engine is rounded this way (lengths and
/// coefficients to 4 places, mesh coordinates to 3).
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

macro_rules! impl_value {
    ($type:ty) => {
        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_value!(Meters);
impl_value!(Millimeters);
impl_value!(Inches);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inches_to_millimeters() {
        let mm: Millimeters = Inches(0.5).into();
        assert!((mm.0 - 12.7).abs() < 1e-12);
    }

    #[test]
    fn test_millimeters_to_meters() {
        let m: Meters = Millimeters(50.8).into();
        assert!((m.0 - 0.0508).abs() < 1e-12);
    }

    #[test]
    fn test_value_through_conversions() {
        assert_eq!(Meters::from(Millimeters(2500.0)).value(), 2.5);
        assert!((Millimeters::from(Meters(0.075)).value() - 75.0).abs() < 1e-12);
        assert!((Inches::from(Millimeters(50.8)).value() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(3.010_398_6, 4), 3.0104);
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert_eq!(round_to(2.0, 4), 2.0);
    }

    #[test]
    fn test_serialization() {
        let m = Meters(29.3);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "29.3");

        let roundtrip: Meters = serde_json::from_str(&json).unwrap();
        assert_eq!(m, roundtrip);
    }
}
