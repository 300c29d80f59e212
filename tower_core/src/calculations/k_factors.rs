//! # Velocity Pressure Factors
//!
//! Height, terrain and elevation coefficients applied to the basic wind
//! pressure:
//!
//! | Factor | Formula                                   | Reference        |
//! |--------|-------------------------------------------|------------------|
//! | Kz     | `2.01·(z/zg)^(2/α)`, in [Kzmin, 2.01]      | TIA-222 2.6.5.2  |
//! | Kzt    | `(1 + Ke·Kt/Kh)²`, `Kh = e^(f·z/crest)`     | TIA-222 2.6.6    |
//! | Ke     | `e^(−0.000119·zs)`                          | TIA-222 2.6.8    |
//!
//! All results are rounded to 4 decimals.
//!
//! ## Example
//!
//! ```rust
//! use tower_core::calculations::k_factors::calculate_kz;
//! use tower_core::tables::ExposureCategory;
//!
//! // Near the ground Kz saturates at Kzmin
//! assert_eq!(calculate_kz(ExposureCategory::C, 0.5).unwrap(), 0.85);
//! // Far above the boundary layer it saturates at 2.01
//! assert_eq!(calculate_kz(ExposureCategory::C, 5000.0).unwrap(), 2.01);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::tables::{tia_ref, ExposureCategory, TopographicCategory};
use crate::units::round_to;

const KZ_MAX: f64 = 2.01;
const KE_DECAY: f64 = 0.000119;

fn require_positive(calculation: &str, field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::precondition_failed(
            calculation,
            field,
            value.to_string(),
            "Value must be a positive number",
        ));
    }
    Ok(())
}

/// Velocity pressure coefficient Kz at height `z` (m)
pub fn calculate_kz(exposure: ExposureCategory, z: f64) -> CalcResult<f64> {
    require_positive(tia_ref::KZ, "z", z)?;
    let kz = KZ_MAX * (z / exposure.zg()).powf(2.0 / exposure.alpha());
    Ok(round_to(kz.clamp(exposure.kz_min(), KZ_MAX), 4))
}

/// Topographic factor Kzt at height `z` (m) for a feature of height `crest` (m)
pub fn calculate_kzt(
    exposure: ExposureCategory,
    topographic: TopographicCategory,
    z: f64,
    crest: f64,
) -> CalcResult<f64> {
    require_positive(tia_ref::KZT, "crest_height", crest)?;
    require_positive(tia_ref::KZT, "z", z)?;

    let Some((kt, f)) = topographic.constants() else {
        return Ok(1.0);
    };
    let kh = (f * z / crest).exp();
    let kzt = (1.0 + exposure.terrain_constant() * kt / kh).powi(2);
    Ok(round_to(kzt, 4))
}

/// Ground elevation factor Ke for a site `ground_elevation` (m) above sea level
pub fn calculate_ke(ground_elevation: f64) -> CalcResult<f64> {
    if !ground_elevation.is_finite() || ground_elevation < 0.0 {
        return Err(CalcError::precondition_failed(
            tia_ref::KE,
            "ground_elevation",
            ground_elevation.to_string(),
            "Ground elevation cannot be negative",
        ));
    }
    Ok(round_to((-KE_DECAY * ground_elevation).exp(), 4))
}

/// The three factors evaluated at one height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KFactors {
    pub kz: f64,
    pub kzt: f64,
    pub ke: f64,
}

impl KFactors {
    /// Evaluate all three factors for a site and height
    pub fn evaluate(
        exposure: ExposureCategory,
        topographic: TopographicCategory,
        z: f64,
        crest: f64,
        ground_elevation: f64,
    ) -> CalcResult<Self> {
        Ok(Self {
            kz: calculate_kz(exposure, z)?,
            kzt: calculate_kzt(exposure, topographic, z, crest)?,
            ke: calculate_ke(ground_elevation)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kz_saturates_low() {
        assert_eq!(calculate_kz(ExposureCategory::B, 0.01).unwrap(), 0.70);
        assert_eq!(calculate_kz(ExposureCategory::C, 0.01).unwrap(), 0.85);
        assert_eq!(calculate_kz(ExposureCategory::D, 0.01).unwrap(), 1.03);
    }

    #[test]
    fn test_kz_saturates_high() {
        for exposure in ExposureCategory::ALL {
            assert_eq!(calculate_kz(exposure, 10_000.0).unwrap(), 2.01);
        }
    }

    #[test]
    fn test_kz_mid_height() {
        let expected = round_to(2.01 * (30.0f64 / 274.0).powf(2.0 / 9.5), 4);
        assert_eq!(calculate_kz(ExposureCategory::C, 30.0).unwrap(), expected);
        assert!(expected > 0.85 && expected < 2.01);
    }

    #[test]
    fn test_kz_rejects_non_positive_height() {
        let err = calculate_kz(ExposureCategory::C, 0.0).unwrap_err();
        assert_eq!(err.error_code(), "PRECONDITION_FAILED");
        assert!(calculate_kz(ExposureCategory::C, -2.0).is_err());
    }

    #[test]
    fn test_kzt_category_1_is_unity() {
        let kzt = calculate_kzt(ExposureCategory::C, TopographicCategory::Category1, 15.0, 10.0).unwrap();
        assert_eq!(kzt, 1.0);
    }

    #[test]
    fn test_kzt_category_2() {
        let kh = (1.25f64 * 15.0 / 10.0).exp();
        let expected = round_to((1.0 + 1.0 * 0.43 / kh).powi(2), 4);
        let kzt = calculate_kzt(ExposureCategory::C, TopographicCategory::Category2, 15.0, 10.0).unwrap();
        assert_eq!(kzt, expected);
        assert!(kzt > 1.0);
    }

    #[test]
    fn test_kzt_decays_with_height() {
        let low = calculate_kzt(ExposureCategory::C, TopographicCategory::Category3, 2.0, 10.0).unwrap();
        let high = calculate_kzt(ExposureCategory::C, TopographicCategory::Category3, 40.0, 10.0).unwrap();
        assert!(low > high);
    }

    #[test]
    fn test_kzt_rejects_bad_crest() {
        let err = calculate_kzt(ExposureCategory::C, TopographicCategory::Category2, 15.0, 0.0).unwrap_err();
        match err {
            CalcError::PreconditionFailed { field, .. } => assert_eq!(field, "crest_height"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_ke() {
        assert_eq!(calculate_ke(0.0).unwrap(), 1.0);
        assert_eq!(calculate_ke(1000.0).unwrap(), round_to((-0.119f64).exp(), 4));
        assert!(calculate_ke(-1.0).is_err());
    }

    #[test]
    fn test_evaluate_all() {
        let factors =
            KFactors::evaluate(ExposureCategory::C, TopographicCategory::Category1, 0.5, 10.0, 0.0).unwrap();
        assert_eq!(
            factors,
            KFactors {
                kz: 0.85,
                kzt: 1.0,
                ke: 1.0
            }
        );
    }
}
