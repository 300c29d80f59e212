//! Equal-leg angle catalogs (SI and imperial).
//!
//! SI designations follow `L<pa>x<pa>x<t>` in millimetres; imperial ones
//! follow `L<pa>x<pa>x<t>` in inches with fractional thicknesses.

use once_cell::sync::Lazy;

use super::{calculate_linear_weight, calculate_linear_weight_imperial, BarKind, BarSpec, BarTable};
use crate::units::{round_to, Inches, Millimeters};

/// SI leg widths (mm)
const SI_LEG_WIDTHS: [u32; 6] = [25, 50, 75, 100, 125, 150];

/// SI thicknesses (mm)
const SI_THICKNESSES: [u32; 8] = [2, 3, 4, 5, 6, 8, 10, 12];

/// Imperial leg widths (in)
const IMPERIAL_LEG_WIDTHS: [u32; 3] = [1, 2, 3];

/// Imperial thicknesses (designation, in)
pub(crate) const IMPERIAL_THICKNESSES: [(&str, f64); 6] = [
    ("1/8", 0.125),
    ("3/16", 0.1875),
    ("1/4", 0.25),
    ("5/16", 0.3125),
    ("3/8", 0.375),
    ("1/2", 0.5),
];

/// Angle bars designated in millimetres
pub static ANGLE_BARS_SI: Lazy<BarTable> = Lazy::new(|| {
    let mut table = BarTable::new();
    for pa in SI_LEG_WIDTHS {
        for t in SI_THICKNESSES {
            let key = format!("L{pa}x{pa}x{t}");
            let (pa, t) = (f64::from(pa), f64::from(t));
            table.insert(
                key.clone(),
                BarSpec {
                    key,
                    kind: BarKind::Angle,
                    pa,
                    t,
                    weight_per_meter: calculate_linear_weight(pa, t),
                },
            );
        }
    }
    table
});

/// Angle bars designated in inches, stored in millimetres
pub static ANGLE_BARS_IMPERIAL: Lazy<BarTable> = Lazy::new(|| {
    let mut table = BarTable::new();
    for pa_in in IMPERIAL_LEG_WIDTHS {
        for (t_label, t_in) in IMPERIAL_THICKNESSES {
            let key = format!("L{pa_in}x{pa_in}x{t_label}");
            let pa_in = f64::from(pa_in);
            table.insert(
                key.clone(),
                BarSpec {
                    key,
                    kind: BarKind::Angle,
                    pa: round_to(Millimeters::from(Inches(pa_in)).value(), 2),
                    t: round_to(Millimeters::from(Inches(t_in)).value(), 2),
                    weight_per_meter: calculate_linear_weight_imperial(pa_in, t_in),
                },
            );
        }
    }
    table
});
