//! Round (circular hollow) bar catalogs (SI and imperial).

use once_cell::sync::Lazy;

use super::angle::IMPERIAL_THICKNESSES;
use super::{calculate_round_linear_weight, BarKind, BarSpec, BarTable};
use crate::units::{round_to, Inches, Millimeters};

/// SI outside diameters (mm)
const SI_DIAMETERS: [f64; 7] = [12.7, 25.4, 38.1, 50.8, 63.5, 76.2, 101.6];

/// SI wall thicknesses (mm)
const SI_THICKNESSES: [u32; 2] = [2, 4];

/// Imperial outside diameters (designation, in)
const IMPERIAL_DIAMETERS: [(&str, f64); 5] = [("1/2", 0.5), ("1", 1.0), ("2", 2.0), ("3", 3.0), ("4", 4.0)];

/// Imperial wall thicknesses offered for round bars
const IMPERIAL_ROUND_THICKNESSES: [&str; 2] = ["1/8", "1/4"];

fn round_bar(key: String, diameter_mm: f64, t_mm: f64) -> BarSpec {
    BarSpec {
        key,
        kind: BarKind::Round,
        pa: diameter_mm,
        t: t_mm,
        weight_per_meter: calculate_round_linear_weight(diameter_mm, t_mm),
    }
}

/// Round bars designated in millimetres
pub static ROUND_BARS_SI: Lazy<BarTable> = Lazy::new(|| {
    let mut table = BarTable::new();
    for d in SI_DIAMETERS {
        for t in SI_THICKNESSES {
            let key = format!("R{d}x{t}");
            table.insert(key.clone(), round_bar(key, d, f64::from(t)));
        }
    }
    table
});

/// Round bars designated in inches, stored in millimetres
pub static ROUND_BARS_IMPERIAL: Lazy<BarTable> = Lazy::new(|| {
    let mut table = BarTable::new();
    for (d_label, d_in) in IMPERIAL_DIAMETERS {
        for (t_label, t_in) in IMPERIAL_THICKNESSES
            .iter()
            .filter(|(label, _)| IMPERIAL_ROUND_THICKNESSES.contains(label))
        {
            let key = format!("R{d_label}x{t_label}");
            let d_mm = Millimeters::from(Inches(d_in)).value();
            let t_mm = Millimeters::from(Inches(*t_in)).value();
            let mut bar = round_bar(key.clone(), d_mm, t_mm);
            bar.pa = round_to(d_mm, 2);
            bar.t = round_to(t_mm, 2);
            table.insert(key, bar);
        }
    }
    table
});
