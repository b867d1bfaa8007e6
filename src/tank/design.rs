//! Resonant tank component design.
//!
//! Maps a dimensionless (Ln, Qe) design point onto physical Lr, Cr and Lm
//! for a given load and resonant frequency, optionally snapping the
//! components to purchasable steps and recomputing the tank parameters the
//! snapped parts actually realise.

use std::f64::consts::PI;

use serde::Serialize;

use crate::spec::ComponentRounding;

/// Transformer turns ratio for a nominal input voltage.
///
/// At resonance the gain is unity, so n = Vin / (2 * Vout). Returns the
/// exact value and the integer ratio rounded half-up.
pub fn turns_ratio(vin: f64, vout: f64) -> (f64, u32) {
    let n_float = vin / (2.0 * vout);
    let n_used = (n_float + 0.5).floor().max(1.0) as u32;
    (n_float, n_used)
}

/// Largest magnetizing inductance that still reaches ZVS at start-up.
///
/// Start-up runs at roughly three times the minimum switching frequency,
/// so the shortest period is 1 / (3 * fsw_min).
pub fn lm_max(deadtime: f64, coss: f64, fsw_min: f64) -> f64 {
    let t_sw_min = 1.0 / (3.0 * fsw_min);
    t_sw_min * deadtime / (16.0 * coss)
}

/// Dead time needed for ZVS at start-up with magnetizing inductance `lm`.
pub fn required_deadtime(lm: f64, coss: f64, fsw_min: f64) -> f64 {
    let t_sw_min = 1.0 / (3.0 * fsw_min);
    16.0 * coss * lm / t_sw_min
}

/// Ideal tank components for a design point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IdealTank {
    /// Load resistance Vout^2 / Pout (ohm)
    pub rl: f64,
    /// Reflected AC load resistance (ohm)
    pub re: f64,
    pub cr: f64,
    pub lr: f64,
    pub lm: f64,
}

impl IdealTank {
    /// Design the tank for (Ln, Qe) at rated load.
    pub fn design(vout: f64, pout: f64, n: f64, fr: f64, ln: f64, qe: f64) -> Self {
        let rl = vout * vout / pout;
        let re = 8.0 * n * n / (PI * PI) * rl;
        let cr = 1.0 / (2.0 * PI * fr * re * qe);
        let lr = 1.0 / ((2.0 * PI * fr).powi(2) * cr);
        let lm = ln * lr;
        Self { rl, re, cr, lr, lm }
    }
}

/// A tank built from (possibly rounded) components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tank {
    /// Grid Ln the tank was designed for.
    pub ln_design: f64,
    /// Grid Qe the tank was designed for.
    pub qe_design: f64,
    pub lr: f64,
    pub cr: f64,
    pub lm: f64,
    /// Reflected AC load resistance at rated power (ohm).
    pub re: f64,
    /// Resonant frequency of the realised Lr-Cr pair (Hz).
    pub fr: f64,
    /// Realised inductance ratio Lm / Lr.
    pub ln: f64,
    /// Realised quality factor at rated load.
    pub qe: f64,
}

impl Tank {
    /// Build a tank from chosen components and recompute fR, Qe and Ln.
    pub fn realise(ln_design: f64, qe_design: f64, lr: f64, cr: f64, lm: f64, re: f64) -> Self {
        let fr = 1.0 / (2.0 * PI * (lr * cr).sqrt());
        let qe = 1.0 / (2.0 * PI * fr * re * cr);
        Self {
            ln_design,
            qe_design,
            lr,
            cr,
            lm,
            re,
            fr,
            ln: lm / lr,
            qe,
        }
    }
}

/// Realised tanks for a design point under the given rounding mode.
///
/// `Ideal` and `Nearest` always yield exactly one tank; `Neighbors` yields
/// up to eight. Components are never rounded to zero.
pub fn realise_tanks(ideal: &IdealTank, ln: f64, qe: f64, rounding: ComponentRounding) -> Vec<Tank> {
    match rounding {
        ComponentRounding::Ideal => {
            vec![Tank::realise(ln, qe, ideal.lr, ideal.cr, ideal.lm, ideal.re)]
        }
        ComponentRounding::Nearest {
            inductance_step,
            capacitance_step,
        } => {
            let lr = snap_nearest(ideal.lr, inductance_step);
            let cr = snap_nearest(ideal.cr, capacitance_step);
            let lm = snap_nearest(ideal.lm, inductance_step);
            vec![Tank::realise(ln, qe, lr, cr, lm, ideal.re)]
        }
        ComponentRounding::Neighbors {
            inductance_step,
            capacitance_step,
        } => {
            let lr_opts = floor_ceil(ideal.lr, inductance_step);
            let cr_opts = floor_ceil(ideal.cr, capacitance_step);
            let lm_opts = floor_ceil(ideal.lm, inductance_step);

            let mut tanks = Vec::with_capacity(lr_opts.len() * cr_opts.len() * lm_opts.len());
            for &lr in &lr_opts {
                for &cr in &cr_opts {
                    for &lm in &lm_opts {
                        tanks.push(Tank::realise(ln, qe, lr, cr, lm, ideal.re));
                    }
                }
            }
            tanks
        }
    }
}

fn snap_nearest(value: f64, step: f64) -> f64 {
    let units = (value / step).round().max(1.0);
    units * step
}

fn floor_ceil(value: f64, step: f64) -> Vec<f64> {
    let d = value / step;
    let lower = d.floor();
    let upper = d.ceil();
    let mut opts = Vec::with_capacity(2);
    if lower >= 1.0 {
        opts.push(lower * step);
    }
    if upper != lower || opts.is_empty() {
        opts.push(upper.max(1.0) * step);
    }
    opts
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const VOUT: f64 = 48.0;
    const POUT: f64 = 600.0;
    const FR: f64 = 100e3;

    #[test]
    fn test_turns_ratio_rounds_half_up() {
        let (n_float, n_used) = turns_ratio(400.0, VOUT);
        assert_relative_eq!(n_float, 4.1667, epsilon = 1e-3);
        assert_eq!(n_used, 4);

        let (_, n_used) = turns_ratio(432.0, VOUT);
        assert_eq!(n_used, 5);
    }

    #[test]
    fn test_lm_max_and_deadtime_are_inverse() {
        let lm = lm_max(2e-6, 80e-12, 50e3);
        // 6.67 us * 2 us / (16 * 80 pF) ~= 10.4 mH
        assert_relative_eq!(lm, 10.4e-3, epsilon = 0.1e-3);
        assert_relative_eq!(required_deadtime(lm, 80e-12, 50e3), 2e-6, epsilon = 1e-15);
    }

    #[test]
    fn test_ideal_tank_reference_design() {
        let tank = IdealTank::design(VOUT, POUT, 4.0, FR, 9.0, 0.35);
        assert_relative_eq!(tank.rl, 3.84, epsilon = 1e-9);
        assert_relative_eq!(tank.re, 49.8, epsilon = 0.1);
        assert_relative_eq!(tank.cr, 91.3e-9, epsilon = 0.1e-9);
        assert_relative_eq!(tank.lr, 27.7e-6, epsilon = 0.5e-6);
        assert_relative_eq!(tank.lm, 249e-6, epsilon = 5e-6);
    }

    #[test]
    fn test_ideal_rounding_preserves_design_point() {
        let ideal = IdealTank::design(VOUT, POUT, 4.0, FR, 9.0, 0.35);
        let tanks = realise_tanks(&ideal, 9.0, 0.35, ComponentRounding::Ideal);
        assert_eq!(tanks.len(), 1);
        assert_relative_eq!(tanks[0].fr, FR, max_relative = 1e-9);
        assert_relative_eq!(tanks[0].qe, 0.35, max_relative = 1e-9);
        assert_relative_eq!(tanks[0].ln, 9.0, max_relative = 1e-9);
    }

    #[test]
    fn test_nearest_rounding_snaps_components() {
        let ideal = IdealTank::design(VOUT, POUT, 4.0, FR, 9.0, 0.35);
        let tanks = realise_tanks(&ideal, 9.0, 0.35, ComponentRounding::default());
        assert_eq!(tanks.len(), 1);
        let t = tanks[0];
        assert_relative_eq!(t.lr, 28e-6, epsilon = 1e-12);
        assert_relative_eq!(t.cr, 91e-9, epsilon = 1e-15);
        assert_relative_eq!(t.lm, 250e-6, epsilon = 1e-12);
        assert_relative_eq!(t.ln, 250.0 / 28.0, epsilon = 1e-9);
        assert!((t.fr - FR).abs() / FR < 0.01);
    }

    #[test]
    fn test_neighbor_rounding_enumerates_combinations() {
        let ideal = IdealTank::design(VOUT, POUT, 4.0, FR, 9.0, 0.35);
        let steps = ComponentRounding::Neighbors {
            inductance_step: 1e-6,
            capacitance_step: 1e-9,
        };
        let tanks = realise_tanks(&ideal, 9.0, 0.35, steps);
        assert_eq!(tanks.len(), 8);
        assert!(tanks.iter().any(|t| (t.lr - 27e-6).abs() < 1e-12));
        assert!(tanks.iter().any(|t| (t.lr - 28e-6).abs() < 1e-12));
    }

    #[test]
    fn test_rounding_never_reaches_zero() {
        assert_eq!(floor_ceil(0.4e-6, 1e-6), vec![1e-6]);
        assert_relative_eq!(snap_nearest(0.2e-9, 1e-9), 1e-9);
    }
}
