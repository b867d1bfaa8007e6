//! Operating point at one line/load condition.

use serde::Serialize;

use crate::spec::DesignSpec;
use crate::tank::{gain, is_inductive, Tank};
use crate::warning::{Corner, Warning};

use super::root::{NoSolution, RootFinder, RootMethod};
use super::stress::{compute_stress, Stress};
use super::{required_gain, DEFAULT_BRACKET};

/// An input voltage and output power the tank must support.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OperatingCondition {
    pub corner: Corner,
    pub vin: f64,
    pub pout: f64,
}

impl OperatingCondition {
    /// Nominal input, rated power.
    pub fn nominal(spec: &DesignSpec) -> Self {
        Self {
            corner: Corner::Nominal,
            vin: spec.nominal_vin(),
            pout: spec.pout_rated,
        }
    }

    /// Minimum input, rated power: the highest gain and lowest frequency.
    pub fn min_frequency(spec: &DesignSpec) -> Self {
        Self {
            corner: Corner::MinFrequency,
            vin: spec.vin_min,
            pout: spec.pout_rated,
        }
    }

    /// Maximum input at the light-load floor: the highest frequency.
    pub fn max_frequency(spec: &DesignSpec) -> Self {
        Self {
            corner: Corner::MaxFrequency,
            vin: spec.vin_max,
            pout: spec.pout_rated * spec.span.light_load_fraction,
        }
    }
}

/// A solved operating point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolvedPoint {
    pub f_n: f64,
    /// Switching frequency fN * fR (Hz)
    pub fsw: f64,
    /// Gain actually delivered at fN
    pub gain: f64,
    pub method: RootMethod,
    /// Tank input is inductive at fN
    pub zvs: bool,
    pub stress: Stress,
}

/// Outcome of solving one condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatingPoint {
    pub condition: OperatingCondition,
    pub target_gain: f64,
    /// Load-referred quality factor at this power
    pub qe_load: f64,
    /// `Err` marks the point infeasible; no stress is computed then
    pub solution: Result<SolvedPoint, NoSolution>,
    pub warnings: Vec<Warning>,
}

impl OperatingPoint {
    pub fn is_feasible(&self) -> bool {
        self.solution.is_ok()
    }

    pub fn solved(&self) -> Option<&SolvedPoint> {
        self.solution.as_ref().ok()
    }

    pub fn f_n(&self) -> Option<f64> {
        self.solved().map(|s| s.f_n)
    }

    pub fn fsw(&self) -> Option<f64> {
        self.solved().map(|s| s.fsw)
    }

    /// Resonant inductor RMS current (AC view).
    pub fn ilr_rms(&self) -> Option<f64> {
        self.solved().map(|s| s.stress.ac.ilr_rms)
    }

    /// Resonant capacitor peak voltage (peak-with-bias view).
    pub fn vcr_peak(&self) -> Option<f64> {
        self.solved().map(|s| s.stress.peak.vcr_peak)
    }

    /// ZVS flag; false for an infeasible point.
    pub fn zvs(&self) -> bool {
        self.solved().map(|s| s.zvs).unwrap_or(false)
    }
}

/// Solves operating points for a realised tank.
#[derive(Debug, Clone, Default)]
pub struct OperatingPointSolver {
    pub root_finder: RootFinder,
}

impl OperatingPointSolver {
    pub fn new(root_finder: RootFinder) -> Self {
        Self { root_finder }
    }

    /// Solve `tank` at `condition`.
    pub fn solve(
        &self,
        spec: &DesignSpec,
        tank: &Tank,
        condition: OperatingCondition,
    ) -> OperatingPoint {
        let n = spec.turns_ratio;
        let target_gain = required_gain(condition.vin, spec.vout, n);
        let qe_load = tank.qe * condition.pout / spec.pout_rated;

        let solution = self
            .root_finder
            .solve_fn(target_gain, tank.ln, qe_load, DEFAULT_BRACKET)
            .map(|root| {
                let fsw = root.f_n * tank.fr;
                SolvedPoint {
                    f_n: root.f_n,
                    fsw,
                    gain: gain(root.f_n, tank.ln, qe_load),
                    method: root.method,
                    zvs: is_inductive(root.f_n, tank.ln, qe_load),
                    stress: compute_stress(
                        condition.vin,
                        spec.vout,
                        condition.pout,
                        n,
                        tank.lm,
                        tank.cr,
                        fsw,
                    ),
                }
            });

        let mut warnings = Vec::new();
        if let Err(ref e) = solution {
            tracing::debug!(
                corner = %condition.corner,
                ln = tank.ln,
                qe = qe_load,
                "{e}"
            );
            warnings.push(Warning::NoSolution {
                corner: condition.corner,
                target_gain,
            });
        }

        OperatingPoint {
            condition,
            target_gain,
            qe_load,
            solution,
            warnings,
        }
    }
}
