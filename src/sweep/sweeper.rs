//! Grid sweep over (Ln, Qe).

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::solver::{
    estimate_span, OperatingCondition, OperatingPoint, OperatingPointSolver, TYPICAL_FN_RANGE,
};
use crate::spec::{DesignSpec, WINDOW_TOLERANCE};
use crate::tank::{lm_max, realise_tanks, IdealTank, Tank};
use crate::warning::Warning;

use super::candidate::{Candidate, SolvedDesign};
use super::score::ScoringEngine;

/// Evaluates every grid point of a spec into scored candidates.
#[derive(Debug, Clone)]
pub struct CandidateSweeper<'a> {
    spec: &'a DesignSpec,
    solver: OperatingPointSolver,
    scoring: ScoringEngine,
}

impl<'a> CandidateSweeper<'a> {
    pub fn new(spec: &'a DesignSpec) -> Self {
        Self {
            spec,
            solver: OperatingPointSolver::default(),
            scoring: ScoringEngine::new(spec),
        }
    }

    /// Use a custom operating point solver.
    pub fn with_solver(mut self, solver: OperatingPointSolver) -> Self {
        self.solver = solver;
        self
    }

    /// Cartesian (Ln, Qe) grid, Ln-major.
    pub fn grid(&self) -> Vec<(f64, f64)> {
        let qe_values = self.spec.qe_range.values();
        self.spec
            .ln_range
            .values()
            .into_iter()
            .flat_map(|ln| qe_values.iter().map(move |&qe| (ln, qe)))
            .collect()
    }

    /// Scored candidates of one grid point, one per realised tank.
    pub fn evaluate(&self, ln: f64, qe: f64) -> Vec<Candidate> {
        let spec = self.spec;
        let ideal = IdealTank::design(
            spec.vout,
            spec.pout_rated,
            spec.turns_ratio,
            spec.fr_target,
            ln,
            qe,
        );
        realise_tanks(&ideal, ln, qe, spec.rounding)
            .into_iter()
            .map(|tank| {
                let design = self.solve_tank(tank);
                let score = self.scoring.score(&design);
                design.into_candidate(score)
            })
            .collect()
    }

    /// Solve the nominal point and both corners of `tank` and collect warnings.
    pub fn solve_tank(&self, tank: Tank) -> SolvedDesign {
        let spec = self.spec;
        let mut warnings = Vec::new();

        let ln_window = spec.ln_window();
        if !ln_window.contains_within(tank.ln, WINDOW_TOLERANCE) {
            warnings.push(Warning::LnOutOfRange {
                value: tank.ln,
                min: ln_window.min,
                max: ln_window.max,
            });
        }
        let qe_window = spec.qe_window();
        if !qe_window.contains_within(tank.qe, WINDOW_TOLERANCE) {
            warnings.push(Warning::QeOutOfRange {
                value: tank.qe,
                min: qe_window.min,
                max: qe_window.max,
            });
        }

        let nominal = self
            .solver
            .solve(spec, &tank, OperatingCondition::nominal(spec));
        warnings.extend(nominal.warnings.iter().cloned());

        if let Some(f_n) = nominal.f_n() {
            let (lo, hi) = TYPICAL_FN_RANGE;
            if !(lo..=hi).contains(&f_n) {
                warnings.push(Warning::FnOutsideTypical {
                    f_n,
                    min: lo,
                    max: hi,
                });
            }
        }

        let span = estimate_span(&self.solver, spec, &tank);
        warnings.extend(span.min_corner.warnings.iter().cloned());
        warnings.extend(span.max_corner.warnings.iter().cloned());

        if let Some(metrics) = span.metrics {
            if !metrics.is_monotonic() {
                warnings.push(Warning::NonMonotonicCorners {
                    fsw_min_corner: metrics.fsw_min_corner,
                    fsw_max_corner: metrics.fsw_max_corner,
                });
            }
            if metrics.span_ratio > spec.span.high_span_warning {
                warnings.push(Warning::HighSpan {
                    ratio: metrics.span_ratio,
                    threshold: spec.span.high_span_warning,
                });
            }
        }

        for point in [&nominal, &span.min_corner, &span.max_corner] {
            self.check_limits(point, &mut warnings);
        }

        if let (Some(zvs), Some(fsw_min)) = (spec.limits.zvs, spec.limits.fsw_min) {
            let lm_limit = lm_max(zvs.deadtime, zvs.coss, fsw_min);
            if tank.lm > lm_limit {
                warnings.push(Warning::ZvsStartup {
                    lm: tank.lm,
                    lm_max: lm_limit,
                });
            }
        }

        if !nominal.is_feasible() {
            tracing::debug!(ln = tank.ln_design, qe = tank.qe_design, "nominal point infeasible");
        }

        SolvedDesign {
            tank,
            nominal,
            min_corner: span.min_corner,
            max_corner: span.max_corner,
            span: span.metrics,
            warnings,
        }
    }

    fn check_limits(&self, point: &OperatingPoint, warnings: &mut Vec<Warning>) {
        let Some(fsw) = point.fsw() else {
            return;
        };
        let corner = point.condition.corner;
        if let Some(limit) = self.spec.limits.fsw_min {
            if fsw < limit {
                warnings.push(Warning::FswBelowLimit { corner, fsw, limit });
            }
        }
        if let Some(limit) = self.spec.limits.fsw_max {
            if fsw > limit {
                warnings.push(Warning::FswAboveLimit { corner, fsw, limit });
            }
        }
    }

    /// Evaluate the whole grid, in grid order.
    #[cfg(not(feature = "parallel"))]
    pub fn evaluate_grid(&self, grid: &[(f64, f64)]) -> Vec<Candidate> {
        grid.iter()
            .flat_map(|&(ln, qe)| self.evaluate(ln, qe))
            .collect()
    }

    /// Evaluate the whole grid in parallel, collected in grid order.
    #[cfg(feature = "parallel")]
    pub fn evaluate_grid(&self, grid: &[(f64, f64)]) -> Vec<Candidate> {
        let per_point: Vec<Vec<Candidate>> = grid
            .par_iter()
            .map(|&(ln, qe)| self.evaluate(ln, qe))
            .collect();
        per_point.into_iter().flatten().collect()
    }

    /// Unranked candidates for the full grid.
    pub fn run(&self) -> Vec<Candidate> {
        self.evaluate_grid(&self.grid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{ComponentRounding, OperatingLimits, SweepRange, ZvsLimits};
    use crate::warning::Corner;

    fn spec() -> DesignSpec {
        DesignSpec::new(
            380.0,
            420.0,
            48.0,
            1000.0,
            100e3,
            4.0,
            SweepRange::stepped(3.0, 8.0, 0.5),
            SweepRange::points(0.2, 0.6, 9),
        )
    }

    #[test]
    fn test_grid_is_cartesian() {
        let spec = spec();
        let grid = CandidateSweeper::new(&spec).grid();
        assert_eq!(grid.len(), 11 * 9);
        assert_eq!(grid[0], (3.0, 0.2));
        assert_eq!(grid[9].0, 3.5);
    }

    #[test]
    fn test_nearest_rounding_gives_one_candidate_per_point() {
        let spec = spec();
        let sweeper = CandidateSweeper::new(&spec);
        let candidates = sweeper.evaluate(6.0, 0.4);
        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert_eq!(c.ln(), 6.0);
        assert_eq!(c.qe(), 0.4);
        assert!(c.is_feasible());
        assert!(c.warnings.is_empty());
    }

    #[test]
    fn test_neighbors_rounding_expands_point() {
        let spec = spec().with_rounding(ComponentRounding::Neighbors {
            inductance_step: 1e-6,
            capacitance_step: 1e-9,
        });
        let candidates = CandidateSweeper::new(&spec).evaluate(6.0, 0.4);
        assert!(candidates.len() > 1);
        assert!(candidates.len() <= 8);
        assert!(candidates.iter().all(|c| c.ln() == 6.0 && c.qe() == 0.4));
    }

    #[test]
    fn test_window_drift_is_warned_not_dropped() {
        let spec = spec().with_ln_window(3.0, 5.0);
        let candidates = CandidateSweeper::new(&spec).evaluate(6.0, 0.4);
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0]
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::LnOutOfRange { .. })));
    }

    #[test]
    fn test_infeasible_corner_warning_is_inherited() {
        let mut spec = spec();
        spec.vin_min = 160.0;
        spec.vin_nominal = Some(400.0);
        let candidates = CandidateSweeper::new(&spec).evaluate(8.0, 0.6);
        let c = &candidates[0];
        assert!(c.is_feasible());
        assert!(c.span.is_none());
        assert!(c.warnings.contains(&Warning::NoSolution {
            corner: Corner::MinFrequency,
            target_gain: 2.4,
        }));
    }

    #[test]
    fn test_frequency_limits_at_corners() {
        let spec = spec().with_limits(OperatingLimits {
            fsw_min: Some(50e3),
            fsw_max: Some(110e3),
            zvs: None,
        });
        let c = &CandidateSweeper::new(&spec).evaluate(6.0, 0.4)[0];
        let above = c
            .warnings
            .iter()
            .filter(|w| matches!(w, Warning::FswAboveLimit { .. }))
            .count();
        assert!(above >= 1);
        assert!(c.score.limit_penalty >= 5.0);
    }

    #[test]
    fn test_zvs_startup_limit() {
        // Lm_max = 1/(3 * 80 kHz) * 100 ns / (16 * 200 pF) ~= 130 uH, Lm ~= 228 uH
        let spec = spec().with_limits(OperatingLimits {
            fsw_min: Some(80e3),
            fsw_max: None,
            zvs: Some(ZvsLimits {
                coss: 200e-12,
                deadtime: 100e-9,
            }),
        });
        let c = &CandidateSweeper::new(&spec).evaluate(8.0, 0.6)[0];
        assert!(c
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::ZvsStartup { .. })));
    }
}
