//! Cost function.
//!
//! ```text
//! base          = w1 ILR_rms / I_ref + w2 VCr_peak / V_ref + w3 |fN - 1| + 10 warnings
//! span_penalty  = w_span max(0, span_ratio - span_ratio_allowed)
//! limit_penalty = 5 per absolute frequency limit violated at a corner
//! total         = base + span_penalty + limit_penalty
//! ```
//!
//! A candidate whose nominal point has no solution gets the infeasible
//! penalty in place of the three stress terms. An undefined span is charged
//! the configured undefined-span penalty rather than zero, raised after the
//! sweep to the worst span penalty any analyzable candidate received.

use serde::Serialize;

use crate::spec::{DesignSpec, ScoreWeights, SpanConfig};

use super::candidate::{Candidate, SolvedDesign};

/// Score breakdown of a candidate. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Score {
    pub base: f64,
    pub span_penalty: f64,
    pub limit_penalty: f64,
    pub total: f64,
    pub warning_count: usize,
}

/// Scores solved designs against one spec.
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine {
    weights: ScoreWeights,
    span: SpanConfig,
    i_ref: f64,
    v_ref: f64,
}

impl ScoringEngine {
    /// Engine with the weights and normalization constants of `spec`.
    pub fn new(spec: &DesignSpec) -> Self {
        Self {
            weights: spec.weights,
            span: spec.span,
            i_ref: spec.i_ref(),
            v_ref: spec.v_ref(),
        }
    }

    pub fn i_ref(&self) -> f64 {
        self.i_ref
    }

    pub fn v_ref(&self) -> f64 {
        self.v_ref
    }

    pub fn score(&self, design: &SolvedDesign) -> Score {
        let w = &self.weights;
        let warning_count = design.warnings.len();
        let warning_term = w.warning_penalty * warning_count as f64;

        let base = match design.nominal.solved() {
            Some(point) => {
                w.w_ilr * point.stress.ac.ilr_rms / self.i_ref
                    + w.w_vcr * point.stress.peak.vcr_peak / self.v_ref
                    + w.w_fn * (point.f_n - 1.0).abs()
                    + warning_term
            }
            None => w.infeasible_penalty + warning_term,
        };

        let span_penalty = match design.span {
            Some(metrics) => {
                w.w_span * (metrics.span_ratio - self.span.span_ratio_allowed).max(0.0)
            }
            None => self.span.max_penalty(w.w_span),
        };

        let violations = design
            .warnings
            .iter()
            .filter(|w| w.is_corner_limit())
            .count();
        let limit_penalty = w.limit_penalty * violations as f64;

        Score {
            base,
            span_penalty,
            limit_penalty,
            total: base + span_penalty + limit_penalty,
            warning_count,
        }
    }
}

/// Raise the span penalty of candidates without span metrics to the worst
/// penalty among candidates that have them, keeping `total` in step.
pub fn raise_undefined_span_penalty(candidates: &mut [Candidate]) {
    let worst = candidates
        .iter()
        .filter(|c| c.span.is_some())
        .map(|c| c.score.span_penalty)
        .fold(f64::NEG_INFINITY, f64::max);
    if !worst.is_finite() {
        return;
    }

    let mut raised = 0usize;
    for c in candidates.iter_mut().filter(|c| c.span.is_none()) {
        if c.score.span_penalty < worst {
            c.score.span_penalty = worst;
            c.score.total = c.score.base + worst + c.score.limit_penalty;
            raised += 1;
        }
    }
    if raised > 0 {
        tracing::debug!(raised, span_penalty = worst, "raised undefined span penalties");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{estimate_span, OperatingCondition, OperatingPointSolver};
    use crate::spec::SweepRange;
    use crate::tank::{IdealTank, Tank};
    use crate::warning::{Corner, Warning};
    use approx::assert_relative_eq;

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

    fn solved(spec: &DesignSpec, ln: f64, qe: f64) -> SolvedDesign {
        let ideal = IdealTank::design(spec.vout, spec.pout_rated, spec.turns_ratio, spec.fr_target, ln, qe);
        let tank = Tank::realise(ln, qe, ideal.lr, ideal.cr, ideal.lm, ideal.re);
        let solver = OperatingPointSolver::default();
        let nominal = solver.solve(spec, &tank, OperatingCondition::nominal(spec));
        let span = estimate_span(&solver, spec, &tank);
        let mut warnings = nominal.warnings.clone();
        warnings.extend(span.min_corner.warnings.iter().cloned());
        warnings.extend(span.max_corner.warnings.iter().cloned());
        SolvedDesign {
            tank,
            nominal,
            min_corner: span.min_corner,
            max_corner: span.max_corner,
            span: span.metrics,
            warnings,
        }
    }

    #[test]
    fn test_base_score_terms() {
        let spec = spec();
        let design = solved(&spec, 6.0, 0.4);
        let engine = ScoringEngine::new(&spec);
        let score = engine.score(&design);

        let p = design.nominal.solved().unwrap();
        let expected = p.stress.ac.ilr_rms / engine.i_ref()
            + p.stress.peak.vcr_peak / engine.v_ref()
            + 0.2 * (p.f_n - 1.0).abs();
        assert_eq!(score.warning_count, 0);
        assert_relative_eq!(score.base, expected, epsilon = 1e-12);
        assert_relative_eq!(score.limit_penalty, 0.0);
        assert_relative_eq!(
            score.total,
            score.base + score.span_penalty + score.limit_penalty,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_default_normalization() {
        let engine = ScoringEngine::new(&spec());
        // pi * (1000 / 48) / (2 sqrt 2 * 4)
        assert_relative_eq!(engine.i_ref(), 5.785, epsilon = 1e-3);
        assert_relative_eq!(engine.v_ref(), 400.0);
    }

    #[test]
    fn test_each_warning_adds_fixed_penalty() {
        let spec = spec();
        let engine = ScoringEngine::new(&spec);
        let mut design = solved(&spec, 6.0, 0.4);
        let before = engine.score(&design);

        design.warnings.push(Warning::HighSpan {
            ratio: 2.1,
            threshold: 2.0,
        });
        let after = engine.score(&design);

        assert_eq!(after.warning_count, before.warning_count + 1);
        assert_relative_eq!(after.base - before.base, 10.0, epsilon = 1e-9);
        assert_relative_eq!(after.span_penalty, before.span_penalty);
    }

    #[test]
    fn test_span_penalty_above_allowed_ratio() {
        let spec = spec().with_span(SpanConfig {
            span_ratio_allowed: 1.2,
            ..SpanConfig::default()
        });
        let design = solved(&spec, 6.0, 0.4);
        let ratio = design.span.unwrap().span_ratio;
        let score = ScoringEngine::new(&spec).score(&design);
        assert_relative_eq!(score.span_penalty, 0.6 * (ratio - 1.2), epsilon = 1e-12);
    }

    #[test]
    fn test_undefined_span_takes_configured_penalty() {
        let spec = spec();
        let mut design = solved(&spec, 6.0, 0.4);
        design.span = None;
        let score = ScoringEngine::new(&spec).score(&design);
        assert_relative_eq!(score.span_penalty, 0.6 * (5.0 - 1.6), epsilon = 1e-12);
    }

    #[test]
    fn test_corner_limit_adds_limit_penalty() {
        let spec = spec();
        let engine = ScoringEngine::new(&spec);
        let mut design = solved(&spec, 6.0, 0.4);
        design.warnings.push(Warning::FswAboveLimit {
            corner: Corner::MaxFrequency,
            fsw: 150e3,
            limit: 120e3,
        });
        design.warnings.push(Warning::FswBelowLimit {
            corner: Corner::Nominal,
            fsw: 80e3,
            limit: 90e3,
        });
        let score = engine.score(&design);
        assert_relative_eq!(score.limit_penalty, 5.0);
        assert_eq!(score.warning_count, 2);
    }

    #[test]
    fn test_infeasible_nominal_uses_infeasible_penalty() {
        let mut spec = spec();
        spec.vin_nominal = Some(160.0);
        let design = solved(&spec, 8.0, 0.6);
        assert!(!design.nominal.is_feasible());
        let score = ScoringEngine::new(&spec).score(&design);
        assert!(score.base >= 1.0e6);
        assert!(score.total.is_finite());
    }

    fn candidate(spec: &DesignSpec, ln: f64, qe: f64, span_penalty: f64, defined: bool) -> Candidate {
        let mut design = solved(spec, ln, qe);
        if !defined {
            design.span = None;
        }
        let mut score = ScoringEngine::new(spec).score(&design);
        score.span_penalty = span_penalty;
        score.total = score.base + span_penalty + score.limit_penalty;
        design.into_candidate(score)
    }

    #[test]
    fn test_undefined_span_raised_to_worst_observed() {
        let spec = spec();
        let mut candidates = vec![
            candidate(&spec, 6.0, 0.4, 1.0, true),
            candidate(&spec, 5.0, 0.3, 3.5, true),
            candidate(&spec, 4.0, 0.5, 2.04, false),
        ];
        raise_undefined_span_penalty(&mut candidates);

        let undefined = &candidates[2].score;
        assert_relative_eq!(undefined.span_penalty, 3.5);
        assert_relative_eq!(
            undefined.total,
            undefined.base + 3.5 + undefined.limit_penalty,
            epsilon = 1e-12
        );
        assert_relative_eq!(candidates[0].score.span_penalty, 1.0);
    }

    #[test]
    fn test_undefined_span_keeps_configured_floor() {
        let spec = spec();
        let mut candidates = vec![
            candidate(&spec, 6.0, 0.4, 0.2, true),
            candidate(&spec, 4.0, 0.5, 2.04, false),
        ];
        raise_undefined_span_penalty(&mut candidates);
        assert_relative_eq!(candidates[1].score.span_penalty, 2.04);
    }

    #[test]
    fn test_no_defined_spans_leaves_scores() {
        let spec = spec();
        let mut candidates = vec![candidate(&spec, 4.0, 0.5, 2.04, false)];
        let before = candidates[0].score;
        raise_undefined_span_penalty(&mut candidates);
        assert_eq!(candidates[0].score, before);
    }
}
