//! Deterministic ranking of scored candidates.

use std::cmp::Ordering;

use super::candidate::Candidate;

/// Minimum Ln separation between two picks of [`diverse_top`].
pub const DIVERSE_LN_SEPARATION: f64 = 0.9;

/// Minimum Qe separation between two picks of [`diverse_top`].
pub const DIVERSE_QE_SEPARATION: f64 = 0.03;

/// Sort candidates best first.
///
/// Candidates with a solved nominal point come first whatever the weights.
/// Then ascending total score; ties broken by ILR_rms, VCr_peak, grid Ln and
/// Qe, then the realised Lr, Cr and Lm. Missing stress sorts last.
pub fn rank(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(compare);
    candidates
}

/// Total order used by [`rank`].
pub fn compare(a: &Candidate, b: &Candidate) -> Ordering {
    b.is_feasible()
        .cmp(&a.is_feasible())
        .then_with(|| a.score.total.total_cmp(&b.score.total))
        .then_with(|| or_last(a.ilr_rms()).total_cmp(&or_last(b.ilr_rms())))
        .then_with(|| or_last(a.vcr_peak()).total_cmp(&or_last(b.vcr_peak())))
        .then_with(|| a.ln().total_cmp(&b.ln()))
        .then_with(|| a.qe().total_cmp(&b.qe()))
        .then_with(|| a.tank.lr.total_cmp(&b.tank.lr))
        .then_with(|| a.tank.cr.total_cmp(&b.tank.cr))
        .then_with(|| a.tank.lm.total_cmp(&b.tank.lm))
}

fn or_last(value: Option<f64>) -> f64 {
    value.unwrap_or(f64::INFINITY)
}

/// Greedy pick of up to `n` dissimilar designs from a ranked list.
///
/// A candidate is skipped when it lies within both the Ln and the Qe
/// separation of one already picked.
pub fn diverse_top(ranked: &[Candidate], n: usize) -> Vec<&Candidate> {
    let mut picked: Vec<&Candidate> = Vec::with_capacity(n.min(ranked.len()));
    for candidate in ranked {
        if picked.len() >= n {
            break;
        }
        let crowded = picked.iter().any(|p| {
            (p.ln() - candidate.ln()).abs() < DIVERSE_LN_SEPARATION
                && (p.qe() - candidate.qe()).abs() < DIVERSE_QE_SEPARATION
        });
        if !crowded {
            picked.push(candidate);
        }
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::NoSolution;
    use crate::spec::{DesignSpec, SweepRange};
    use crate::sweep::CandidateSweeper;

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

    fn candidate(ln: f64, qe: f64) -> Candidate {
        let spec = spec();
        CandidateSweeper::new(&spec).evaluate(ln, qe).remove(0)
    }

    /// Same design with a forced total and nominal stress.
    fn with_stress(mut c: Candidate, total: f64, ilr_rms: f64, vcr_peak: f64) -> Candidate {
        c.score.total = total;
        if let Ok(point) = c.nominal.solution.as_mut() {
            point.stress.ac.ilr_rms = ilr_rms;
            point.stress.peak.vcr_peak = vcr_peak;
        }
        c
    }

    fn infeasible(mut c: Candidate, total: f64) -> Candidate {
        c.score.total = total;
        c.nominal.solution = Err(NoSolution {
            target_gain: 2.4,
            best_f_n: 0.4,
            best_residual: 0.5,
            evaluations: 300,
        });
        c
    }

    #[test]
    fn test_equal_totals_break_on_ilr_rms() {
        let base = candidate(6.0, 0.4);
        let high = with_stress(base.clone(), 2.0, 4.0, 300.0);
        let low = with_stress(base, 2.0, 3.0, 350.0);

        let ranked = rank(vec![high, low]);
        assert_eq!(ranked[0].ilr_rms(), Some(3.0));
        assert_eq!(ranked[1].ilr_rms(), Some(4.0));
    }

    #[test]
    fn test_equal_totals_and_current_break_on_vcr_peak() {
        let base = candidate(6.0, 0.4);
        let high = with_stress(base.clone(), 2.0, 3.0, 350.0);
        let low = with_stress(base, 2.0, 3.0, 300.0);

        let ranked = rank(vec![high, low]);
        assert_eq!(ranked[0].vcr_peak(), Some(300.0));
        assert_eq!(ranked[1].vcr_peak(), Some(350.0));
    }

    #[test]
    fn test_total_dominates_tie_breaks() {
        let base = candidate(6.0, 0.4);
        let cheap = with_stress(base.clone(), 1.0, 9.0, 900.0);
        let dear = with_stress(base, 2.0, 1.0, 100.0);

        let ranked = rank(vec![dear, cheap]);
        assert_eq!(ranked[0].score.total, 1.0);
    }

    #[test]
    fn test_equal_stress_breaks_on_grid_point() {
        let a = with_stress(candidate(5.0, 0.4), 2.0, 3.0, 300.0);
        let b = with_stress(candidate(4.0, 0.4), 2.0, 3.0, 300.0);

        let ranked = rank(vec![a, b]);
        assert_eq!(ranked[0].ln(), 4.0);
        assert_eq!(ranked[1].ln(), 5.0);
    }

    #[test]
    fn test_missing_stress_sorts_last() {
        let base = candidate(6.0, 0.4);
        let unsolved = infeasible(base.clone(), 2.0);
        let solved = with_stress(base, 2.0, 3.0, 300.0);

        assert!(unsolved.ilr_rms().is_none());
        let ranked = rank(vec![unsolved, solved]);
        assert!(ranked[0].is_feasible());
        assert!(!ranked[1].is_feasible());
    }

    #[test]
    fn test_infeasible_sorts_last_even_with_lower_total() {
        let base = candidate(6.0, 0.4);
        let unsolved = infeasible(base.clone(), 1.0e6);
        let solved = with_stress(base, 3.0e7, 3.0, 300.0);

        let ranked = rank(vec![unsolved, solved]);
        assert!(ranked[0].is_feasible());
        assert_eq!(compare(&ranked[1], &ranked[0]), Ordering::Greater);
    }

    #[test]
    fn test_diverse_top_with_unbounded_count() {
        let ranked = rank(vec![
            with_stress(candidate(4.0, 0.3), 1.0, 3.0, 300.0),
            with_stress(candidate(4.0, 0.3), 1.5, 3.0, 300.0),
            with_stress(candidate(6.0, 0.4), 2.0, 3.0, 300.0),
        ]);

        let top = diverse_top(&ranked, usize::MAX);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].ln(), 4.0);
        assert_eq!(top[1].ln(), 6.0);
        assert!(diverse_top(&ranked, 0).is_empty());
    }
}
