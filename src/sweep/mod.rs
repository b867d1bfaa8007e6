//! Candidate sweep, scoring and ranking.
//!
//! Every (Ln, Qe) grid point becomes at least one [`Candidate`]. Candidates
//! are never filtered: infeasible and heavily warned designs stay in the
//! report and sort to the bottom through their penalty terms.

mod candidate;
mod ranking;
mod score;
mod sweeper;

pub use candidate::{Candidate, MagneticsRequest, SolvedDesign};
pub use ranking::{compare, diverse_top, rank, DIVERSE_LN_SEPARATION, DIVERSE_QE_SEPARATION};
pub use score::{raise_undefined_span_penalty, Score, ScoringEngine};
pub use sweeper::CandidateSweeper;

use serde::Serialize;

use crate::error::{LlcError, Result};
use crate::solver::OperatingPointSolver;
use crate::spec::{validate_spec, DesignSpec};

/// Ranked result of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepReport {
    /// All candidates, best first
    pub candidates: Vec<Candidate>,
    pub feasible_count: usize,
    pub total_count: usize,
}

impl SweepReport {
    /// Best-ranked candidate.
    pub fn best(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    /// Up to `n` dissimilar designs from the top of the ranking.
    pub fn diverse_top(&self, n: usize) -> Vec<&Candidate> {
        diverse_top(&self.candidates, n)
    }

    /// Encode the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| LlcError::SerializeError {
            message: e.to_string(),
        })
    }
}

/// Validate `spec`, sweep its grid and rank the candidates.
pub fn run_sweep(spec: &DesignSpec) -> Result<SweepReport> {
    run_sweep_with(spec, OperatingPointSolver::default())
}

/// [`run_sweep`] with a custom operating point solver.
pub fn run_sweep_with(spec: &DesignSpec, solver: OperatingPointSolver) -> Result<SweepReport> {
    validate_spec(spec)?;

    let sweeper = CandidateSweeper::new(spec).with_solver(solver);
    let grid = sweeper.grid();
    if grid.is_empty() {
        return Err(LlcError::EmptySweep);
    }

    tracing::info!(
        grid_points = grid.len(),
        ln_min = spec.ln_range.min,
        ln_max = spec.ln_range.max,
        qe_min = spec.qe_range.min,
        qe_max = spec.qe_range.max,
        "sweeping resonant tank designs"
    );

    let mut candidates = sweeper.evaluate_grid(&grid);
    raise_undefined_span_penalty(&mut candidates);
    let candidates = rank(candidates);
    let total_count = candidates.len();
    let feasible_count = candidates.iter().filter(|c| c.is_feasible()).count();

    if feasible_count == 0 {
        tracing::warn!(total_count, "no candidate reaches the nominal gain");
    }
    if let Some(best) = candidates.first() {
        tracing::info!(
            total_count,
            feasible_count,
            best_ln = best.ln(),
            best_qe = best.qe(),
            best_score = best.score.total,
            "sweep complete"
        );
    }

    Ok(SweepReport {
        candidates,
        feasible_count,
        total_count,
    })
}
