//! Candidate tank designs.

use serde::Serialize;

use crate::solver::{OperatingPoint, SpanMetrics};
use crate::tank::Tank;
use crate::warning::Warning;

use super::score::Score;

/// A fully solved, not yet scored design.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolvedDesign {
    pub tank: Tank,
    pub nominal: OperatingPoint,
    pub min_corner: OperatingPoint,
    pub max_corner: OperatingPoint,
    /// `None` when a corner is infeasible
    pub span: Option<SpanMetrics>,
    pub warnings: Vec<Warning>,
}

impl SolvedDesign {
    /// Attach a score, producing an immutable candidate.
    pub fn into_candidate(self, score: Score) -> Candidate {
        Candidate {
            tank: self.tank,
            nominal: self.nominal,
            min_corner: self.min_corner,
            max_corner: self.max_corner,
            span: self.span,
            warnings: self.warnings,
            score,
        }
    }
}

/// A scored tank design.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub tank: Tank,
    pub nominal: OperatingPoint,
    pub min_corner: OperatingPoint,
    pub max_corner: OperatingPoint,
    pub span: Option<SpanMetrics>,
    pub warnings: Vec<Warning>,
    pub score: Score,
}

impl Candidate {
    /// Grid Ln of the design point.
    pub fn ln(&self) -> f64 {
        self.tank.ln_design
    }

    /// Grid Qe of the design point.
    pub fn qe(&self) -> f64 {
        self.tank.qe_design
    }

    /// Whether the nominal point has a solution.
    pub fn is_feasible(&self) -> bool {
        self.nominal.is_feasible()
    }

    pub fn f_n(&self) -> Option<f64> {
        self.nominal.f_n()
    }

    pub fn fsw(&self) -> Option<f64> {
        self.nominal.fsw()
    }

    pub fn ilr_rms(&self) -> Option<f64> {
        self.nominal.ilr_rms()
    }

    pub fn vcr_peak(&self) -> Option<f64> {
        self.nominal.vcr_peak()
    }

    pub fn span_ratio(&self) -> Option<f64> {
        self.span.map(|s| s.span_ratio)
    }

    /// Hand-off record for an external magnetics designer.
    ///
    /// `None` when the nominal point is infeasible.
    pub fn magnetics_request(&self, turns_ratio: f64) -> Option<MagneticsRequest> {
        let point = self.nominal.solved()?;
        Some(MagneticsRequest {
            ln: self.tank.ln,
            qe: self.tank.qe,
            turns_ratio,
            lr: self.tank.lr,
            lm: self.tank.lm,
            fsw: point.fsw,
            ilr_rms: point.stress.ac.ilr_rms,
            ilm_rms: point.stress.ac.ilm_rms,
            ilm_peak: point.stress.peak.ilm_peak,
        })
    }
}

/// What a magnetics designer needs to propose a core and winding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MagneticsRequest {
    pub ln: f64,
    pub qe: f64,
    pub turns_ratio: f64,
    pub lr: f64,
    pub lm: f64,
    pub fsw: f64,
    pub ilr_rms: f64,
    pub ilm_rms: f64,
    pub ilm_peak: f64,
}
