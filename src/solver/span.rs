//! Switching frequency span across the line/load corners.
//!
//! The span is bounded by two fixed corners:
//! - min-frequency: Vin_min at rated power
//! - max-frequency: Vin_max at the light-load floor
//!
//! Below the light-load floor controllers typically leave continuous
//! switching for burst mode, so no lighter corner is evaluated.

use serde::Serialize;

use crate::spec::DesignSpec;
use crate::tank::Tank;

use super::operating_point::{OperatingCondition, OperatingPoint, OperatingPointSolver};

/// Span metrics of a candidate with both corners solved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpanMetrics {
    pub fsw_min_corner: f64,
    pub fsw_max_corner: f64,
    /// fsw_max_corner / fsw_min_corner
    pub span_ratio: f64,
    /// (fsw_max_corner - fsw_min_corner) in kHz
    pub span_khz: f64,
}

impl SpanMetrics {
    pub fn from_corners(fsw_min_corner: f64, fsw_max_corner: f64) -> Self {
        Self {
            fsw_min_corner,
            fsw_max_corner,
            span_ratio: fsw_max_corner / fsw_min_corner,
            span_khz: (fsw_max_corner - fsw_min_corner) / 1000.0,
        }
    }

    /// Whether the corners are ordered as monotonic gain implies.
    pub fn is_monotonic(&self) -> bool {
        self.fsw_max_corner >= self.fsw_min_corner
    }
}

/// Both corner operating points and the derived span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencySpan {
    pub min_corner: OperatingPoint,
    pub max_corner: OperatingPoint,
    /// `None` when either corner is infeasible
    pub metrics: Option<SpanMetrics>,
}

/// Solve both corners of `tank` and derive the span.
pub fn estimate_span(
    solver: &OperatingPointSolver,
    spec: &DesignSpec,
    tank: &Tank,
) -> FrequencySpan {
    let min_corner = solver.solve(spec, tank, OperatingCondition::min_frequency(spec));
    let max_corner = solver.solve(spec, tank, OperatingCondition::max_frequency(spec));

    let metrics = match (min_corner.fsw(), max_corner.fsw()) {
        (Some(lo), Some(hi)) => Some(SpanMetrics::from_corners(lo, hi)),
        _ => None,
    };

    FrequencySpan {
        min_corner,
        max_corner,
        metrics,
    }
}
