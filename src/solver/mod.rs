//! Operating point solver.
//!
//! This module turns a realised tank and a line/load condition into an
//! operating point.
//!
//! ## Flow
//!
//! ```text
//! (Vin, Pout) -> G_req = 2 n Vout / Vin
//!             -> RootFinder: M(fN, Ln, Qe_load) = G_req
//!             -> fsw = fN * fR
//!             -> StressCalculator (AC RMS view, peak-with-bias view)
//! ```
//!
//! The load-referred quality factor scales with output power,
//! Qe_load = Qe * Pout / Pout_rated, so light-load corners see a flatter
//! gain curve.
//!
//! A required gain that the tank cannot reach is not an error: the root
//! finder returns [`NoSolution`] and the operating point is marked
//! infeasible, so the sweep can continue and rank the candidate as a
//! near-miss.

mod operating_point;
mod root;
mod span;
mod stress;

pub use operating_point::{OperatingCondition, OperatingPoint, OperatingPointSolver, SolvedPoint};
pub use root::{solve_fn, NoSolution, RootFinder, RootMethod, RootSolution};
pub use span::{estimate_span, FrequencySpan, SpanMetrics};
pub use stress::{compute_stress, AcStress, PeakStress, Stress};

/// Default fN search bracket.
pub const DEFAULT_BRACKET: (f64, f64) = (0.3, 3.0);

/// Maximum Brent iterations per root.
pub const MAX_ITERATIONS: usize = 100;

/// Bracket width at which Brent's method stops.
pub const CONVERGENCE_TOLERANCE: f64 = 1e-12;

/// Number of samples in the fallback scan.
pub const SCAN_SAMPLES: usize = 300;

/// Largest gain residual accepted from the fallback scan.
pub const MAX_GAIN_ERROR: f64 = 0.02;

/// Required gains this close to unity are solved at resonance.
pub const RESONANCE_SNAP: f64 = 0.01;

/// Range of fN considered typical for a well-behaved design.
pub const TYPICAL_FN_RANGE: (f64, f64) = (0.5, 2.5);

/// Gain the tank must deliver for `vout` at `vin` with turns ratio `n`.
pub fn required_gain(vin: f64, vout: f64, n: f64) -> f64 {
    2.0 * n * vout / vin
}
