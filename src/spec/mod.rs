//! Design specification and sweep configuration.
//!
//! A [`DesignSpec`] is the only input to a sweep. It holds the converter
//! ratings, the Ln/Qe search grid, the preferred Ln/Qe windows used for
//! soft-constraint penalties, and the scoring/span configuration. All
//! thresholds live on the value itself rather than in process-wide state.

mod types;
mod validate;

pub use types::*;
pub use validate::validate_spec;

/// Span ratio tolerated before the span penalty applies.
pub const DEFAULT_SPAN_RATIO_ALLOWED: f64 = 1.6;

/// Fraction of rated power at the max-frequency corner.
pub const DEFAULT_LIGHT_LOAD_FRACTION: f64 = 0.20;

/// Default inductor rounding step (1 uH).
pub const DEFAULT_INDUCTANCE_STEP: f64 = 1.0e-6;

/// Default capacitor rounding step (1 nF).
pub const DEFAULT_CAPACITANCE_STEP: f64 = 1.0e-9;

/// Relative drift allowed outside a preferred window before warning.
pub const WINDOW_TOLERANCE: f64 = 0.01;

/// Largest number of values one sweep axis may produce.
pub const MAX_RANGE_POINTS: usize = 10_000;

/// Largest number of (Ln, Qe) pairs in one sweep.
pub const MAX_GRID_POINTS: usize = 1_000_000;
