//! Soft-constraint warnings attached to operating points and candidates.
//!
//! Every warning adds a fixed penalty to a candidate's score instead of
//! removing it, so near-miss designs stay visible in the ranking.

use std::fmt;

use serde::Serialize;

/// A line/load condition the tank is evaluated at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    /// Nominal input voltage, rated power.
    Nominal,
    /// Minimum input voltage, rated power (lowest switching frequency).
    MinFrequency,
    /// Maximum input voltage, light load (highest switching frequency).
    MaxFrequency,
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Corner::Nominal => write!(f, "nominal"),
            Corner::MinFrequency => write!(f, "min-frequency corner"),
            Corner::MaxFrequency => write!(f, "max-frequency corner"),
        }
    }
}

/// A soft-constraint violation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// No fN reaches the required gain at a corner
    NoSolution { corner: Corner, target_gain: f64 },
    /// Realised Ln drifted outside the preferred window
    LnOutOfRange { value: f64, min: f64, max: f64 },
    /// Realised Qe drifted outside the preferred window
    QeOutOfRange { value: f64, min: f64, max: f64 },
    /// Nominal fN outside the typical operating range
    FnOutsideTypical { f_n: f64, min: f64, max: f64 },
    /// Corner frequencies are inverted
    NonMonotonicCorners { fsw_min_corner: f64, fsw_max_corner: f64 },
    /// Switching frequency span above the warning threshold
    HighSpan { ratio: f64, threshold: f64 },
    /// Switching frequency below the absolute limit
    FswBelowLimit { corner: Corner, fsw: f64, limit: f64 },
    /// Switching frequency above the absolute limit
    FswAboveLimit { corner: Corner, fsw: f64, limit: f64 },
    /// Magnetizing inductance too large for ZVS at start-up
    ZvsStartup { lm: f64, lm_max: f64 },
}

impl Warning {
    /// Whether this warning also carries the absolute-limit penalty.
    pub fn is_corner_limit(&self) -> bool {
        matches!(
            self,
            Warning::FswBelowLimit { corner, .. } | Warning::FswAboveLimit { corner, .. }
                if *corner != Corner::Nominal
        )
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::NoSolution { corner, target_gain } => {
                write!(f, "no valid fN found at {corner} (gain {target_gain:.3})")
            }
            Warning::LnOutOfRange { value, min, max } => {
                write!(f, "Ln out of range: {value:.2} not in [{min}, {max}]")
            }
            Warning::QeOutOfRange { value, min, max } => {
                write!(f, "Qe out of range: {value:.3} not in [{min}, {max}]")
            }
            Warning::FnOutsideTypical { f_n, min, max } => {
                write!(f, "fN {f_n:.2} outside typical range [{min}, {max}]")
            }
            Warning::NonMonotonicCorners {
                fsw_min_corner,
                fsw_max_corner,
            } => write!(
                f,
                "max-frequency corner {:.1} kHz below min-frequency corner {:.1} kHz",
                fsw_max_corner / 1e3,
                fsw_min_corner / 1e3
            ),
            Warning::HighSpan { ratio, .. } => write!(f, "high fsw span ({ratio:.1}x)"),
            Warning::FswBelowLimit { corner, fsw, limit } => write!(
                f,
                "fsw {:.1} kHz at {corner} below {:.0} kHz",
                fsw / 1e3,
                limit / 1e3
            ),
            Warning::FswAboveLimit { corner, fsw, limit } => write!(
                f,
                "fsw {:.1} kHz at {corner} above {:.0} kHz",
                fsw / 1e3,
                limit / 1e3
            ),
            Warning::ZvsStartup { lm, lm_max } => write!(
                f,
                "Lm {:.1} uH > Lm_max {:.1} uH: no ZVS at start-up",
                lm * 1e6,
                lm_max * 1e6
            ),
        }
    }
}
