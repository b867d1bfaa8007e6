//! Design specification types.

use std::f64::consts::{PI, SQRT_2};

use serde::{Deserialize, Serialize};

use super::{
    DEFAULT_CAPACITANCE_STEP, DEFAULT_INDUCTANCE_STEP, DEFAULT_LIGHT_LOAD_FRACTION,
    DEFAULT_SPAN_RATIO_ALLOWED,
};

/// Grid resolution for a sweep range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Fixed increment starting at `min`, never exceeding `max`.
    Step(f64),
    /// Inclusive, evenly spaced number of samples.
    Points(usize),
}

/// A one-dimensional search range for Ln or Qe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRange {
    pub min: f64,
    pub max: f64,
    pub resolution: Resolution,
}

impl SweepRange {
    /// Range sampled every `step` from `min` up to `max`.
    pub fn stepped(min: f64, max: f64, step: f64) -> Self {
        Self {
            min,
            max,
            resolution: Resolution::Step(step),
        }
    }

    /// Range sampled at `points` evenly spaced values, both ends included.
    pub fn points(min: f64, max: f64, points: usize) -> Self {
        Self {
            min,
            max,
            resolution: Resolution::Points(points),
        }
    }

    /// Grid values in ascending order.
    ///
    /// Each value is computed from its index rather than by accumulation so
    /// that repeated sweeps produce bit-identical grids.
    pub fn values(&self) -> Vec<f64> {
        match self.resolution {
            Resolution::Step(step) => (0..self.len())
                .map(|i| self.min + i as f64 * step)
                .collect(),
            Resolution::Points(0) => Vec::new(),
            Resolution::Points(1) => vec![self.min],
            Resolution::Points(n) => {
                let span = self.max - self.min;
                (0..n)
                    .map(|i| self.min + span * i as f64 / (n - 1) as f64)
                    .collect()
            }
        }
    }

    /// Number of grid values, without allocating them.
    ///
    /// Saturates at `usize::MAX` for steps too small to count.
    pub fn len(&self) -> usize {
        match self.resolution {
            Resolution::Step(step) => {
                if !(step > 0.0) || !(self.max >= self.min) {
                    return 0;
                }
                let intervals = ((self.max - self.min) / step + 1e-9).floor();
                if intervals.is_finite() && intervals < (usize::MAX / 2) as f64 {
                    intervals as usize + 1
                } else {
                    usize::MAX
                }
            }
            Resolution::Points(n) => n,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The range bounds as an acceptable window.
    pub fn window(&self) -> Window {
        Window::new(self.min, self.max)
    }
}

/// The user's preferred window for a design variable.
///
/// Values outside the window are kept but penalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub min: f64,
    pub max: f64,
}

impl Window {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Check membership allowing a relative drift of `tolerance` on each side.
    pub fn contains_within(&self, value: f64, tolerance: f64) -> bool {
        value >= self.min * (1.0 - tolerance) && value <= self.max * (1.0 + tolerance)
    }
}

/// How ideal tank components are mapped onto purchasable values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ComponentRounding {
    /// Use the computed components as-is.
    Ideal,
    /// Snap each component to its nearest step (one tank per grid pair).
    Nearest {
        inductance_step: f64,
        capacitance_step: f64,
    },
    /// Try every floor/ceil combination of Lr, Cr and Lm.
    Neighbors {
        inductance_step: f64,
        capacitance_step: f64,
    },
}

impl Default for ComponentRounding {
    fn default() -> Self {
        Self::Nearest {
            inductance_step: DEFAULT_INDUCTANCE_STEP,
            capacitance_step: DEFAULT_CAPACITANCE_STEP,
        }
    }
}

/// Weights and normalization constants of the cost function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Weight on normalized resonant inductor RMS current (w1).
    pub w_ilr: f64,
    /// Weight on normalized resonant capacitor peak voltage (w2).
    pub w_vcr: f64,
    /// Weight on distance from resonance |fN - 1| (w3).
    pub w_fn: f64,
    /// Weight on the excess frequency span ratio.
    pub w_span: f64,
    /// Additive penalty per warning.
    pub warning_penalty: f64,
    /// Additive penalty per violated absolute frequency limit.
    pub limit_penalty: f64,
    /// Additive penalty for a candidate whose nominal point has no solution.
    pub infeasible_penalty: f64,
    /// Current normalization; defaults to the rated primary load current.
    pub i_ref: Option<f64>,
    /// Voltage normalization; defaults to the nominal input voltage.
    pub v_ref: Option<f64>,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            w_ilr: 1.0,
            w_vcr: 1.0,
            w_fn: 0.2,
            w_span: 0.6,
            warning_penalty: 10.0,
            limit_penalty: 5.0,
            infeasible_penalty: 1.0e6,
            i_ref: None,
            v_ref: None,
        }
    }
}

/// Frequency span corner configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanConfig {
    /// Span ratio tolerated before the span penalty applies.
    pub span_ratio_allowed: f64,
    /// Fraction of rated power at the max-frequency corner.
    ///
    /// Below this load most controllers enter burst mode, so no lighter
    /// corner is evaluated.
    pub light_load_fraction: f64,
    /// Ratio assumed when a corner is unsolvable.
    ///
    /// Sets the floor of the undefined-span penalty; a sweep raises it to the
    /// worst penalty among analyzable candidates when that is larger.
    pub undefined_span_ratio: f64,
    /// Span ratio above which a warning is attached.
    pub high_span_warning: f64,
}

impl Default for SpanConfig {
    fn default() -> Self {
        Self {
            span_ratio_allowed: DEFAULT_SPAN_RATIO_ALLOWED,
            light_load_fraction: DEFAULT_LIGHT_LOAD_FRACTION,
            undefined_span_ratio: 5.0,
            high_span_warning: 2.0,
        }
    }
}

impl SpanConfig {
    /// Configured penalty for undefined span metrics, before raising it to
    /// the worst observed span penalty.
    pub fn max_penalty(&self, w_span: f64) -> f64 {
        w_span * (self.undefined_span_ratio - self.span_ratio_allowed).max(0.0)
    }
}

/// Switch parameters used for the ZVS start-up check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZvsLimits {
    /// MOSFET output capacitance (F).
    pub coss: f64,
    /// Maximum dead time (s).
    pub deadtime: f64,
}

/// Optional absolute operating limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingLimits {
    /// Lowest acceptable switching frequency (Hz).
    pub fsw_min: Option<f64>,
    /// Highest acceptable switching frequency (Hz).
    pub fsw_max: Option<f64>,
    /// Start-up ZVS check; requires `fsw_min`.
    pub zvs: Option<ZvsLimits>,
}

/// Immutable input to a sweep.
///
/// Units: volts, watts, hertz, henries, farads, seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSpec {
    pub vin_min: f64,
    pub vin_max: f64,
    /// Nominal input voltage; the midpoint of the input range when absent.
    #[serde(default)]
    pub vin_nominal: Option<f64>,
    pub vout: f64,
    pub pout_rated: f64,
    /// Target resonant frequency before component rounding.
    pub fr_target: f64,
    /// Transformer turns ratio n = Np / Ns.
    pub turns_ratio: f64,
    pub ln_range: SweepRange,
    pub qe_range: SweepRange,
    #[serde(default)]
    pub ln_window: Option<Window>,
    #[serde(default)]
    pub qe_window: Option<Window>,
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(default)]
    pub span: SpanConfig,
    #[serde(default)]
    pub rounding: ComponentRounding,
    #[serde(default)]
    pub limits: OperatingLimits,
}

impl DesignSpec {
    /// Create a spec with default weights, thresholds and rounding.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        vin_min: f64,
        vin_max: f64,
        vout: f64,
        pout_rated: f64,
        fr_target: f64,
        turns_ratio: f64,
        ln_range: SweepRange,
        qe_range: SweepRange,
    ) -> Self {
        Self {
            vin_min,
            vin_max,
            vin_nominal: None,
            vout,
            pout_rated,
            fr_target,
            turns_ratio,
            ln_range,
            qe_range,
            ln_window: None,
            qe_window: None,
            weights: ScoreWeights::default(),
            span: SpanConfig::default(),
            rounding: ComponentRounding::default(),
            limits: OperatingLimits::default(),
        }
    }

    /// Set the nominal input voltage.
    pub fn with_vin_nominal(mut self, vin: f64) -> Self {
        self.vin_nominal = Some(vin);
        self
    }

    /// Set the preferred Ln window.
    pub fn with_ln_window(mut self, min: f64, max: f64) -> Self {
        self.ln_window = Some(Window::new(min, max));
        self
    }

    /// Set the preferred Qe window.
    pub fn with_qe_window(mut self, min: f64, max: f64) -> Self {
        self.qe_window = Some(Window::new(min, max));
        self
    }

    /// Replace the cost function weights.
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Replace the frequency span configuration.
    pub fn with_span(mut self, span: SpanConfig) -> Self {
        self.span = span;
        self
    }

    /// Set the component rounding mode.
    pub fn with_rounding(mut self, rounding: ComponentRounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Set absolute operating limits.
    pub fn with_limits(mut self, limits: OperatingLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Input voltage of the nominal design point.
    pub fn nominal_vin(&self) -> f64 {
        self.vin_nominal
            .unwrap_or(0.5 * (self.vin_min + self.vin_max))
    }

    /// Acceptable Ln window (the search range unless overridden).
    pub fn ln_window(&self) -> Window {
        self.ln_window.unwrap_or_else(|| self.ln_range.window())
    }

    /// Acceptable Qe window (the search range unless overridden).
    pub fn qe_window(&self) -> Window {
        self.qe_window.unwrap_or_else(|| self.qe_range.window())
    }

    /// Rated output current.
    pub fn iout_rated(&self) -> f64 {
        self.pout_rated / self.vout
    }

    /// Current normalization for the ILR term.
    pub fn i_ref(&self) -> f64 {
        self.weights
            .i_ref
            .unwrap_or_else(|| PI * self.iout_rated() / (2.0 * SQRT_2 * self.turns_ratio))
    }

    /// Voltage normalization for the VCr term.
    pub fn v_ref(&self) -> f64 {
        self.weights.v_ref.unwrap_or_else(|| self.nominal_vin())
    }

    /// Decode a spec from a JSON document.
    pub fn from_json(input: &str) -> crate::Result<Self> {
        serde_json::from_str(input).map_err(|e| crate::LlcError::SpecParseError {
            message: e.to_string(),
        })
    }
}
