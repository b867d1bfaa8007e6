//! # LLC Sweep
//!
//! Resonant tank design sweep for half-bridge LLC converters.
//!
//! This library provides:
//! - A first-harmonic (FHA) gain model of the Lr-Cr-Lm tank
//! - A robust fN root finder (Brent's method with a scan fallback)
//! - Operating point, stress and switching frequency span evaluation
//! - A cost function and deterministic ranking over an (Ln, Qe) grid
//!
//! ## Architecture
//!
//! - [`spec`] - Design spec, sweep ranges, weights and validation
//! - [`tank`] - Gain model and tank component design
//! - [`solver`] - Root finding, operating points, stress and span
//! - [`sweep`] - Candidate generation, scoring and ranking
//! - [`warning`] - Soft-constraint warnings carried by candidates
//!
//! ## Usage
//!
//! ### Library
//!
//! ```no_run
//! use llc_sweep::{run_sweep, DesignSpec, SweepRange};
//!
//! let spec = DesignSpec::new(
//!     380.0, 420.0, 48.0, 1000.0, 100e3, 4.0,
//!     SweepRange::stepped(3.0, 8.0, 0.5),
//!     SweepRange::points(0.2, 0.6, 9),
//! );
//! let report = run_sweep(&spec)?;
//! for c in report.diverse_top(5) {
//!     println!("Ln {:.1} Qe {:.2} score {:.3}", c.ln(), c.qe(), c.score.total);
//! }
//! # Ok::<(), llc_sweep::LlcError>(())
//! ```
//!
//! ### Native CLI
//!
//! ```bash
//! llc-sweep --vin-min 380 --vin-max 420 --vout 48 --pout 1000 --fr 100e3 --top 5
//! llc-sweep --spec design.json --json > ranked.json
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmSweeper } from 'llc_sweep';
//!
//! const ranked = JSON.parse(new WasmSweeper().sweep(specJson));
//! ```
//!
//! ## Method
//!
//! For each (Ln, Qe) grid point:
//!
//! 1. Design Lr, Cr and Lm for the rated load and round them to real parts
//! 2. Solve fN at the nominal point and at the min/max frequency corners
//! 3. Compute stress at the nominal point and the span between corners
//! 4. Score; every warning adds a fixed penalty instead of removing the design
//!
//! Candidates are then sorted by total score with deterministic tie-breaks.

pub mod error;
pub mod solver;
pub mod spec;
pub mod sweep;
pub mod tank;
pub mod warning;

use std::path::Path;

// Re-export main types for convenience
pub use error::{LlcError, Result};
pub use spec::{validate_spec, DesignSpec, SweepRange};
pub use sweep::{run_sweep, run_sweep_with, Candidate, MagneticsRequest, SweepReport};
pub use warning::{Corner, Warning};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmSweeper;

/// Load a design spec from a JSON file.
pub fn load_spec(path: impl AsRef<Path>) -> Result<DesignSpec> {
    let path = path.as_ref();
    let input = std::fs::read_to_string(path).map_err(|source| LlcError::SpecReadError {
        path: path.display().to_string(),
        source,
    })?;
    DesignSpec::from_json(&input)
}
