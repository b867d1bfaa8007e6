//! WASM bindings for LLC Sweep.
//!
//! This module exposes the sweep to JavaScript. Specs and results cross the
//! boundary as JSON strings.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmSweeper } from 'llc_sweep';
//!
//! await init();
//!
//! const spec = {
//!   vin_min: 380, vin_max: 420, vout: 48, pout_rated: 1000,
//!   fr_target: 100e3, turns_ratio: 4,
//!   ln_range: { min: 3, max: 8, resolution: { step: 0.5 } },
//!   qe_range: { min: 0.2, max: 0.6, resolution: { points: 9 } },
//! };
//!
//! const sweeper = new WasmSweeper();
//! const report = JSON.parse(sweeper.sweep(JSON.stringify(spec)));
//! const shortlist = JSON.parse(sweeper.top(JSON.stringify(spec), 5));
//! ```

use wasm_bindgen::prelude::*;

use crate::error::LlcError;
use crate::solver::{OperatingPointSolver, RootFinder};
use crate::spec::DesignSpec;
use crate::sweep::run_sweep_with;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(e: LlcError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-compatible tank design sweeper.
#[wasm_bindgen]
pub struct WasmSweeper {
    solver: OperatingPointSolver,
}

#[wasm_bindgen]
impl WasmSweeper {
    /// Create a sweeper with the default root finder budget.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmSweeper {
        WasmSweeper {
            solver: OperatingPointSolver::default(),
        }
    }

    /// Create a sweeper with a custom fallback scan.
    ///
    /// # Arguments
    /// * `scan_samples` - Samples in the fallback scan (default: 300)
    /// * `max_residual` - Largest accepted gain residual (default: 0.02)
    #[wasm_bindgen]
    pub fn with_config(scan_samples: usize, max_residual: f64) -> WasmSweeper {
        let root_finder = RootFinder::new()
            .with_scan_samples(scan_samples)
            .with_max_residual(max_residual);
        WasmSweeper {
            solver: OperatingPointSolver::new(root_finder),
        }
    }

    /// Run a full sweep.
    ///
    /// # Arguments
    /// * `spec_json` - A design spec as JSON
    ///
    /// # Returns
    /// The ranked report as JSON, or an error message for an invalid spec.
    #[wasm_bindgen]
    pub fn sweep(&self, spec_json: &str) -> Result<String, JsValue> {
        let spec = DesignSpec::from_json(spec_json).map_err(to_js)?;
        let report = run_sweep_with(&spec, self.solver.clone()).map_err(to_js)?;
        report.to_json().map_err(to_js)
    }

    /// Run a sweep and return up to `n` dissimilar top designs as JSON.
    #[wasm_bindgen]
    pub fn top(&self, spec_json: &str, n: usize) -> Result<String, JsValue> {
        let spec = DesignSpec::from_json(spec_json).map_err(to_js)?;
        let report = run_sweep_with(&spec, self.solver.clone()).map_err(to_js)?;
        serde_json::to_string(&report.diverse_top(n))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Default for WasmSweeper {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
