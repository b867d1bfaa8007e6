//! Electrical stress at an operating point.
//!
//! Two views are kept apart:
//! - [`AcStress`]: first-harmonic RMS quantities without DC bias, used for
//!   conduction-loss scoring.
//! - [`PeakStress`]: peak values for component ratings, including the Vin/2
//!   DC bias the half-bridge puts on the resonant capacitor.
//!
//! ```text
//! ILm_pk  = n Vout / (4 fsw Lm)          ILm_rms = ILm_pk / sqrt 2
//! I_load  = pi Iout / (2 sqrt 2 n)       ILr_rms = sqrt(ILm_rms^2 + I_load^2)
//! VCr_rms = ILr_rms / (2 pi fsw Cr)      VCr_pk  = Vin / 2 + sqrt 2 VCr_rms
//! ```

use std::f64::consts::{PI, SQRT_2};

use serde::Serialize;

/// AC RMS stress (no DC bias).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AcStress {
    /// Magnetizing current RMS
    pub ilm_rms: f64,
    /// Resonant inductor (primary) current RMS
    pub ilr_rms: f64,
    /// Resonant capacitor AC voltage RMS
    pub vcr_rms: f64,
    /// Primary switch current RMS
    pub iq_rms: f64,
    /// Secondary rectifier current RMS
    pub id_rms: f64,
}

/// Peak stress for component ratings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeakStress {
    pub ilm_peak: f64,
    pub ilr_peak: f64,
    /// Resonant capacitor peak voltage including the Vin/2 bias
    pub vcr_peak: f64,
    pub iq_peak: f64,
    pub id_peak: f64,
}

/// Both stress views at one operating point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stress {
    pub ac: AcStress,
    pub peak: PeakStress,
}

/// Compute tank stress at switching frequency `fsw`.
pub fn compute_stress(
    vin: f64,
    vout: f64,
    pout: f64,
    n: f64,
    lm: f64,
    cr: f64,
    fsw: f64,
) -> Stress {
    let iout = pout / vout;

    let ilm_peak = n * vout / (4.0 * fsw * lm);
    let ilm_rms = ilm_peak / SQRT_2;

    // Fundamental of the reflected square-wave load current
    let i_load = PI * iout / (2.0 * SQRT_2 * n);
    let ilr_rms = (ilm_rms * ilm_rms + i_load * i_load).sqrt();
    let ilr_peak = SQRT_2 * ilr_rms;

    let vcr_rms = ilr_rms / (2.0 * PI * fsw * cr);
    let vcr_peak = 0.5 * vin + SQRT_2 * vcr_rms;

    let id_peak = PI * iout / 2.0;
    let id_rms = id_peak / 2.0;

    Stress {
        ac: AcStress {
            ilm_rms,
            ilr_rms,
            vcr_rms,
            iq_rms: ilr_rms / SQRT_2,
            id_rms,
        },
        peak: PeakStress {
            ilm_peak,
            ilr_peak,
            vcr_peak,
            iq_peak: ilr_peak,
            id_peak,
        },
    }
}
