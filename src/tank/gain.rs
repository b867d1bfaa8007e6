//! First-harmonic gain model of the half-bridge LLC tank.
//!
//! With the tank normalized to its characteristic impedance Zo = sqrt(Lr/Cr),
//! the series branch is j(fN - 1/fN), the magnetizing branch is j*Ln*fN and
//! the reflected load is 1/Qe. The voltage gain seen by the rectifier is
//!
//! ```text
//! M(fN) = 1 / sqrt( (1 + (1 - 1/fN^2) / Ln)^2 + Qe^2 * (fN - 1/fN)^2 )
//! ```
//!
//! M(1) = 1 for every Ln and Qe. Below resonance the curve rises to a peak
//! whose height shrinks as Qe grows; above resonance it falls monotonically.

/// Normalized voltage gain M(fN, Ln, Qe).
///
/// Never panics. Non-physical inputs (fN <= 0, Ln <= 0) yield whatever the
/// closed form evaluates to, possibly infinite or NaN; callers decide
/// admissibility.
pub fn gain(f_n: f64, ln: f64, qe: f64) -> f64 {
    let inv_f2 = 1.0 / (f_n * f_n);
    let real = 1.0 + (1.0 - inv_f2) / ln;
    let imag = qe * (f_n - 1.0 / f_n);
    1.0 / (real * real + imag * imag).sqrt()
}

/// Tank input impedance normalized to Zo, as (real, imaginary).
///
/// Series Lr-Cr in front of Lm in parallel with the reflected load Re.
pub fn input_impedance(f_n: f64, ln: f64, qe: f64) -> (f64, f64) {
    let series = f_n - 1.0 / f_n;
    // Re / Zo
    let r = 1.0 / qe;
    // Lm reactance / Zo
    let x = ln * f_n;
    let denom = r * r + x * x;
    let real = r * x * x / denom;
    let imag = series + r * r * x / denom;
    (real, imag)
}

/// Whether the tank presents an inductive load to the bridge at fN.
///
/// An inductive input impedance lets the resonant current lag the bridge
/// voltage, which is the FHA condition for zero-voltage switching.
pub fn is_inductive(f_n: f64, ln: f64, qe: f64) -> bool {
    let (_, imag) = input_impedance(f_n, ln, qe);
    imag > 0.0
}
