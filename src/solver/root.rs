//! Root finding for the normalized switching frequency.
//!
//! The gain curve is not globally monotonic: below resonance it peaks and
//! the peak height depends on Qe, so a target may have zero, one or two
//! roots in a bracket. The solver therefore works in two tiers:
//!
//! 1. Pick the region from the target (boost below resonance, buck above)
//!    and run Brent's method when the region end points change sign.
//! 2. Otherwise scan the region densely and keep the sample with the
//!    smallest residual, accepting it only below [`MAX_GAIN_ERROR`].
//!
//! Both tiers have a fixed evaluation budget.

use serde::Serialize;
use thiserror::Error;

use crate::tank::gain;

use super::{CONVERGENCE_TOLERANCE, MAX_GAIN_ERROR, MAX_ITERATIONS, RESONANCE_SNAP, SCAN_SAMPLES};

/// How a root was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RootMethod {
    /// Target within the resonance snap of unity.
    Resonance,
    /// Brent's method on a sign-changing bracket.
    Bracketed,
    /// Best sample of the fallback scan.
    Scan,
}

/// A solved normalized frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RootSolution {
    pub f_n: f64,
    /// |M(fN) - target|
    pub residual: f64,
    pub method: RootMethod,
    /// Gain evaluations spent.
    pub evaluations: usize,
}

/// No fN reaches the target gain within tolerance.
#[derive(Error, Debug, Clone, Copy, PartialEq, Serialize)]
#[error("no fN reaches gain {target_gain:.4} (best residual {best_residual:.3e} at fN = {best_f_n:.4})")]
pub struct NoSolution {
    pub target_gain: f64,
    pub best_f_n: f64,
    pub best_residual: f64,
    pub evaluations: usize,
}

/// Two-tier fN solver.
#[derive(Debug, Clone)]
pub struct RootFinder {
    /// Maximum Brent iterations
    pub max_iterations: usize,
    /// Bracket width at convergence
    pub tolerance: f64,
    /// Samples in the fallback scan
    pub scan_samples: usize,
    /// Largest accepted gain residual
    pub max_residual: f64,
}

impl Default for RootFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl RootFinder {
    /// Create a solver with the default budget.
    pub fn new() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            tolerance: CONVERGENCE_TOLERANCE,
            scan_samples: SCAN_SAMPLES,
            max_residual: MAX_GAIN_ERROR,
        }
    }

    /// Set the accepted gain residual.
    pub fn with_max_residual(mut self, max_residual: f64) -> Self {
        self.max_residual = max_residual;
        self
    }

    /// Set the fallback scan density.
    pub fn with_scan_samples(mut self, samples: usize) -> Self {
        self.scan_samples = samples.max(2);
        self
    }

    /// Upper bound on gain evaluations for a single solve.
    pub fn evaluation_budget(&self) -> usize {
        3 + self.max_iterations + self.scan_samples
    }

    /// Solve M(fN, Ln, Qe) = `target_gain` inside `bracket`.
    pub fn solve_fn(
        &self,
        target_gain: f64,
        ln: f64,
        qe: f64,
        bracket: (f64, f64),
    ) -> Result<RootSolution, NoSolution> {
        if (target_gain - 1.0).abs() < RESONANCE_SNAP {
            return Ok(RootSolution {
                f_n: 1.0,
                residual: (gain(1.0, ln, qe) - target_gain).abs(),
                method: RootMethod::Resonance,
                evaluations: 1,
            });
        }

        let (lo, hi) = region(target_gain, bracket);
        let residual = |f: f64| gain(f, ln, qe) - target_gain;
        let mut evaluations = 0;

        let r_lo = residual(lo);
        let r_hi = residual(hi);
        evaluations += 2;

        if r_lo * r_hi < 0.0 {
            let (f_n, iterations) = self.brent(&residual, lo, hi, r_lo, r_hi);
            evaluations += iterations;
            let r = residual(f_n).abs();
            evaluations += 1;
            if r < self.max_residual {
                return Ok(RootSolution {
                    f_n,
                    residual: r,
                    method: RootMethod::Bracketed,
                    evaluations,
                });
            }
        }

        // Fallback: dense scan
        let samples = self.scan_samples.max(2);
        let mut best_f_n = lo;
        let mut best_residual = f64::INFINITY;
        for i in 0..samples {
            let f = lo + (hi - lo) * i as f64 / (samples - 1) as f64;
            let r = residual(f).abs();
            evaluations += 1;
            if r < best_residual {
                best_residual = r;
                best_f_n = f;
            }
        }

        if best_residual < self.max_residual {
            Ok(RootSolution {
                f_n: best_f_n,
                residual: best_residual,
                method: RootMethod::Scan,
                evaluations,
            })
        } else {
            Err(NoSolution {
                target_gain,
                best_f_n,
                best_residual,
                evaluations,
            })
        }
    }

    /// Brent's method on a bracket with f(a) * f(b) < 0.
    ///
    /// Returns the root estimate and the number of extra evaluations.
    fn brent(
        &self,
        f: &impl Fn(f64) -> f64,
        a: f64,
        b: f64,
        fa: f64,
        fb: f64,
    ) -> (f64, usize) {
        let (mut a, mut b, mut fa, mut fb) = (a, b, fa, fb);
        if fa.abs() < fb.abs() {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }
        let (mut c, mut fc) = (a, fa);
        let mut d = c;
        let mut bisected = true;
        let mut evaluations = 0;

        for _ in 0..self.max_iterations {
            if fb == 0.0 || (b - a).abs() < self.tolerance {
                break;
            }

            let mut s = if fa != fc && fb != fc {
                // Inverse quadratic interpolation
                a * fb * fc / ((fa - fb) * (fa - fc))
                    + b * fa * fc / ((fb - fa) * (fb - fc))
                    + c * fa * fb / ((fc - fa) * (fc - fb))
            } else {
                // Secant
                b - fb * (b - a) / (fb - fa)
            };

            let quarter = (3.0 * a + b) / 4.0;
            let outside = !((quarter < s && s < b) || (b < s && s < quarter));
            let slow = if bisected {
                (s - b).abs() >= (b - c).abs() / 2.0 || (b - c).abs() < self.tolerance
            } else {
                (s - b).abs() >= (c - d).abs() / 2.0 || (c - d).abs() < self.tolerance
            };

            if outside || slow {
                s = 0.5 * (a + b);
                bisected = true;
            } else {
                bisected = false;
            }

            let fs = f(s);
            evaluations += 1;
            d = c;
            c = b;
            fc = fb;

            if fa * fs < 0.0 {
                b = s;
                fb = fs;
            } else {
                a = s;
                fa = fs;
            }

            if fa.abs() < fb.abs() {
                std::mem::swap(&mut a, &mut b);
                std::mem::swap(&mut fa, &mut fb);
            }
        }

        (b, evaluations)
    }
}

/// Solve fN with the default [`RootFinder`].
pub fn solve_fn(
    target_gain: f64,
    ln: f64,
    qe: f64,
    bracket: (f64, f64),
) -> Result<RootSolution, NoSolution> {
    RootFinder::default().solve_fn(target_gain, ln, qe, bracket)
}

/// Search region for a target gain.
///
/// Gains below unity are reached above resonance, gains above unity below
/// it, where the lower edge stays clear of the capacitive region.
fn region(target_gain: f64, bracket: (f64, f64)) -> (f64, f64) {
    if target_gain < 1.0 {
        (bracket.0.max(1.000001), bracket.1.max(2.5))
    } else {
        (bracket.0.max(0.4), bracket.1.min(0.999999))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::DEFAULT_BRACKET;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_recovers_known_root_below_resonance() {
        let target = gain(0.8, 5.0, 0.3);
        let sol = solve_fn(target, 5.0, 0.3, DEFAULT_BRACKET).unwrap();
        assert_eq!(sol.method, RootMethod::Bracketed);
        assert_abs_diff_eq!(sol.f_n, 0.8, epsilon = 1e-6);
        assert!(sol.residual < 1e-9);
    }

    #[test]
    fn test_recovers_known_root_above_resonance() {
        let target = gain(1.4, 5.0, 0.3);
        let sol = solve_fn(target, 5.0, 0.3, DEFAULT_BRACKET).unwrap();
        assert_abs_diff_eq!(sol.f_n, 1.4, epsilon = 1e-6);
    }

    #[test]
    fn test_resonance_snap() {
        let sol = solve_fn(1.005, 6.0, 0.4, DEFAULT_BRACKET).unwrap();
        assert_eq!(sol.method, RootMethod::Resonance);
        assert_eq!(sol.f_n, 1.0);
        assert!(sol.residual < MAX_GAIN_ERROR);
    }

    #[test]
    fn test_unreachable_gain_returns_no_solution() {
        let finder = RootFinder::default();
        let err = finder.solve_fn(5.0, 5.0, 0.3, DEFAULT_BRACKET).unwrap_err();
        assert!(err.best_residual >= MAX_GAIN_ERROR);
        assert!(err.evaluations <= finder.evaluation_budget());
    }

    #[test]
    fn test_scan_fallback_finds_near_miss() {
        // The boost region of a heavily loaded tank never changes sign at the
        // end points; the scan still lands near the peak.
        let finder = RootFinder::default();
        let (lo, hi) = region(1.2, DEFAULT_BRACKET);
        let peak = (0..=1000)
            .map(|i| lo + (hi - lo) * i as f64 / 1000.0)
            .map(|f| gain(f, 3.0, 0.5))
            .fold(0.0, f64::max);
        let target = peak - 0.005;
        let sol = finder.solve_fn(target, 3.0, 0.5, DEFAULT_BRACKET).unwrap();
        assert!(sol.residual < MAX_GAIN_ERROR);
        assert_abs_diff_eq!(gain(sol.f_n, 3.0, 0.5), target, epsilon = MAX_GAIN_ERROR);
    }

    #[test]
    fn test_nan_target_terminates() {
        let finder = RootFinder::default();
        let err = finder.solve_fn(f64::NAN, 5.0, 0.3, DEFAULT_BRACKET).unwrap_err();
        assert!(err.evaluations <= finder.evaluation_budget());
    }

    #[test]
    fn test_solution_satisfies_gain() {
        for &(ln, qe) in &[(3.0, 0.2), (5.0, 0.4), (8.0, 0.6)] {
            for &target in &[0.9, 0.95, 1.05, 1.1] {
                if let Ok(sol) = solve_fn(target, ln, qe, DEFAULT_BRACKET) {
                    assert!((gain(sol.f_n, ln, qe) - target).abs() < MAX_GAIN_ERROR);
                }
            }
        }
    }
}
