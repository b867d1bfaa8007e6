//! LLC resonant tank model.
//!
//! - [`gain`] is the first-harmonic transfer function of the tank
//! - [`input_impedance`] / [`is_inductive`] locate the ZVS region
//! - [`IdealTank`] and [`Tank`] turn (Ln, Qe) into Lr, Cr and Lm and back

mod design;
mod gain;

pub use design::{lm_max, realise_tanks, required_deadtime, turns_ratio, IdealTank, Tank};
pub use gain::{gain, input_impedance, is_inductive};
