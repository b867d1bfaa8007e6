//! Design spec validation.

use crate::error::{LlcError, Result};

use super::{
    ComponentRounding, DesignSpec, Resolution, ScoreWeights, SweepRange, Window, MAX_GRID_POINTS,
    MAX_RANGE_POINTS,
};

/// Validate a design spec before sweeping.
///
/// Checks:
/// - Voltages, power, frequency and turns ratio are positive and finite
/// - The input range is ordered and contains the nominal voltage
/// - Ln/Qe ranges stay in the physical domain (> 0) and have a usable resolution
/// - The grid stays within [`MAX_RANGE_POINTS`] per axis and [`MAX_GRID_POINTS`] overall
/// - Weights and penalties are finite and non-negative, so warnings never help a design
/// - Span thresholds and rounding steps are meaningful
pub fn validate_spec(spec: &DesignSpec) -> Result<()> {
    positive("vin_min", spec.vin_min)?;
    positive("vin_max", spec.vin_max)?;
    positive("vout", spec.vout)?;
    positive("pout_rated", spec.pout_rated)?;
    positive("fr_target", spec.fr_target)?;
    positive("turns_ratio", spec.turns_ratio)?;

    if spec.vin_min > spec.vin_max {
        return Err(LlcError::invalid_spec(
            "vin_min",
            format!("{} V exceeds vin_max {} V", spec.vin_min, spec.vin_max),
        ));
    }

    if let Some(vin) = spec.vin_nominal {
        positive("vin_nominal", vin)?;
    }

    validate_range("ln_range", &spec.ln_range)?;
    validate_range("qe_range", &spec.qe_range)?;
    let grid_points = spec.ln_range.len().saturating_mul(spec.qe_range.len());
    if grid_points > MAX_GRID_POINTS {
        return Err(LlcError::invalid_range(
            "grid",
            format!("{grid_points} (Ln, Qe) pairs exceed the limit of {MAX_GRID_POINTS}"),
        ));
    }

    if let Some(w) = spec.ln_window {
        validate_window("ln_window", &w)?;
    }
    if let Some(w) = spec.qe_window {
        validate_window("qe_window", &w)?;
    }

    let fraction = spec.span.light_load_fraction;
    if !(fraction > 0.0 && fraction <= 1.0) {
        return Err(LlcError::invalid_spec(
            "light_load_fraction",
            format!("{fraction} must be in (0, 1]"),
        ));
    }
    positive("span_ratio_allowed", spec.span.span_ratio_allowed)?;
    positive("undefined_span_ratio", spec.span.undefined_span_ratio)?;
    positive("high_span_warning", spec.span.high_span_warning)?;

    validate_weights(&spec.weights)?;

    match spec.rounding {
        ComponentRounding::Ideal => {}
        ComponentRounding::Nearest {
            inductance_step,
            capacitance_step,
        }
        | ComponentRounding::Neighbors {
            inductance_step,
            capacitance_step,
        } => {
            positive("inductance_step", inductance_step)?;
            positive("capacitance_step", capacitance_step)?;
        }
    }

    if let Some(i_ref) = spec.weights.i_ref {
        positive("i_ref", i_ref)?;
    }
    if let Some(v_ref) = spec.weights.v_ref {
        positive("v_ref", v_ref)?;
    }

    if let Some(zvs) = spec.limits.zvs {
        positive("coss", zvs.coss)?;
        positive("deadtime", zvs.deadtime)?;
        if spec.limits.fsw_min.is_none() {
            return Err(LlcError::invalid_spec(
                "zvs",
                "start-up ZVS check needs limits.fsw_min",
            ));
        }
    }

    Ok(())
}

fn positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LlcError::invalid_spec(
            field,
            format!("{value} must be positive and finite"),
        ))
    }
}

fn non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LlcError::invalid_spec(
            field,
            format!("{value} must be non-negative and finite"),
        ))
    }
}

fn validate_weights(weights: &ScoreWeights) -> Result<()> {
    non_negative("w_ilr", weights.w_ilr)?;
    non_negative("w_vcr", weights.w_vcr)?;
    non_negative("w_fn", weights.w_fn)?;
    non_negative("w_span", weights.w_span)?;
    non_negative("warning_penalty", weights.warning_penalty)?;
    non_negative("limit_penalty", weights.limit_penalty)?;
    non_negative("infeasible_penalty", weights.infeasible_penalty)?;
    Ok(())
}

fn validate_range(name: &str, range: &SweepRange) -> Result<()> {
    if !(range.min.is_finite() && range.min > 0.0) {
        return Err(LlcError::invalid_range(
            name,
            format!("minimum {} must be positive", range.min),
        ));
    }
    if !range.max.is_finite() || range.max < range.min {
        return Err(LlcError::invalid_range(
            name,
            format!("maximum {} is below minimum {}", range.max, range.min),
        ));
    }
    match range.resolution {
        Resolution::Step(step) if !(step.is_finite() && step > 0.0) => Err(
            LlcError::invalid_range(name, format!("step {step} must be positive")),
        ),
        Resolution::Points(0) => Err(LlcError::invalid_range(name, "needs at least one point")),
        _ if range.len() > MAX_RANGE_POINTS => Err(LlcError::invalid_range(
            name,
            format!("resolution gives more than {MAX_RANGE_POINTS} values"),
        )),
        _ => Ok(()),
    }
}

fn validate_window(name: &str, window: &Window) -> Result<()> {
    if !(window.min > 0.0 && window.max >= window.min) {
        return Err(LlcError::invalid_range(
            name,
            format!("[{}, {}] is not a positive interval", window.min, window.max),
        ));
    }
    Ok(())
}
