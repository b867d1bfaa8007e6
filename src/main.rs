//! LLC Sweep - resonant tank design sweep
//!
//! Sweeps an (Ln, Qe) grid for a half-bridge LLC converter and prints the
//! best dissimilar designs.
//!
//! # Usage
//!
//! ```bash
//! llc-sweep --vin-min 380 --vin-max 420 --vout 48 --pout 1000 --fr 100e3 --top 5
//! llc-sweep --spec design.json --json > ranked.json
//! RUST_LOG=debug llc-sweep --spec design.json
//! ```

use std::io;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use llc_sweep::{
    error::{LlcError, Result},
    load_spec, run_sweep,
    spec::{ComponentRounding, OperatingLimits, DEFAULT_CAPACITANCE_STEP, DEFAULT_INDUCTANCE_STEP},
    tank::turns_ratio,
    Candidate, DesignSpec, SweepRange,
};

/// LLC resonant tank design sweep
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Design spec as JSON; replaces the converter flags below
    #[arg(long, value_name = "SPEC_FILE")]
    spec: Option<PathBuf>,

    /// Minimum input voltage (V)
    #[arg(long)]
    vin_min: Option<f64>,

    /// Maximum input voltage (V)
    #[arg(long)]
    vin_max: Option<f64>,

    /// Nominal input voltage (V), defaults to the midpoint
    #[arg(long)]
    vin_nom: Option<f64>,

    /// Output voltage (V)
    #[arg(long)]
    vout: Option<f64>,

    /// Rated output power (W)
    #[arg(long)]
    pout: Option<f64>,

    /// Target resonant frequency (Hz)
    #[arg(long)]
    fr: Option<f64>,

    /// Turns ratio Np/Ns, derived from the nominal input when omitted
    #[arg(long)]
    turns: Option<f64>,

    /// Ln range
    #[arg(long, num_args = 3, value_names = ["MIN", "MAX", "STEP"], default_values_t = [3.0, 8.0, 0.5])]
    ln: Vec<f64>,

    /// Qe range
    #[arg(long, num_args = 3, value_names = ["MIN", "MAX", "POINTS"], default_values_t = [0.2, 0.6, 9.0])]
    qe: Vec<f64>,

    /// Component rounding
    #[arg(long, value_enum, default_value_t = Rounding::Nearest)]
    rounding: Rounding,

    /// Lowest acceptable switching frequency (Hz)
    #[arg(long)]
    fsw_min: Option<f64>,

    /// Highest acceptable switching frequency (Hz)
    #[arg(long)]
    fsw_max: Option<f64>,

    /// Number of dissimilar designs to print
    #[arg(short, long, default_value_t = 5)]
    top: usize,

    /// Print the full ranked report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Rounding {
    Ideal,
    Nearest,
    Neighbors,
}

impl From<Rounding> for ComponentRounding {
    fn from(r: Rounding) -> Self {
        match r {
            Rounding::Ideal => ComponentRounding::Ideal,
            Rounding::Nearest => ComponentRounding::Nearest {
                inductance_step: DEFAULT_INDUCTANCE_STEP,
                capacitance_step: DEFAULT_CAPACITANCE_STEP,
            },
            Rounding::Neighbors => ComponentRounding::Neighbors {
                inductance_step: DEFAULT_INDUCTANCE_STEP,
                capacitance_step: DEFAULT_CAPACITANCE_STEP,
            },
        }
    }
}

fn required(field: &str, value: Option<f64>) -> Result<f64> {
    value.ok_or_else(|| LlcError::invalid_spec(field, "required when --spec is not given"))
}

fn spec_from_flags(args: &Args) -> Result<DesignSpec> {
    let vin_min = required("vin_min", args.vin_min)?;
    let vin_max = required("vin_max", args.vin_max)?;
    let vout = required("vout", args.vout)?;
    let pout = required("pout", args.pout)?;
    let fr = required("fr", args.fr)?;
    let vin_nom = args.vin_nom.unwrap_or(0.5 * (vin_min + vin_max));

    let n = match args.turns {
        Some(n) => n,
        None => {
            let (n_float, n_used) = turns_ratio(vin_nom, vout);
            tracing::info!(n_float, n_used, "turns ratio derived from nominal input");
            f64::from(n_used)
        }
    };

    let ln = SweepRange::stepped(args.ln[0], args.ln[1], args.ln[2]);
    let qe = SweepRange::points(args.qe[0], args.qe[1], args.qe[2].round().max(0.0) as usize);

    let mut spec = DesignSpec::new(vin_min, vin_max, vout, pout, fr, n, ln, qe)
        .with_vin_nominal(vin_nom)
        .with_rounding(args.rounding.into());
    if args.fsw_min.is_some() || args.fsw_max.is_some() {
        spec = spec.with_limits(OperatingLimits {
            fsw_min: args.fsw_min,
            fsw_max: args.fsw_max,
            zvs: None,
        });
    }
    Ok(spec)
}

fn print_candidate(rank: usize, c: &Candidate) {
    let fmt = |v: Option<f64>, scale: f64, prec: usize| match v {
        Some(v) => format!("{:.*}", prec, v * scale),
        None => "-".to_string(),
    };
    println!(
        "{:>3}  {:>4.1} {:>5.3}  {:>7.1} {:>7.1} {:>7.1}  {:>7} {:>6}  {:>6} {:>7}  {:>5}  {:>9.3}",
        rank,
        c.ln(),
        c.qe(),
        c.tank.lr * 1e6,
        c.tank.cr * 1e9,
        c.tank.lm * 1e6,
        fmt(c.fsw(), 1e-3, 1),
        fmt(c.f_n(), 1.0, 3),
        fmt(c.ilr_rms(), 1.0, 2),
        fmt(c.vcr_peak(), 1.0, 1),
        fmt(c.span_ratio(), 1.0, 2),
        c.score.total,
    );
    for w in &c.warnings {
        println!("       ! {w}");
    }
}

fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let spec = match &args.spec {
        Some(path) => load_spec(path)?,
        None => spec_from_flags(&args)?,
    };

    let report = run_sweep(&spec)?;

    if args.json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    println!(
        "{} candidates, {} feasible (n = {}, Vin {}-{} V, Vout {} V, {} W, fR {:.1} kHz)",
        report.total_count,
        report.feasible_count,
        spec.turns_ratio,
        spec.vin_min,
        spec.vin_max,
        spec.vout,
        spec.pout_rated,
        spec.fr_target / 1e3,
    );
    println!(
        "{:>3}  {:>4} {:>5}  {:>7} {:>7} {:>7}  {:>7} {:>6}  {:>6} {:>7}  {:>5}  {:>9}",
        "#", "Ln", "Qe", "Lr uH", "Cr nF", "Lm uH", "fsw kHz", "fN", "ILr A", "VCr V", "span", "score"
    );
    for (i, c) in report.diverse_top(args.top).into_iter().enumerate() {
        print_candidate(i + 1, c);
    }

    Ok(())
}
