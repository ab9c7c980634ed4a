//! Individual predicted survival curves
//!
//! Prints a summary of each (optionally sampled) subject curve and of the
//! mean-of-curves series, and exports the chart rows as JSON.

use std::path::PathBuf;

use clap::Args;
use isd_analysis::{curves, sampling, subject::PredictionCurve};
use rand::SeedableRng as _;
use rand_pcg::Pcg32;

use crate::{
    command::PayloadArg,
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct CurvesArg {
    #[command(flatten)]
    pub payload: PayloadArg,

    /// Show only this many randomly chosen curves
    #[arg(long)]
    pub sample: Option<usize>,

    /// Seed for the random curve selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the chart rows as JSON to this file (stdout if `-`)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CurvesArg) -> anyhow::Result<()> {
    let data = util::read_survival_curves_file(&arg.payload.file, arg.payload.strict)?;
    let all_curves = data.prediction_curves();

    let selected = match arg.sample {
        Some(count) => match arg.seed {
            Some(seed) => sampling::sample_curves(&all_curves, count, &mut Pcg32::seed_from_u64(seed)),
            None => sampling::sample_curves(&all_curves, count, &mut rand::rng()),
        },
        None => all_curves.clone(),
    };
    if selected.len() < all_curves.len() {
        eprintln!("Showing {} of {} curves", selected.len(), all_curves.len());
    }

    let rows = curves::chart_rows(&selected);

    println!("Individual Survival Curves ({} subjects)", selected.len());
    println!("==========================================\n");
    print_curve_table(&selected);
    println!();
    print_overall_summary(&selected);

    if let Some(path) = &arg.output {
        let path = (path.as_os_str() != "-").then(|| path.clone());
        Output::save_json(&rows, path)?;
    }

    Ok(())
}

fn print_curve_table(curves: &[PredictionCurve]) {
    println!(
        "  {:<12} {:>8} {:>10} {:>10} {:>12}",
        "Subject", "Points", "Start", "End", "Final S(t)%"
    );
    // subject(12) + points(8) + start(10) + end(10) + final(12) + spaces(4)
    println!("  {}", "-".repeat(56));
    for curve in curves {
        let step = curve.step_curve();
        let times = step.times();
        println!(
            "  {:<12} {:>8} {:>10} {:>10} {:>12}",
            curves::series_name(curve),
            times.len(),
            util::format_opt(times.first().copied(), 1),
            util::format_opt(times.last().copied(), 1),
            util::format_opt(curve.survival_probabilities.last().copied(), 1),
        );
    }
}

/// Prints the mean-of-curves series at a few quantiles of its time range.
fn print_overall_summary(curves: &[PredictionCurve]) {
    let axis = curves
        .iter()
        .flat_map(|curve| curve.step_curve().times().to_vec())
        .collect::<Vec<_>>();
    let (Some(start), Some(end)) = (
        axis.iter().copied().reduce(f64::min),
        axis.iter().copied().reduce(f64::max),
    ) else {
        println!("  No curve points");
        return;
    };

    println!("  Mean of individual curves ({}):", curves::OVERALL_SERIES);
    for fraction in [0.0, 0.25, 0.5, 0.75, 1.0] {
        let time = start + fraction * (end - start);
        println!(
            "    t={:>10.1}  S(t)%={:>6}",
            time,
            util::format_opt(curves::overall_at(curves, time), 1)
        );
    }
}
