use std::path::PathBuf;

use clap::Args;
use isd_analysis::calibration::CalibrationHistogram;

use crate::{
    command::PayloadArg,
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct CalibrationArg {
    #[command(flatten)]
    pub payload: PayloadArg,

    /// Number of equal-width probability bins
    #[arg(long, default_value_t = 10)]
    pub bins: usize,

    /// Write the histogram as JSON to this file (stdout if `-`)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CalibrationArg) -> anyhow::Result<()> {
    if arg.bins == 0 {
        anyhow::bail!("--bins must be at least 1");
    }
    let data = util::read_full_predictions_file(&arg.payload.file, arg.payload.strict)?;
    let histogram = CalibrationHistogram::from_payload(&data, arg.bins);

    println!("D-Calibration ({} subjects, {} bins)", data.len(), arg.bins);
    println!("==========================================\n");
    print_calibration_table(&histogram);

    if let Some(path) = &arg.output {
        let path = (path.as_os_str() != "-").then(|| path.clone());
        Output::save_json(&histogram, path)?;
    }

    Ok(())
}

pub(crate) fn print_calibration_table(histogram: &CalibrationHistogram) {
    println!(
        "  {:<12} {:>12} {:>10} {:>12} {:>10} {:>8}",
        "Bin", "Uncensored", "Uncens%", "Censored", "Cens%", "Total"
    );
    // bin(12) + uncensored(12) + uncens%(10) + censored(12) + cens%(10) + total(8) + spaces(5)
    println!("  {}", "-".repeat(69));
    for row in &histogram.rows {
        println!(
            "  {:<12} {:>12} {:>9.1}% {:>12} {:>9.1}% {:>8}",
            row.bin_label,
            row.uncensored_count,
            row.uncensored_percent,
            row.censored_count,
            row.censored_percent,
            row.total_count,
        );
    }
    println!();
    println!(
        "  Hosmer-Lemeshow: chi2 = {:.4}, p = {:.4}",
        histogram.chi_square, histogram.p_value
    );
}
