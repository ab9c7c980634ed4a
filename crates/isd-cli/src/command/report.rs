use std::path::PathBuf;

use clap::Args;
use isd_analysis::report::{AnalysisParams, EvaluationReport};

use crate::{
    command::{GroupingArg, PayloadArg, calibration, km, log_rank},
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct ReportArg {
    #[command(flatten)]
    pub payload: PayloadArg,

    #[command(flatten)]
    pub grouping: GroupingArg,

    /// Number of D-calibration bins
    #[arg(long, default_value_t = 10)]
    pub bins: usize,

    /// Write the report as JSON to this file (stdout if `-`)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ReportArg) -> anyhow::Result<()> {
    if arg.bins == 0 {
        anyhow::bail!("--bins must be at least 1");
    }
    let data = util::read_full_predictions_file(&arg.payload.file, arg.payload.strict)?;
    let params = AnalysisParams {
        num_bins: arg.bins,
        ..arg.grouping.params()
    };

    eprintln!("Evaluating {} subjects...", data.len());
    let report = EvaluationReport::compute(&data, &params);
    print_report(&report);

    if let Some(path) = &arg.output {
        let path = (path.as_os_str() != "-").then(|| path.clone());
        Output::save_json(&report, path)?;
    }

    Ok(())
}

fn print_report(report: &EvaluationReport) {
    println!("Model Evaluation Report ({} subjects)", report.subjects);
    println!("==========================================\n");

    println!(
        "Kaplan-Meier by risk group ({} groups by {:?} prediction):",
        report.groups.len(),
        report.params.score_field
    );
    km::print_group_table(&report.groups);
    println!();

    println!("Log-rank tests:");
    log_rank::print_log_rank_table(&report.log_rank);
    println!();

    println!("D-calibration ({} bins):", report.params.num_bins);
    calibration::print_calibration_table(&report.calibration);
}
