use std::{num::NonZeroUsize, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use isd_analysis::{report::AnalysisParams, subject::ScoreField};

use self::{
    calibration::CalibrationArg, curves::CurvesArg, km::KmArg, log_rank::LogRankArg,
    report::ReportArg,
};

mod calibration;
mod curves;
mod km;
mod log_rank;
mod report;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log computation details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    /// What analysis to run
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Kaplan-Meier curves per predicted risk group
    Km(#[clap(flatten)] KmArg),
    /// Pairwise log-rank tests between predicted risk groups
    LogRank(#[clap(flatten)] LogRankArg),
    /// D-calibration histogram with Hosmer-Lemeshow test
    Calibration(#[clap(flatten)] CalibrationArg),
    /// Individual predicted survival curves and their mean
    Curves(#[clap(flatten)] CurvesArg),
    /// Complete evaluation report (KM, log-rank and D-calibration)
    Report(#[clap(flatten)] ReportArg),
}

/// Input payload shared by all subcommands
#[derive(Debug, Clone, Args)]
pub(crate) struct PayloadArg {
    /// Path to the JSON payload
    pub file: PathBuf,

    /// Reject malformed payloads instead of truncating them
    #[arg(long)]
    pub strict: bool,
}

/// Risk stratification options
#[derive(Debug, Clone, Args)]
pub(crate) struct GroupingArg {
    /// Number of risk groups
    #[arg(long, default_value = "2")]
    pub groups: NonZeroUsize,

    /// Risk score used to order subjects (median or mean)
    #[arg(long, default_value = "median")]
    pub score: ScoreField,
}

impl GroupingArg {
    fn params(&self) -> AnalysisParams {
        AnalysisParams {
            groups: self.groups,
            score_field: self.score,
            ..AnalysisParams::default()
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logger(args.verbose);
    match args.mode {
        Mode::Km(arg) => km::run(&arg)?,
        Mode::LogRank(arg) => log_rank::run(&arg)?,
        Mode::Calibration(arg) => calibration::run(&arg)?,
        Mode::Curves(arg) => curves::run(&arg)?,
        Mode::Report(arg) => report::run(&arg)?,
    }
    Ok(())
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
