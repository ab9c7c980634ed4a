use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use isd_analysis::{
    log_rank::{self, LogRankResult},
    stratify,
};

use crate::{
    command::{GroupingArg, PayloadArg},
    util,
};

#[derive(Debug, Clone, Args)]
pub(crate) struct LogRankArg {
    #[command(flatten)]
    pub payload: PayloadArg,

    #[command(flatten)]
    pub grouping: GroupingArg,

    /// Write the test table to this CSV file
    #[arg(long)]
    pub csv_output: Option<PathBuf>,
}

pub(crate) fn run(arg: &LogRankArg) -> anyhow::Result<()> {
    let data = util::read_full_predictions_file(&arg.payload.file, arg.payload.strict)?;
    let params = arg.grouping.params();

    let risk_groups = stratify::stratify(
        &data.subjects(),
        params.groups.get(),
        params.score_field,
    );
    if risk_groups.len() < 2 {
        eprintln!(
            "Only {} risk group(s) could be formed; nothing to compare",
            risk_groups.len()
        );
    }
    let results = log_rank::compare_all(&risk_groups);

    println!("Log-Rank Tests ({} groups)", risk_groups.len());
    println!("==========================================\n");
    print_log_rank_table(&results);

    if let Some(path) = &arg.csv_output {
        let csv = log_rank::to_csv(&results).context("Failed to format log-rank CSV")?;
        util::save_csv(path, &csv)?;
    }

    Ok(())
}

pub(crate) fn print_log_rank_table(results: &[LogRankResult]) {
    println!("  {:<8} {:<8} {:>10} {:>10}", "Group A", "Group B", "Z", "Q");
    // group_a(8) + group_b(8) + z(10) + q(10) + spaces(3)
    println!("  {}", "-".repeat(39));
    for result in results {
        println!(
            "  {:<8} {:<8} {:>10.4} {:>10.4}",
            result.group_a, result.group_b, result.z, result.p
        );
    }
    println!("  (Q = 1 - Phi(|Z|); positive Z means group A fails earlier than expected)");
}
