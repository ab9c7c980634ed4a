//! Kaplan-Meier curves per risk group
//!
//! Stratifies the test set by predicted risk and prints the group summary,
//! optionally exporting the combined chart rows as CSV and the group curves as
//! JSON.

use std::path::PathBuf;

use clap::Args;
use isd_analysis::{chart, stratify, survival::GroupSurvival};

use crate::{
    command::{GroupingArg, PayloadArg},
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct KmArg {
    #[command(flatten)]
    pub payload: PayloadArg,

    #[command(flatten)]
    pub grouping: GroupingArg,

    /// Write the combined curves (one column per group) to this CSV file
    #[arg(long)]
    pub csv_output: Option<PathBuf>,

    /// Write the group curves as JSON to this file (stdout if `-`)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &KmArg) -> anyhow::Result<()> {
    let data = util::read_full_predictions_file(&arg.payload.file, arg.payload.strict)?;
    let params = arg.grouping.params();

    let subjects = data.subjects();
    let risk_groups = stratify::stratify(&subjects, params.groups.get(), params.score_field);
    let groups = GroupSurvival::from_groups(&risk_groups);

    println!(
        "Kaplan-Meier Curves ({} subjects, {} groups by {:?} prediction)",
        subjects.len(),
        groups.len(),
        params.score_field
    );
    println!("==========================================\n");
    print_group_table(&groups);

    if let Some(path) = &arg.csv_output {
        let rows = GroupSurvival::chart_rows(&groups);
        util::save_csv(path, &chart::rows_to_csv(&rows))?;
    }

    if let Some(path) = &arg.output {
        let path = (path.as_os_str() != "-").then(|| path.clone());
        Output::save_json(&groups, path)?;
    }

    Ok(())
}

pub(crate) fn print_group_table(groups: &[GroupSurvival]) {
    println!(
        "  {:<8} {:>10} {:>8} {:>8} {:>12} {:>12}",
        "Group", "Mean Risk", "Subjects", "Events", "Median(KM)", "Final S(t)%"
    );
    // group(8) + mean_risk(10) + subjects(8) + events(8) + median(12) + final(12) + spaces(5)
    println!("  {}", "-".repeat(63));

    for group in groups {
        let events = group.points.iter().map(|p| p.events).sum::<usize>();
        let final_pct = group.points.last().map(|p| p.survival_pct);
        println!(
            "  {:<8} {:>10.2} {:>8} {:>8} {:>12} {:>12}",
            group.series_name(),
            group.mean_risk,
            group.subjects,
            events,
            util::format_opt(group.median_survival, 1),
            util::format_opt(final_pct, 1),
        );
    }
}
