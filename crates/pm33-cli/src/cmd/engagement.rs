use crate::cmd::open_store;
use crate::output::print_json;
use clap::Subcommand;
use pm33_core::state::EngagementMetrics;
use std::path::Path;

#[derive(Subcommand)]
pub enum RecordSubcommand {
    /// A strategic analysis was completed (also updates the streak)
    Analysis,
    /// An integration sync succeeded
    Sync,
    /// A power-user action was taken (e.g. a keyboard shortcut)
    PowerAction,
}

pub fn record(root: &Path, subcmd: RecordSubcommand, json: bool) -> anyhow::Result<()> {
    let (_, mut store) = open_store(root)?;
    let what = match subcmd {
        RecordSubcommand::Analysis => {
            store.record_strategic_analysis();
            "analysis"
        }
        RecordSubcommand::Sync => {
            store.record_successful_sync();
            "sync"
        }
        RecordSubcommand::PowerAction => {
            store.record_power_user_action();
            "power action"
        }
    };
    report(&store.state().engagement_metrics, Some(what), json)
}

pub fn streak(root: &Path, json: bool) -> anyhow::Result<()> {
    let (_, mut store) = open_store(root)?;
    store.update_streak();
    report(&store.state().engagement_metrics, None, json)
}

fn report(metrics: &EngagementMetrics, recorded: Option<&str>, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(metrics);
    }
    if let Some(what) = recorded {
        println!("Recorded {what}.");
    }
    println!(
        "Streak: {} day(s)  Analyses: {}/{}  Syncs: {}  Power actions: {}",
        metrics.current_streak,
        metrics.total_analyses,
        metrics.weekly_goal,
        metrics.successful_syncs,
        metrics.power_user_actions
    );
    Ok(())
}
