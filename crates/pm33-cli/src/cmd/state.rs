use crate::cmd::open_store;
use crate::output::print_json;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let (_, store) = open_store(root)?;
    let state = store.state();

    if json {
        return print_json(state);
    }

    let persona = state
        .persona
        .map(|p| p.to_string())
        .unwrap_or_else(|| "(unset)".to_string());
    let m = &state.engagement_metrics;

    println!("Mode:        {}", state.current_mode);
    println!("Persona:     {persona}");
    println!("Onboarding:  {}", state.onboarding_stage);
    println!(
        "Sidebar:     {}",
        if state.sidebar_collapsed {
            "collapsed"
        } else {
            "expanded"
        }
    );

    println!("\nEngagement:");
    println!("  streak:         {} day(s)", m.current_streak);
    println!(
        "  analyses:       {} (weekly goal {})",
        m.total_analyses, m.weekly_goal
    );
    println!("  syncs:          {}", m.successful_syncs);
    println!("  power actions:  {}", m.power_user_actions);
    println!(
        "  last engaged:   {}",
        m.last_engagement.format("%Y-%m-%d %H:%M UTC")
    );

    let recent = &state.command_palette.recent_commands;
    if !recent.is_empty() {
        println!("\nRecent commands:");
        for id in recent {
            println!("  {id}");
        }
    }

    Ok(())
}

pub fn reset(root: &Path) -> anyhow::Result<()> {
    let (_, mut store) = open_store(root)?;
    store.reset();
    println!("Workflow state reset to defaults.");
    Ok(())
}
