//! Read-only views: contextual suggestions, quick actions and the
//! firefighting gate. Flags describe a what-if situation and are applied to
//! a scratch copy of the store, never to the persisted record.

use crate::cmd::scratch_store;
use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Args;
use pm33_core::{
    state::NavigationContextUpdate,
    suggest::QuickActionKind,
    types::{Integration, Persona, WorkflowMode},
    WorkflowStore,
};
use std::path::Path;
use std::str::FromStr;

const MAX_WHAT_IF_ALERTS: i64 = 1000;

#[derive(Args, Default)]
pub struct Situation {
    /// Workflow mode to evaluate in (planning, executing, reviewing, firefighting)
    #[arg(long)]
    pub mode: Option<String>,
    /// Persona to evaluate for, instead of the stored one
    #[arg(long)]
    pub persona: Option<String>,
    /// Active integration (jira, linear, monday, asana)
    #[arg(long)]
    pub integration: Option<String>,
    /// Number of critical alerts raised (at most 1000)
    #[arg(
        long,
        default_value = "0",
        value_parser = clap::value_parser!(u32).range(..=MAX_WHAT_IF_ALERTS)
    )]
    pub alerts: u32,
    /// Number of urgent tasks
    #[arg(long)]
    pub urgent: Option<u32>,
    /// Team pulse score, 0-100
    #[arg(long)]
    pub pulse: Option<u8>,
}

impl Situation {
    fn apply(&self, store: &mut WorkflowStore) -> anyhow::Result<()> {
        if let Some(mode) = &self.mode {
            store.set_workflow_state(WorkflowMode::from_str(mode).context("invalid --mode")?);
        }
        if let Some(persona) = &self.persona {
            store.set_user_persona(Persona::from_str(persona).context("invalid --persona")?);
        }
        let integration = self
            .integration
            .as_deref()
            .map(Integration::from_str)
            .transpose()
            .context("invalid --integration")?;
        store.update_navigation_context(NavigationContextUpdate {
            active_integration: integration,
            urgent_tasks: self.urgent,
            team_pulse_score: self.pulse,
            ..Default::default()
        });
        for _ in 0..self.alerts {
            store.add_critical_alert();
        }
        Ok(())
    }
}

fn situated(root: &Path, situation: &Situation) -> anyhow::Result<WorkflowStore> {
    let (_, mut store) = scratch_store(root)?;
    situation.apply(&mut store)?;
    Ok(store)
}

pub fn suggest(root: &Path, situation: &Situation, json: bool) -> anyhow::Result<()> {
    let store = situated(root, situation)?;
    let suggestions = store.contextual_suggestions();

    if json {
        return print_json(&suggestions);
    }

    println!("Mode: {}", store.state().current_mode);
    let rows = suggestions
        .iter()
        .map(|s| vec![s.label.to_string(), s.path.to_string(), s.reason.to_string()])
        .collect();
    print_table(&["SUGGESTION", "PATH", "WHY"], rows);
    Ok(())
}

pub fn actions(root: &Path, situation: &Situation, json: bool) -> anyhow::Result<()> {
    let store = situated(root, situation)?;
    let actions = store.relevant_quick_actions();

    if json {
        return print_json(&actions);
    }

    let rows = actions
        .iter()
        .map(|a| {
            let target = match &a.kind {
                QuickActionKind::Navigate { route } => route.clone(),
                QuickActionKind::Crisis => "crisis".to_string(),
                QuickActionKind::Sync { integration } => format!("sync:{integration}"),
            };
            vec![a.id.to_string(), a.label.clone(), target]
        })
        .collect();
    print_table(&["ID", "LABEL", "TARGET"], rows);
    Ok(())
}

pub fn firefighting(root: &Path, situation: &Situation, json: bool) -> anyhow::Result<()> {
    let store = situated(root, situation)?;
    let show = store.should_show_firefighting_mode();
    let state = store.state();

    if json {
        return print_json(&serde_json::json!({
            "firefighting": show,
            "critical_alerts": state.critical_alerts_count,
            "urgent_tasks": state.navigation_context.urgent_tasks,
            "team_pulse_score": state.navigation_context.team_pulse_score,
        }));
    }

    println!("Firefighting mode: {}", if show { "yes" } else { "no" });
    Ok(())
}
