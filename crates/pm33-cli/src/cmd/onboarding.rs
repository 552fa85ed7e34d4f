use crate::cmd::open_store;
use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use pm33_core::types::{OnboardingStage, Persona};
use std::path::Path;
use std::str::FromStr;

#[derive(Subcommand)]
pub enum OnboardingSubcommand {
    /// Show the current onboarding stage
    Show,
    /// Move onboarding to a stage (any stage is accepted)
    Advance { stage: String },
    /// Move onboarding to the stage after the current one
    Next,
}

pub fn set_persona(root: &Path, persona: &str, json: bool) -> anyhow::Result<()> {
    let persona = Persona::from_str(persona)
        .context("expected senior-manager, executive-leader or founder")?;
    let (_, mut store) = open_store(root)?;
    store.set_user_persona(persona);

    let stage = store.state().onboarding_stage;
    if json {
        print_json(&serde_json::json!({
            "persona": persona,
            "onboarding_stage": stage,
        }))?;
    } else {
        println!("Persona set: {persona}");
        println!("Onboarding:  {stage}");
    }
    Ok(())
}

pub fn run(root: &Path, subcmd: OnboardingSubcommand, json: bool) -> anyhow::Result<()> {
    let (_, mut store) = open_store(root)?;

    let target = match subcmd {
        OnboardingSubcommand::Show => None,
        OnboardingSubcommand::Advance { stage } => Some(
            OnboardingStage::from_str(&stage)
                .with_context(|| format!("unknown onboarding stage '{stage}'"))?,
        ),
        OnboardingSubcommand::Next => {
            let current = store.state().onboarding_stage;
            match current.next() {
                Some(next) => Some(next),
                None => anyhow::bail!("onboarding is already {current}"),
            }
        }
    };

    if let Some(stage) = target {
        store.advance_onboarding(stage);
    }

    let state = store.state();
    if json {
        print_json(&serde_json::json!({
            "onboarding_stage": state.onboarding_stage,
            "completed": state.onboarding_stage.is_terminal(),
            "power_user_actions": state.engagement_metrics.power_user_actions,
        }))?;
    } else {
        let total = OnboardingStage::all().len();
        println!(
            "Onboarding: {} ({}/{})",
            state.onboarding_stage,
            state.onboarding_stage.index() + 1,
            total
        );
    }
    Ok(())
}
