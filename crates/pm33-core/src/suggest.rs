//! Derived read-only views over [`WorkflowState`]: contextual suggestions,
//! the firefighting gate and the quick actions relevant right now.
//!
//! Everything here is a pure function of the state. Side effects for the
//! returned actions belong to the caller.

use crate::state::WorkflowState;
use crate::types::{Persona, WorkflowMode};
use serde::Serialize;

pub const MAX_SUGGESTIONS: usize = 3;
pub const URGENT_TASK_THRESHOLD: u32 = 5;
pub const TEAM_PULSE_THRESHOLD: u8 = 60;
pub const DEFAULT_TEAM_PULSE: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub label: &'static str,
    pub path: &'static str,
    pub reason: &'static str,
}

const fn suggestion(label: &'static str, path: &'static str, reason: &'static str) -> Suggestion {
    Suggestion {
        label,
        path,
        reason,
    }
}

fn mode_suggestions(mode: WorkflowMode) -> [Suggestion; 2] {
    match mode {
        WorkflowMode::Planning => [
            suggestion(
                "Strategic Analysis",
                "/strategic-intelligence",
                "Ground the plan in data before committing",
            ),
            suggestion(
                "Roadmap Review",
                "/roadmap",
                "Check priorities against this quarter's goals",
            ),
        ],
        WorkflowMode::Executing => [
            suggestion(
                "Sprint Board",
                "/command-center",
                "Track delivery against the current plan",
            ),
            suggestion(
                "Sync Progress",
                "/integrations",
                "Pull the latest status from connected tools",
            ),
        ],
        WorkflowMode::Reviewing => [
            suggestion(
                "Outcome Metrics",
                "/analytics",
                "Compare shipped work with expected impact",
            ),
            suggestion(
                "Team Pulse",
                "/team-pulse",
                "See how the team is holding up",
            ),
        ],
        WorkflowMode::Firefighting => [
            suggestion(
                "Critical Issues",
                "/command-center?filter=critical",
                "Triage what is blocking delivery right now",
            ),
            suggestion(
                "Stakeholder Update",
                "/communications",
                "Keep leadership informed while you respond",
            ),
        ],
    }
}

fn persona_suggestion(persona: Persona) -> Option<Suggestion> {
    match persona {
        Persona::ExecutiveLeader => Some(suggestion(
            "Portfolio Overview",
            "/portfolio",
            "Roll up progress across every team",
        )),
        Persona::Founder => Some(suggestion(
            "Investor Metrics",
            "/investor-metrics",
            "Keep the board narrative current",
        )),
        Persona::SeniorManager => None,
    }
}

/// What a quick action does, so the caller can wire the side effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuickActionKind {
    Navigate { route: String },
    Crisis,
    Sync { integration: crate::types::Integration },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickActionDescriptor {
    pub id: &'static str,
    pub label: String,
    pub kind: QuickActionKind,
}

impl WorkflowState {
    /// Up to two mode entries, then one persona entry, capped at three.
    pub fn contextual_suggestions(&self) -> Vec<Suggestion> {
        let mut out: Vec<Suggestion> = mode_suggestions(self.current_mode).into();
        if let Some(extra) = self.persona.and_then(persona_suggestion) {
            out.push(extra);
        }
        out.truncate(MAX_SUGGESTIONS);
        out
    }

    pub fn should_show_firefighting_mode(&self) -> bool {
        let ctx = &self.navigation_context;
        self.critical_alerts_count > 0
            || ctx.urgent_tasks.unwrap_or(0) > URGENT_TASK_THRESHOLD
            || ctx.team_pulse_score.unwrap_or(DEFAULT_TEAM_PULSE) < TEAM_PULSE_THRESHOLD
    }

    pub fn relevant_quick_actions(&self) -> Vec<QuickActionDescriptor> {
        let mut actions = vec![
            QuickActionDescriptor {
                id: "strategic-analysis",
                label: "New Strategic Analysis".to_string(),
                kind: QuickActionKind::Navigate {
                    route: "/strategic-intelligence".to_string(),
                },
            },
            QuickActionDescriptor {
                id: "command-center",
                label: "Open Command Center".to_string(),
                kind: QuickActionKind::Navigate {
                    route: "/command-center".to_string(),
                },
            },
        ];

        if self.current_mode == WorkflowMode::Firefighting {
            actions.push(QuickActionDescriptor {
                id: "crisis-response",
                label: "Open Crisis Response".to_string(),
                kind: QuickActionKind::Crisis,
            });
        }

        if let Some(integration) = self.navigation_context.active_integration {
            actions.push(QuickActionDescriptor {
                id: "sync-integration",
                label: format!("Sync {}", integration.label()),
                kind: QuickActionKind::Sync { integration },
            });
        }

        actions
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Integration;
    use chrono::Utc;

    fn state() -> WorkflowState {
        WorkflowState::new(Utc::now())
    }

    #[test]
    fn planning_founder_gets_two_mode_entries_then_persona() {
        let mut s = state();
        s.current_mode = WorkflowMode::Planning;
        s.persona = Some(Persona::Founder);

        let got = s.contextual_suggestions();
        assert_eq!(got.len(), 3);
        assert_eq!(got[0].label, "Strategic Analysis");
        assert_eq!(got[1].label, "Roadmap Review");
        assert_eq!(got[2].label, "Investor Metrics");
    }

    #[test]
    fn senior_manager_gets_no_persona_entry() {
        let mut s = state();
        s.current_mode = WorkflowMode::Reviewing;
        s.persona = Some(Persona::SeniorManager);
        let got = s.contextual_suggestions();
        assert_eq!(got.len(), 2);
        assert!(got.iter().all(|g| g.path != "/portfolio"));
    }

    #[test]
    fn suggestions_are_deterministic() {
        let mut s = state();
        s.current_mode = WorkflowMode::Firefighting;
        s.persona = Some(Persona::ExecutiveLeader);
        assert_eq!(s.contextual_suggestions(), s.contextual_suggestions());
        assert_eq!(s.contextual_suggestions()[2].label, "Portfolio Overview");
    }

    #[test]
    fn firefighting_gate_on_single_alert() {
        let mut s = state();
        s.critical_alerts_count = 1;
        assert!(s.should_show_firefighting_mode());
    }

    #[test]
    fn firefighting_gate_off_at_defaults() {
        assert!(!state().should_show_firefighting_mode());
    }

    #[test]
    fn firefighting_gate_thresholds_are_strict() {
        let mut s = state();
        s.navigation_context.urgent_tasks = Some(5);
        s.navigation_context.team_pulse_score = Some(60);
        assert!(!s.should_show_firefighting_mode());

        s.navigation_context.urgent_tasks = Some(6);
        assert!(s.should_show_firefighting_mode());

        s.navigation_context.urgent_tasks = Some(0);
        s.navigation_context.team_pulse_score = Some(59);
        assert!(s.should_show_firefighting_mode());
    }

    #[test]
    fn quick_actions_include_active_integration() {
        let mut s = state();
        s.navigation_context.active_integration = Some(Integration::Jira);
        let actions = s.relevant_quick_actions();
        assert_eq!(actions.len(), 3);
        assert!(actions.iter().any(|a| a.label.contains("Jira")));
    }

    #[test]
    fn quick_actions_in_firefighting_add_crisis() {
        let mut s = state();
        s.current_mode = WorkflowMode::Firefighting;
        s.navigation_context.active_integration = Some(Integration::Linear);
        let ids: Vec<&str> = s.relevant_quick_actions().iter().map(|a| a.id).collect();
        assert_eq!(
            ids,
            [
                "strategic-analysis",
                "command-center",
                "crisis-response",
                "sync-integration"
            ]
        );
    }

    #[test]
    fn quick_actions_base_only() {
        assert_eq!(state().relevant_quick_actions().len(), 2);
    }
}
