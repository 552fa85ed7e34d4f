use crate::types::{
    AnalysisFramework, Integration, OnboardingStage, Persona, QuickActionCategory, WorkflowMode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_BREADCRUMBS: usize = 5;
pub const MAX_RECENT_COMMANDS: usize = 10;
pub const DEFAULT_WEEKLY_GOAL: u32 = 3;

const DAY_MS: i64 = 86_400_000;

// ---------------------------------------------------------------------------
// Navigation context
// ---------------------------------------------------------------------------

/// Summary of the last completed strategic analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub id: String,
    pub framework: AnalysisFramework,
    /// 0–100.
    pub confidence: u8,
    pub timestamp: DateTime<Utc>,
}

impl AnalysisSummary {
    pub fn new(
        id: impl Into<String>,
        framework: AnalysisFramework,
        confidence: u8,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            framework,
            confidence: confidence.min(100),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_integration: Option<Integration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_analysis: Option<AnalysisSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgent_tasks: Option<u32>,
    /// 0–100; treated as 100 when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_pulse_score: Option<u8>,
}

/// Partial update for [`NavigationContext`]. `Some` fields overwrite, `None`
/// fields leave the current value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationContextUpdate {
    pub current_project: Option<String>,
    pub active_integration: Option<Integration>,
    pub last_analysis: Option<AnalysisSummary>,
    pub urgent_tasks: Option<u32>,
    pub team_pulse_score: Option<u8>,
}

impl NavigationContext {
    fn merge(&mut self, update: NavigationContextUpdate) {
        if let Some(project) = update.current_project {
            self.current_project = Some(project);
        }
        if let Some(integration) = update.active_integration {
            self.active_integration = Some(integration);
        }
        if let Some(mut analysis) = update.last_analysis {
            analysis.confidence = analysis.confidence.min(100);
            self.last_analysis = Some(analysis);
        }
        if let Some(urgent) = update.urgent_tasks {
            self.urgent_tasks = Some(urgent);
        }
        if let Some(score) = update.team_pulse_score {
            self.team_pulse_score = Some(score.min(100));
        }
    }
}

// ---------------------------------------------------------------------------
// Breadcrumbs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub label: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

// ---------------------------------------------------------------------------
// Engagement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementMetrics {
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub total_analyses: u32,
    #[serde(default)]
    pub successful_syncs: u32,
    #[serde(default)]
    pub power_user_actions: u32,
    #[serde(default = "Utc::now")]
    pub last_engagement: DateTime<Utc>,
    #[serde(default = "default_weekly_goal")]
    pub weekly_goal: u32,
}

fn default_weekly_goal() -> u32 {
    DEFAULT_WEEKLY_GOAL
}

impl EngagementMetrics {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            current_streak: 0,
            total_analyses: 0,
            successful_syncs: 0,
            power_user_actions: 0,
            last_engagement: now,
            weekly_goal: DEFAULT_WEEKLY_GOAL,
        }
    }

    /// Whole days elapsed since the last engagement, floored. Negative when
    /// the clock went backwards.
    pub fn days_since_engagement(&self, now: DateTime<Utc>) -> i64 {
        let elapsed = (now - self.last_engagement).num_milliseconds();
        elapsed.div_euclid(DAY_MS)
    }

    /// Rolling 24h streak rule: up to one whole day since the last
    /// engagement continues the streak, anything longer restarts it at 1.
    fn update_streak(&mut self, now: DateTime<Utc>) {
        if self.days_since_engagement(now) <= 1 {
            self.current_streak = self.current_streak.saturating_add(1);
        } else {
            self.current_streak = 1;
        }
        self.last_engagement = now;
    }
}

// ---------------------------------------------------------------------------
// Command palette
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,
    pub category: QuickActionCategory,
}

impl QuickAction {
    fn new(id: &str, label: &str, shortcut: &str, category: QuickActionCategory) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            shortcut: Some(shortcut.to_string()),
            category,
        }
    }
}

pub fn default_quick_actions() -> Vec<QuickAction> {
    vec![
        QuickAction::new(
            "command-center",
            "Go to Command Center",
            "⌘H",
            QuickActionCategory::Navigation,
        ),
        QuickAction::new(
            "strategic-analysis",
            "New Strategic Analysis",
            "⌘N",
            QuickActionCategory::Analysis,
        ),
        QuickAction::new(
            "sync-integrations",
            "Sync Integrations",
            "⌘J",
            QuickActionCategory::Integration,
        ),
        QuickAction::new(
            "workflow-view",
            "Open Workflow View",
            "⌘W",
            QuickActionCategory::Workflow,
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandPaletteState {
    #[serde(default)]
    pub is_open: bool,
    #[serde(default)]
    pub search_query: String,
    /// Newest first.
    #[serde(default)]
    pub recent_commands: Vec<String>,
    #[serde(default = "default_quick_actions")]
    pub quick_actions: Vec<QuickAction>,
}

impl Default for CommandPaletteState {
    fn default() -> Self {
        Self {
            is_open: false,
            search_query: String::new(),
            recent_commands: Vec::new(),
            quick_actions: default_quick_actions(),
        }
    }
}

impl CommandPaletteState {
    /// Copy suitable for persistence: closed, with an empty search.
    pub fn sanitized(&self) -> Self {
        Self {
            is_open: false,
            search_query: String::new(),
            recent_commands: self.recent_commands.clone(),
            quick_actions: self.quick_actions.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// WorkflowState
// ---------------------------------------------------------------------------

/// The whole in-memory record. Only [`crate::store::WorkflowStore`] mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
    pub current_mode: WorkflowMode,
    pub persona: Option<Persona>,
    pub onboarding_stage: OnboardingStage,
    pub navigation_context: NavigationContext,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub engagement_metrics: EngagementMetrics,
    pub command_palette: CommandPaletteState,
    pub sidebar_collapsed: bool,
    pub notification_count: u32,
    pub critical_alerts_count: u32,
}

impl WorkflowState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            current_mode: WorkflowMode::default(),
            persona: None,
            onboarding_stage: OnboardingStage::default(),
            navigation_context: NavigationContext::default(),
            breadcrumbs: Vec::new(),
            engagement_metrics: EngagementMetrics::new(now),
            command_palette: CommandPaletteState::default(),
            sidebar_collapsed: false,
            notification_count: 0,
            critical_alerts_count: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Mutations (crate-private; the store wraps them with write-through)
    // -----------------------------------------------------------------------

    /// Navigation context is left alone; entering firefighting keeps the
    /// current urgent task count.
    pub(crate) fn set_mode(&mut self, mode: WorkflowMode) {
        self.current_mode = mode;
    }

    pub(crate) fn set_persona(&mut self, persona: Persona) {
        self.persona = Some(persona);
        self.onboarding_stage = persona.entry_stage();
    }

    pub(crate) fn advance_onboarding(&mut self, stage: OnboardingStage, now: DateTime<Utc>) {
        self.onboarding_stage = stage;
        if stage == OnboardingStage::Completed {
            self.record_power_user_action(now);
        }
    }

    pub(crate) fn update_navigation_context(&mut self, update: NavigationContextUpdate) {
        self.navigation_context.merge(update);
    }

    pub(crate) fn add_breadcrumb(&mut self, crumb: Breadcrumb) {
        self.breadcrumbs.push(crumb);
        if self.breadcrumbs.len() > MAX_BREADCRUMBS {
            let excess = self.breadcrumbs.len() - MAX_BREADCRUMBS;
            self.breadcrumbs.drain(..excess);
        }
    }

    pub(crate) fn clear_breadcrumbs(&mut self) {
        self.breadcrumbs.clear();
    }

    pub(crate) fn record_strategic_analysis(&mut self, now: DateTime<Utc>) {
        let metrics = &mut self.engagement_metrics;
        metrics.total_analyses = metrics.total_analyses.saturating_add(1);
        // Compared against the previous engagement, then stamps `now`.
        metrics.update_streak(now);
    }

    pub(crate) fn record_successful_sync(&mut self, now: DateTime<Utc>) {
        let metrics = &mut self.engagement_metrics;
        metrics.successful_syncs = metrics.successful_syncs.saturating_add(1);
        metrics.last_engagement = now;
    }

    pub(crate) fn record_power_user_action(&mut self, now: DateTime<Utc>) {
        let metrics = &mut self.engagement_metrics;
        metrics.power_user_actions = metrics.power_user_actions.saturating_add(1);
        metrics.last_engagement = now;
    }

    pub(crate) fn update_streak(&mut self, now: DateTime<Utc>) {
        self.engagement_metrics.update_streak(now);
    }

    pub(crate) fn toggle_command_palette(&mut self, now: DateTime<Utc>) {
        let palette = &mut self.command_palette;
        palette.is_open = !palette.is_open;
        palette.search_query.clear();
        if palette.is_open {
            self.record_power_user_action(now);
        }
    }

    pub(crate) fn set_command_palette_search(&mut self, query: String) {
        self.command_palette.search_query = query;
    }

    pub(crate) fn add_recent_command(&mut self, id: String) {
        let recent = &mut self.command_palette.recent_commands;
        recent.insert(0, id);
        recent.truncate(MAX_RECENT_COMMANDS);
    }

    pub(crate) fn toggle_sidebar(&mut self, now: DateTime<Utc>) {
        self.sidebar_collapsed = !self.sidebar_collapsed;
        self.record_power_user_action(now);
    }

    pub(crate) fn push_notification(&mut self) {
        self.notification_count = self.notification_count.saturating_add(1);
    }

    pub(crate) fn clear_notifications(&mut self) {
        self.notification_count = 0;
    }

    pub(crate) fn add_critical_alert(&mut self) {
        self.critical_alerts_count = self.critical_alerts_count.saturating_add(1);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
