//! The workflow store: single owner of [`WorkflowState`].
//!
//! Constructed explicitly by the application root and passed by reference to
//! consumers. Reads go through [`WorkflowStore::state`]; writes only through
//! the action methods. After every action the persisted subset is written
//! through to storage (best effort: failures are logged, never surfaced) and
//! change subscribers are notified.

use crate::listener::{Registration, Registry};
use crate::paths::DEFAULT_STORAGE_KEY;
use crate::persist::{self, MemoryStorage, PersistedState, StateStorage};
use crate::state::{Breadcrumb, NavigationContextUpdate, WorkflowState, DEFAULT_WEEKLY_GOAL};
use crate::suggest::{QuickActionDescriptor, Suggestion};
use crate::types::{OnboardingStage, Persona, WorkflowMode};
use chrono::{DateTime, Utc};
use std::fmt;
use std::rc::Rc;

pub type ChangeListener = dyn Fn(&WorkflowState);

/// Guard returned by [`WorkflowStore::subscribe`].
pub type Subscription = Registration<ChangeListener>;

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub key: String,
    /// Weekly goal for a fresh record; a persisted record keeps its own.
    pub weekly_goal: u32,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            weekly_goal: DEFAULT_WEEKLY_GOAL,
        }
    }
}

pub struct WorkflowStore {
    state: WorkflowState,
    storage: Box<dyn StateStorage>,
    options: StoreOptions,
    listeners: Registry<ChangeListener>,
}

impl fmt::Debug for WorkflowStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowStore")
            .field("key", &self.options.key)
            .field("state", &self.state)
            .field("listeners", &self.listeners)
            .finish()
    }
}

impl WorkflowStore {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Build defaults, then rehydrate the persisted subset from `storage`.
    /// An unreadable or corrupt record is logged and ignored.
    pub fn open(storage: impl StateStorage + 'static, options: StoreOptions) -> Self {
        let mut state = fresh_state(&options);

        match storage.get_item(&options.key) {
            Ok(Some(data)) => match persist::from_json(&data) {
                Ok(persisted) => {
                    persisted.apply_to(&mut state);
                    tracing::info!(key = %options.key, "rehydrated workflow state");
                }
                Err(e) => {
                    tracing::warn!(key = %options.key, error = %e, "ignoring corrupt workflow state");
                }
            },
            Ok(None) => {
                tracing::debug!(key = %options.key, "no persisted workflow state; using defaults");
            }
            Err(e) => {
                tracing::warn!(key = %options.key, error = %e, "failed to read workflow state");
            }
        }

        Self {
            state,
            storage: Box::new(storage),
            options,
            listeners: Registry::new(),
        }
    }

    pub fn in_memory() -> Self {
        Self::open(MemoryStorage::new(), StoreOptions::default())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn key(&self) -> &str {
        &self.options.key
    }

    /// The sanitized snapshot that is written to storage.
    pub fn persisted(&self) -> PersistedState {
        PersistedState::from_state(&self.state)
    }

    pub fn contextual_suggestions(&self) -> Vec<Suggestion> {
        self.state.contextual_suggestions()
    }

    pub fn should_show_firefighting_mode(&self) -> bool {
        self.state.should_show_firefighting_mode()
    }

    pub fn relevant_quick_actions(&self) -> Vec<QuickActionDescriptor> {
        self.state.relevant_quick_actions()
    }

    /// Register a callback run after every action. It stays registered until
    /// the returned guard is dropped.
    pub fn subscribe(&self, listener: impl Fn(&WorkflowState) + 'static) -> Subscription {
        let listener: Rc<ChangeListener> = Rc::new(listener);
        self.listeners.register(listener)
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    pub fn set_workflow_state(&mut self, mode: WorkflowMode) {
        self.state.set_mode(mode);
        self.commit("set_workflow_state");
    }

    /// Overwrites any previous persona and routes onboarding to the
    /// persona's entry stage.
    pub fn set_user_persona(&mut self, persona: Persona) {
        self.state.set_persona(persona);
        self.commit("set_user_persona");
    }

    /// Accepts any stage, including regressions.
    pub fn advance_onboarding(&mut self, stage: OnboardingStage) {
        self.advance_onboarding_at(stage, Utc::now());
    }

    pub fn advance_onboarding_at(&mut self, stage: OnboardingStage, now: DateTime<Utc>) {
        self.state.advance_onboarding(stage, now);
        self.commit("advance_onboarding");
    }

    pub fn update_navigation_context(&mut self, update: NavigationContextUpdate) {
        self.state.update_navigation_context(update);
        self.commit("update_navigation_context");
    }

    pub fn add_breadcrumb(
        &mut self,
        label: impl Into<String>,
        path: impl Into<String>,
        context: Option<String>,
    ) {
        self.state.add_breadcrumb(Breadcrumb {
            label: label.into(),
            path: path.into(),
            context,
        });
        self.commit("add_breadcrumb");
    }

    pub fn clear_breadcrumbs(&mut self) {
        self.state.clear_breadcrumbs();
        self.commit("clear_breadcrumbs");
    }

    pub fn record_strategic_analysis(&mut self) {
        self.record_strategic_analysis_at(Utc::now());
    }

    pub fn record_strategic_analysis_at(&mut self, now: DateTime<Utc>) {
        self.state.record_strategic_analysis(now);
        self.commit("record_strategic_analysis");
    }

    pub fn record_successful_sync(&mut self) {
        self.record_successful_sync_at(Utc::now());
    }

    pub fn record_successful_sync_at(&mut self, now: DateTime<Utc>) {
        self.state.record_successful_sync(now);
        self.commit("record_successful_sync");
    }

    pub fn record_power_user_action(&mut self) {
        self.record_power_user_action_at(Utc::now());
    }

    pub fn record_power_user_action_at(&mut self, now: DateTime<Utc>) {
        self.state.record_power_user_action(now);
        self.commit("record_power_user_action");
    }

    pub fn update_streak(&mut self) {
        self.update_streak_at(Utc::now());
    }

    pub fn update_streak_at(&mut self, now: DateTime<Utc>) {
        self.state.update_streak(now);
        self.commit("update_streak");
    }

    pub fn toggle_command_palette(&mut self) {
        self.toggle_command_palette_at(Utc::now());
    }

    pub fn toggle_command_palette_at(&mut self, now: DateTime<Utc>) {
        self.state.toggle_command_palette(now);
        self.commit("toggle_command_palette");
    }

    pub fn set_command_palette_search(&mut self, query: impl Into<String>) {
        self.state.set_command_palette_search(query.into());
        self.commit("set_command_palette_search");
    }

    pub fn add_recent_command(&mut self, id: impl Into<String>) {
        self.state.add_recent_command(id.into());
        self.commit("add_recent_command");
    }

    pub fn toggle_sidebar(&mut self) {
        self.toggle_sidebar_at(Utc::now());
    }

    pub fn toggle_sidebar_at(&mut self, now: DateTime<Utc>) {
        self.state.toggle_sidebar(now);
        self.commit("toggle_sidebar");
    }

    pub fn push_notification(&mut self) {
        self.state.push_notification();
        self.commit("push_notification");
    }

    pub fn clear_notifications(&mut self) {
        self.state.clear_notifications();
        self.commit("clear_notifications");
    }

    pub fn add_critical_alert(&mut self) {
        self.state.add_critical_alert();
        self.commit("add_critical_alert");
    }

    /// Return every field to its default and persist the result.
    pub fn reset(&mut self) {
        self.state = fresh_state(&self.options);
        self.commit("reset");
    }

    // -----------------------------------------------------------------------
    // Write-through
    // -----------------------------------------------------------------------

    fn commit(&mut self, action: &'static str) {
        tracing::debug!(
            action,
            mode = %self.state.current_mode,
            stage = %self.state.onboarding_stage,
            "workflow state updated"
        );

        match persist::to_json(&self.state) {
            Ok(data) => {
                if let Err(e) = self.storage.set_item(&self.options.key, &data) {
                    tracing::warn!(action, error = %e, "failed to persist workflow state");
                }
            }
            Err(e) => tracing::warn!(action, error = %e, "failed to serialize workflow state"),
        }

        for listener in self.listeners.snapshot() {
            listener(&self.state);
        }
    }
}

fn fresh_state(options: &StoreOptions) -> WorkflowState {
    let mut state = WorkflowState::new(Utc::now());
    state.engagement_metrics.weekly_goal = options.weekly_goal;
    state
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
