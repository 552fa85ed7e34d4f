//! Persisted subset of [`WorkflowState`] and the key/value backends it is
//! written to.
//!
//! Only an allow-list survives a reload: persona, onboarding stage,
//! engagement metrics, the sidebar preference and a sanitized command
//! palette. Everything else starts from defaults each session.

use crate::error::Result;
use crate::io;
use crate::paths;
use crate::state::{CommandPaletteState, EngagementMetrics, WorkflowState, MAX_RECENT_COMMANDS};
use crate::types::{OnboardingStage, Persona};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

pub const PERSIST_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// PersistedState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub persona: Option<Persona>,
    #[serde(default)]
    pub onboarding_stage: OnboardingStage,
    #[serde(default = "default_metrics")]
    pub engagement_metrics: EngagementMetrics,
    #[serde(default)]
    pub sidebar_collapsed: bool,
    #[serde(default)]
    pub command_palette: CommandPaletteState,
}

fn default_metrics() -> EngagementMetrics {
    EngagementMetrics::new(Utc::now())
}

impl PersistedState {
    pub fn from_state(state: &WorkflowState) -> Self {
        Self {
            persona: state.persona,
            onboarding_stage: state.onboarding_stage,
            engagement_metrics: state.engagement_metrics.clone(),
            sidebar_collapsed: state.sidebar_collapsed,
            command_palette: state.command_palette.sanitized(),
        }
    }

    /// Overlay the persisted fields onto `state`. Palette UI state is forced
    /// closed and recent history re-trimmed whatever the record says.
    pub fn apply_to(self, state: &mut WorkflowState) {
        let mut palette = self.command_palette.sanitized();
        palette.recent_commands.truncate(MAX_RECENT_COMMANDS);

        state.persona = self.persona;
        state.onboarding_stage = self.onboarding_stage;
        state.engagement_metrics = self.engagement_metrics;
        state.sidebar_collapsed = self.sidebar_collapsed;
        state.command_palette = palette;
    }
}

/// On-disk wrapper carrying a format version next to the state.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    state: T,
    #[serde(default)]
    version: u32,
}

pub fn to_json(state: &WorkflowState) -> Result<String> {
    let envelope = Envelope {
        state: PersistedState::from_state(state),
        version: PERSIST_VERSION,
    };
    Ok(serde_json::to_string(&envelope)?)
}

pub fn from_json(data: &str) -> Result<PersistedState> {
    let envelope: Envelope<PersistedState> = serde_json::from_str(data)?;
    if envelope.version != PERSIST_VERSION {
        tracing::warn!(
            version = envelope.version,
            expected = PERSIST_VERSION,
            "persisted workflow state has an unexpected version; reading best-effort"
        );
    }
    Ok(envelope.state)
}

// ---------------------------------------------------------------------------
// StateStorage
// ---------------------------------------------------------------------------

/// Synchronous string key/value storage. No integrity or multi-writer
/// guarantees are assumed.
pub trait StateStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// In-process storage. Clones share the same map, so a caller can keep a
/// handle after handing one to a store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl StateStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// One JSON file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn item_path(&self, key: &str) -> Result<PathBuf> {
        paths::validate_storage_key(key)?;
        Ok(paths::storage_item_path(&self.dir, key))
    }
}

impl StateStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        io::read_if_exists(&self.item_path(key)?)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        io::atomic_write(&self.item_path(key)?, value.as_bytes())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        io::remove_if_exists(&self.item_path(key)?)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DEFAULT_WEEKLY_GOAL;
    use crate::types::WorkflowMode;
    use tempfile::TempDir;

    fn busy_state() -> WorkflowState {
        let mut state = WorkflowState::new(Utc::now());
        state.current_mode = WorkflowMode::Executing;
        state.persona = Some(Persona::Founder);
        state.onboarding_stage = OnboardingStage::FirstAnalysis;
        state.sidebar_collapsed = true;
        state.notification_count = 4;
        state.critical_alerts_count = 2;
        state.command_palette.is_open = true;
        state.command_palette.search_query = "sync".into();
        state.command_palette.recent_commands = vec!["a".into(), "b".into()];
        state.engagement_metrics.total_analyses = 9;
        state
    }

    #[test]
    fn serialized_palette_is_closed_and_empty() {
        let json = to_json(&busy_state()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let palette = &value["state"]["commandPalette"];
        assert_eq!(palette["isOpen"], false);
        assert_eq!(palette["searchQuery"], "");
        assert_eq!(value["version"], PERSIST_VERSION);
    }

    #[test]
    fn only_allow_listed_fields_are_written() {
        let json = to_json(&busy_state()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let mut keys: Vec<&str> = value["state"]
            .as_object()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "commandPalette",
                "engagementMetrics",
                "onboardingStage",
                "persona",
                "sidebarCollapsed"
            ]
        );
    }

    #[test]
    fn reload_resets_session_fields() {
        let json = to_json(&busy_state()).unwrap();
        let mut fresh = WorkflowState::new(Utc::now());
        from_json(&json).unwrap().apply_to(&mut fresh);

        assert_eq!(fresh.current_mode, WorkflowMode::Planning);
        assert_eq!(fresh.persona, Some(Persona::Founder));
        assert_eq!(fresh.onboarding_stage, OnboardingStage::FirstAnalysis);
        assert!(fresh.sidebar_collapsed);
        assert_eq!(fresh.notification_count, 0);
        assert_eq!(fresh.critical_alerts_count, 0);
        assert!(!fresh.command_palette.is_open);
        assert!(fresh.command_palette.search_query.is_empty());
        assert_eq!(fresh.command_palette.recent_commands, ["a", "b"]);
        assert_eq!(fresh.engagement_metrics.total_analyses, 9);
    }

    #[test]
    fn hand_edited_record_is_sanitized_on_load() {
        let data = r#"{"state":{"commandPalette":{"isOpen":true,"searchQuery":"x",
            "recentCommands":["1","2","3","4","5","6","7","8","9","10","11","12"]}},"version":1}"#;
        let mut fresh = WorkflowState::new(Utc::now());
        from_json(data).unwrap().apply_to(&mut fresh);
        assert!(!fresh.command_palette.is_open);
        assert!(fresh.command_palette.search_query.is_empty());
        assert_eq!(fresh.command_palette.recent_commands.len(), MAX_RECENT_COMMANDS);
        assert_eq!(fresh.command_palette.quick_actions.len(), 4);
        assert_eq!(fresh.persona, None);
    }

    #[test]
    fn partial_metrics_keep_the_rest_of_the_record() {
        let data = r#"{"state":{"persona":"founder","onboardingStage":"first_analysis",
            "sidebarCollapsed":true,"engagementMetrics":{"currentStreak":4,"totalAnalyses":7,
            "lastEngagement":"2026-03-01T09:00:00Z"}},"version":1}"#;
        let persisted = from_json(data).unwrap();
        let metrics = &persisted.engagement_metrics;
        assert_eq!(metrics.current_streak, 4);
        assert_eq!(metrics.total_analyses, 7);
        assert_eq!(metrics.successful_syncs, 0);
        assert_eq!(metrics.weekly_goal, DEFAULT_WEEKLY_GOAL);

        let mut fresh = WorkflowState::new(Utc::now());
        persisted.apply_to(&mut fresh);
        assert_eq!(fresh.persona, Some(Persona::Founder));
        assert_eq!(fresh.onboarding_stage, OnboardingStage::FirstAnalysis);
        assert!(fresh.sidebar_collapsed);
    }

    #[test]
    fn memory_storage_clones_share_items() {
        let handle = MemoryStorage::new();
        let mut writer = handle.clone();
        writer.set_item("k", "v").unwrap();
        assert_eq!(handle.get_item("k").unwrap().as_deref(), Some("v"));
        writer.remove_item("k").unwrap();
        assert!(handle.is_empty());
    }

    #[test]
    fn file_storage_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path().join("storage"));
        assert!(storage.get_item("pm33").unwrap().is_none());

        storage.set_item("pm33", "{\"a\":1}").unwrap();
        assert!(dir.path().join("storage/pm33.json").exists());
        assert_eq!(
            storage.get_item("pm33").unwrap().as_deref(),
            Some("{\"a\":1}")
        );

        storage.remove_item("pm33").unwrap();
        assert!(storage.get_item("pm33").unwrap().is_none());
    }

    #[test]
    fn file_storage_rejects_path_keys() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path());
        assert!(storage.set_item("../outside", "x").is_err());
    }
}
