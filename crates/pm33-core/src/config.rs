use crate::error::{Pm33Error, Result};
use crate::paths;
use crate::state::DEFAULT_WEEKLY_GOAL;
use crate::store::StoreOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// StorageConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_key() -> String {
    paths::DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
        }
    }
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// Fixed destinations the keyboard shortcuts navigate to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routes {
    #[serde(default = "default_command_center")]
    pub command_center: String,
    #[serde(default = "default_strategic_intelligence")]
    pub strategic_intelligence: String,
    #[serde(default = "default_workflow")]
    pub workflow: String,
}

fn default_command_center() -> String {
    "/command-center".to_string()
}

fn default_strategic_intelligence() -> String {
    "/strategic-intelligence".to_string()
}

fn default_workflow() -> String {
    "/command-center?mode=workflow".to_string()
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            command_center: default_command_center(),
            strategic_intelligence: default_strategic_intelligence(),
            workflow: default_workflow(),
        }
    }
}

impl Routes {
    fn entries(&self) -> [(&'static str, &str); 3] {
        [
            ("command_center", self.command_center.as_str()),
            ("strategic_intelligence", self.strategic_intelligence.as_str()),
            ("workflow", self.workflow.as_str()),
        ]
    }
}

// ---------------------------------------------------------------------------
// EngagementConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementConfig {
    #[serde(default = "default_weekly_goal")]
    pub weekly_goal: u32,
}

fn default_weekly_goal() -> u32 {
    DEFAULT_WEEKLY_GOAL
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            weekly_goal: default_weekly_goal(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub routes: Routes,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub engagement: EngagementConfig,
}

fn default_version() -> u32 {
    1
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            project: ProjectConfig {
                name: project_name.into(),
            },
            storage: StorageConfig::default(),
            routes: Routes::default(),
            base_url: default_base_url(),
            engagement: EngagementConfig::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(Pm33Error::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            key: self.storage.key.clone(),
            weekly_goal: self.engagement.weekly_goal,
        }
    }

    /// `base_url` joined with a route such as `/command-center`.
    pub fn url_for(&self, route: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), route)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if let Err(e) = paths::validate_storage_key(&self.storage.key) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("storage.key: {e}"),
            });
        }

        for (name, route) in self.routes.entries() {
            if !route.starts_with('/') {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("routes.{name} '{route}' should start with '/'"),
                });
            }
        }

        if self.engagement.weekly_goal == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "engagement.weekly_goal is 0; weekly progress will always read complete"
                    .to_string(),
            });
        }

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("base_url '{}' has no http(s) scheme", self.base_url),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::new("pm33-site");
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.project.name, "pm33-site");
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.routes, Routes::default());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let yaml = "project:\n  name: demo\nroutes:\n  workflow: /flow\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.storage.key, paths::DEFAULT_STORAGE_KEY);
        assert_eq!(cfg.routes.workflow, "/flow");
        assert_eq!(cfg.routes.command_center, "/command-center");
        assert_eq!(cfg.engagement.weekly_goal, DEFAULT_WEEKLY_GOAL);
        assert_eq!(cfg.base_url, "http://localhost:3000");
    }

    #[test]
    fn load_missing_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(Pm33Error::NotInitialized)
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::new("demo");
        cfg.engagement.weekly_goal = 7;
        cfg.save(dir.path()).unwrap();
        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.store_options().weekly_goal, 7);
    }

    #[test]
    fn validate_valid_config_no_warnings() {
        assert!(Config::new("demo").validate().is_empty());
    }

    #[test]
    fn validate_flags_problems() {
        let mut cfg = Config::new("demo");
        cfg.storage.key = "../x".into();
        cfg.routes.workflow = "flow".into();
        cfg.engagement.weekly_goal = 0;
        cfg.base_url = "localhost".into();

        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 4);
        assert_eq!(warnings[0].level, WarnLevel::Error);
        assert!(warnings[1].message.contains("routes.workflow"));
    }

    #[test]
    fn url_for_joins_cleanly() {
        let mut cfg = Config::new("demo");
        cfg.base_url = "https://app.pm33.ai/".into();
        assert_eq!(
            cfg.url_for("/command-center"),
            "https://app.pm33.ai/command-center"
        );
    }
}
