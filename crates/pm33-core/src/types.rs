use crate::error::Pm33Error;
use serde::{Deserialize, Serialize};
use std::fmt;

fn normalize(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace('-', "_")
}

// ---------------------------------------------------------------------------
// WorkflowMode
// ---------------------------------------------------------------------------

/// The user's current high-level task context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowMode {
    #[default]
    Planning,
    Executing,
    Reviewing,
    Firefighting,
}

impl WorkflowMode {
    pub fn all() -> &'static [WorkflowMode] {
        &[
            WorkflowMode::Planning,
            WorkflowMode::Executing,
            WorkflowMode::Reviewing,
            WorkflowMode::Firefighting,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowMode::Planning => "planning",
            WorkflowMode::Executing => "executing",
            WorkflowMode::Reviewing => "reviewing",
            WorkflowMode::Firefighting => "firefighting",
        }
    }
}

impl fmt::Display for WorkflowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WorkflowMode {
    type Err = Pm33Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "planning" => Ok(WorkflowMode::Planning),
            "executing" => Ok(WorkflowMode::Executing),
            "reviewing" => Ok(WorkflowMode::Reviewing),
            "firefighting" => Ok(WorkflowMode::Firefighting),
            _ => Err(Pm33Error::InvalidMode(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Persona
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    SeniorManager,
    ExecutiveLeader,
    Founder,
}

impl Persona {
    pub fn all() -> &'static [Persona] {
        &[
            Persona::SeniorManager,
            Persona::ExecutiveLeader,
            Persona::Founder,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Persona::SeniorManager => "senior_manager",
            Persona::ExecutiveLeader => "executive_leader",
            Persona::Founder => "founder",
        }
    }

    /// The onboarding stage a freshly selected persona is routed to.
    pub fn entry_stage(self) -> OnboardingStage {
        match self {
            Persona::ExecutiveLeader => OnboardingStage::ToolConnection,
            Persona::Founder | Persona::SeniorManager => OnboardingStage::StrategicSetup,
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Persona {
    type Err = Pm33Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "senior_manager" => Ok(Persona::SeniorManager),
            "executive_leader" => Ok(Persona::ExecutiveLeader),
            "founder" => Ok(Persona::Founder),
            _ => Err(Pm33Error::InvalidPersona(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// OnboardingStage
// ---------------------------------------------------------------------------

/// Forward-moving checkpoint of the guided first-run experience.
///
/// Variants are declared in progression order; `Ord` follows it. Nothing
/// forbids moving backwards, the ordering is informational.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStage {
    #[default]
    PersonaSelection,
    StrategicSetup,
    ToolConnection,
    FirstAnalysis,
    WorkflowDiscovery,
    PowerUser,
    Completed,
}

impl OnboardingStage {
    pub fn all() -> &'static [OnboardingStage] {
        &[
            OnboardingStage::PersonaSelection,
            OnboardingStage::StrategicSetup,
            OnboardingStage::ToolConnection,
            OnboardingStage::FirstAnalysis,
            OnboardingStage::WorkflowDiscovery,
            OnboardingStage::PowerUser,
            OnboardingStage::Completed,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<OnboardingStage> {
        OnboardingStage::all().get(self.index() + 1).copied()
    }

    pub fn is_terminal(self) -> bool {
        self == OnboardingStage::Completed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OnboardingStage::PersonaSelection => "persona_selection",
            OnboardingStage::StrategicSetup => "strategic_setup",
            OnboardingStage::ToolConnection => "tool_connection",
            OnboardingStage::FirstAnalysis => "first_analysis",
            OnboardingStage::WorkflowDiscovery => "workflow_discovery",
            OnboardingStage::PowerUser => "power_user",
            OnboardingStage::Completed => "completed",
        }
    }
}

impl fmt::Display for OnboardingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OnboardingStage {
    type Err = Pm33Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        OnboardingStage::all()
            .iter()
            .copied()
            .find(|stage| stage.as_str() == normalized)
            .ok_or_else(|| Pm33Error::InvalidStage(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Integration
// ---------------------------------------------------------------------------

/// External work-tracking tool the user has connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Integration {
    Jira,
    Linear,
    Monday,
    Asana,
}

impl Integration {
    pub fn all() -> &'static [Integration] {
        &[
            Integration::Jira,
            Integration::Linear,
            Integration::Monday,
            Integration::Asana,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Integration::Jira => "jira",
            Integration::Linear => "linear",
            Integration::Monday => "monday",
            Integration::Asana => "asana",
        }
    }

    /// Display name used in user-facing labels.
    pub fn label(self) -> &'static str {
        match self {
            Integration::Jira => "Jira",
            Integration::Linear => "Linear",
            Integration::Monday => "Monday",
            Integration::Asana => "Asana",
        }
    }
}

impl fmt::Display for Integration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Integration {
    type Err = Pm33Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "jira" => Ok(Integration::Jira),
            "linear" => Ok(Integration::Linear),
            "monday" => Ok(Integration::Monday),
            "asana" => Ok(Integration::Asana),
            _ => Err(Pm33Error::InvalidIntegration(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// AnalysisFramework
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisFramework {
    Ice,
    Rice,
    PortersFiveForces,
    Custom,
}

impl AnalysisFramework {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisFramework::Ice => "ice",
            AnalysisFramework::Rice => "rice",
            AnalysisFramework::PortersFiveForces => "porters_five_forces",
            AnalysisFramework::Custom => "custom",
        }
    }
}

impl fmt::Display for AnalysisFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AnalysisFramework {
    type Err = Pm33Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "ice" => Ok(AnalysisFramework::Ice),
            "rice" => Ok(AnalysisFramework::Rice),
            "porters_five_forces" | "porter" => Ok(AnalysisFramework::PortersFiveForces),
            "custom" => Ok(AnalysisFramework::Custom),
            _ => Err(Pm33Error::InvalidFramework(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// QuickActionCategory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickActionCategory {
    Navigation,
    Analysis,
    Integration,
    Workflow,
}

impl fmt::Display for QuickActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuickActionCategory::Navigation => "navigation",
            QuickActionCategory::Analysis => "analysis",
            QuickActionCategory::Integration => "integration",
            QuickActionCategory::Workflow => "workflow",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn mode_parse_accepts_any_case() {
        assert_eq!(
            WorkflowMode::from_str("Firefighting").unwrap(),
            WorkflowMode::Firefighting
        );
        assert!(WorkflowMode::from_str("panicking").is_err());
    }

    #[test]
    fn as_str_parses_back_for_every_variant() {
        for mode in WorkflowMode::all() {
            assert_eq!(WorkflowMode::from_str(mode.as_str()).unwrap(), *mode);
        }
        for persona in Persona::all() {
            assert_eq!(Persona::from_str(persona.as_str()).unwrap(), *persona);
        }
        for tool in Integration::all() {
            assert_eq!(Integration::from_str(&tool.to_string()).unwrap(), *tool);
        }
    }

    #[test]
    fn persona_parse_accepts_kebab_case() {
        assert_eq!(
            Persona::from_str("executive-leader").unwrap(),
            Persona::ExecutiveLeader
        );
        assert_eq!(
            Persona::from_str("senior_manager").unwrap(),
            Persona::SeniorManager
        );
        assert!(matches!(
            Persona::from_str("intern"),
            Err(Pm33Error::InvalidPersona(_))
        ));
    }

    #[test]
    fn persona_entry_stage_routing() {
        assert_eq!(
            Persona::Founder.entry_stage(),
            OnboardingStage::StrategicSetup
        );
        assert_eq!(
            Persona::ExecutiveLeader.entry_stage(),
            OnboardingStage::ToolConnection
        );
        assert_eq!(
            Persona::SeniorManager.entry_stage(),
            OnboardingStage::StrategicSetup
        );
    }

    #[test]
    fn stage_ordering_and_next() {
        assert!(OnboardingStage::PersonaSelection < OnboardingStage::StrategicSetup);
        assert_eq!(
            OnboardingStage::PowerUser.next(),
            Some(OnboardingStage::Completed)
        );
        assert_eq!(OnboardingStage::Completed.next(), None);
        assert!(OnboardingStage::Completed.is_terminal());
    }

    #[test]
    fn stage_parse_every_variant() {
        for stage in OnboardingStage::all() {
            assert_eq!(OnboardingStage::from_str(stage.as_str()).unwrap(), *stage);
        }
        assert_eq!(
            OnboardingStage::from_str("first-analysis").unwrap(),
            OnboardingStage::FirstAnalysis
        );
    }

    #[test]
    fn integration_serializes_snake_case() {
        let json = serde_json::to_string(&Integration::Jira).unwrap();
        assert_eq!(json, "\"jira\"");
        assert_eq!(Integration::Monday.label(), "Monday");
    }

    #[test]
    fn framework_accepts_short_alias() {
        assert_eq!(
            AnalysisFramework::from_str("porter").unwrap(),
            AnalysisFramework::PortersFiveForces
        );
    }
}
