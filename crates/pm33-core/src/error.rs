use thiserror::Error;

#[derive(Debug, Error)]
pub enum Pm33Error {
    #[error("not initialized: run 'pm33 init'")]
    NotInitialized,

    #[error("invalid workflow mode: {0}")]
    InvalidMode(String),

    #[error("invalid persona: {0}")]
    InvalidPersona(String),

    #[error("invalid onboarding stage: {0}")]
    InvalidStage(String),

    #[error("invalid integration: {0}")]
    InvalidIntegration(String),

    #[error("invalid analysis framework: {0}")]
    InvalidFramework(String),

    #[error("invalid key chord '{0}': expected e.g. 'ctrl+k' or 'cmd+k'")]
    InvalidChord(String),

    #[error("invalid storage key '{0}': must be non-empty without path separators")]
    InvalidStorageKey(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Pm33Error>;
