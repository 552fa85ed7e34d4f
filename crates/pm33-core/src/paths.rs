use crate::error::{Pm33Error, Result};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const PM33_DIR: &str = ".pm33";
pub const STORAGE_DIR: &str = ".pm33/storage";
pub const CONFIG_FILE: &str = ".pm33/config.yaml";

pub const DEFAULT_STORAGE_KEY: &str = "pm33-workflow-state";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn pm33_dir(root: &Path) -> PathBuf {
    root.join(PM33_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn storage_dir(root: &Path) -> PathBuf {
    root.join(STORAGE_DIR)
}

/// File backing a single storage key.
pub fn storage_item_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{key}.json"))
}

// ---------------------------------------------------------------------------
// Storage key validation
// ---------------------------------------------------------------------------

pub fn validate_storage_key(key: &str) -> Result<()> {
    let bad = key.trim().is_empty()
        || key.len() > 128
        || key.starts_with('.')
        || key.contains(['/', '\\', '\0']);
    if bad {
        return Err(Pm33Error::InvalidStorageKey(key.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
