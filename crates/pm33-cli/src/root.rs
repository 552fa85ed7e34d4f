use pm33_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the PM33 root directory.
///
/// Priority:
/// 1. `--root` flag / `PM33_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.pm33/`
/// 3. Walk upward from `cwd` looking for `.git/`
/// 4. The home directory, if it holds a `.pm33/`
/// 5. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    if let Some(dir) = find_upward(&cwd, paths::PM33_DIR) {
        return dir;
    }
    if let Some(dir) = find_upward(&cwd, ".git") {
        return dir;
    }
    if let Some(home) = home::home_dir() {
        if paths::pm33_dir(&home).is_dir() {
            return home;
        }
    }

    cwd
}

/// First ancestor of `start` (inclusive) containing a directory named `marker`.
fn find_upward(start: &Path, marker: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(marker).is_dir())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn finds_pm33_dir_from_subdirectory() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".pm33")).unwrap();
        let subdir = dir.path().join("src/deep");
        std::fs::create_dir_all(&subdir).unwrap();

        assert_eq!(find_upward(&subdir, ".pm33").as_deref(), Some(dir.path()));
    }

    #[test]
    fn find_upward_misses_cleanly() {
        let dir = TempDir::new().unwrap();
        assert!(find_upward(dir.path(), ".definitely-not-here").is_none());
    }
}
