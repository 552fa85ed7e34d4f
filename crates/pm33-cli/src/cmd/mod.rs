pub mod config;
pub mod engagement;
pub mod init;
pub mod insights;
pub mod onboarding;
pub mod palette;
pub mod session;
pub mod state;

use anyhow::Context;
use pm33_core::{
    config::Config,
    keyboard::Navigator,
    paths,
    persist::{FileStorage, MemoryStorage, StateStorage},
    WorkflowStore,
};
use std::path::Path;

/// Open the project's file-backed store. Every CLI invocation is one
/// session: only the persisted subset carries over from the last one.
pub fn open_store(root: &Path) -> anyhow::Result<(Config, WorkflowStore)> {
    let config = Config::load(root).context("failed to load config")?;
    let storage = FileStorage::new(paths::storage_dir(root));
    let store = WorkflowStore::open(storage, config.store_options());
    Ok((config, store))
}

/// A throwaway store seeded from the persisted record. What-if flags applied
/// to it never reach disk.
pub fn scratch_store(root: &Path) -> anyhow::Result<(Config, WorkflowStore)> {
    let config = Config::load(root).context("failed to load config")?;
    let options = config.store_options();
    let disk = FileStorage::new(paths::storage_dir(root));
    let mut memory = MemoryStorage::new();
    if let Some(record) = disk
        .get_item(&options.key)
        .context("failed to read persisted state")?
    {
        memory.set_item(&options.key, &record)?;
    }
    Ok((config, WorkflowStore::open(memory, options)))
}

/// Prints the full URL for each navigation and optionally opens it in the
/// default browser.
pub struct CliNavigator {
    config: Config,
    open_browser: bool,
}

impl CliNavigator {
    pub fn new(config: &Config, open_browser: bool) -> Self {
        Self {
            config: config.clone(),
            open_browser,
        }
    }
}

impl Navigator for CliNavigator {
    fn navigate(&mut self, route: &str) {
        let url = self.config.url_for(route);
        println!("navigate: {url}");
        if self.open_browser {
            if let Err(e) = open::that(&url) {
                tracing::warn!(%url, error = %e, "failed to open browser");
            }
        }
    }
}
