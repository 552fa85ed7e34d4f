pub mod config;
pub mod error;
pub mod io;
pub mod keyboard;
pub mod listener;
pub mod paths;
pub mod persist;
pub mod state;
pub mod store;
pub mod suggest;
pub mod types;

pub use error::{Pm33Error, Result};
pub use store::WorkflowStore;
