//! Content loaders for reading action data from files.
//!
//! Loadouts are RON, configuration is TOML. Loaders only parse; turning
//! specs into live item actions is [`ContentFactory`]'s job.

pub mod config;
pub mod factory;
pub mod loadout;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use loadout::{
    ActionSpec, GroupKindSpec, GroupSpec, LoadoutLoader, LoadoutSpec, ModuleKindSpec, ModuleSpec,
};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
