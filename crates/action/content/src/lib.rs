//! Data-driven item action definitions and loaders.
//!
//! This crate turns authored data into live item actions:
//! - Loadouts (data-driven via RON): item actions, groups, module lists
//! - Action configuration (data-driven via TOML)
//!
//! Authored enabled flags and empty module slots are restored as-is, without
//! firing any listener updates.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ActionSpec, ConfigLoader, ContentFactory, GroupKindSpec, GroupSpec, LoadResult,
    LoadoutLoader, LoadoutSpec, ModuleKindSpec, ModuleSpec,
};
