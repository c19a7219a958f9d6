//! Content factory for building item actions from data files.

use std::path::{Path, PathBuf};

use action_core::{ActionConfig, EntityHandle, ItemAction, RunMode};

use crate::loaders::{ConfigLoader, LoadResult, LoadoutLoader, LoadoutSpec};

/// Content factory that loads action content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── loadouts/
///     ├── rifle.ron
///     └── pistol.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load action configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<ActionConfig> {
        let path = self.data_dir.join("config.toml");
        ConfigLoader::load(&path)
    }

    /// Load a loadout from `loadouts/{name}.ron`.
    pub fn load_loadout(&self, name: &str) -> LoadResult<LoadoutSpec> {
        let path = self.data_dir.join("loadouts").join(format!("{}.ron", name));
        LoadoutLoader::load(&path)
    }

    /// Builds every item action of `loadout`, groups registered but not
    /// initialized.
    pub fn build_actions(
        loadout: &LoadoutSpec,
        config: &ActionConfig,
        mode: RunMode,
    ) -> LoadResult<Vec<ItemAction>> {
        let character = EntityHandle(loadout.character);
        loadout
            .actions
            .iter()
            .map(|spec| spec.build(character, config, mode))
            .collect()
    }

    /// Loads config and loadout `name`, then builds its item actions.
    pub fn load_actions(&self, name: &str, mode: RunMode) -> LoadResult<Vec<ItemAction>> {
        let config = self.load_config()?;
        let loadout = self.load_loadout(name)?;
        Self::build_actions(&loadout, &config, mode)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use action_core::{ActionPhase, GroupId, ModuleGroupBase};
    use tempfile::TempDir;

    use super::*;

    const LOADOUT: &str = r#"(
    character: 3,
    actions: [
        (
            id: 7,
            name: "pistol",
            groups: [
                (
                    kind: Triggers,
                    modules: [
                        Some((name: "semi", kind: Single(cooldown: 1))),
                        Some((name: "burst", enabled: false, kind: Burst(shots: 3, interval: 1))),
                    ],
                ),
                (
                    kind: Clips,
                    modules: [Some((name: "magazine", kind: Clip(capacity: 12)))],
                ),
            ],
        ),
    ],
)"#;

    fn data_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("loadouts")).unwrap();
        fs::write(dir.path().join("loadouts/pistol.ron"), LOADOUT).unwrap();
        fs::write(dir.path().join("config.toml"), "default_switch_loop = false\n").unwrap();
        dir
    }

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn loads_actions_from_data_dir() {
        let dir = data_dir();
        let factory = ContentFactory::new(dir.path());

        let mut actions = factory.load_actions("pistol", RunMode::Running).unwrap();
        assert_eq!(actions.len(), 1);

        let pistol = &mut actions[0];
        assert_eq!(pistol.name(), "pistol");
        assert_eq!(pistol.character(), EntityHandle(3));
        assert!(!pistol.config().default_switch_loop);
        assert_eq!(pistol.phase(), ActionPhase::Uninitialized);

        let triggers = pistol.group_dyn(GroupId(0)).unwrap();
        assert_eq!(triggers.enabled_indices(), &[0]);
        assert_eq!(triggers.disabled_indices(), &[1]);
        assert!(!triggers.module_at(0).unwrap().is_initialized());

        pistol.initialize().unwrap();
        pistol.equip().unwrap();
        let triggers = pistol.group_dyn(GroupId(0)).unwrap();
        assert!(triggers.module_at(0).unwrap().is_listening());
        assert!(!triggers.module_at(1).unwrap().is_listening());
    }

    #[test]
    fn missing_loadout_is_an_error() {
        let dir = data_dir();
        let factory = ContentFactory::new(dir.path());

        let err = factory.load_loadout("shotgun").unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
