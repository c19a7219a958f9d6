//! Action configuration loader.

use std::path::Path;

use action_core::ActionConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for action configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`ActionConfig::default`].
    pub fn load(path: &Path) -> LoadResult<ActionConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ActionConfig> {
        let config: ActionConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let config = ConfigLoader::parse("max_event_chain = 3\n").unwrap();
        assert_eq!(config.max_event_chain, 3);
        assert_eq!(config.default_switch_loop, ActionConfig::DEFAULT_SWITCH_LOOP);
    }

    #[test]
    fn empty_file_is_default_config() {
        assert_eq!(ConfigLoader::parse("").unwrap(), ActionConfig::default());
    }
}
