//! Sandbox configuration structures and loaders.
use std::env;
use std::path::PathBuf;

/// Where the sandbox reads its data from and how long it runs.
#[derive(Clone, Debug)]
pub struct SandboxConfig {
    pub loadout: PathBuf,
    pub config: Option<PathBuf>,
    pub script: Option<PathBuf>,
    /// Ticks to run when no script is given.
    pub ticks: u32,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            loadout: PathBuf::from(Self::DEFAULT_LOADOUT),
            config: None,
            script: None,
            ticks: Self::DEFAULT_TICKS,
        }
    }
}

impl SandboxConfig {
    pub const DEFAULT_LOADOUT: &'static str = "crates/action/content/data/loadouts/rifle.ron";
    pub const DEFAULT_TICKS: u32 = 12;

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ACTION_LOADOUT` - Loadout RON file (default: the bundled rifle)
    /// - `ACTION_CONFIG` - Action config TOML file (default: built-in defaults)
    /// - `ACTION_SCRIPT` - Input script RON file (default: hold use for `ACTION_TICKS`)
    /// - `ACTION_TICKS` - Ticks to run without a script (default: 12)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(path) = read_env::<PathBuf>("ACTION_LOADOUT") {
            config.loadout = path;
        }
        config.config = read_env::<PathBuf>("ACTION_CONFIG");
        config.script = read_env::<PathBuf>("ACTION_SCRIPT");
        if let Some(ticks) = read_env::<u32>("ACTION_TICKS") {
            config.ticks = ticks.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
