//! Simulator configuration structures and loaders.
use std::env;
use std::path::PathBuf;

/// Content shipped with the workspace.
const DEFAULT_DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../attributes/content/data");

/// Runtime configuration of the simulator.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Directory holding `templates.ron`, `config.toml` and `characters/`.
    pub data_dir: PathBuf,
    /// Directory for saved characters; defaults to `<data_dir>/saves`.
    pub save_dir: Option<PathBuf>,
    /// Overrides `max_propagation_depth` from `config.toml`.
    pub max_depth: Option<u32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            save_dir: None,
            max_depth: None,
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ATTRSIM_DATA_DIR` - Content directory (default: bundled content)
    /// - `ATTRSIM_SAVE_DIR` - Save directory (default: `<data_dir>/saves`)
    /// - `ATTRSIM_MAX_DEPTH` - Propagation depth limit (default: from `config.toml`)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("ATTRSIM_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.save_dir = env::var("ATTRSIM_SAVE_DIR").ok().map(PathBuf::from);
        config.max_depth = read_env::<u32>("ATTRSIM_MAX_DEPTH").map(|depth| depth.max(1));

        config
    }

    pub fn save_dir(&self) -> PathBuf {
        self.save_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("saves"))
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_dir_defaults_under_data_dir() {
        let config = SimConfig {
            data_dir: PathBuf::from("/srv/content"),
            ..SimConfig::default()
        };
        assert_eq!(config.save_dir(), PathBuf::from("/srv/content/saves"));

        let config = SimConfig {
            save_dir: Some(PathBuf::from("/var/saves")),
            ..config
        };
        assert_eq!(config.save_dir(), PathBuf::from("/var/saves"));
    }
}
