//! Graph configuration loader.

use std::path::Path;

use attribute_core::GraphConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for graph configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`GraphConfig::default`].
    pub fn load(path: &Path) -> LoadResult<GraphConfig> {
        let content = read_file(path)?;
        let config: GraphConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        fs::write(&path, "").unwrap();
        assert_eq!(ConfigLoader::load(&path).unwrap(), GraphConfig::default());

        fs::write(&path, "max_propagation_depth = 4\n").unwrap();
        assert_eq!(
            ConfigLoader::load(&path).unwrap().max_propagation_depth,
            4
        );
    }

    #[test]
    fn rejects_wrong_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_propagation_depth = \"deep\"\n").unwrap();
        assert!(ConfigLoader::load(&path).is_err());
    }
}
