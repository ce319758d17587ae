//! Content factory for building character sheets from data files.

use std::path::{Path, PathBuf};

use attribute_core::{CharacterAttributes, GraphConfig, TemplateRegistry};

use crate::loaders::{CharacterLoader, ConfigLoader, LoadResult, TemplateLoader};
use crate::specs::CharacterSpec;

/// Content factory that loads all attribute content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── templates.ron
/// └── characters/
///     ├── hero.ron
///     └── golem.ron
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

    /// Load graph configuration from `config.toml`, or defaults if the file is absent.
    pub fn load_config(&self) -> LoadResult<GraphConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!("{} not found, using default graph config", path.display());
            return Ok(GraphConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the template registry from `templates.ron`.
    pub fn load_templates(&self) -> LoadResult<TemplateRegistry> {
        let path = self.data_dir.join("templates.ron");
        TemplateLoader::load(&path)
    }

    /// Load a character spec from `characters/{name}.ron`.
    pub fn load_character(&self, name: &str) -> LoadResult<CharacterSpec> {
        let path = self
            .data_dir
            .join("characters")
            .join(format!("{}.ron", name));
        CharacterLoader::load(&path)
    }

    /// Builds a wired character sheet for `name` against `registry`.
    pub fn build_character(
        &self,
        registry: &TemplateRegistry,
        name: &str,
        config: GraphConfig,
    ) -> LoadResult<CharacterAttributes> {
        let spec = self.load_character(name)?;
        let blueprint = spec
            .to_blueprint(registry)
            .map_err(|e| anyhow::anyhow!("Failed to resolve character '{}': {}", name, e))?;
        let sheet = CharacterAttributes::from_blueprint(registry, &blueprint, config)
            .map_err(|e| anyhow::anyhow!("Failed to build character '{}': {}", name, e))?;

        tracing::info!(character = name, attributes = sheet.len(), "built character sheet");
        Ok(sheet)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use attribute_core::TemplateId;

    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn builds_character_from_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("characters")).unwrap();
        fs::write(
            dir.path().join("templates.ron"),
            r#"TemplateCatalog(templates: [
                (id: 1, name: "Vitality"),
                (id: 2, name: "Health", kind: Resource, max_value: 100, clamp: true,
                 formulas: [(child: "Vitality", numerator: 5)]),
            ])"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("characters").join("hero.ron"),
            r#"(name: "hero", attributes: [
                (template: "Vitality", base_value: 10),
                (template: "Health", base_value: 50),
            ])"#,
        )
        .unwrap();

        let factory = ContentFactory::new(dir.path());
        let config = factory.load_config().unwrap();
        assert_eq!(config, GraphConfig::default());

        let registry = factory.load_templates().unwrap();
        let sheet = factory.build_character(&registry, "hero", config).unwrap();
        let health = sheet.try_get_resource_attribute(TemplateId(2)).unwrap();
        assert_eq!(health.final_value(), 100);
        assert_eq!(health.current_value(), Some(100));

        assert!(
            factory
                .build_character(&registry, "villain", GraphConfig::default())
                .is_err()
        );
    }
}
