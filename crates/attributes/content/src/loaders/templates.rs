//! Attribute template catalog loader.

use std::path::Path;

use attribute_core::TemplateRegistry;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::specs::{TemplateSpec, build_registry};

/// Template catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateCatalog {
    pub templates: Vec<TemplateSpec>,
}

/// Loader for the template catalog.
pub struct TemplateLoader;

impl TemplateLoader {
    /// Load the template catalog from a RON file and build a validated registry.
    pub fn load(path: &Path) -> LoadResult<TemplateRegistry> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a RON catalog held in memory.
    pub fn parse(content: &str) -> LoadResult<TemplateRegistry> {
        let catalog: TemplateCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse template catalog RON: {}", e))?;

        let registry = build_registry(&catalog.templates)
            .map_err(|e| anyhow::anyhow!("Invalid template catalog: {}", e))?;
        tracing::debug!(templates = registry.len(), "loaded attribute templates");

        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use attribute_core::{AttributeKind, TemplateId, TemplateOracle};

    use super::*;

    const CATALOG: &str = r#"
        TemplateCatalog(
            templates: [
                (id: 1, name: "Vitality"),
                (
                    id: 2,
                    name: "Health",
                    kind: Resource,
                    min_value: 0,
                    max_value: 100,
                    clamp: true,
                    formulas: [(child: "Vitality", numerator: 5)],
                ),
            ],
        )
    "#;

    #[test]
    fn parses_catalog_with_defaults() {
        let registry = TemplateLoader::parse(CATALOG).unwrap();
        assert_eq!(registry.len(), 2);

        let vitality = registry.resolve(TemplateId(1)).unwrap();
        assert_eq!(vitality.kind(), AttributeKind::Standard);
        assert_eq!(vitality.max_value(), i32::MAX);
        assert!(!vitality.clamp_final_value());

        let health = registry.resolve_name("Health").unwrap();
        assert_eq!(health.kind(), AttributeKind::Resource);
        assert_eq!(health.resolve_final(250), 100);
        assert!(health.has_formula_for(TemplateId(1)));
    }

    #[test]
    fn dangling_child_fails_to_load() {
        let broken = r#"TemplateCatalog(templates: [(id: 2, name: "Health", formulas: [(child: "Stamina")])])"#;
        let err = TemplateLoader::parse(broken).unwrap_err();
        assert!(err.to_string().contains("Stamina"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = TemplateLoader::load(Path::new("/nonexistent/templates.ron")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/templates.ron"));
    }
}
