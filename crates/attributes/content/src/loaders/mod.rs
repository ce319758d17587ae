//! Content loaders for reading attribute data from files.
//!
//! Loaders convert RON/TOML files into the specs defined in [`crate::specs`]
//! and, where possible, resolve them straight into `attribute-core` types.

pub mod character;
pub mod config;
pub mod factory;
pub mod templates;

pub use character::CharacterLoader;
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use templates::{TemplateCatalog, TemplateLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
