//! Character blueprint loader.

use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::specs::CharacterSpec;

/// Loader for character specs from RON files.
pub struct CharacterLoader;

impl CharacterLoader {
    /// Load a character spec from a RON file.
    ///
    /// Template names stay unresolved; see [`CharacterSpec::to_blueprint`].
    pub fn load(path: &Path) -> LoadResult<CharacterSpec> {
        let content = read_file(path)?;
        let character: CharacterSpec = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse character RON: {}", e))?;

        Ok(character)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn loads_character_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"CharacterSpec(
                name: "hero",
                attributes: [
                    (template: "Vitality", base_value: 10),
                    (template: "Health", base_value: 50, modifier: 2),
                ],
            )"#
        )
        .unwrap();

        let character = CharacterLoader::load(file.path()).unwrap();
        assert_eq!(character.name, "hero");
        assert_eq!(character.attributes.len(), 2);
        assert_eq!(character.attributes[0].modifier, 0);
        assert_eq!(character.attributes[1].modifier, 2);
    }
}
