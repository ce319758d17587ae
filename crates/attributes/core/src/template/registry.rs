//! Template registry: the read-only lookup every node is constructed from.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{AttributeTemplate, TemplateId};
use crate::error::{AttributeError, Result};

/// Read-only access to attribute templates.
///
/// Runtime systems hand an oracle to the graph and the character sheet;
/// tests and tools usually use [`TemplateRegistry`] directly.
pub trait TemplateOracle {
    fn template(&self, id: TemplateId) -> Option<Arc<AttributeTemplate>>;

    fn template_by_name(&self, name: &str) -> Option<Arc<AttributeTemplate>>;

    /// All registered identifiers in ascending order.
    fn template_ids(&self) -> Vec<TemplateId>;

    /// Resolves `id`, failing with [`AttributeError::TemplateNotFound`].
    fn resolve(&self, id: TemplateId) -> Result<Arc<AttributeTemplate>> {
        self.template(id)
            .ok_or(AttributeError::TemplateNotFound(id))
    }

    /// Resolves `name`, failing with [`AttributeError::TemplateNameNotFound`].
    fn resolve_name(&self, name: &str) -> Result<Arc<AttributeTemplate>> {
        self.template_by_name(name)
            .ok_or_else(|| AttributeError::TemplateNameNotFound(name.to_owned()))
    }
}

/// In-memory template registry keyed by identifier and by name.
#[derive(Clone, Debug, Default)]
pub struct TemplateRegistry {
    by_id: BTreeMap<TemplateId, Arc<AttributeTemplate>>,
    by_name: BTreeMap<String, TemplateId>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a template. Identifiers and names must both be unique.
    pub fn register(&mut self, template: AttributeTemplate) -> Result<Arc<AttributeTemplate>> {
        if self.by_id.contains_key(&template.id()) || self.by_name.contains_key(template.name()) {
            return Err(AttributeError::DuplicateTemplate {
                id: template.id(),
                name: template.name().to_owned(),
            });
        }
        let template = Arc::new(template);
        self.by_name
            .insert(template.name().to_owned(), template.id());
        self.by_id.insert(template.id(), Arc::clone(&template));
        Ok(template)
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, template: AttributeTemplate) -> Result<Self> {
        self.register(template)?;
        Ok(self)
    }

    /// Checks that every formula targets a registered template.
    pub fn validate(&self) -> Result<()> {
        for template in self.by_id.values() {
            for entry in template.formulas() {
                if !self.by_id.contains_key(&entry.child) {
                    return Err(AttributeError::FormulaTargetNotFound {
                        owner: template.name().to_owned(),
                        child: entry.child.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<AttributeTemplate>> {
        self.by_id.values()
    }
}

impl TemplateOracle for TemplateRegistry {
    fn template(&self, id: TemplateId) -> Option<Arc<AttributeTemplate>> {
        self.by_id.get(&id).cloned()
    }

    fn template_by_name(&self, name: &str) -> Option<Arc<AttributeTemplate>> {
        let id = self.by_name.get(name)?;
        self.template(*id)
    }

    fn template_ids(&self) -> Vec<TemplateId> {
        self.by_id.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{FormulaSource, LinearFormula};

    fn strength() -> AttributeTemplate {
        AttributeTemplate::builder(TemplateId(1), "Strength").build()
    }

    #[test]
    fn resolves_by_id_and_name() {
        let registry = TemplateRegistry::new().with(strength()).unwrap();

        assert_eq!(registry.resolve(TemplateId(1)).unwrap().name(), "Strength");
        assert_eq!(registry.resolve_name("Strength").unwrap().id(), TemplateId(1));
        assert_eq!(
            registry.resolve(TemplateId(9)).unwrap_err(),
            AttributeError::TemplateNotFound(TemplateId(9))
        );
        assert!(matches!(
            registry.resolve_name("Luck"),
            Err(AttributeError::TemplateNameNotFound(_))
        ));
    }

    #[test]
    fn rejects_duplicate_id_or_name() {
        let mut registry = TemplateRegistry::new();
        registry.register(strength()).unwrap();

        let same_name = AttributeTemplate::builder(TemplateId(2), "Strength").build();
        assert!(matches!(
            registry.register(same_name),
            Err(AttributeError::DuplicateTemplate { .. })
        ));
        let same_id = AttributeTemplate::builder(TemplateId(1), "Might").build();
        assert!(registry.register(same_id).is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn validate_reports_dangling_formula() {
        let attack = AttributeTemplate::builder(TemplateId(2), "Attack")
            .formula(TemplateId(1), LinearFormula::scale(FormulaSource::Final, 2))
            .build();
        let registry = TemplateRegistry::new().with(attack).unwrap();
        assert!(matches!(
            registry.validate(),
            Err(AttributeError::FormulaTargetNotFound { .. })
        ));

        let registry = registry.with(strength()).unwrap();
        assert!(registry.validate().is_ok());
        assert_eq!(registry.template_ids(), vec![TemplateId(1), TemplateId(2)]);
    }
}
