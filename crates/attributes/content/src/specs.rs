//! Serializable specs for templates and characters.
//!
//! Content authors refer to attributes by name; [`build_registry`] and
//! [`CharacterSpec::to_blueprint`] resolve those names to identifiers.

use std::collections::BTreeMap;

use attribute_core::{
    AttributeBlueprint, AttributeError, AttributeKind, AttributeTemplate, BlueprintEntry,
    FormulaSource, LinearFormula, TemplateId, TemplateOracle, TemplateRegistry,
};

#[cfg(feature = "serde")]
fn one() -> i32 {
    1
}

#[cfg(feature = "serde")]
fn unbounded() -> i32 {
    i32::MAX
}

/// `child × numerator / denominator + offset` over a child picked by name.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormulaSpec {
    pub child: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub source: FormulaSource,
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub numerator: i32,
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub denominator: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub offset: i32,
}

impl FormulaSpec {
    pub fn formula(&self) -> LinearFormula {
        LinearFormula::new(self.source, self.numerator, self.denominator, self.offset)
    }
}

/// One attribute template as written in `templates.ron`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateSpec {
    pub id: TemplateId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: AttributeKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_value: i32,
    #[cfg_attr(feature = "serde", serde(default = "unbounded"))]
    pub max_value: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub clamp: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub formulas: Vec<FormulaSpec>,
}

/// Builds a registry from template specs.
///
/// Formula children are resolved by name across the whole list, so a template
/// may reference one declared after it.
pub fn build_registry(specs: &[TemplateSpec]) -> attribute_core::Result<TemplateRegistry> {
    let ids: BTreeMap<&str, TemplateId> = specs
        .iter()
        .map(|spec| (spec.name.as_str(), spec.id))
        .collect();

    let mut registry = TemplateRegistry::new();
    for spec in specs {
        let mut builder = AttributeTemplate::builder(spec.id, spec.name.as_str())
            .kind(spec.kind)
            .bounds(spec.min_value, spec.max_value)
            .clamped(spec.clamp);
        for formula in &spec.formulas {
            let Some(&child) = ids.get(formula.child.as_str()) else {
                return Err(AttributeError::FormulaTargetNotFound {
                    owner: spec.name.clone(),
                    child: formula.child.clone(),
                });
            };
            builder = builder.formula(child, formula.formula());
        }
        registry.register(builder.build())?;
    }
    registry.validate()?;
    Ok(registry)
}

/// Starting value of one attribute, by template name.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeEntrySpec {
    pub template: String,
    pub base_value: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifier: i32,
}

/// A character as written in `characters/<name>.ron`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterSpec {
    pub name: String,
    pub attributes: Vec<AttributeEntrySpec>,
}

impl CharacterSpec {
    /// Resolves template names into a blueprint.
    pub fn to_blueprint<O>(&self, registry: &O) -> attribute_core::Result<AttributeBlueprint>
    where
        O: TemplateOracle + ?Sized,
    {
        let entries = self
            .attributes
            .iter()
            .map(|entry| {
                let template = registry.resolve_name(&entry.template)?;
                Ok(BlueprintEntry {
                    template: template.id(),
                    base_value: entry.base_value,
                    modifier: entry.modifier,
                })
            })
            .collect::<attribute_core::Result<Vec<_>>>()?;
        Ok(AttributeBlueprint::new(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(id: u32, name: &str, formulas: Vec<FormulaSpec>) -> TemplateSpec {
        TemplateSpec {
            id: TemplateId(id),
            name: name.to_owned(),
            kind: AttributeKind::Standard,
            min_value: 0,
            max_value: i32::MAX,
            clamp: false,
            formulas,
        }
    }

    fn per(child: &str, numerator: i32) -> FormulaSpec {
        FormulaSpec {
            child: child.to_owned(),
            source: FormulaSource::Final,
            numerator,
            denominator: 1,
            offset: 0,
        }
    }

    #[test]
    fn forward_references_resolve() {
        let specs = vec![
            spec(2, "Health", vec![per("Vitality", 5)]),
            spec(1, "Vitality", vec![]),
        ];
        let registry = build_registry(&specs).unwrap();
        let health = registry.resolve_name("Health").unwrap();
        assert!(health.has_formula_for(TemplateId(1)));
    }

    #[test]
    fn unknown_child_name_is_reported() {
        let specs = vec![spec(2, "Health", vec![per("Stamina", 5)])];
        assert_eq!(
            build_registry(&specs).unwrap_err(),
            AttributeError::FormulaTargetNotFound {
                owner: "Health".into(),
                child: "Stamina".into(),
            }
        );
    }

    #[test]
    fn blueprint_resolves_names() {
        let registry = build_registry(&[spec(1, "Vitality", vec![])]).unwrap();
        let character = CharacterSpec {
            name: "hero".into(),
            attributes: vec![AttributeEntrySpec {
                template: "Vitality".into(),
                base_value: 12,
                modifier: 1,
            }],
        };
        let blueprint = character.to_blueprint(&registry).unwrap();
        assert_eq!(
            blueprint.entries,
            vec![BlueprintEntry {
                template: TemplateId(1),
                base_value: 12,
                modifier: 1,
            }]
        );

        let unknown = CharacterSpec {
            name: "ghost".into(),
            attributes: vec![AttributeEntrySpec {
                template: "Luck".into(),
                base_value: 1,
                modifier: 0,
            }],
        };
        assert!(matches!(
            unknown.to_blueprint(&registry),
            Err(AttributeError::TemplateNameNotFound(_))
        ));
    }
}
