//! Attribute templates: immutable reference data shared by every node of a kind.
//!
//! A template names an attribute ("Health", "Vitality"), bounds its final
//! value, and lists the formulas that turn attached children into a modifier.
//! Templates are loaded once and shared through [`Arc`]; nodes never mutate them.
mod formula;
mod registry;

use core::fmt;
use std::sync::Arc;

pub use formula::{AttributeFormula, FnFormula, FormulaSource, LinearFormula};
pub use registry::{TemplateOracle, TemplateRegistry};

use crate::graph::DependencyKey;

/// Stable integer identifier of an attribute template.
///
/// Identifiers are assigned by content data and are the keys of every
/// parent/child edge set, so lookups never hash strings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TemplateId(pub u32);

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "template#{}", self.0)
    }
}

/// Concrete kind of an attribute node.
///
/// Resource attributes (health, mana) additionally track a depletable
/// current value bounded by their final value.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AttributeKind {
    #[default]
    Standard,
    Resource,
}

impl AttributeKind {
    /// Key under which a node of this kind registers as someone's dependency
    /// when the caller does not pick one explicitly.
    pub const fn dependency_key(self) -> DependencyKey {
        match self {
            Self::Standard => DependencyKey::from_static("standard"),
            Self::Resource => DependencyKey::from_static("resource"),
        }
    }
}

/// One `(child template -> formula)` entry of a template.
#[derive(Clone, Debug)]
pub struct FormulaEntry {
    pub child: TemplateId,
    pub formula: Arc<dyn AttributeFormula>,
}

/// Immutable definition of an attribute kind.
#[derive(Clone, Debug)]
pub struct AttributeTemplate {
    id: TemplateId,
    name: String,
    kind: AttributeKind,
    min_value: i32,
    max_value: i32,
    clamp_final_value: bool,
    formulas: Vec<FormulaEntry>,
}

impl AttributeTemplate {
    /// Create a builder for constructing templates
    pub fn builder(id: TemplateId, name: impl Into<String>) -> AttributeTemplateBuilder {
        AttributeTemplateBuilder::new(id, name)
    }

    pub fn id(&self) -> TemplateId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    pub fn min_value(&self) -> i32 {
        self.min_value
    }

    pub fn max_value(&self) -> i32 {
        self.max_value
    }

    pub fn clamp_final_value(&self) -> bool {
        self.clamp_final_value
    }

    /// Formula entries in declaration order.
    pub fn formulas(&self) -> &[FormulaEntry] {
        &self.formulas
    }

    /// Returns true if some formula of this template reads `child`.
    pub fn has_formula_for(&self, child: TemplateId) -> bool {
        self.formulas.iter().any(|entry| entry.child == child)
    }

    /// Maps `base + modifier` to the final value under this template's clamp policy.
    pub fn resolve_final(&self, raw: i32) -> i32 {
        if self.clamp_final_value {
            // max/min rather than i32::clamp: malformed content with min > max must not panic
            raw.max(self.min_value).min(self.max_value)
        } else {
            raw
        }
    }
}

/// Builder for [`AttributeTemplate`].
#[derive(Debug)]
pub struct AttributeTemplateBuilder {
    template: AttributeTemplate,
}

impl AttributeTemplateBuilder {
    fn new(id: TemplateId, name: impl Into<String>) -> Self {
        Self {
            template: AttributeTemplate {
                id,
                name: name.into(),
                kind: AttributeKind::Standard,
                min_value: 0,
                max_value: i32::MAX,
                clamp_final_value: false,
                formulas: Vec::new(),
            },
        }
    }

    pub fn kind(mut self, kind: AttributeKind) -> Self {
        self.template.kind = kind;
        self
    }

    /// Shorthand for `kind(AttributeKind::Resource)`.
    pub fn resource(self) -> Self {
        self.kind(AttributeKind::Resource)
    }

    pub fn bounds(mut self, min_value: i32, max_value: i32) -> Self {
        self.template.min_value = min_value;
        self.template.max_value = max_value;
        self
    }

    pub fn clamped(mut self, clamp: bool) -> Self {
        self.template.clamp_final_value = clamp;
        self
    }

    /// Adds a formula computing a bonus from the attached child of template `child`.
    ///
    /// A second formula for the same child is kept; both contribute.
    pub fn formula(mut self, child: TemplateId, formula: impl AttributeFormula + 'static) -> Self {
        self.template.formulas.push(FormulaEntry {
            child,
            formula: Arc::new(formula),
        });
        self
    }

    /// Adds an already shared formula.
    pub fn shared_formula(mut self, child: TemplateId, formula: Arc<dyn AttributeFormula>) -> Self {
        self.template.formulas.push(FormulaEntry { child, formula });
        self
    }

    pub fn build(self) -> AttributeTemplate {
        self.template
    }
}
