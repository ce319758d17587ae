//! Character attribute dependency graph.
//!
//! `attribute-core` models numeric character attributes (Vitality, Health,
//! Attack, ...) whose values derive from one another. Each attribute is a
//! node in an [`AttributeGraph`]; a parent's modifier is rebuilt from its
//! template's formulas over the attached children, and changes propagate
//! upward with pruning when a final value did not move.
//!
//! Reference data lives in [`AttributeTemplate`]s resolved through a
//! [`TemplateOracle`]. [`CharacterAttributes`] owns one graph per character
//! and marks the persistence boundary.
pub mod config;
pub mod error;
pub mod graph;
pub mod sheet;
pub mod template;

pub use config::GraphConfig;
pub use error::{AttributeError, ClassifiedError, ErrorSeverity, Result};
pub use graph::{
    AttributeFields, AttributeGraph, AttributeNode, AttributeUpdate, DependencyKey, NodeId,
    NodeView, SubscriptionHandle,
};
pub use sheet::{AttributeBlueprint, AttributeRecord, BlueprintEntry, CharacterAttributes};
pub use template::{
    AttributeFormula, AttributeKind, AttributeTemplate, AttributeTemplateBuilder, FnFormula,
    FormulaEntry, FormulaSource, LinearFormula, TemplateId, TemplateOracle, TemplateRegistry,
};
