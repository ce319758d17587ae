//! Common error infrastructure for attribute-core.
//!
//! Every fallible graph, registry and sheet operation reports an
//! [`AttributeError`]. Lookups of optional data (a missing dependency, an
//! unattached child) are not errors: they resolve to zero.
//!
//! # Design Principles
//!
//! - **Fail fast**: unknown template identifiers and dangling node handles are
//!   rejected instead of producing half-built nodes
//! - **Idempotent edits**: inserting an edge that already exists is `Ok(false)`
//! - **Severity Classification**: errors are categorized for recovery strategies

use crate::graph::NodeId;
use crate::template::TemplateId;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: Unrecoverable errors indicating a corrupted graph
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input, should not retry without changes.
    ///
    /// Examples: unknown template, edge that would close a cycle
    Validation,

    /// Unexpected state inconsistency.
    ///
    /// Examples: stale node handle, propagation deeper than configured
    Internal,

    /// Graph state cannot be trusted anymore.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Uniform classification interface for attribute errors.
pub trait ClassifiedError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors raised by the attribute graph, template registry and character sheet.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AttributeError {
    /// No template registered under the identifier.
    #[error("attribute template {0} not found")]
    TemplateNotFound(TemplateId),

    /// No template registered under the name.
    #[error("attribute template '{0}' not found")]
    TemplateNameNotFound(String),

    /// Two templates share an identifier or a name.
    #[error("attribute template '{name}' ({id}) is already registered")]
    DuplicateTemplate { id: TemplateId, name: String },

    /// A template formula references a child template that does not exist.
    #[error("formula on '{owner}' references unknown child template '{child}'")]
    FormulaTargetNotFound { owner: String, child: String },

    /// The handle does not refer to a live node in this graph.
    #[error("attribute node {0} not found")]
    NodeNotFound(NodeId),

    /// Inserting the edge would make a node (transitively) depend on itself.
    #[error("edge {parent} -> {child} would create a dependency cycle")]
    CycleDetected { parent: NodeId, child: NodeId },

    /// Recursive propagation went deeper than the configured limit.
    #[error("propagation from {origin} exceeded depth {limit}")]
    PropagationDepthExceeded { origin: NodeId, limit: u32 },

    /// A node has no room left for another edge.
    #[error("node {node} cannot hold more than {capacity} {what}")]
    EdgeCapacityExceeded {
        node: NodeId,
        capacity: usize,
        what: &'static str,
    },

    /// A resource-only operation was used on a standard attribute.
    #[error("attribute node {0} is not a resource attribute")]
    NotAResource(NodeId),
}

impl ClassifiedError for AttributeError {
    fn severity(&self) -> ErrorSeverity {
        use AttributeError::*;
        match self {
            TemplateNotFound(_)
            | TemplateNameNotFound(_)
            | DuplicateTemplate { .. }
            | FormulaTargetNotFound { .. }
            | CycleDetected { .. }
            | EdgeCapacityExceeded { .. }
            | NotAResource(_) => ErrorSeverity::Validation,

            NodeNotFound(_) => ErrorSeverity::Internal,

            // A cascade stopped halfway; parents may hold stale values.
            PropagationDepthExceeded { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        use AttributeError::*;
        match self {
            TemplateNotFound(_) => "ATTR_TEMPLATE_NOT_FOUND",
            TemplateNameNotFound(_) => "ATTR_TEMPLATE_NAME_NOT_FOUND",
            DuplicateTemplate { .. } => "ATTR_DUPLICATE_TEMPLATE",
            FormulaTargetNotFound { .. } => "ATTR_FORMULA_TARGET_NOT_FOUND",
            NodeNotFound(_) => "ATTR_NODE_NOT_FOUND",
            CycleDetected { .. } => "ATTR_CYCLE_DETECTED",
            PropagationDepthExceeded { .. } => "ATTR_PROPAGATION_DEPTH_EXCEEDED",
            EdgeCapacityExceeded { .. } => "ATTR_EDGE_CAPACITY_EXCEEDED",
            NotAResource(_) => "ATTR_NOT_A_RESOURCE",
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, AttributeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        let missing = AttributeError::TemplateNotFound(TemplateId(7));
        assert_eq!(missing.severity(), ErrorSeverity::Validation);
        assert_eq!(missing.error_code(), "ATTR_TEMPLATE_NOT_FOUND");

        let depth = AttributeError::PropagationDepthExceeded {
            origin: NodeId(0),
            limit: 4,
        };
        assert!(depth.severity().is_internal());
        assert_eq!(depth.severity().as_str(), "fatal");
    }

    #[test]
    fn messages_name_the_offender() {
        let err = AttributeError::CycleDetected {
            parent: NodeId(1),
            child: NodeId(2),
        };
        assert_eq!(
            err.to_string(),
            "edge node#1 -> node#2 would create a dependency cycle"
        );
    }
}
