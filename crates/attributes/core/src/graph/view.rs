use core::fmt;

use super::{AttributeGraph, AttributeNode, NodeId};
use crate::template::{AttributeKind, AttributeTemplate, TemplateId};

/// Read-only view of one node, able to follow its edges.
///
/// Formulas and listeners receive views; they never get mutable access to
/// the graph.
#[derive(Clone, Copy)]
pub struct NodeView<'a> {
    graph: &'a AttributeGraph,
    id: NodeId,
    node: &'a AttributeNode,
}

impl<'a> NodeView<'a> {
    pub(crate) fn new(graph: &'a AttributeGraph, id: NodeId, node: &'a AttributeNode) -> Self {
        Self { graph, id, node }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node(&self) -> &'a AttributeNode {
        self.node
    }

    pub fn template(&self) -> &'a AttributeTemplate {
        self.node.template.as_ref()
    }

    pub fn template_id(&self) -> TemplateId {
        self.node.template.id()
    }

    pub fn name(&self) -> &'a str {
        self.node.template.name()
    }

    pub fn kind(&self) -> AttributeKind {
        self.node.template.kind()
    }

    pub fn base_value(&self) -> i32 {
        self.node.base_value
    }

    pub fn modifier(&self) -> i32 {
        self.node.modifier
    }

    pub fn final_value(&self) -> i32 {
        self.node.final_value
    }

    pub fn final_value_as_f32(&self) -> f32 {
        self.node.final_value as f32
    }

    /// Final value read as a percentage (`final × 0.01`).
    pub fn final_value_as_pct(&self) -> f32 {
        self.node.final_value as f32 * 0.01
    }

    pub fn min_value(&self) -> i32 {
        self.node.template.min_value()
    }

    pub fn max_value(&self) -> i32 {
        self.node.template.max_value()
    }

    /// Current amount of a resource attribute; `None` for standard attributes.
    pub fn current_value(&self) -> Option<i32> {
        self.node.current_value
    }

    /// `current / final` of a resource, `0.0` when the final value is not positive.
    pub fn current_ratio(&self) -> f32 {
        match self.node.current_value {
            Some(current) if self.node.final_value > 0 => {
                current as f32 / self.node.final_value as f32
            }
            _ => 0.0,
        }
    }

    pub fn child(&self, template: TemplateId) -> Option<NodeView<'a>> {
        self.graph.view(self.node.children.get(template)?)
    }

    pub fn parent(&self, template: TemplateId) -> Option<NodeView<'a>> {
        self.graph.view(self.node.parents.get(template)?)
    }

    pub fn children(self) -> impl Iterator<Item = NodeView<'a>> + 'a {
        let (graph, node) = (self.graph, self.node);
        node.children.iter().filter_map(move |(_, id)| graph.view(id))
    }

    pub fn parents(self) -> impl Iterator<Item = NodeView<'a>> + 'a {
        let (graph, node) = (self.graph, self.node);
        node.parents.iter().filter_map(move |(_, id)| graph.view(id))
    }

    // ===== dependency side-channel: absent entries read as zero =====

    pub fn dependency(&self, key: &str) -> Option<NodeView<'a>> {
        self.graph.view(self.node.dependencies.get(key)?)
    }

    pub fn dependency_base_value(&self, key: &str) -> i32 {
        self.dependency(key).map_or(0, |dep| dep.base_value())
    }

    pub fn dependency_min_value(&self, key: &str) -> i32 {
        self.dependency(key).map_or(0, |dep| dep.min_value())
    }

    pub fn dependency_max_value(&self, key: &str) -> i32 {
        self.dependency(key).map_or(0, |dep| dep.max_value())
    }

    pub fn dependency_modifier(&self, key: &str) -> i32 {
        self.dependency(key).map_or(0, |dep| dep.modifier())
    }

    pub fn dependency_final_value(&self, key: &str) -> i32 {
        self.dependency(key).map_or(0, |dep| dep.final_value())
    }
}

impl fmt::Display for NodeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.final_value())
    }
}

impl fmt::Debug for NodeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeView")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("base_value", &self.node.base_value)
            .field("modifier", &self.node.modifier)
            .field("final_value", &self.node.final_value)
            .finish()
    }
}
