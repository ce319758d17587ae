use core::fmt;
use std::sync::Arc;

use super::edges::{DependencySet, EdgeSet};
use crate::template::{AttributeKind, AttributeTemplate};

/// Handle of a node inside an [`AttributeGraph`](super::AttributeGraph) arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Runtime state of one attribute.
///
/// Only `base_value` is authoritative; `modifier` is rebuilt from formulas on
/// every recompute and `final_value` follows from both through the template's
/// clamp policy. Edges hold handles, never ownership.
#[derive(Clone, Debug)]
pub struct AttributeNode {
    pub(crate) template: Arc<AttributeTemplate>,
    pub(crate) base_value: i32,
    pub(crate) modifier: i32,
    pub(crate) final_value: i32,
    /// Depletable amount, present only on resource attributes.
    pub(crate) current_value: Option<i32>,
    pub(crate) parents: EdgeSet,
    pub(crate) children: EdgeSet,
    pub(crate) dependencies: DependencySet,
}

impl AttributeNode {
    pub(crate) fn new(template: Arc<AttributeTemplate>, base_value: i32, modifier: i32) -> Self {
        let mut node = Self {
            template,
            base_value,
            modifier,
            final_value: 0,
            current_value: None,
            parents: EdgeSet::new(),
            children: EdgeSet::new(),
            dependencies: DependencySet::default(),
        };
        node.final_value = node.calculate_final();
        if node.template.kind() == AttributeKind::Resource {
            // Resources spawn full.
            node.current_value = Some(node.final_value.max(0));
        }
        node
    }

    pub(crate) fn calculate_final(&self) -> i32 {
        self.template
            .resolve_final(self.base_value.saturating_add(self.modifier))
    }

    /// Keeps a resource's current value inside `[0, final]`.
    pub(crate) fn clamp_current(&mut self) {
        if let Some(current) = self.current_value {
            self.current_value = Some(current.min(self.final_value).max(0));
        }
    }

    pub fn template(&self) -> &Arc<AttributeTemplate> {
        &self.template
    }

    pub fn base_value(&self) -> i32 {
        self.base_value
    }

    pub fn modifier(&self) -> i32 {
        self.modifier
    }

    pub fn final_value(&self) -> i32 {
        self.final_value
    }

    pub fn current_value(&self) -> Option<i32> {
        self.current_value
    }

    pub fn parents(&self) -> &EdgeSet {
        &self.parents
    }

    pub fn children(&self) -> &EdgeSet {
        &self.children
    }

    pub fn dependencies(&self) -> &DependencySet {
        &self.dependencies
    }

    pub(crate) fn clear_edges(&mut self) {
        self.parents.clear();
        self.children.clear();
        self.dependencies.clear();
    }
}
