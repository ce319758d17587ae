//! Attribute dependency graph with incremental, pruned recomputation.
//!
//! Nodes live in an arena owned by [`AttributeGraph`] and refer to each other
//! by [`NodeId`]. A child feeds its parents: when a node's final value
//! changes (or a base value is set explicitly) every parent recomputes its
//! modifier from its template's formulas, and so on upward.
//!
//! # Recompute
//!
//! ```text
//! old = final
//! modifier = Σ formula(self, child)   for each formula whose child is attached
//! final    = clamp?(base + modifier)
//! notify listeners                    (always)
//! if force || final != old:
//!     recompute(parent, force = false) for each parent
//! ```
//!
//! Cycles are rejected when an edge is inserted, and propagation depth is
//! bounded by [`GraphConfig::max_propagation_depth`].
mod edges;
mod listener;
mod node;
mod view;

use tracing::{debug, trace, warn};

pub use edges::{DependencyKey, DependencySet, EdgeSet, EdgesFull};
pub use listener::{AttributeFields, AttributeUpdate, ListenerFn, SubscriptionHandle};
pub use node::{AttributeNode, NodeId};
pub use view::NodeView;

use std::sync::Arc;

use crate::config::GraphConfig;
use crate::error::{AttributeError, Result};
use crate::template::{AttributeTemplate, TemplateId, TemplateOracle};
use listener::ListenerSlot;

/// Arena of attribute nodes plus their change listeners.
#[derive(Debug, Default)]
pub struct AttributeGraph {
    nodes: Vec<AttributeNode>,
    listeners: Vec<ListenerSlot>,
    next_handle: u64,
    config: GraphConfig,
}

impl AttributeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ========================================================================
    // Construction & lookup
    // ========================================================================

    /// Creates a node from the registered template `template`.
    ///
    /// The final value is computed once from `base_value + modifier`; no
    /// child-driven recompute happens until children are attached.
    pub fn insert<O>(
        &mut self,
        registry: &O,
        template: TemplateId,
        base_value: i32,
        modifier: i32,
    ) -> Result<NodeId>
    where
        O: TemplateOracle + ?Sized,
    {
        let template = registry.resolve(template)?;
        Ok(self.insert_template(template, base_value, modifier))
    }

    /// Creates a node from an already resolved template.
    pub fn insert_template(
        &mut self,
        template: Arc<AttributeTemplate>,
        base_value: i32,
        modifier: i32,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        trace!(node = %id, template = template.name(), base_value, modifier, "insert attribute");
        self.nodes
            .push(AttributeNode::new(template, base_value, modifier));
        id
    }

    pub fn view(&self, id: NodeId) -> Option<NodeView<'_>> {
        self.nodes
            .get(id.index())
            .map(|node| NodeView::new(self, id, node))
    }

    /// Like [`view`](Self::view) but fails with [`AttributeError::NodeNotFound`].
    pub fn get(&self, id: NodeId) -> Result<NodeView<'_>> {
        self.view(id).ok_or(AttributeError::NodeNotFound(id))
    }

    /// All nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = NodeView<'_>> {
        self.nodes
            .iter()
            .enumerate()
            .map(move |(index, node)| NodeView::new(self, NodeId(index as u32), node))
    }

    fn node(&self, id: NodeId) -> Result<&AttributeNode> {
        self.nodes
            .get(id.index())
            .ok_or(AttributeError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut AttributeNode> {
        self.nodes
            .get_mut(id.index())
            .ok_or(AttributeError::NodeNotFound(id))
    }

    // ========================================================================
    // Base value
    // ========================================================================

    /// Sets the base value and, if it changed, recomputes with forced propagation.
    pub fn set_value(&mut self, id: NodeId, value: i32) -> Result<()> {
        self.set_value_with(id, value, false)
    }

    /// Sets the base value; `skip_propagate` leaves derived values stale.
    pub fn set_value_with(&mut self, id: NodeId, value: i32, skip_propagate: bool) -> Result<()> {
        let node = self.node_mut(id)?;
        if node.base_value == value {
            return Ok(());
        }
        node.base_value = value;
        if skip_propagate {
            return Ok(());
        }
        self.propagate(id, id, true, 0, AttributeFields::BASE)
    }

    /// Adds `delta` (negative to subtract) to the base value.
    pub fn add_value(&mut self, id: NodeId, delta: i32) -> Result<()> {
        self.add_value_with(id, delta, false)
    }

    pub fn add_value_with(&mut self, id: NodeId, delta: i32, skip_propagate: bool) -> Result<()> {
        let base = self.node(id)?.base_value;
        self.set_value_with(id, base.saturating_add(delta), skip_propagate)
    }

    // ========================================================================
    // Overrides (bypass formulas, listeners and propagation)
    // ========================================================================

    /// Overrides the modifier and refreshes the final value only.
    ///
    /// The next recompute of this node rebuilds the modifier from formulas.
    pub fn set_modifier(&mut self, id: NodeId, value: i32) -> Result<()> {
        let node = self.node_mut(id)?;
        if node.modifier != value {
            node.modifier = value;
            node.final_value = node.calculate_final();
        }
        Ok(())
    }

    pub fn add_modifier(&mut self, id: NodeId, delta: i32) -> Result<()> {
        let modifier = self.node(id)?.modifier;
        self.set_modifier(id, modifier.saturating_add(delta))
    }

    /// Writes the final value directly, breaking `final = clamp?(base + modifier)`
    /// until the next recompute.
    pub fn set_final(&mut self, id: NodeId, value: i32) -> Result<()> {
        self.node_mut(id)?.final_value = value;
        Ok(())
    }

    /// Recomputes `final` from the stored base and modifier, nothing else.
    pub(crate) fn refresh_final(&mut self, id: NodeId) -> Result<()> {
        let node = self.node_mut(id)?;
        node.final_value = node.calculate_final();
        Ok(())
    }

    // ========================================================================
    // Resource current value
    // ========================================================================

    /// Sets a resource's current value, clamped to `[0, final]`.
    ///
    /// Listeners are notified when the stored value changes; parents are not
    /// recomputed since formulas read base, modifier and final only.
    pub fn set_current(&mut self, id: NodeId, value: i32) -> Result<()> {
        let node = self.node_mut(id)?;
        let Some(current) = node.current_value else {
            return Err(AttributeError::NotAResource(id));
        };
        let clamped = value.min(node.final_value).max(0);
        if clamped != current {
            node.current_value = Some(clamped);
            self.notify(id, AttributeFields::CURRENT);
        }
        Ok(())
    }

    pub fn add_current(&mut self, id: NodeId, delta: i32) -> Result<()> {
        let current = self
            .node(id)?
            .current_value
            .ok_or(AttributeError::NotAResource(id))?;
        self.set_current(id, current.saturating_add(delta))
    }

    // ========================================================================
    // Parent / child edges
    // ========================================================================

    /// Makes `child` feed `parent`, then recomputes `parent` (unforced).
    ///
    /// Returns `Ok(false)` without touching either node when `parent` already
    /// has a child of the same template, or `child` already feeds another
    /// parent of `parent`'s template.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<bool> {
        let child_node = self.node(child)?;
        let parent_node = self.node(parent)?;
        let child_template = child_node.template.id();
        let parent_template = parent_node.template.id();

        if parent_node.children.contains_key(child_template) {
            debug!(%parent, %child, "child template already attached");
            return Ok(false);
        }
        if let Some(other) = child_node.parents.get(parent_template)
            && other != parent
        {
            debug!(%parent, %child, %other, "child already feeds a parent of this template");
            return Ok(false);
        }
        if self.creates_cycle(parent, child) {
            warn!(%parent, %child, "rejected child edge closing a cycle");
            return Err(AttributeError::CycleDetected { parent, child });
        }
        if parent_node.children.is_full() {
            return Err(capacity_error(parent, "children"));
        }
        if child_node.parents.is_full() && !child_node.parents.contains_key(parent_template) {
            return Err(capacity_error(child, "parents"));
        }

        self.nodes[parent.index()]
            .children
            .insert(child_template, child)
            .map_err(|_| capacity_error(parent, "children"))?;
        self.nodes[child.index()]
            .parents
            .insert(parent_template, parent)
            .map_err(|_| capacity_error(child, "parents"))?;
        debug!(%parent, %child, "attached child");

        self.recompute(parent, false)?;
        Ok(true)
    }

    /// Removes both sides of the edge, then recomputes `parent` (unforced).
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<bool> {
        let child_template = self.node(child)?.template.id();
        let parent_template = self.node(parent)?.template.id();

        let removed = self.nodes[parent.index()]
            .children
            .remove(child_template, child);
        self.nodes[child.index()]
            .parents
            .remove(parent_template, parent);
        debug!(%parent, %child, removed, "detached child");

        self.recompute(parent, false)?;
        Ok(removed)
    }

    /// Registers `parent` on `node` without recomputing anything.
    pub fn add_parent(&mut self, id: NodeId, parent: NodeId) -> Result<bool> {
        let parent_template = self.node(parent)?.template.id();
        let node = self.node(id)?;
        if node.parents.contains_key(parent_template) {
            return Ok(false);
        }
        if self.creates_cycle(parent, id) {
            warn!(node = %id, %parent, "rejected parent edge closing a cycle");
            return Err(AttributeError::CycleDetected { parent, child: id });
        }
        self.nodes[id.index()]
            .parents
            .insert(parent_template, parent)
            .map_err(|_| capacity_error(id, "parents"))
    }

    /// Unregisters `parent` from `node` without recomputing anything.
    pub fn remove_parent(&mut self, id: NodeId, parent: NodeId) -> Result<bool> {
        let parent_template = self.node(parent)?.template.id();
        Ok(self
            .node_mut(id)?
            .parents
            .remove(parent_template, parent))
    }

    /// Returns true if making `parent` depend on `child` would close a cycle,
    /// i.e. `child` is `parent` or already sits above it.
    fn creates_cycle(&self, parent: NodeId, child: NodeId) -> bool {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![parent];
        while let Some(current) = stack.pop() {
            if current == child {
                return true;
            }
            let Some(seen) = visited.get_mut(current.index()) else {
                continue;
            };
            if *seen {
                continue;
            }
            *seen = true;
            stack.extend(self.nodes[current.index()].parents.iter().map(|(_, id)| id));
        }
        false
    }

    // ========================================================================
    // Dependency side-channel
    // ========================================================================

    /// Registers `dependency` under its kind's key (one dependency per kind).
    pub fn add_dependency(&mut self, id: NodeId, dependency: NodeId) -> Result<bool> {
        let key = self.node(dependency)?.template.kind().dependency_key();
        self.add_dependency_as(id, key, dependency)
    }

    /// Registers `dependency` under a caller-chosen key.
    ///
    /// Returns `Ok(false)` if the key is already taken.
    pub fn add_dependency_as(
        &mut self,
        id: NodeId,
        key: impl Into<DependencyKey>,
        dependency: NodeId,
    ) -> Result<bool> {
        self.node(dependency)?;
        self.node_mut(id)?
            .dependencies
            .insert(key.into(), dependency)
            .map_err(|_| capacity_error(id, "dependencies"))
    }

    pub fn remove_dependency(&mut self, id: NodeId, key: &str) -> Result<Option<NodeId>> {
        Ok(self.node_mut(id)?.dependencies.remove(key))
    }

    // ========================================================================
    // Recompute & propagation
    // ========================================================================

    /// Rebuilds the modifier and final value of `id`, notifies its listeners,
    /// and recomputes parents when the final value changed or `force` is set.
    pub fn recompute(&mut self, id: NodeId, force: bool) -> Result<()> {
        self.propagate(id, id, force, 0, AttributeFields::empty())
    }

    fn propagate(
        &mut self,
        origin: NodeId,
        id: NodeId,
        force: bool,
        depth: u32,
        seed: AttributeFields,
    ) -> Result<()> {
        let limit = self.config.max_propagation_depth;
        if depth > limit {
            warn!(%origin, node = %id, limit, "propagation depth exceeded");
            return Err(AttributeError::PropagationDepthExceeded { origin, limit });
        }

        let (old_final, changed) = self.apply_children(id)?;
        self.notify(id, changed | seed);

        let node = &self.nodes[id.index()];
        if !force && node.final_value == old_final {
            trace!(node = %id, final_value = old_final, "final value unchanged, propagation pruned");
            return Ok(());
        }

        for parent in node.parents.node_ids() {
            self.propagate(origin, parent, false, depth + 1, AttributeFields::empty())?;
        }
        Ok(())
    }

    /// Steps 1-4 of recompute. Returns the previous final value and what changed.
    fn apply_children(&mut self, id: NodeId) -> Result<(i32, AttributeFields)> {
        let node = self.node_mut(id)?;
        let old_modifier = node.modifier;
        let old_final = node.final_value;
        let old_current = node.current_value;
        node.modifier = 0;

        let mut modifier: i32 = 0;
        let node = &self.nodes[id.index()];
        let owner = NodeView::new(self, id, node);
        for entry in node.template.formulas() {
            let Some(child) = node
                .children
                .get(entry.child)
                .and_then(|child| self.view(child))
            else {
                continue;
            };
            modifier = modifier.saturating_add(entry.formula.compute_bonus(owner, child));
        }

        let node = &mut self.nodes[id.index()];
        node.modifier = modifier;
        node.final_value = node.calculate_final();
        node.clamp_current();

        let mut changed = AttributeFields::empty();
        changed.set(AttributeFields::MODIFIER, node.modifier != old_modifier);
        changed.set(AttributeFields::FINAL, node.final_value != old_final);
        changed.set(AttributeFields::CURRENT, node.current_value != old_current);
        trace!(node = %id, modifier, final_value = node.final_value, "recomputed");
        Ok((old_final, changed))
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    /// Subscribes `callback` to every recompute of `id`.
    ///
    /// Callbacks run in subscription order and see the graph read-only.
    pub fn subscribe<F>(&mut self, id: NodeId, callback: F) -> Result<SubscriptionHandle>
    where
        F: FnMut(&AttributeUpdate<'_>) + 'static,
    {
        self.node(id)?;
        let handle = SubscriptionHandle(self.next_handle);
        self.next_handle += 1;
        self.listeners.push(ListenerSlot {
            handle,
            node: id,
            callback: Box::new(callback),
        });
        Ok(handle)
    }

    /// Returns false if the handle was unknown or already unsubscribed.
    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        let Some(index) = self
            .listeners
            .iter()
            .position(|slot| slot.handle == handle)
        else {
            return false;
        };
        // `remove`, not `swap_remove`: invocation order is subscription order.
        self.listeners.remove(index);
        true
    }

    pub fn listener_count(&self, id: NodeId) -> usize {
        self.listeners
            .iter()
            .filter(|slot| slot.node == id)
            .count()
    }

    fn notify(&mut self, id: NodeId, changed: AttributeFields) {
        if !self.listeners.iter().any(|slot| slot.node == id) {
            return;
        }
        let mut listeners = std::mem::take(&mut self.listeners);
        if let Some(node) = self.nodes.get(id.index()) {
            let update = AttributeUpdate {
                node: NodeView::new(self, id, node),
                changed,
            };
            for slot in listeners.iter_mut().filter(|slot| slot.node == id) {
                (slot.callback)(&update);
            }
        }
        self.listeners = listeners;
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Cuts every edge touching `id` and recomputes the former parents.
    ///
    /// The node itself stays in the arena with no children, so its modifier
    /// drops back to zero.
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        let node = self.node(id)?;
        let template = node.template.id();
        let children = node.children.node_ids();
        let parents = node.parents.node_ids();

        for child in children {
            if let Some(child_node) = self.nodes.get_mut(child.index()) {
                child_node.parents.remove(template, id);
            }
        }
        self.nodes[id.index()].children.clear();

        for parent in parents {
            self.remove_child(parent, id)?;
        }
        self.nodes[id.index()].parents.clear();
        self.nodes[id.index()].dependencies.clear();
        for other in &mut self.nodes {
            other.dependencies.remove_node(id);
        }

        self.recompute(id, false)
    }

    /// Drops every node, edge and subscription. Outstanding [`NodeId`]s
    /// become invalid.
    pub fn clear(&mut self) {
        debug!(nodes = self.nodes.len(), listeners = self.listeners.len(), "clearing attribute graph");
        for node in &mut self.nodes {
            node.clear_edges();
        }
        self.nodes.clear();
        self.listeners.clear();
    }
}

fn capacity_error(node: NodeId, what: &'static str) -> AttributeError {
    AttributeError::EdgeCapacityExceeded {
        node,
        capacity: GraphConfig::MAX_EDGES_PER_NODE,
        what,
    }
}
