//! Character attribute sheet: the owning entity of an attribute graph.
//!
//! A sheet holds at most one attribute per template. Edges are never stored:
//! they are rebuilt from template formulas every time a sheet is built, and
//! only `(template, base, modifier, current)` crosses the persistence boundary.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::GraphConfig;
use crate::error::{AttributeError, Result};
use crate::graph::{AttributeGraph, NodeId, NodeView};
use crate::template::{AttributeKind, TemplateId, TemplateOracle};

/// Initial value of one attribute on a freshly created character.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlueprintEntry {
    pub template: TemplateId,
    pub base_value: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifier: i32,
}

impl BlueprintEntry {
    pub const fn new(template: TemplateId, base_value: i32) -> Self {
        Self {
            template,
            base_value,
            modifier: 0,
        }
    }
}

/// The set of attributes a character starts with.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeBlueprint {
    pub entries: Vec<BlueprintEntry>,
}

impl AttributeBlueprint {
    pub fn new(entries: Vec<BlueprintEntry>) -> Self {
        Self { entries }
    }
}

/// Persisted state of one attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeRecord {
    pub template: TemplateId,
    pub base_value: i32,
    pub modifier: i32,
    /// Current amount of resource attributes.
    pub current_value: Option<i32>,
}

/// All attributes of one character, wired into a single graph.
#[derive(Debug, Default)]
pub struct CharacterAttributes {
    graph: AttributeGraph,
    index: BTreeMap<TemplateId, NodeId>,
}

impl CharacterAttributes {
    pub fn new(config: GraphConfig) -> Self {
        Self {
            graph: AttributeGraph::with_config(config),
            index: BTreeMap::new(),
        }
    }

    /// Creates every blueprint attribute, then wires formula edges between them.
    pub fn from_blueprint<O>(
        registry: &O,
        blueprint: &AttributeBlueprint,
        config: GraphConfig,
    ) -> Result<Self>
    where
        O: TemplateOracle + ?Sized,
    {
        let mut sheet = Self::new(config);
        for entry in &blueprint.entries {
            sheet.add_attribute(registry, entry.template, entry.base_value, entry.modifier)?;
        }
        sheet.wire()?;
        sheet.refill_resources()?;
        Ok(sheet)
    }

    /// Adds one attribute. A template may appear only once per sheet.
    ///
    /// The new node is not wired; call [`wire`](Self::wire) afterwards.
    pub fn add_attribute<O>(
        &mut self,
        registry: &O,
        template: TemplateId,
        base_value: i32,
        modifier: i32,
    ) -> Result<NodeId>
    where
        O: TemplateOracle + ?Sized,
    {
        let resolved = registry.resolve(template)?;
        if self.index.contains_key(&template) {
            return Err(AttributeError::DuplicateTemplate {
                id: template,
                name: resolved.name().to_owned(),
            });
        }
        let id = self.graph.insert_template(resolved, base_value, modifier);
        self.index.insert(template, id);
        Ok(id)
    }

    /// Attaches, for every attribute, each child its template has a formula for.
    ///
    /// Already attached children are skipped, so wiring twice is harmless.
    pub fn wire(&mut self) -> Result<()> {
        let mut edges = Vec::new();
        for &parent in self.index.values() {
            let view = self.graph.get(parent)?;
            for entry in view.template().formulas() {
                if let Some(&child) = self.index.get(&entry.child) {
                    edges.push((parent, child));
                }
            }
        }
        for (parent, child) in edges {
            self.graph.add_child(parent, child)?;
        }
        debug!(attributes = self.index.len(), "wired character attributes");
        Ok(())
    }

    /// Sets every resource attribute's current value to its final value.
    pub fn refill_resources(&mut self) -> Result<()> {
        let resources: Vec<(NodeId, i32)> = self
            .iter()
            .filter(|view| view.current_value().is_some())
            .map(|view| (view.id(), view.final_value()))
            .collect();
        for (id, maximum) in resources {
            self.graph.set_current(id, maximum)?;
        }
        Ok(())
    }

    pub fn graph(&self) -> &AttributeGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut AttributeGraph {
        &mut self.graph
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn node_id(&self, template: TemplateId) -> Option<NodeId> {
        self.index.get(&template).copied()
    }

    fn require(&self, template: TemplateId) -> Result<NodeId> {
        self.node_id(template)
            .ok_or(AttributeError::TemplateNotFound(template))
    }

    pub fn try_get_attribute(&self, template: TemplateId) -> Option<NodeView<'_>> {
        self.graph.view(self.node_id(template)?)
    }

    /// Like [`try_get_attribute`](Self::try_get_attribute) but only for resources.
    pub fn try_get_resource_attribute(&self, template: TemplateId) -> Option<NodeView<'_>> {
        self.try_get_attribute(template)
            .filter(|view| view.kind() == AttributeKind::Resource)
    }

    /// Attributes in ascending template order.
    pub fn iter(&self) -> impl Iterator<Item = NodeView<'_>> {
        self.index
            .values()
            .filter_map(|id| self.graph.view(*id))
    }

    pub fn set_value(&mut self, template: TemplateId, value: i32) -> Result<()> {
        let id = self.require(template)?;
        self.graph.set_value(id, value)
    }

    pub fn add_value(&mut self, template: TemplateId, delta: i32) -> Result<()> {
        let id = self.require(template)?;
        self.graph.add_value(id, delta)
    }

    pub fn add_modifier(&mut self, template: TemplateId, delta: i32) -> Result<()> {
        let id = self.require(template)?;
        self.graph.add_modifier(id, delta)
    }

    pub fn set_current(&mut self, template: TemplateId, value: i32) -> Result<()> {
        let id = self.require(template)?;
        self.graph.set_current(id, value)
    }

    pub fn add_current(&mut self, template: TemplateId, delta: i32) -> Result<()> {
        let id = self.require(template)?;
        self.graph.add_current(id, delta)
    }

    // ========================================================================
    // Persistence boundary
    // ========================================================================

    /// Snapshot of every attribute, in ascending template order.
    pub fn records(&self) -> Vec<AttributeRecord> {
        self.iter()
            .map(|view| AttributeRecord {
                template: view.template_id(),
                base_value: view.base_value(),
                modifier: view.modifier(),
                current_value: view.current_value(),
            })
            .collect()
    }

    /// Restores persisted values onto an already wired sheet.
    ///
    /// Records for templates the sheet does not have are ignored. Base values
    /// and modifiers are written first without propagation, derived attributes
    /// are recomputed once everything is in place, and resource current values
    /// are restored last so they clamp against the rebuilt maximums.
    pub fn apply_records(&mut self, records: &[AttributeRecord]) -> Result<()> {
        let mut applied = Vec::with_capacity(records.len());
        for record in records {
            let Some(id) = self.node_id(record.template) else {
                debug!(template = %record.template, "skipping record for unknown attribute");
                continue;
            };
            self.graph.set_value_with(id, record.base_value, true)?;
            self.graph.set_modifier(id, record.modifier)?;
            self.graph.refresh_final(id)?;
            applied.push((id, record));
        }

        let derived: Vec<NodeId> = self
            .index
            .values()
            .copied()
            .filter(|id| {
                self.graph
                    .view(*id)
                    .is_some_and(|view| view.children().next().is_some())
            })
            .collect();
        for id in derived {
            self.graph.recompute(id, false)?;
        }

        for (id, record) in applied {
            if let Some(current) = record.current_value
                && self.graph.get(id)?.current_value().is_some()
            {
                self.graph.set_current(id, current)?;
            }
        }
        Ok(())
    }

    /// Releases every attribute, edge and listener.
    pub fn teardown(&mut self) {
        self.graph.clear();
        self.index.clear();
    }
}
