//! Fixed-capacity edge containers stored inline in every node.

use std::borrow::Cow;
use core::fmt;

use arrayvec::ArrayVec;

use super::NodeId;
use crate::config::GraphConfig;
use crate::template::TemplateId;

/// Edge list kept sorted by template id; at most one edge per template.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeSet {
    entries: ArrayVec<(TemplateId, NodeId), { GraphConfig::MAX_EDGES_PER_NODE }>,
}

/// Returned when an [`EdgeSet`] or [`DependencySet`] is full.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgesFull;

impl EdgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, template: TemplateId) -> Option<NodeId> {
        self.entries
            .binary_search_by_key(&template, |(key, _)| *key)
            .ok()
            .map(|index| self.entries[index].1)
    }

    pub fn contains_key(&self, template: TemplateId) -> bool {
        self.get(template).is_some()
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.entries.iter().any(|(_, id)| *id == node)
    }

    /// Inserts `node` under `template`.
    ///
    /// Returns `Ok(false)` without touching the set if `template` is already present.
    pub fn insert(&mut self, template: TemplateId, node: NodeId) -> Result<bool, EdgesFull> {
        match self.entries.binary_search_by_key(&template, |(key, _)| *key) {
            Ok(_) => Ok(false),
            Err(index) => {
                if self.entries.is_full() {
                    return Err(EdgesFull);
                }
                self.entries.insert(index, (template, node));
                Ok(true)
            }
        }
    }

    /// Removes the edge under `template` only if it points at `node`.
    pub fn remove(&mut self, template: TemplateId, node: NodeId) -> bool {
        match self.entries.binary_search_by_key(&template, |(key, _)| *key) {
            Ok(index) if self.entries[index].1 == node => {
                self.entries.remove(index);
                true
            }
            _ => false,
        }
    }

    pub fn is_full(&self) -> bool {
        self.entries.is_full()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Edges in ascending template order.
    pub fn iter(&self) -> impl Iterator<Item = (TemplateId, NodeId)> + '_ {
        self.entries.iter().copied()
    }

    /// Copy of the target nodes, for iterating while the graph is mutated.
    pub fn node_ids(&self) -> ArrayVec<NodeId, { GraphConfig::MAX_EDGES_PER_NODE }> {
        self.entries.iter().map(|(_, id)| *id).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Caller-chosen key of a dependency side-channel entry.
///
/// Keys are plain names; a node registered without an explicit key uses its
/// kind's key (see [`AttributeKind::dependency_key`](crate::AttributeKind::dependency_key)).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DependencyKey(Cow<'static, str>);

impl DependencyKey {
    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for DependencyKey {
    fn from(key: &'static str) -> Self {
        Self::from_static(key)
    }
}

impl From<String> for DependencyKey {
    fn from(key: String) -> Self {
        Self(Cow::Owned(key))
    }
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unordered dependency side-channel; one entry per key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencySet {
    entries: ArrayVec<(DependencyKey, NodeId), { GraphConfig::MAX_EDGES_PER_NODE }>,
}

impl DependencySet {
    pub fn get(&self, key: &str) -> Option<NodeId> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, id)| *id)
    }

    /// Returns `Ok(false)` if `key` is already taken.
    pub fn insert(&mut self, key: DependencyKey, node: NodeId) -> Result<bool, EdgesFull> {
        if self.get(key.as_str()).is_some() {
            return Ok(false);
        }
        self.entries.try_push((key, node)).map_err(|_| EdgesFull)?;
        Ok(true)
    }

    pub fn remove(&mut self, key: &str) -> Option<NodeId> {
        let index = self.entries.iter().position(|(k, _)| k.as_str() == key)?;
        Some(self.entries.swap_remove(index).1)
    }

    /// Drops every entry pointing at `node`; returns how many were removed.
    pub fn remove_node(&mut self, node: NodeId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(_, id)| *id != node);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DependencyKey, NodeId)> + '_ {
        self.entries.iter().map(|(key, id)| (key, *id))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_set_stays_sorted_and_unique() {
        let mut set = EdgeSet::new();
        assert_eq!(set.insert(TemplateId(5), NodeId(0)), Ok(true));
        assert_eq!(set.insert(TemplateId(1), NodeId(1)), Ok(true));
        assert_eq!(set.insert(TemplateId(5), NodeId(2)), Ok(false));

        let keys: Vec<_> = set.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec![TemplateId(1), TemplateId(5)]);
        assert_eq!(set.get(TemplateId(5)), Some(NodeId(0)));
    }

    #[test]
    fn edge_set_remove_requires_matching_node() {
        let mut set = EdgeSet::new();
        set.insert(TemplateId(3), NodeId(7)).unwrap();

        assert!(!set.remove(TemplateId(3), NodeId(8)));
        assert!(set.remove(TemplateId(3), NodeId(7)));
        assert!(set.is_empty());
    }

    #[test]
    fn edge_set_reports_full() {
        let mut set = EdgeSet::new();
        for i in 0..GraphConfig::MAX_EDGES_PER_NODE as u32 {
            set.insert(TemplateId(i), NodeId(i)).unwrap();
        }
        assert_eq!(set.insert(TemplateId(999), NodeId(0)), Err(EdgesFull));
        // Existing keys are still a no-op rather than an error.
        assert_eq!(set.insert(TemplateId(0), NodeId(0)), Ok(false));
    }

    #[test]
    fn dependency_set_keys_by_name() {
        let mut deps = DependencySet::default();
        assert_eq!(deps.insert("Vitality".into(), NodeId(4)), Ok(true));
        assert_eq!(deps.insert(String::from("Vitality").into(), NodeId(5)), Ok(false));
        assert_eq!(deps.get("Vitality"), Some(NodeId(4)));
        assert_eq!(deps.remove("Vitality"), Some(NodeId(4)));
        assert_eq!(deps.get("Vitality"), None);
    }
}
