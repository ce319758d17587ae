/// Graph configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GraphConfig {
    /// Maximum recursion depth of a single propagation cascade.
    /// Exceeding it fails with `PropagationDepthExceeded` instead of
    /// overflowing the stack.
    pub max_propagation_depth: u32,
}

impl GraphConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum parent edges, child edges or dependencies held by one node.
    pub const MAX_EDGES_PER_NODE: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_PROPAGATION_DEPTH: u32 = 32;

    pub fn new() -> Self {
        Self {
            max_propagation_depth: Self::DEFAULT_MAX_PROPAGATION_DEPTH,
        }
    }

    pub fn with_max_propagation_depth(max_propagation_depth: u32) -> Self {
        Self {
            max_propagation_depth,
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::new()
    }
}
