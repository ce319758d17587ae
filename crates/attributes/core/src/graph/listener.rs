//! Change notification: explicit, ordered subscriber lists.
//!
//! Listeners run synchronously inside recompute, in subscription order, every
//! time a node's derived values are recomputed (even when nothing changed).

use core::fmt;

use bitflags::bitflags;

use super::{NodeId, NodeView};

bitflags! {
    /// Tracks which values of a node changed during one notification.
    ///
    /// Empty when a recompute reproduced the previous values.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct AttributeFields: u8 {
        const BASE     = 1 << 0;
        const MODIFIER = 1 << 1;
        const FINAL    = 1 << 2;
        const CURRENT  = 1 << 3;
    }
}

/// Handle returned by [`AttributeGraph::subscribe`](super::AttributeGraph::subscribe).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionHandle(pub(crate) u64);

/// Payload handed to listeners.
#[derive(Clone, Copy, Debug)]
pub struct AttributeUpdate<'a> {
    pub node: NodeView<'a>,
    pub changed: AttributeFields,
}

pub type ListenerFn = Box<dyn FnMut(&AttributeUpdate<'_>)>;

pub(crate) struct ListenerSlot {
    pub(crate) handle: SubscriptionHandle,
    pub(crate) node: NodeId,
    pub(crate) callback: ListenerFn,
}

impl fmt::Debug for ListenerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSlot")
            .field("handle", &self.handle)
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}
