use std::sync::Arc;

use crate::pattern::CompiledPath;
use crate::record::RouteRecord;

/// Stable identity of a matcher node inside its registry arena. Ids are
/// never reused, so a stale id simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

/// The compiled, scored representation of one registered route. Parent
/// and child links are non-owning arena indices; the registry owns every
/// node.
#[derive(Debug)]
pub struct MatcherNode<T> {
    pub(crate) id: NodeId,
    pub(crate) path: CompiledPath,
    pub(crate) record: Arc<RouteRecord<T>>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Set when this node is a secondary entry point sharing another
    /// node's record.
    pub(crate) alias_of: Option<NodeId>,
    pub(crate) aliases: Vec<NodeId>,
    pub(crate) insertion_seq: u64,
}

impl<T> MatcherNode<T> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn record(&self) -> &Arc<RouteRecord<T>> {
        &self.record
    }

    pub fn compiled(&self) -> &CompiledPath {
        &self.path
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_alias(&self) -> bool {
        self.alias_of.is_some()
    }

    /// Only nodes that name something or carry a payload take part in
    /// resolution; bare structural records exist as parents only.
    pub(crate) fn is_matchable(&self) -> bool {
        self.record.name.is_some() || self.record.payload().is_some()
    }
}
