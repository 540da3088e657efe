use hashbrown::HashMap;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::config::MatcherConfig;
use crate::errors::{MatcherError, MatcherResult};
use crate::pattern::{CompiledPath, Segment};
use crate::record::{RouteDef, RouteRecord};

use super::node::{MatcherNode, NodeId};

#[derive(Debug)]
pub(crate) struct Registry<T> {
    /// Grow-only arena; removed nodes leave a vacant slot so ids stay
    /// stable and are never reused.
    nodes: Vec<Option<MatcherNode<T>>>,
    names: HashMap<String, NodeId>,
    /// Scan order: score descending with the documented tie-breaks.
    ordered: Vec<NodeId>,
    next_seq: u64,
    config: MatcherConfig,
}

/// Declaration payloads are shared up front so alias siblings and their
/// replicated children can reuse them without cloning `T`.
struct NormalizedDef<T> {
    path: String,
    name: Option<String>,
    aliases: Vec<String>,
    sensitive: Option<bool>,
    strict: Option<bool>,
    end: Option<bool>,
    payload: Option<Arc<T>>,
    children: Vec<NormalizedDef<T>>,
}

fn normalize<T>(def: RouteDef<T>) -> NormalizedDef<T> {
    NormalizedDef {
        path: def.path,
        name: def.name,
        aliases: def.aliases,
        sensitive: def.sensitive,
        strict: def.strict,
        end: def.end,
        payload: def.payload.map(Arc::new),
        children: def.children.into_iter().map(normalize).collect(),
    }
}

#[derive(Clone, Copy)]
enum ParentRef {
    Registered(Option<NodeId>),
    Staged(usize),
}

struct StagedNode<T> {
    compiled: CompiledPath,
    full_path: String,
    name: Option<String>,
    payload: Option<Arc<T>>,
    parent: ParentRef,
    alias_of: Option<usize>,
}

impl<T> Registry<T> {
    pub(crate) fn new(config: MatcherConfig) -> Self {
        Self {
            nodes: Vec::new(),
            names: HashMap::new(),
            ordered: Vec::new(),
            next_seq: 0,
            config,
        }
    }

    pub(crate) fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&MatcherNode<T>> {
        self.nodes.get(id.index()).and_then(|slot| slot.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut MatcherNode<T>> {
        self.nodes.get_mut(id.index()).and_then(|slot| slot.as_mut())
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    pub(crate) fn scan_order(&self) -> &[NodeId] {
        &self.ordered
    }

    /// Snapshot of live matchable records in insertion order.
    pub(crate) fn routes(&self) -> Vec<Arc<RouteRecord<T>>> {
        let mut live: Vec<&MatcherNode<T>> = self
            .nodes
            .iter()
            .flatten()
            .filter(|node| node.is_matchable())
            .collect();
        live.sort_by_key(|node| node.insertion_seq);
        live.into_iter().map(|node| node.record.clone()).collect()
    }

    /// Compiles and inserts a declaration tree. Nothing is committed
    /// until every template in the tree has compiled, so a malformed
    /// child leaves the registry untouched.
    pub(crate) fn add_route(
        &mut self,
        def: RouteDef<T>,
        parent: Option<NodeId>,
    ) -> MatcherResult<NodeId> {
        if let Some(parent_id) = parent
            && self.get(parent_id).is_none()
        {
            return Err(MatcherError::NodeNotFound {
                id: parent_id.value(),
            });
        }

        let normalized = normalize(def);
        let mut staged = Vec::new();
        self.stage(&normalized, ParentRef::Registered(parent), None, &mut staged)?;
        let id = self.commit(staged);
        self.rebuild_order();
        Ok(id)
    }

    pub(crate) fn remove_route(&mut self, name: &str) -> MatcherResult<()> {
        let Some(&id) = self.names.get(name) else {
            return Err(MatcherError::RecordNotFound {
                name: name.to_string(),
            });
        };
        self.remove_node(id);
        self.rebuild_order();
        Ok(())
    }

    pub(crate) fn remove_route_node(&mut self, id: NodeId) -> MatcherResult<()> {
        if self.get(id).is_none() {
            return Err(MatcherError::NodeNotFound { id: id.value() });
        }
        self.remove_node(id);
        self.rebuild_order();
        Ok(())
    }

    fn stage(
        &self,
        def: &NormalizedDef<T>,
        parent: ParentRef,
        counterpart: Option<usize>,
        staged: &mut Vec<StagedNode<T>>,
    ) -> MatcherResult<usize> {
        let flags = self
            .config
            .resolve_flags(def.sensitive, def.strict, def.end);

        let index = self.stage_single(&def.path, def, parent, counterpart, flags, staged)?;

        let mut child_indices = Vec::with_capacity(def.children.len());
        for child in &def.children {
            child_indices.push(self.stage(child, ParentRef::Staged(index), None, staged)?);
        }

        for alias in &def.aliases {
            let alias_index = self.stage_single(alias, def, parent, Some(index), flags, staged)?;
            for (child, original) in def.children.iter().zip(&child_indices) {
                self.stage(child, ParentRef::Staged(alias_index), Some(*original), staged)?;
            }
        }

        Ok(index)
    }

    fn stage_single(
        &self,
        template: &str,
        def: &NormalizedDef<T>,
        parent: ParentRef,
        alias_of: Option<usize>,
        flags: crate::config::PathFlags,
        staged: &mut Vec<StagedNode<T>>,
    ) -> MatcherResult<usize> {
        let empty: &[Segment] = &[];
        let (parent_tokens, parent_path): (&[Segment], &str) = match parent {
            ParentRef::Registered(None) => (empty, ""),
            ParentRef::Registered(Some(id)) => {
                let node = self.get(id).ok_or(MatcherError::NodeNotFound { id: id.value() })?;
                (node.path.tokens(), node.record.path.as_str())
            }
            ParentRef::Staged(index) => (
                staged[index].compiled.tokens(),
                staged[index].full_path.as_str(),
            ),
        };

        let compiled = CompiledPath::compile(template, parent_tokens, flags)?;
        let full_path = join_paths(parent_path, template);
        let index = staged.len();
        staged.push(StagedNode {
            compiled,
            full_path,
            name: def.name.clone(),
            payload: def.payload.clone(),
            parent,
            alias_of,
        });
        Ok(index)
    }

    fn commit(&mut self, staged: Vec<StagedNode<T>>) -> NodeId {
        let base = self.nodes.len() as u32;
        let ids: Vec<NodeId> = (0..staged.len())
            .map(|offset| NodeId(base + offset as u32))
            .collect();

        for (offset, item) in staged.into_iter().enumerate() {
            let id = ids[offset];
            let parent = match item.parent {
                ParentRef::Registered(parent) => parent,
                ParentRef::Staged(index) => Some(ids[index]),
            };
            let alias_of = item.alias_of.map(|index| ids[index]);

            // Names bind to the original subtree only; aliases and their
            // replicated descendants stay out of the name map.
            let register_name =
                item.name.is_some() && alias_of.is_none() && !self.in_alias_subtree(parent);

            let mut seq = None;
            if register_name
                && let Some(name) = &item.name
                && let Some(&previous) = self.names.get(name)
            {
                seq = self.get(previous).map(|node| node.insertion_seq);
                tracing::debug!(name = %name, "replacing route registered under an existing name");
                self.remove_node(previous);
            }
            let insertion_seq = seq.unwrap_or_else(|| {
                let next = self.next_seq;
                self.next_seq += 1;
                next
            });

            let record = Arc::new(RouteRecord::new(item.full_path, item.name, item.payload));
            self.nodes.push(Some(MatcherNode {
                id,
                path: item.compiled,
                record,
                parent,
                children: Vec::new(),
                alias_of,
                aliases: Vec::new(),
                insertion_seq,
            }));

            if let Some(parent_id) = parent
                && let Some(parent_node) = self.get_mut(parent_id)
            {
                parent_node.children.push(id);
            }
            if let Some(original) = alias_of
                && let Some(original_node) = self.get_mut(original)
            {
                original_node.aliases.push(id);
            }
            if register_name
                && let Some(name) = self.get(id).and_then(|node| node.record.name.clone())
            {
                self.names.insert(name, id);
            }
        }

        ids[0]
    }

    fn in_alias_subtree(&self, mut current: Option<NodeId>) -> bool {
        while let Some(id) = current {
            let Some(node) = self.get(id) else {
                return false;
            };
            if node.alias_of.is_some() {
                return true;
            }
            current = node.parent;
        }
        false
    }

    /// Unlinks one node. Children survive in the scan order and re-parent
    /// to the removed node's former parent; alias siblings go with their
    /// original.
    fn remove_node(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id.index()).and_then(|slot| slot.take()) else {
            return;
        };

        if let Some(name) = &node.record.name
            && self.names.get(name) == Some(&id)
        {
            self.names.remove(name);
        }

        if let Some(parent_id) = node.parent
            && let Some(parent) = self.get_mut(parent_id)
        {
            parent.children.retain(|child| *child != id);
            parent.children.extend(node.children.iter().copied());
        }
        for &child in &node.children {
            if let Some(child_node) = self.get_mut(child) {
                child_node.parent = node.parent;
            }
        }

        if let Some(original) = node.alias_of
            && let Some(original_node) = self.get_mut(original)
        {
            original_node.aliases.retain(|alias| *alias != id);
        }
        for &alias in &node.aliases {
            self.remove_node(alias);
        }

        tracing::debug!(path = %node.record.path, "removed matcher node");
    }

    /// Rebuilds the scan order from scratch: live matchable nodes replay
    /// through the insertion rule in insertion-sequence order, which keeps
    /// the relative order of unaffected equal-score nodes stable.
    fn rebuild_order(&mut self) {
        let mut live: Vec<(u64, NodeId)> = self
            .nodes
            .iter()
            .flatten()
            .filter(|node| node.is_matchable())
            .map(|node| (node.insertion_seq, node.id))
            .collect();
        live.sort_unstable();

        let mut ordered: Vec<NodeId> = Vec::with_capacity(live.len());
        for (_, id) in live {
            let index = self.insertion_index(id, &ordered);
            ordered.insert(index, id);
        }
        self.ordered = ordered;
    }

    /// A node goes after every existing node that outranks or ties with
    /// it (earliest insertion wins among equals), except that it goes
    /// before one of its own strict ancestors of equal score: depth
    /// breaks that tie before insertion order is consulted.
    fn insertion_index(&self, id: NodeId, ordered: &[NodeId]) -> usize {
        let Some(node) = self.get(id) else {
            return ordered.len();
        };
        let mut index = 0;
        while index < ordered.len() {
            let Some(other) = self.get(ordered[index]) else {
                break;
            };
            match node.path.score().cmp_priority(other.path.score()) {
                Ordering::Less => break,
                Ordering::Equal if self.is_descendant(id, other.id) => break,
                _ => index += 1,
            }
        }
        index
    }

    fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.get(node).and_then(|n| n.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(|n| n.parent);
        }
        false
    }
}

fn join_paths(parent: &str, child: &str) -> String {
    if child.is_empty() {
        return parent.to_string();
    }
    if child.starts_with('/') {
        return child.to_string();
    }
    if parent.ends_with('/') {
        format!("{parent}{child}")
    } else {
        format!("{parent}/{child}")
    }
}
