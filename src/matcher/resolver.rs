use std::sync::Arc;

use crate::errors::{MatcherError, MatcherResult};
use crate::location::{
    MatcherLocation, ResolveTarget, RouteParams, resolve_relative_path,
};
use crate::record::RouteRecord;

use super::node::MatcherNode;
use super::registry::Registry;

/// Outcome of a resolution. An unmatched path is a valid result with an
/// empty `matched` chain, not an error.
#[derive(Debug)]
pub struct MatchResult<T> {
    pub name: Option<String>,
    pub path: String,
    pub params: RouteParams,
    /// Matched records from the outermost ancestor down to the winner.
    pub matched: Vec<Arc<RouteRecord<T>>>,
}

impl<T> MatchResult<T> {
    pub fn is_matched(&self) -> bool {
        !self.matched.is_empty()
    }

    pub fn record(&self) -> Option<&Arc<RouteRecord<T>>> {
        self.matched.last()
    }

    fn unmatched(path: String) -> Self {
        Self {
            name: None,
            path,
            params: RouteParams::new(),
            matched: Vec::new(),
        }
    }
}

impl<T> Clone for MatchResult<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            path: self.path.clone(),
            params: self.params.clone(),
            matched: self.matched.clone(),
        }
    }
}

pub(crate) fn resolve_target<T>(
    registry: &Registry<T>,
    target: ResolveTarget<'_>,
    current: &MatcherLocation,
) -> MatcherResult<MatchResult<T>> {
    match target {
        ResolveTarget::Path(path) => Ok(resolve_path(registry, path)),
        ResolveTarget::Relative(path) => {
            let absolute = resolve_relative_path(path, &current.path);
            Ok(resolve_path(registry, &absolute))
        }
        ResolveTarget::Name { name, params } => resolve_name(registry, name, params, current),
    }
}

/// Scans the ordered sequence; the first matching expression wins, so the
/// registry order fully determines the outcome.
pub(crate) fn resolve_path<T>(registry: &Registry<T>, path: &str) -> MatchResult<T> {
    for &id in registry.scan_order() {
        let Some(node) = registry.get(id) else {
            continue;
        };
        if let Some(params) = node.compiled().captures(path) {
            return assemble(registry, node, path.to_string(), params);
        }
    }
    MatchResult::unmatched(path.to_string())
}

fn resolve_name<T>(
    registry: &Registry<T>,
    name: &str,
    params: RouteParams,
    current: &MatcherLocation,
) -> MatcherResult<MatchResult<T>> {
    let node = registry
        .lookup(name)
        .and_then(|id| registry.get(id))
        .ok_or_else(|| MatcherError::RecordNotFound {
            name: name.to_string(),
        })?;

    let keys = node.compiled().keys();
    let mut merged = RouteParams::with_capacity(keys.len());
    // required parameters fall back to the current location's values
    for key in keys {
        if !key.optional
            && let Some(value) = current.params.get(&key.name)
        {
            merged.insert(key.name.clone(), value.clone());
        }
    }
    for (name, value) in params {
        if keys.iter().any(|key| key.name == name) {
            merged.insert(name, value);
        }
    }

    let path = node.compiled().interpolate(&merged)?;
    Ok(assemble(registry, node, path, merged))
}

/// Walks parent links up to the root so `matched` lists records from the
/// outermost ancestor to the winning leaf.
fn assemble<T>(
    registry: &Registry<T>,
    winner: &MatcherNode<T>,
    path: String,
    params: RouteParams,
) -> MatchResult<T> {
    let mut matched = Vec::new();
    let mut current = Some(winner.id());
    while let Some(id) = current {
        let Some(node) = registry.get(id) else {
            break;
        };
        matched.push(node.record().clone());
        current = node.parent();
    }
    matched.reverse();

    MatchResult {
        name: winner.record().name.clone(),
        path,
        params,
        matched,
    }
}
