use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::MatcherConfig;
use crate::errors::MatcherResult;
use crate::location::{MatcherLocation, ResolveTarget};
use crate::matcher::{MatchResult, Matcher, NodeId};
use crate::record::{RouteDef, RouteRecord};

/// Reader-writer wrapper for callers that mutate and resolve from
/// multiple threads: mutations serialize behind the write lock while
/// resolutions share the read lock.
#[derive(Debug)]
pub struct SharedMatcher<T> {
    inner: RwLock<Matcher<T>>,
}

impl<T> SharedMatcher<T> {
    pub fn new(routes: Vec<RouteDef<T>>, config: MatcherConfig) -> MatcherResult<Self> {
        Ok(Self {
            inner: RwLock::new(Matcher::new(routes, config)?),
        })
    }

    pub fn add_route(&self, def: RouteDef<T>, parent: Option<NodeId>) -> MatcherResult<NodeId> {
        self.inner.write().add_route(def, parent)
    }

    pub fn remove_route(&self, name: &str) -> MatcherResult<()> {
        self.inner.write().remove_route(name)
    }

    pub fn resolve(
        &self,
        target: ResolveTarget<'_>,
        current: &MatcherLocation,
    ) -> MatcherResult<MatchResult<T>> {
        self.inner.read().resolve(target, current)
    }

    pub fn resolve_path(&self, path: &str) -> MatchResult<T> {
        self.inner.read().resolve_path(path)
    }

    pub fn get_routes(&self) -> Vec<Arc<RouteRecord<T>>> {
        self.inner.read().get_routes()
    }

    pub fn get_record_matcher(&self, name: &str) -> Option<NodeId> {
        self.inner.read().get_record_matcher(name)
    }
}
