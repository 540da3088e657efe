mod node;
mod registry;
mod resolver;

pub use node::{MatcherNode, NodeId};
pub use resolver::MatchResult;

use std::sync::Arc;

use crate::config::MatcherConfig;
use crate::errors::MatcherResult;
use crate::location::{MatcherLocation, ResolveTarget};
use crate::record::{RouteDef, RouteRecord};
use registry::Registry;

/// The matching engine: a registry of compiled, scored route templates
/// and the resolver that picks a single winner for any request path.
#[derive(Debug)]
pub struct Matcher<T> {
    registry: Registry<T>,
}

impl<T> Matcher<T> {
    pub fn new(routes: Vec<RouteDef<T>>, config: MatcherConfig) -> MatcherResult<Self> {
        let mut matcher = Self::with_config(config);
        for def in routes {
            matcher.add_route(def, None)?;
        }
        Ok(matcher)
    }

    pub fn with_config(config: MatcherConfig) -> Self {
        Self {
            registry: Registry::new(config),
        }
    }

    pub fn config(&self) -> &MatcherConfig {
        self.registry.config()
    }

    /// Compiles a declaration (and its children) relative to `parent` and
    /// inserts it, keeping the scan order consistent before returning.
    #[tracing::instrument(level = "trace", skip(self, def), fields(path = %def.path))]
    pub fn add_route(&mut self, def: RouteDef<T>, parent: Option<NodeId>) -> MatcherResult<NodeId> {
        self.registry.add_route(def, parent)
    }

    pub fn remove_route(&mut self, name: &str) -> MatcherResult<()> {
        self.registry.remove_route(name)
    }

    pub fn remove_route_node(&mut self, id: NodeId) -> MatcherResult<()> {
        self.registry.remove_route_node(id)
    }

    /// Resolves a target against the registry. Path targets never fail;
    /// name targets error on unknown names or unsatisfiable parameters.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn resolve(
        &self,
        target: ResolveTarget<'_>,
        current: &MatcherLocation,
    ) -> MatcherResult<MatchResult<T>> {
        resolver::resolve_target(&self.registry, target, current)
    }

    /// Convenience for the common case: scan an absolute path. Unlike
    /// name-based targets this can never fail.
    pub fn resolve_path(&self, path: &str) -> MatchResult<T> {
        resolver::resolve_path(&self.registry, path)
    }

    pub fn get_routes(&self) -> Vec<Arc<RouteRecord<T>>> {
        self.registry.routes()
    }

    pub fn get_record_matcher(&self, name: &str) -> Option<NodeId> {
        self.registry.lookup(name)
    }

    pub fn node(&self, id: NodeId) -> Option<&MatcherNode<T>> {
        self.registry.get(id)
    }
}
