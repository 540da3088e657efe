pub mod config;
pub mod errors;
pub mod location;
mod matcher;
pub mod pattern;
pub mod record;
mod shared;

pub use config::{MatcherConfig, MatcherConfigBuilder, PathFlags};
pub use errors::{MatcherError, MatcherResult};
pub use location::{MatcherLocation, ParamValue, ResolveTarget, RouteParams};
pub use matcher::{MatchResult, Matcher, MatcherNode, NodeId};
pub use record::{RouteDef, RouteRecord};
pub use shared::SharedMatcher;
