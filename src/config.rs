use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Per-node compile flags, resolved from the node's own declaration
    /// and the global defaults. Never inherited from a parent node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PathFlags: u8 {
        const SENSITIVE = 1 << 0;
        const STRICT = 1 << 1;
        const END = 1 << 2;
    }
}

impl Default for PathFlags {
    fn default() -> Self {
        PathFlags::END
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MatcherConfig {
    pub sensitive: bool,
    pub strict: bool,
}

impl MatcherConfig {
    pub fn builder() -> MatcherConfigBuilder {
        MatcherConfigBuilder::default()
    }

    /// Explicit per-node option wins, then the global default; `end` has
    /// no global override and defaults to anchoring at end-of-path.
    pub(crate) fn resolve_flags(
        &self,
        sensitive: Option<bool>,
        strict: Option<bool>,
        end: Option<bool>,
    ) -> PathFlags {
        let mut flags = PathFlags::empty();
        if sensitive.unwrap_or(self.sensitive) {
            flags |= PathFlags::SENSITIVE;
        }
        if strict.unwrap_or(self.strict) {
            flags |= PathFlags::STRICT;
        }
        if end.unwrap_or(true) {
            flags |= PathFlags::END;
        }
        flags
    }
}

#[derive(Debug, Default, Clone)]
pub struct MatcherConfigBuilder {
    config: MatcherConfig,
}

impl MatcherConfigBuilder {
    pub fn sensitive(mut self, value: bool) -> Self {
        self.config.sensitive = value;
        self
    }

    pub fn strict(mut self, value: bool) -> Self {
        self.config.strict = value;
        self
    }

    pub fn build(self) -> MatcherConfig {
        self.config
    }
}
