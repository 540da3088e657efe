use std::sync::Arc;

/// Declarative description of one route template, possibly nested. The
/// payload is opaque to the engine and only carried through to matched
/// records.
#[derive(Debug, Clone)]
pub struct RouteDef<T> {
    pub path: String,
    pub name: Option<String>,
    pub aliases: Vec<String>,
    pub sensitive: Option<bool>,
    pub strict: Option<bool>,
    pub end: Option<bool>,
    pub payload: Option<T>,
    pub children: Vec<RouteDef<T>>,
}

impl<T> RouteDef<T> {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            aliases: Vec::new(),
            sensitive: None,
            strict: None,
            end: None,
            payload: None,
            children: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn alias(mut self, path: impl Into<String>) -> Self {
        self.aliases.push(path.into());
        self
    }

    pub fn sensitive(mut self, value: bool) -> Self {
        self.sensitive = Some(value);
        self
    }

    pub fn strict(mut self, value: bool) -> Self {
        self.strict = Some(value);
        self
    }

    pub fn end(mut self, value: bool) -> Self {
        self.end = Some(value);
        self
    }

    pub fn payload(mut self, payload: T) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn child(mut self, child: RouteDef<T>) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = RouteDef<T>>) -> Self {
        self.children.extend(children);
        self
    }
}

/// Immutable record attached to a compiled matcher node. Alias nodes get
/// their own record (the path differs) but share the payload allocation.
#[derive(Debug)]
pub struct RouteRecord<T> {
    pub path: String,
    pub name: Option<String>,
    payload: Option<Arc<T>>,
}

impl<T> RouteRecord<T> {
    pub(crate) fn new(path: String, name: Option<String>, payload: Option<Arc<T>>) -> Self {
        Self {
            path,
            name,
            payload,
        }
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_deref()
    }
}
