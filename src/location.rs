use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Extracted value of one parameter. Repeatable parameters collect every
/// repetition in declaration order; absent optional parameters extract as
/// an empty `Single`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Single(String),
    List(Vec<String>),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Single(value) => Some(value),
            ParamValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ParamValue::Single(_) => None,
            ParamValue::List(values) => Some(values),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ParamValue::Single(value) => value.is_empty(),
            ParamValue::List(values) => values.is_empty(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Single(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::List(values)
    }
}

pub type RouteParams = HashMap<String, ParamValue>;

/// The location a relative target resolves against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherLocation {
    pub path: String,
    pub name: Option<String>,
    pub params: RouteParams,
}

impl MatcherLocation {
    pub fn root() -> Self {
        Self::from_path("/")
    }

    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            params: RouteParams::new(),
        }
    }
}

impl Default for MatcherLocation {
    fn default() -> Self {
        Self::root()
    }
}

/// The three mutually exclusive ways to ask for a resolution.
#[derive(Debug, Clone)]
pub enum ResolveTarget<'a> {
    /// An absolute request path, matched by scanning the ordered registry.
    Path(&'a str),
    /// A registered name plus parameter values to interpolate into its
    /// template.
    Name { name: &'a str, params: RouteParams },
    /// A path interpreted relative to the current location's directory,
    /// then matched like [`ResolveTarget::Path`].
    Relative(&'a str),
}

/// Resolves `to` against the directory of `from`. `.` stays in place,
/// `..` climbs one directory without escaping the root.
pub fn resolve_relative_path(to: &str, from: &str) -> String {
    if to.starts_with('/') {
        return to.to_string();
    }
    if to.is_empty() {
        return from.to_string();
    }

    let from_segments: Vec<&str> = from.split('/').collect();
    let mut to_segments: Vec<&str> = to.split('/').collect();

    // a trailing `..` or `.` acts like `../` / `./`
    if matches!(to_segments.last(), Some(&"..") | Some(&".")) {
        to_segments.push("");
    }

    let mut position = from_segments.len() - 1;
    let mut consumed = 0;
    for segment in &to_segments {
        match *segment {
            "." => consumed += 1,
            ".." => {
                if position > 1 {
                    position -= 1;
                }
                consumed += 1;
            }
            _ => break,
        }
    }

    format!(
        "{}/{}",
        from_segments[..position].join("/"),
        to_segments[consumed..].join("/")
    )
}
