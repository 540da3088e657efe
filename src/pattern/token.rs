use smallvec::SmallVec;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Static(String),
    Param {
        name: String,
        pattern: Option<String>,
        optional: bool,
        repeatable: bool,
    },
    Group {
        pattern: String,
        optional: bool,
        repeatable: bool,
    },
}

impl Token {
    pub fn is_static(&self) -> bool {
        matches!(self, Token::Static(_))
    }

    pub fn is_repeatable(&self) -> bool {
        match self {
            Token::Static(_) => false,
            Token::Param { repeatable, .. } | Token::Group { repeatable, .. } => *repeatable,
        }
    }

    pub fn param_name(&self) -> Option<&str> {
        match self {
            Token::Param { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// One `/`-delimited piece of a template. An empty segment stands for a
/// trailing separator (or the root path itself).
pub type Segment = SmallVec<[Token; 2]>;
