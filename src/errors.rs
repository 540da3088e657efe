use crate::pattern::{InterpolateError, PatternError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatcherError {
    #[error("no route record is registered under the name '{name}'")]
    RecordNotFound { name: String },
    #[error("matcher node {id} is not registered")]
    NodeNotFound { id: u32 },
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error(transparent)]
    Interpolate(#[from] InterpolateError),
}

pub type MatcherResult<T> = Result<T, MatcherError>;
