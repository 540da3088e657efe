mod compile;
mod error;
mod score;
mod token;
mod tokenizer;

pub use compile::{CompiledPath, DEFAULT_PARAM_PATTERN, PathKey};
pub use error::{InterpolateError, PatternError, PatternResult};
pub use score::{PathScore, SegmentScore, score};
pub use token::{Segment, Token};
pub use tokenizer::tokenize;
