use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("template '{template}' must start with '/'")]
    MissingLeadingSlash { template: String },
    #[error("template '{template}' contains an empty segment at byte {index}")]
    EmptySegment { template: String, index: usize },
    #[error("template '{template}' ends with a lone escape character")]
    LoneEscape { template: String },
    #[error("parameter at byte {index} in template '{template}' is missing a name")]
    ParameterMissingName { template: String, index: usize },
    #[error(
        "parameter name '{name}' in template '{template}' must start with an alphabetic character or underscore (found '{found}')"
    )]
    ParameterInvalidStart {
        template: String,
        name: String,
        found: char,
    },
    #[error("parameter '{name}' appears more than once in template '{template}'")]
    DuplicateParamName { template: String, name: String },
    #[error(
        "match expression for parameter '{name}' in template '{template}' is unterminated (opened at byte {start})"
    )]
    UnterminatedParamExpression {
        template: String,
        name: String,
        start: usize,
    },
    #[error("group in template '{template}' is unterminated (opened at byte {start})")]
    UnterminatedGroup { template: String, start: usize },
    #[error("group in template '{template}' is empty (opened at byte {start})")]
    EmptyGroup { template: String, start: usize },
    #[error("repeatable parameter '{name}' must be alone in its segment in template '{template}'")]
    RepeatableNotAlone { template: String, name: String },
    #[error("match expression for parameter '{name}' in template '{template}' is not a valid regex: {error}")]
    InvalidParamExpression {
        template: String,
        name: String,
        error: String,
    },
    #[error("template '{template}' compiled into an invalid expression: {error}")]
    ExpressionNotCompilable { template: String, error: String },
}

pub type PatternResult<T> = Result<T, PatternError>;

#[derive(Debug, Error)]
pub enum InterpolateError {
    #[error("missing required parameter '{name}'")]
    MissingParam { name: String },
    #[error("value '{value}' for parameter '{name}' does not match its expression")]
    ParamMismatch { name: String, value: String },
    #[error("parameter '{name}' does not accept a list of values")]
    UnexpectedList { name: String },
}
