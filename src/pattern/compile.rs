use regex::{Regex, RegexBuilder};
use std::sync::Arc;

use crate::config::PathFlags;
use crate::location::{ParamValue, RouteParams};

use super::error::{InterpolateError, PatternError, PatternResult};
use super::score::{self, PathScore};
use super::token::{Segment, Token};
use super::tokenizer::tokenize;

/// Default expression for a bare parameter: any non-separator run.
pub const DEFAULT_PARAM_PATTERN: &str = "[^/]+?";

#[derive(Debug, Clone)]
pub struct PathKey {
    pub name: String,
    pub optional: bool,
    pub repeatable: bool,
    constraint: Option<Arc<Regex>>,
}

impl PathKey {
    fn check(&self, value: &str) -> Result<(), InterpolateError> {
        if let Some(constraint) = &self.constraint
            && !constraint.is_match(value)
        {
            return Err(InterpolateError::ParamMismatch {
                name: self.name.clone(),
                value: value.to_string(),
            });
        }
        Ok(())
    }
}

/// The compiled, matchable form of one node's full template: the combined
/// token chain, the anchored expression, the ordered capture keys
/// (ancestor keys first) and the cached specificity score.
#[derive(Debug)]
pub struct CompiledPath {
    tokens: Vec<Segment>,
    re: Regex,
    keys: Vec<PathKey>,
    score: PathScore,
    flags: PathFlags,
}

impl CompiledPath {
    /// Compiles `template` against the parent's token chain. An absolute
    /// template (leading `/`) replaces the chain; anything else appends
    /// to it, an empty template leaving it untouched.
    #[tracing::instrument(level = "trace", skip(parent_tokens), fields(template = %template))]
    pub fn compile(
        template: &str,
        parent_tokens: &[Segment],
        flags: PathFlags,
    ) -> PatternResult<Self> {
        if !template.is_empty() && !template.starts_with('/') && parent_tokens.is_empty() {
            return Err(PatternError::MissingLeadingSlash {
                template: template.to_string(),
            });
        }

        let own = tokenize(template)?;
        let tokens = if template.starts_with('/') {
            own
        } else {
            let mut combined = parent_tokens.to_vec();
            if !own.is_empty() {
                if combined.last().is_some_and(|segment| segment.is_empty()) {
                    combined.pop();
                }
                combined.extend(own);
            }
            combined
        };

        let (pattern, keys) = build_pattern(&tokens, flags, template)?;
        let re = RegexBuilder::new(&pattern)
            .case_insensitive(!flags.contains(PathFlags::SENSITIVE))
            .build()
            .map_err(|error| PatternError::ExpressionNotCompilable {
                template: template.to_string(),
                error: error.to_string(),
            })?;
        let score = score::score(&tokens, flags);

        Ok(Self {
            tokens,
            re,
            keys,
            score,
            flags,
        })
    }

    pub fn tokens(&self) -> &[Segment] {
        &self.tokens
    }

    pub fn keys(&self) -> &[PathKey] {
        &self.keys
    }

    pub fn score(&self) -> &PathScore {
        &self.score
    }

    pub fn flags(&self) -> PathFlags {
        self.flags
    }

    pub fn expression(&self) -> &str {
        self.re.as_str()
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.re.is_match(path)
    }

    /// Extracts parameter values for a matching path; `None` when the
    /// expression does not match. Repeatable values split into lists,
    /// absent optional values extract as empty strings.
    pub fn captures(&self, path: &str) -> Option<RouteParams> {
        let caps = self.re.captures(path)?;
        let mut params = RouteParams::with_capacity(self.keys.len());
        for (index, key) in self.keys.iter().enumerate() {
            let value = caps.get(index + 1).map(|m| m.as_str()).unwrap_or("");
            let entry = if key.repeatable && !value.is_empty() {
                ParamValue::List(value.split('/').map(str::to_string).collect())
            } else {
                ParamValue::Single(value.to_string())
            };
            params.insert(key.name.clone(), entry);
        }
        Some(params)
    }

    /// Back-generates a concrete path by substituting `params` into the
    /// token chain.
    pub fn interpolate(&self, params: &RouteParams) -> Result<String, InterpolateError> {
        let mut path = String::new();
        let mut key_index = 0usize;

        for segment in &self.tokens {
            if !path.ends_with('/') {
                path.push('/');
            }
            for token in segment {
                match token {
                    Token::Static(value) => path.push_str(value),
                    Token::Param { .. } | Token::Group { .. } => {
                        let key = &self.keys[key_index];
                        key_index += 1;
                        let text = match params.get(&key.name) {
                            Some(ParamValue::List(values)) => {
                                if !key.repeatable {
                                    return Err(InterpolateError::UnexpectedList {
                                        name: key.name.clone(),
                                    });
                                }
                                for value in values {
                                    key.check(value)?;
                                }
                                values.join("/")
                            }
                            Some(ParamValue::Single(value)) => {
                                if !value.is_empty() {
                                    key.check(value)?;
                                }
                                value.clone()
                            }
                            None => String::new(),
                        };
                        if text.is_empty() {
                            if !key.optional {
                                return Err(InterpolateError::MissingParam {
                                    name: key.name.clone(),
                                });
                            }
                            // a lone optional parameter folds its separator away
                            if segment.len() < 2 && path.ends_with('/') {
                                path.pop();
                            }
                        }
                        path.push_str(&text);
                    }
                }
            }
        }

        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }
}

fn build_pattern(
    tokens: &[Segment],
    flags: PathFlags,
    template: &str,
) -> PatternResult<(String, Vec<PathKey>)> {
    let mut pattern = String::from("^");
    let mut keys: Vec<PathKey> = Vec::new();
    let mut group_index = 0usize;

    for segment in tokens {
        if segment.is_empty() && flags.contains(PathFlags::STRICT) {
            pattern.push('/');
        }
        for (token_index, token) in segment.iter().enumerate() {
            match token {
                Token::Static(value) => {
                    if token_index == 0 {
                        pattern.push('/');
                    }
                    pattern.push_str(&regex::escape(value));
                }
                Token::Param {
                    name,
                    pattern: custom,
                    optional,
                    repeatable,
                } => {
                    let key = build_key(
                        name.clone(),
                        custom.as_deref(),
                        *optional,
                        *repeatable,
                        flags,
                        template,
                    )?;
                    push_capture(
                        &mut pattern,
                        custom.as_deref().unwrap_or(DEFAULT_PARAM_PATTERN),
                        &key,
                        token_index,
                        segment.len(),
                    );
                    keys.push(key);
                }
                Token::Group {
                    pattern: custom,
                    optional,
                    repeatable,
                } => {
                    let key = build_key(
                        group_index.to_string(),
                        Some(custom.as_str()),
                        *optional,
                        *repeatable,
                        flags,
                        template,
                    )?;
                    group_index += 1;
                    push_capture(&mut pattern, custom, &key, token_index, segment.len());
                    keys.push(key);
                }
            }
        }
    }

    if !flags.contains(PathFlags::STRICT) {
        pattern.push_str("/?");
    }
    if flags.contains(PathFlags::END) {
        pattern.push('$');
    } else if flags.contains(PathFlags::STRICT) {
        pattern.push_str("(?:/|$)");
    }

    Ok((pattern, keys))
}

fn build_key(
    name: String,
    custom: Option<&str>,
    optional: bool,
    repeatable: bool,
    flags: PathFlags,
    template: &str,
) -> PatternResult<PathKey> {
    let constraint = match custom {
        Some(expression) => {
            let anchored = format!("^(?:{expression})$");
            let re = RegexBuilder::new(&anchored)
                .case_insensitive(!flags.contains(PathFlags::SENSITIVE))
                .build()
                .map_err(|error| PatternError::InvalidParamExpression {
                    template: template.to_string(),
                    name: name.clone(),
                    error: error.to_string(),
                })?;
            Some(Arc::new(re))
        }
        None => None,
    };
    Ok(PathKey {
        name,
        optional,
        repeatable,
        constraint,
    })
}

fn push_capture(
    pattern: &mut String,
    expression: &str,
    key: &PathKey,
    token_index: usize,
    segment_len: usize,
) {
    let mut sub = if key.repeatable {
        format!("((?:{expression})(?:/(?:{expression}))*)")
    } else {
        format!("({expression})")
    };
    if token_index == 0 {
        sub = if key.optional && segment_len < 2 {
            format!("(?:/{sub})")
        } else {
            format!("/{sub}")
        };
    }
    if key.optional {
        sub.push('?');
    }
    pattern.push_str(&sub);
}
