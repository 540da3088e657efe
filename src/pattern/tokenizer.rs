use memchr::{memchr, memchr3};

use super::error::{PatternError, PatternResult};
use super::token::{Segment, Token};

struct Cursor<'a> {
    template: &'a str,
    index: usize,
}

impl<'a> Cursor<'a> {
    fn peek_byte(&self) -> Option<u8> {
        self.template.as_bytes().get(self.index).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.template[self.index..].chars().next()
    }
}

/// Splits a template into `/`-delimited segments of tokens.
///
/// The leading separator is optional so that child templates can be
/// tokenized relative to a parent; an empty template yields no segments.
#[tracing::instrument(level = "trace", fields(template = %template))]
pub fn tokenize(template: &str) -> PatternResult<Vec<Segment>> {
    if template.is_empty() {
        return Ok(Vec::new());
    }

    let bytes = template.as_bytes();
    let mut cursor = Cursor {
        template,
        index: usize::from(bytes[0] == b'/'),
    };
    let mut segments: Vec<Segment> = Vec::new();
    let mut segment = Segment::new();
    let mut literal = String::new();

    while let Some(byte) = cursor.peek_byte() {
        match byte {
            b'/' => {
                flush_literal(&mut literal, &mut segment, template)?;
                if segment.is_empty() {
                    return Err(PatternError::EmptySegment {
                        template: template.to_string(),
                        index: cursor.index,
                    });
                }
                segments.push(std::mem::take(&mut segment));
                cursor.index += 1;
            }
            b'\\' => {
                cursor.index += 1;
                let Some(escaped) = cursor.peek_char() else {
                    return Err(PatternError::LoneEscape {
                        template: template.to_string(),
                    });
                };
                literal.push(escaped);
                cursor.index += escaped.len_utf8();
            }
            b':' => {
                flush_literal(&mut literal, &mut segment, template)?;
                let token = parse_param(&mut cursor)?;
                push_token(&mut segment, token, template)?;
            }
            b'(' => {
                flush_literal(&mut literal, &mut segment, template)?;
                let token = parse_group(&mut cursor)?;
                push_token(&mut segment, token, template)?;
            }
            _ => {
                let rest = &bytes[cursor.index..];
                let mut stop = memchr3(b'/', b':', b'(', rest).unwrap_or(rest.len());
                if let Some(escape) = memchr(b'\\', &rest[..stop]) {
                    stop = escape;
                }
                literal.push_str(&template[cursor.index..cursor.index + stop]);
                cursor.index += stop;
            }
        }
    }

    flush_literal(&mut literal, &mut segment, template)?;
    segments.push(segment);

    let mut seen: Vec<&str> = Vec::new();
    for segment in &segments {
        for token in segment {
            if let Some(name) = token.param_name() {
                if seen.contains(&name) {
                    return Err(PatternError::DuplicateParamName {
                        template: template.to_string(),
                        name: name.to_string(),
                    });
                }
                seen.push(name);
            }
        }
    }

    Ok(segments)
}

fn flush_literal(literal: &mut String, segment: &mut Segment, template: &str) -> PatternResult<()> {
    if literal.is_empty() {
        return Ok(());
    }
    guard_repeatable(segment, template)?;
    segment.push(Token::Static(std::mem::take(literal)));
    Ok(())
}

fn push_token(segment: &mut Segment, token: Token, template: &str) -> PatternResult<()> {
    if token.is_repeatable() && !segment.is_empty() {
        return Err(PatternError::RepeatableNotAlone {
            template: template.to_string(),
            name: token.param_name().unwrap_or_default().to_string(),
        });
    }
    guard_repeatable(segment, template)?;
    segment.push(token);
    Ok(())
}

fn guard_repeatable(segment: &Segment, template: &str) -> PatternResult<()> {
    if let Some(previous) = segment.last()
        && previous.is_repeatable()
    {
        return Err(PatternError::RepeatableNotAlone {
            template: template.to_string(),
            name: previous.param_name().unwrap_or_default().to_string(),
        });
    }
    Ok(())
}

fn parse_param(cursor: &mut Cursor<'_>) -> PatternResult<Token> {
    let colon_index = cursor.index;
    cursor.index += 1;
    let start = cursor.index;

    while let Some(byte) = cursor.peek_byte() {
        if byte.is_ascii_alphanumeric() || byte == b'_' {
            cursor.index += 1;
        } else {
            break;
        }
    }

    let name = &cursor.template[start..cursor.index];
    if name.is_empty() {
        return Err(PatternError::ParameterMissingName {
            template: cursor.template.to_string(),
            index: colon_index,
        });
    }
    let first = name.as_bytes()[0];
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return Err(PatternError::ParameterInvalidStart {
            template: cursor.template.to_string(),
            name: name.to_string(),
            found: first as char,
        });
    }
    let name = name.to_string();

    let pattern = if cursor.peek_byte() == Some(b'(') {
        Some(scan_expression(cursor, Some(&name))?)
    } else {
        None
    };
    let (optional, repeatable) = parse_modifier(cursor);

    Ok(Token::Param {
        name,
        pattern,
        optional,
        repeatable,
    })
}

fn parse_group(cursor: &mut Cursor<'_>) -> PatternResult<Token> {
    let open = cursor.index;
    let pattern = scan_expression(cursor, None)?;
    if pattern.is_empty() {
        return Err(PatternError::EmptyGroup {
            template: cursor.template.to_string(),
            start: open,
        });
    }
    let (optional, repeatable) = parse_modifier(cursor);

    Ok(Token::Group {
        pattern,
        optional,
        repeatable,
    })
}

/// Reads a parenthesized expression verbatim, tracking nesting depth.
/// `owner` is the parameter name for error reporting; `None` for an
/// anonymous group.
fn scan_expression(cursor: &mut Cursor<'_>, owner: Option<&str>) -> PatternResult<String> {
    let open = cursor.index;
    cursor.index += 1;
    let mut depth = 1usize;
    let mut out = String::new();

    while let Some(ch) = cursor.peek_char() {
        match ch {
            '\\' => {
                cursor.index += 1;
                let Some(escaped) = cursor.peek_char() else {
                    break;
                };
                out.push('\\');
                out.push(escaped);
                cursor.index += escaped.len_utf8();
            }
            '(' => {
                depth += 1;
                out.push('(');
                cursor.index += 1;
            }
            ')' => {
                depth -= 1;
                cursor.index += 1;
                if depth == 0 {
                    return Ok(out);
                }
                out.push(')');
            }
            _ => {
                out.push(ch);
                cursor.index += ch.len_utf8();
            }
        }
    }

    Err(match owner {
        Some(name) => PatternError::UnterminatedParamExpression {
            template: cursor.template.to_string(),
            name: name.to_string(),
            start: open,
        },
        None => PatternError::UnterminatedGroup {
            template: cursor.template.to_string(),
            start: open,
        },
    })
}

fn parse_modifier(cursor: &mut Cursor<'_>) -> (bool, bool) {
    let modifier = match cursor.peek_byte() {
        Some(b'?') => (true, false),
        Some(b'*') => (true, true),
        Some(b'+') => (false, true),
        _ => return (false, false),
    };
    cursor.index += 1;
    modifier
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_static_and_parameter_segments() {
        let segments = tokenize("/users/:id").unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].as_slice(), &[Token::Static("users".to_string())]);
        match &segments[1][0] {
            Token::Param {
                name,
                pattern,
                optional,
                repeatable,
            } => {
                assert_eq!(name, "id");
                assert!(pattern.is_none());
                assert!(!optional && !repeatable);
            }
            other => panic!("expected parameter token, got {other:?}"),
        }
    }

    #[test]
    fn trailing_slash_yields_empty_segment() {
        let segments = tokenize("/users/").unwrap();
        assert_eq!(segments.len(), 2);
        assert!(segments[1].is_empty());
    }

    #[test]
    fn keeps_nested_parentheses_in_expressions() {
        let segments = tokenize("/:id((\\d+)(?:-\\d+)?)").unwrap();
        match &segments[0][0] {
            Token::Param { pattern, .. } => {
                assert_eq!(pattern.as_deref(), Some("(\\d+)(?:-\\d+)?"));
            }
            other => panic!("expected parameter token, got {other:?}"),
        }
    }

    #[test]
    fn escapes_turn_specials_into_literals() {
        let segments = tokenize("/files/\\:id").unwrap();
        assert_eq!(segments[1].as_slice(), &[Token::Static(":id".to_string())]);
    }

    #[test]
    fn rejects_interior_empty_segment() {
        let err = tokenize("/a//b").unwrap_err();
        match err {
            PatternError::EmptySegment { index, .. } => assert_eq!(index, 3),
            other => panic!("expected EmptySegment, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_parameter_names() {
        let err = tokenize("/:id/:id").unwrap_err();
        match err {
            PatternError::DuplicateParamName { name, .. } => assert_eq!(name, "id"),
            other => panic!("expected DuplicateParamName, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unterminated_expression() {
        let err = tokenize("/:id(\\d+").unwrap_err();
        match err {
            PatternError::UnterminatedParamExpression { name, .. } => assert_eq!(name, "id"),
            other => panic!("expected UnterminatedParamExpression, got {other:?}"),
        }
    }

    #[test]
    fn rejects_repeatable_sharing_a_segment() {
        let err = tokenize("/:ids+-tail").unwrap_err();
        match err {
            PatternError::RepeatableNotAlone { name, .. } => assert_eq!(name, "ids"),
            other => panic!("expected RepeatableNotAlone, got {other:?}"),
        }
    }
}
