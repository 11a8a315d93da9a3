// src/analyze/extract.rs
//! Locates the structured JSON block inside a free-text LLM reply.
//!
//! Only the first fenced block (```` ``` ```` with an optional language tag) is
//! considered when the reply has one; otherwise the whole reply is scanned.
//! Inside that region the first opener of the requested shape starts a
//! bracket-stack walk that honors JSON strings and escapes. Anything that does
//! not balance is a typed error, never a guessed substring.

use serde::de::DeserializeOwned;

use crate::analyze::error::{ExtractError, FacetError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Object,
    Array,
}

impl Shape {
    fn opener(self) -> char {
        match self {
            Shape::Object => '{',
            Shape::Array => '[',
        }
    }

    fn label(self) -> &'static str {
        match self {
            Shape::Object => "JSON object",
            Shape::Array => "JSON array",
        }
    }
}

const FENCE: &str = "```";

/// Contents of the first fenced block, if any. An unclosed fence runs to the end.
fn first_fenced_region(text: &str) -> Option<&str> {
    let start = text.find(FENCE)? + FENCE.len();
    let rest = &text[start..];
    // Skip the language tag line ("json", "JSON", ...).
    let body_start = match rest.find('\n') {
        Some(nl) if rest[..nl].chars().all(|c| c.is_ascii_alphanumeric() || c == ' ') => nl + 1,
        _ => 0,
    };
    let body = &rest[body_start..];
    Some(match body.find(FENCE) {
        Some(end) => &body[..end],
        None => body,
    })
}

/// Return the first balanced block of `shape`.
pub fn extract_block(text: &str, shape: Shape) -> Result<&str, ExtractError> {
    let region = first_fenced_region(text).unwrap_or(text);
    let start = region
        .find(shape.opener())
        .ok_or(ExtractError::NotFound(shape.label()))?;

    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (off, ch) in region[start..].char_indices() {
        let at = start + off;
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                if stack.pop() != Some(ch) {
                    return Err(ExtractError::Mismatched { found: ch, at });
                }
                if stack.is_empty() {
                    return Ok(&region[start..=at]);
                }
            }
            _ => {}
        }
    }
    Err(ExtractError::Unterminated(shape.label(), start))
}

/// Extract the block and decode it as `T`.
pub fn parse_structured<T: DeserializeOwned>(text: &str, shape: Shape) -> Result<T, FacetError> {
    let block = extract_block(text, shape)?;
    Ok(serde_json::from_str(block)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_json_object() {
        assert_eq!(extract_block(r#"{"a": 1}"#, Shape::Object), Ok(r#"{"a": 1}"#));
    }

    #[test]
    fn fenced_json_with_prose_around() {
        let reply = "Sure! Here it is:\n```json\n[{\"x\": \"]\"}]\n```\nHope this helps [1].";
        assert_eq!(extract_block(reply, Shape::Array), Ok(r#"[{"x": "]"}]"#));
    }

    #[test]
    fn plain_fence_without_language_tag() {
        let reply = "```\n{\"k\": [1, 2]}\n```";
        assert_eq!(extract_block(reply, Shape::Object), Ok(r#"{"k": [1, 2]}"#));
    }

    #[test]
    fn only_first_fence_is_considered() {
        let reply = "```json\n{\"first\": true}\n```\ntext\n```json\n{\"second\": true}\n```";
        assert_eq!(extract_block(reply, Shape::Object), Ok(r#"{"first": true}"#));
    }

    #[test]
    fn escaped_quotes_inside_strings() {
        let reply = r#"{"q": "say \"}\" please", "n": {"m": 1}} trailing"#;
        assert_eq!(
            extract_block(reply, Shape::Object),
            Ok(r#"{"q": "say \"}\" please", "n": {"m": 1}}"#)
        );
    }

    #[test]
    fn typed_errors() {
        assert_eq!(
            extract_block("no json here", Shape::Object),
            Err(ExtractError::NotFound("JSON object"))
        );
        assert_eq!(
            extract_block(r#"{"a": [1, 2}"#, Shape::Object),
            Err(ExtractError::Mismatched { found: '}', at: 11 })
        );
        assert!(matches!(
            extract_block(r#"[{"a": 1}"#, Shape::Array),
            Err(ExtractError::Unterminated(_, 0))
        ));
    }

    #[test]
    fn parse_structured_reports_shape_mismatch() {
        let r: Result<Vec<u32>, _> = parse_structured(r#"["x"]"#, Shape::Array);
        assert!(matches!(r, Err(FacetError::Shape(_))));
    }
}
