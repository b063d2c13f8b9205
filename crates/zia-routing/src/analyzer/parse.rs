use serde_json::{Value, from_str};

use crate::{Result, RoutingError};

/// Fence markers recognised around oracle replies.
const FENCE_MARKERS: [&str; 2] = ["```", "~~~"];

/// Removes a surrounding code fence of any flavor.
///
/// Handles a bare fence, a fence with a language tag (`json`, `python`, ...)
/// on the opening line or glued to the content, and a missing closing fence.
/// Text that does not start with a fence is returned trimmed.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();

    for marker in FENCE_MARKERS {
        let Some(rest) = trimmed.strip_prefix(marker) else {
            continue;
        };

        let after_tag = skip_language_tag(rest);
        let body = if until_closing(after_tag, marker).trim().is_empty() {
            until_closing(rest, marker)
        } else {
            until_closing(after_tag, marker)
        };
        return body.trim();
    }

    trimmed
}

/// Parses an oracle reply as JSON after stripping fences.
///
/// # Errors
/// Returns [`RoutingError::OracleMalformedResponse`] if the reply is not valid JSON.
pub fn parse_json(text: &str) -> Result<Value> {
    from_str(strip_code_fences(text))
        .map_err(|error| RoutingError::OracleMalformedResponse(format!("{error}: {text}")))
}

fn skip_language_tag(rest: &str) -> &str {
    let rest = rest.trim_start_matches([' ', '\t']);
    let tag_len = rest
        .find(|ch: char| !(ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '+')))
        .unwrap_or(rest.len());
    &rest[tag_len..]
}

fn until_closing<'text>(body: &'text str, marker: &str) -> &'text str {
    body.find(marker).map_or(body, |end| &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_text_is_trimmed() {
        assert_eq!(strip_code_fences("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_fence_flavors() {
        let expected = "{\"type\": \"web_search\"}";

        assert_eq!(strip_code_fences("```json\n{\"type\": \"web_search\"}\n```"), expected);
        assert_eq!(strip_code_fences("```python\n{\"type\": \"web_search\"}\n```"), expected);
        assert_eq!(strip_code_fences("```\n{\"type\": \"web_search\"}\n```"), expected);
        assert_eq!(strip_code_fences("~~~json\n{\"type\": \"web_search\"}\n~~~"), expected);
        assert_eq!(strip_code_fences("```json{\"type\": \"web_search\"}```"), expected);
        assert_eq!(strip_code_fences("``` json\n{\"type\": \"web_search\"}\n```"), expected);
        assert_eq!(strip_code_fences("~~~\tjson\n{\"type\": \"web_search\"}\n~~~"), expected);
    }

    #[test]
    fn test_missing_closing_fence() {
        assert_eq!(strip_code_fences("```json\n[1, 2]"), "[1, 2]");
    }

    #[test]
    fn test_trailing_prose_after_fence_is_dropped() {
        assert_eq!(strip_code_fences("```json\n[1]\n```\nHope this helps!"), "[1]");
    }

    #[test]
    fn test_fenced_bare_word_is_kept() {
        assert_eq!(strip_code_fences("```web_search```"), "web_search");
    }

    #[test]
    fn test_parse_json_through_fence() {
        let value = parse_json("```json\n{\"type\": \"data_retrieval\", \"payload\": {}}\n```").unwrap();
        assert_eq!(value, json!({"type": "data_retrieval", "payload": {}}));
    }

    #[test]
    fn test_parse_json_rejects_python_literals() {
        let error = parse_json("{'type': 'web_search', 'payload': {}}").unwrap_err();
        assert!(matches!(error, RoutingError::OracleMalformedResponse(_)));
    }
}
