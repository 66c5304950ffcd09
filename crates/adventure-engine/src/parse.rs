//! Parsing of raw service output into a story tree.
//!
//! The completion is untrusted text. Models frequently wrap JSON in a
//! Markdown code fence despite instructions, so the fence is stripped
//! before deserializing. Parsing extends no trust: the caller must still
//! run structural validation on the result.

use adventure_core::error::DomainError;
use adventure_story::StoryTree;

/// Parses raw completion text into a nested story tree.
///
/// # Errors
///
/// Returns `DomainError::Parse` if the text is not JSON of the expected
/// shape. Parse failures are not retried; the caller decides.
pub fn parse_story_tree(raw: &str) -> Result<StoryTree, DomainError> {
    let body = strip_code_fence(raw);
    serde_json::from_str(body).map_err(|e| {
        DomainError::Parse(format!("output does not match the story shape: {e}"))
    })
}

/// Removes a surrounding Markdown code fence, if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(after_open) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") up to the end of the opening line.
    let body = match after_open.split_once('\n') {
        Some((_, rest)) => rest,
        None => after_open,
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BARE: &str = r#"{
        "title": "T",
        "rootNode": {"content": "c", "isEnding": true, "isWinningEnding": true}
    }"#;

    #[test]
    fn test_parses_bare_json() {
        let tree = parse_story_tree(BARE).unwrap();
        assert_eq!(tree.title, "T");
        assert!(tree.root_node.is_ending);
    }

    #[test]
    fn test_parses_fenced_json() {
        let fenced = format!("```json\n{BARE}\n```");
        let tree = parse_story_tree(&fenced).unwrap();
        assert_eq!(tree.title, "T");
    }

    #[test]
    fn test_parses_fence_without_info_string() {
        let fenced = format!("```\n{BARE}\n```\n");
        assert!(parse_story_tree(&fenced).is_ok());
    }

    #[test]
    fn test_rejects_non_json() {
        let err = parse_story_tree("Once upon a time...").unwrap_err();
        assert!(matches!(err, DomainError::Parse(_)));
    }

    #[test]
    fn test_rejects_schema_mismatch() {
        // Valid JSON, wrong shape: rootNode is missing.
        let err = parse_story_tree(r#"{"title": "T"}"#).unwrap_err();
        assert!(matches!(err, DomainError::Parse(_)));
    }

    #[test]
    fn test_rejects_truncated_json() {
        let truncated = &BARE[..BARE.len() - 10];
        let err = parse_story_tree(truncated).unwrap_err();
        assert!(matches!(err, DomainError::Parse(_)));
    }
}
