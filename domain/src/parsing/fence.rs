//! Code fence stripping

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Remove one leading ```` ```json ```` / ```` ``` ```` fence and one trailing
/// ```` ``` ```` fence.
///
/// Text without any fence is returned unchanged (including its whitespace).
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let has_open = trimmed.starts_with(FENCE);
    let has_close = trimmed.len() >= FENCE.len() && trimmed.ends_with(FENCE);
    if !has_open && !has_close {
        return text;
    }

    let mut inner = trimmed;
    if let Some(rest) = inner.strip_prefix(JSON_FENCE) {
        inner = rest;
    } else if let Some(rest) = inner.strip_prefix(FENCE) {
        inner = rest;
    }
    if let Some(rest) = inner.strip_suffix(FENCE) {
        inner = rest;
    }
    inner.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fence() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_plain_fence() {
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_only_leading_fence() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1"), "{\"a\": 1");
    }

    #[test]
    fn test_fence_free_text_is_unchanged() {
        for text in ["{\"a\": 1}", "  {\"a\": 1}\n", "", "plain words"] {
            assert_eq!(strip_code_fences(text), text);
        }
    }

    #[test]
    fn test_stripping_twice_equals_once() {
        let inputs = [
            "```json\n{\"name\": \"x\"}\n```",
            "```\n[1, 2]\n```",
            "{\"name\": \"x\"}",
            "```json{\"a\": true}```",
            "  \n```json\n{}\n```  ",
        ];
        for text in inputs {
            let once = strip_code_fences(text);
            assert_eq!(strip_code_fences(once), once, "input: {:?}", text);
        }
    }
}
