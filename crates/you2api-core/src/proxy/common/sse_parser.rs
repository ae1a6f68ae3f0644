/// Parse a single SSE line into (key, value) pair.
///
/// SSE format: `key: value\n`
pub fn parse_sse_line(line: &str) -> Option<(String, String)> {
    let colon_pos = line.find(':')?;
    let key = &line[..colon_pos];
    let value = line[colon_pos + 1..].trim_start();
    Some((key.to_string(), value.to_string()))
}

/// True when `line` is the `event:` header announcing a token payload.
pub fn is_event(line: &str, name: &str) -> bool {
    matches!(parse_sse_line(line), Some((key, value)) if key == "event" && value.trim_end() == name)
}

/// Payload of a `data:` line, if `line` is one.
pub fn data_payload(line: &str) -> Option<String> {
    match parse_sse_line(line) {
        Some((key, value)) if key == "data" => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sse_line() {
        assert_eq!(
            parse_sse_line("event: youChatToken"),
            Some(("event".to_string(), "youChatToken".to_string()))
        );
        assert_eq!(parse_sse_line("no separator"), None);
    }

    #[test]
    fn test_data_payload_keeps_inner_colons() {
        assert_eq!(
            data_payload(r#"data: {"youChatToken": "a:b"}"#).as_deref(),
            Some(r#"{"youChatToken": "a:b"}"#)
        );
        assert_eq!(data_payload("event: youChatToken"), None);
    }

    #[test]
    fn test_is_event() {
        assert!(is_event("event: youChatToken", "youChatToken"));
        assert!(is_event("event:youChatToken", "youChatToken"));
        assert!(!is_event("event: done", "youChatToken"));
        assert!(!is_event("data: youChatToken", "youChatToken"));
    }
}
