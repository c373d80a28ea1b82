//! Framed line parsing
//!
//! ```text
//! data: {"choices":[{"delta":{"content":"text"}}]}
//! data: [DONE]
//! ```

use serde::Deserialize;

/// Prefix marking a line of interest.
pub const DATA_PREFIX: &str = "data: ";

/// Payload that terminates the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// What one logical line means to the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Not a `data: ` line
    Ignored,
    /// The termination sentinel
    Done,
    /// A `data: ` line whose payload is not a chunk document
    Malformed(String),
    /// A chunk document and the non-empty content it carries, if any
    Delta(Option<String>),
}

#[derive(Debug, Deserialize)]
struct ChunkPayload {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Option<ChunkDelta>,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Classify one line.
pub fn parse_line(line: &str) -> Frame {
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return Frame::Ignored;
    };

    let payload = payload.trim();
    if payload == DONE_SENTINEL {
        return Frame::Done;
    }

    match serde_json::from_str::<ChunkPayload>(payload) {
        Ok(chunk) => Frame::Delta(
            chunk
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.delta)
                .and_then(|delta| delta.content)
                .filter(|content| !content.is_empty()),
        ),
        Err(e) => Frame::Malformed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_is_extracted_from_first_choice() {
        let frame = parse_line(
            r#"data: {"choices":[{"delta":{"content":"Hello"}},{"delta":{"content":"other"}}]}"#,
        );
        assert_eq!(frame, Frame::Delta(Some("Hello".to_string())));
    }

    #[test]
    fn whitespace_around_payload_is_trimmed() {
        assert_eq!(parse_line("data:   [DONE]  \r"), Frame::Done);
        assert_eq!(
            parse_line("data: {\"choices\":[{\"delta\":{\"content\":\" a \"}}]}\r"),
            Frame::Delta(Some(" a ".to_string()))
        );
    }

    #[test]
    fn lines_without_prefix_are_ignored() {
        assert_eq!(parse_line(""), Frame::Ignored);
        assert_eq!(parse_line(": keep-alive"), Frame::Ignored);
        assert_eq!(parse_line("event: message"), Frame::Ignored);
        assert_eq!(parse_line("data:{\"choices\":[]}"), Frame::Ignored);
        assert_eq!(parse_line(" data: [DONE]"), Frame::Ignored);
    }

    #[test]
    fn empty_or_missing_content_yields_no_fragment() {
        assert_eq!(
            parse_line(r#"data: {"choices":[{"delta":{"content":""}}]}"#),
            Frame::Delta(None)
        );
        assert_eq!(
            parse_line(r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#),
            Frame::Delta(None)
        );
        assert_eq!(
            parse_line(r#"data: {"choices":[{"delta":{"content":null}}]}"#),
            Frame::Delta(None)
        );
        assert_eq!(parse_line(r#"data: {"choices":[]}"#), Frame::Delta(None));
        assert_eq!(parse_line(r#"data: {"id":"x"}"#), Frame::Delta(None));
    }

    #[test]
    fn invalid_json_is_malformed() {
        assert!(matches!(parse_line("data: {not json"), Frame::Malformed(_)));
        assert!(matches!(parse_line("data: "), Frame::Malformed(_)));
        assert!(matches!(
            parse_line(r#"data: {"choices":[{"delta":{"content":42}}]}"#),
            Frame::Malformed(_)
        ));
    }
}
