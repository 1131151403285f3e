//! Turns raw chain error documents into translation keys.

use serde::Deserialize;

/// Returned when the error document does not have the expected shape.
pub const UNKNOWN_ERROR: &str = "error.unknown";

const MESSAGE_SEPARATOR: &str = ": ";

#[derive(Deserialize)]
struct ErrorDocument {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    details: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Relevant fragment of `raw` if it is a chain error document with at
/// least one detail message, `None` for anything else.
pub fn chain_error_message(raw: &str) -> Option<String> {
    let ErrorDetail { message } = serde_json::from_str::<ErrorDocument>(raw)
        .ok()?
        .error
        .details
        .into_iter()
        .next()?;

    match message.split_once(MESSAGE_SEPARATOR) {
        Some((_, relevant)) => Some(relevant.to_string()),
        None => Some(message),
    }
}

/// Most relevant fragment of a chain error, e.g. the text after
/// `assertion failure with message: `.
pub fn extract_failure(raw: &str) -> String {
    chain_error_message(raw).unwrap_or_else(|| UNKNOWN_ERROR.to_string())
}

/// Translation key for an error under `namespace`
/// (e.g. `"error.contracts.transfer."`), or `default_key` when there is no
/// error to inspect.
pub fn translation_key(namespace: &str, error: Option<&str>, default_key: &str) -> String {
    match error {
        Some(raw) => format!("{}{}", namespace, extract_failure(raw)),
        None => default_key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_text_after_separator() {
        let raw = r#"{"error":{"details":[{"message":"assertion failure with message: Can't vote on already verified claim"}]}}"#;
        assert_eq!(extract_failure(raw), "Can't vote on already verified claim");
    }

    #[test]
    fn test_splits_only_once() {
        let raw = r#"{"error":{"details":[{"message":"assertion failure with message: bad input: amount"}]}}"#;
        assert_eq!(extract_failure(raw), "bad input: amount");
    }

    #[test]
    fn test_uses_first_detail() {
        let raw = r#"{"error":{"code":3050003,"details":[{"message":"first: one"},{"message":"second: two"}]}}"#;
        assert_eq!(extract_failure(raw), "one");
    }

    #[test]
    fn test_message_without_separator() {
        let raw = r#"{"error":{"details":[{"message":"timeout"}]}}"#;
        assert_eq!(extract_failure(raw), "timeout");
    }

    #[test]
    fn test_unknown_error_fallback() {
        assert_eq!(extract_failure("{}"), UNKNOWN_ERROR);
        assert_eq!(extract_failure("not json"), UNKNOWN_ERROR);
        assert_eq!(extract_failure(r#"{"error":{"details":[]}}"#), UNKNOWN_ERROR);
        assert_eq!(extract_failure(r#"{"error":{"details":[{"code":1}]}}"#), UNKNOWN_ERROR);
    }

    #[test]
    fn test_chain_error_message_only_for_documents() {
        let raw = r#"{"error":{"details":[{"message":"assertion failure with message: overdrawn balance"}]}}"#;
        assert_eq!(chain_error_message(raw).as_deref(), Some("overdrawn balance"));

        assert_eq!(chain_error_message("<html>404 Not Found</html>"), None);
        assert_eq!(chain_error_message(r#"{"error":{"details":[]}}"#), None);
    }

    #[test]
    fn test_translation_key() {
        let raw = r#"{"error":{"details":[{"message":"assertion failure with message: overdrawn balance"}]}}"#;

        assert_eq!(
            translation_key("error.contracts.transfer.", Some(raw), "error.unknown"),
            "error.contracts.transfer.overdrawn balance"
        );
        assert_eq!(
            translation_key("error.contracts.transfer.", None, "error.contracts.transfer.default"),
            "error.contracts.transfer.default"
        );
        assert_eq!(
            translation_key("error.contracts.transfer.", Some("{}"), "unused"),
            "error.contracts.transfer.error.unknown"
        );
    }
}
