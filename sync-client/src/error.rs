//! Request errors and server error-body normalization.

use thiserror::Error;

use crate::transport::TransportError;

/// Failure of one API operation.
///
/// `to_string()` is exactly the message that reaches application state.
#[derive(Debug, Error)]
pub enum RequestError {
    /// No response arrived.
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// A request or response body did not have the expected shape.
    #[error("invalid body: {0}")]
    Body(String),
}

impl From<TransportError> for RequestError {
    fn from(err: TransportError) -> Self {
        Self::Transport(err.to_string())
    }
}

impl RequestError {
    /// Build a status error from a response body.
    pub fn from_status(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            message: error_message_from_body(body),
        }
    }

    /// HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Extract the human-readable message from an error response body.
///
/// A JSON string is the message itself; a JSON object carries it in its
/// `message` field. Anything else is used as plain text.
pub fn error_message_from_body(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::String(message)) => message,
        Ok(serde_json::Value::Object(map)) => match map.get("message") {
            Some(serde_json::Value::String(message)) => message.clone(),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        _ => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_string_body_is_the_message() {
        assert_eq!(error_message_from_body(r#""no such recording""#), "no such recording");
    }

    #[test]
    fn object_message_field_is_the_message() {
        assert_eq!(
            error_message_from_body(r#"{"message": "name too long", "code": 7}"#),
            "name too long"
        );
    }

    #[test]
    fn non_string_message_field_is_rendered() {
        assert_eq!(error_message_from_body(r#"{"message": 42}"#), "42");
    }

    #[test]
    fn object_without_message_is_raw_text() {
        let body = r#"{"error": "x"}"#;
        assert_eq!(error_message_from_body(body), body);
    }

    #[test]
    fn unparsable_body_is_raw_text() {
        assert_eq!(error_message_from_body("Internal Server Error"), "Internal Server Error");
        assert_eq!(error_message_from_body(""), "");
    }

    #[test]
    fn other_json_is_raw_text() {
        assert_eq!(error_message_from_body("[1,2]"), "[1,2]");
    }

    #[test]
    fn display_is_the_state_message() {
        let err = RequestError::from_status(404, r#""gone""#);
        assert_eq!(err.to_string(), "gone");
        assert_eq!(err.status(), Some(404));

        let err = RequestError::from(TransportError::ConnectionFailed("refused".into()));
        assert_eq!(err.to_string(), "connection failed: refused");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RequestError>();
    }
}
