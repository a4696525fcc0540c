use datamonster_core::{CoreError, ValidationErrors};

/// Longest server message kept in a [`ClientError::Rejected`].
const MAX_MESSAGE_LEN: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("not signed in or session expired")]
    Unauthorized,
    #[error("request rejected by server ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("server unavailable ({status})")]
    Unavailable { status: u16 },
    #[error("unexpected response status {status}")]
    UnexpectedStatus { status: u16 },
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to decode response body: {0}")]
    Decode(serde_json::Error),
    #[error("invalid draft: {0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Classifies a non-2xx response.
    ///
    /// 401 means the session is missing or expired, other 4xx mean the server refused this
    /// input, 5xx mean the server could not handle the request at all.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 => ClientError::Unauthorized,
            400..=499 => ClientError::Rejected {
                status,
                message: server_message(body),
            },
            500..=599 => ClientError::Unavailable { status },
            _ => ClientError::UnexpectedStatus { status },
        }
    }

    /// Whether trying the same request again later may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Unavailable { .. } => true,
            ClientError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Best-effort human readable message from an error body.
///
/// The API answers errors with a bare JSON string; objects with `message` or `error` and plain
/// text bodies are accepted too.
fn server_message(body: &str) -> String {
    let message = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(serde_json::Value::Object(map)) => map
            .get("message")
            .or_else(|| map.get("error"))
            .and_then(|v| v.as_str())
            .map(str::to_owned)
            .unwrap_or_else(|| body.trim().to_owned()),
        _ => body.trim().to_owned(),
    };

    if message.is_empty() {
        return "no details provided".to_owned();
    }
    message.chars().take(MAX_MESSAGE_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_is_its_own_class() {
        assert!(matches!(
            ClientError::from_status(401, ""),
            ClientError::Unauthorized
        ));
    }

    #[test]
    fn test_client_errors_are_rejections_with_message() {
        let err = ClientError::from_status(400, r#""survival must be positive""#);
        match err {
            ClientError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "survival must be positive");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_rejection_reads_message_field() {
        let err = ClientError::from_status(422, r#"{"message": "bad status"}"#);
        assert!(matches!(err, ClientError::Rejected { message, .. } if message == "bad status"));
    }

    #[test]
    fn test_rejection_with_empty_body() {
        let err = ClientError::from_status(404, "  ");
        assert!(
            matches!(err, ClientError::Rejected { message, .. } if message == "no details provided")
        );
    }

    #[test]
    fn test_rejection_message_is_truncated() {
        let body = "x".repeat(1000);
        let err = ClientError::from_status(400, &body);
        assert!(matches!(err, ClientError::Rejected { message, .. } if message.len() == 200));
    }

    #[test]
    fn test_server_errors_are_unavailable_and_transient() {
        let err = ClientError::from_status(503, "");
        assert!(matches!(err, ClientError::Unavailable { status: 503 }));
        assert!(err.is_transient());
        assert!(!ClientError::from_status(400, "").is_transient());
    }

    #[test]
    fn test_other_statuses_are_unexpected() {
        assert!(matches!(
            ClientError::from_status(302, ""),
            ClientError::UnexpectedStatus { status: 302 }
        ));
    }
}
