/// Name of the session cookie issued by the settlement API on login.
pub const SESSION_COOKIE: &str = "dm_session";

/// Credentials attached to every request of one client.
///
/// Held by the transport that uses it; there is no process-wide auth state.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    token: Option<String>,
}

impl SessionContext {
    /// No credentials; protected calls come back as `ClientError::Unauthorized`.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self::from_optional(Some(&token.into()))
    }

    /// Blank values count as no session.
    pub fn from_optional(token: Option<&str>) -> Self {
        Self {
            token: token
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_owned),
        }
    }

    /// Whether a session token is present. The server may still reject it.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Value for the `Cookie` request header, if signed in.
    pub fn cookie_header(&self) -> Option<String> {
        self.token
            .as_ref()
            .map(|token| format!("{SESSION_COOKIE}={token}"))
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_header() {
        let session = SessionContext::with_token("abc123");
        assert_eq!(session.cookie_header().as_deref(), Some("dm_session=abc123"));
    }

    #[test]
    fn test_blank_token_is_anonymous() {
        assert!(!SessionContext::from_optional(Some("  ")).is_authenticated());
        assert_eq!(SessionContext::anonymous().cookie_header(), None);
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let rendered = format!("{:?}", SessionContext::with_token("secret"));
        assert!(!rendered.contains("secret"));
    }
}
