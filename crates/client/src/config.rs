//! Client runtime configuration.
//!
//! Resolved once at process startup and passed into [`HttpTransport`](crate::HttpTransport).
//! Nothing in this crate reads environment variables while a request is being handled.

use crate::session::SessionContext;
use crate::{ClientError, ClientResult};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

pub const API_URL_ENV: &str = "DATAMONSTER_API_URL";
pub const SESSION_ENV: &str = "DATAMONSTER_SESSION";
pub const TIMEOUT_ENV: &str = "DATAMONSTER_TIMEOUT_SECS";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: reqwest::Url,
    session: SessionContext,
    timeout: Duration,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidConfig` if `base_url` is not an absolute http(s) URL or the
    /// timeout is zero.
    pub fn new(base_url: &str, session: SessionContext, timeout: Duration) -> ClientResult<Self> {
        let trimmed = base_url.trim();
        let parsed = reqwest::Url::parse(trimmed)
            .map_err(|e| ClientError::InvalidConfig(format!("api url {trimmed:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidConfig(format!(
                "api url must use http or https, got {:?}",
                parsed.scheme()
            )));
        }
        if timeout.is_zero() {
            return Err(ClientError::InvalidConfig(
                "request timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            base_url: parsed,
            session,
            timeout,
        })
    }

    /// Builds a config from raw values as found in the environment.
    ///
    /// Missing values fall back to [`DEFAULT_API_URL`] and [`DEFAULT_TIMEOUT_SECS`]; an empty
    /// session means anonymous.
    pub fn from_values(
        base_url: Option<&str>,
        session: Option<&str>,
        timeout_secs: Option<&str>,
    ) -> ClientResult<Self> {
        let timeout_secs = match timeout_secs.map(str::trim) {
            None | Some("") => DEFAULT_TIMEOUT_SECS,
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                ClientError::InvalidConfig(format!("{TIMEOUT_ENV} must be a whole number, got {raw:?}"))
            })?,
        };

        Self::new(
            base_url.unwrap_or(DEFAULT_API_URL),
            SessionContext::from_optional(session),
            Duration::from_secs(timeout_secs),
        )
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Upper bound for one request, connect to last body byte.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL for the given path segments below the base URL.
    ///
    /// Each segment is percent-encoded on its own, so `/`, `?` and `#` inside an id stay part
    /// of that segment.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidConfig` if the base URL cannot take path segments, which
    /// does not happen for the http(s) URLs accepted by [`ClientConfig::new`].
    pub fn url_for<S: AsRef<str>>(&self, segments: &[S]) -> ClientResult<reqwest::Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidConfig("api url cannot take a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_values(None, None, None).unwrap();
        assert_eq!(config.base_url(), DEFAULT_API_URL);
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(!config.session().is_authenticated());
    }

    #[test]
    fn test_trailing_slash_is_removed() {
        let config =
            ClientConfig::new("https://dm.example/", SessionContext::anonymous(), Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            config.url_for(&["api", "glossary"]).unwrap().as_str(),
            "https://dm.example/api/glossary"
        );
    }

    #[test]
    fn test_base_path_is_kept() {
        let config = ClientConfig::new(
            "https://dm.example/v1",
            SessionContext::anonymous(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            config.url_for(&["api", "glossary"]).unwrap().as_str(),
            "https://dm.example/v1/api/glossary"
        );
    }

    #[test]
    fn test_reserved_characters_in_ids_are_encoded() {
        let config = ClientConfig::from_values(None, None, None).unwrap();
        let url = config
            .url_for(&["api", "settlements", "12/../7?x#y", "survivors"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/settlements/12%2F..%2F7%3Fx%23y/survivors"
        );
    }

    #[test]
    fn test_rejects_non_http_url() {
        let result = ClientConfig::from_values(Some("ftp://dm.example"), None, None);
        assert!(matches!(result, Err(ClientError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_garbage_url() {
        let result = ClientConfig::from_values(Some("not a url"), None, None);
        assert!(matches!(result, Err(ClientError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_zero_and_non_numeric_timeout() {
        assert!(ClientConfig::from_values(None, None, Some("0")).is_err());
        assert!(ClientConfig::from_values(None, None, Some("soon")).is_err());
    }
}
