//! Request transport.
//!
//! [`DatamonsterApi`](crate::DatamonsterApi) talks to the server only through [`Transport`], so
//! tests can substitute a scripted implementation for [`HttpTransport`].

use crate::config::ClientConfig;
use crate::{ClientError, ClientResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
        })
    }
}

/// One call against the API.
///
/// The path is kept as separate segments so ids are percent-encoded one segment at a time
/// when the URL is built; an id containing `/`, `?` or `#` cannot reach another resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path segments below the API base URL, unencoded.
    pub segments: Vec<String>,
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Creates a request for `segments` with no body.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method
    /// * `segments` - Path segments such as `["api", "settlements"]`, not encoded
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Readable form of the path for logs and assertions; segments are not encoded.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// A settled response, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Maps a non-2xx status to its [`ClientError`].
    pub fn error_for_status(self) -> ClientResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::from_status(self.status, &self.body))
        }
    }

    /// Decodes a 2xx body, classifying any other status first.
    pub fn json<T: DeserializeOwned>(self) -> ClientResult<T> {
        let response = self.error_for_status()?;
        serde_json::from_str(&response.body).map_err(ClientError::Decode)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and waits for it to settle.
    ///
    /// Non-2xx statuses are returned as responses, not errors; only failures to get a response
    /// at all are `Err`.
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse>;
}

/// [`Transport`] over HTTP using `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Creates a transport whose requests carry the session from `config` and time out
    /// after `config.timeout()`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the underlying client cannot be built.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        let url = self.config.url_for(&request.segments)?;
        tracing::debug!("{} {}", request.method, url);

        let mut builder = match request.method {
            Method::Get => self.http.get(url.clone()),
            Method::Post => self.http.post(url.clone()),
            Method::Patch => self.http.patch(url.clone()),
        };
        if let Some(cookie) = self.config.session().cookie_header() {
            builder = builder.header(reqwest::header::COOKIE, cookie);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!("{} {} -> {}", request.method, url, status);

        Ok(ApiResponse { status, body })
    }
}
