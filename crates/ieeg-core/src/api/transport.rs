//! The seam between the API client and whatever moves bytes over the wire.

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::credentials::Credentials;
use crate::error::TransportError;

/// HTTP method of a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// One fully built request.
///
/// `url` is what goes on the wire. `segments` and `query` are the same
/// endpoint path (below `/services`) and parameters, unencoded.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// Returns the value of a query parameter, if present.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Status and body of a response, whatever the status.
#[derive(Clone, Debug, PartialEq, Eq)]
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

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs authenticated requests.
///
/// Implementations authenticate each request with the supplied credentials
/// and return the raw status and body. They must not retry: a failure to get
/// any response at all is reported as a [`TransportError`].
pub trait Transport: Send + Sync {
    /// Send one request and wait for its response.
    fn send(
        &self,
        request: &ApiRequest,
        credentials: &Credentials,
    ) -> Result<ApiResponse, TransportError>;

    /// Release any held connections. Called once when the owning session closes.
    fn close(&self) {}
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(
        &self,
        request: &ApiRequest,
        credentials: &Credentials,
    ) -> Result<ApiResponse, TransportError> {
        (**self).send(request, credentials)
    }

    fn close(&self) {
        (**self).close()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(
        &self,
        request: &ApiRequest,
        credentials: &Credentials,
    ) -> Result<ApiResponse, TransportError> {
        (**self).send(request, credentials)
    }

    fn close(&self) {
        (**self).close()
    }
}
