//! Blocking HTTP transport backed by reqwest.

use std::error::Error as StdError;
use std::sync::RwLock;

use ieeg_core::{
    ApiRequest, ApiResponse, ConnectionConfig, Credentials, Method, Transport, TransportError,
};
use tracing::{debug, trace, warn};

/// Sends API requests over HTTP(S) with basic authentication.
///
/// Every request carries the caller's credentials; there is no login
/// round-trip and no retry. After [`Transport::close`] the client is
/// released and further requests fail with a connection error.
#[derive(Debug)]
pub struct HttpTransport {
    client: RwLock<Option<reqwest::blocking::Client>>,
}

impl HttpTransport {
    /// Build a transport honoring the TLS and timeout settings in `config`.
    ///
    /// Must not be called from inside an async runtime.
    pub fn new(config: &ConnectionConfig) -> Result<Self, TransportError> {
        // `None` disables reqwest's 30 second default and waits indefinitely.
        let builder = reqwest::blocking::Client::builder()
            .user_agent(concat!("ieeg-rs/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(!config.verify_ssl)
            .timeout(config.timeout);

        if !config.verify_ssl {
            warn!(host = %config.host, "TLS certificate verification disabled");
        }

        let client = builder.build().map_err(transport_error)?;
        Ok(Self {
            client: RwLock::new(Some(client)),
        })
    }

    fn client(&self) -> Result<reqwest::blocking::Client, TransportError> {
        let guard = self.client.read().map_err(|_| TransportError::Http {
            message: "transport lock poisoned".to_string(),
        })?;
        guard.clone().ok_or_else(|| TransportError::Connection {
            message: "transport closed".to_string(),
        })
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        request: &ApiRequest,
        credentials: &Credentials,
    ) -> Result<ApiResponse, TransportError> {
        let client = self.client()?;

        let mut builder = match request.method {
            Method::Get => client.get(request.url.clone()),
            Method::Post => client.post(request.url.clone()),
        }
        .basic_auth(credentials.username(), Some(credentials.password()));
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(transport_error)?;
        let status = response.status().as_u16();
        trace!(status, "HTTP response");

        let body = response.text().map_err(transport_error)?;
        Ok(ApiResponse::new(status, body))
    }

    fn close(&self) {
        if let Ok(mut guard) = self.client.write()
            && guard.take().is_some()
        {
            debug!("HTTP client released");
        }
    }
}

/// Classify a reqwest failure that produced no usable response.
pub fn transport_error(err: reqwest::Error) -> TransportError {
    let causes = causes(&err);
    let message = if causes.is_empty() {
        err.to_string()
    } else {
        format!("{}: {}", err, causes.join(": "))
    };

    if err.is_timeout() {
        TransportError::Timeout { message }
    } else if causes.iter().any(|c| is_tls_failure(c)) {
        TransportError::Tls { message }
    } else if err.is_connect() {
        TransportError::Connection { message }
    } else {
        TransportError::Http { message }
    }
}

// The top-level message embeds the request URL, so only the causes are
// inspected when classifying.
fn causes(err: &reqwest::Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }
    causes
}

fn is_tls_failure(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("certificate") || lower.contains("tls") || lower.contains("handshake")
}
