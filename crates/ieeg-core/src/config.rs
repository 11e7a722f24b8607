//! Per-session connection configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, ValidationError};

/// Default repository host.
pub const DEFAULT_HOST: &str = "www.ieeg.org";

/// Path prefix shared by every service endpoint.
const SERVICES_PATH: &str = "services";

/// URL scheme used to reach the repository.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    #[default]
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_end_matches("://") {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            other => Err(ValidationError::Config {
                value: other.to_string(),
                reason: "scheme must be http or https".to_string(),
            }
            .into()),
        }
    }
}

/// Where and how one session talks to the repository.
///
/// Each [`Session`](crate::Session) owns its own copy, so sessions pointed at
/// different hosts can live side by side in one process.
///
/// # Example
///
/// ```
/// use ieeg_core::{ConnectionConfig, Scheme};
///
/// let config = ConnectionConfig::new("localhost")
///     .with_scheme(Scheme::Http)
///     .with_port(8080);
/// assert_eq!(config.base_url().unwrap().as_str(), "http://localhost:8080/");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub scheme: Scheme,
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    pub verify_ssl: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            scheme: Scheme::Https,
            host: DEFAULT_HOST.to_string(),
            port: None,
            verify_ssl: true,
            timeout: None,
        }
    }
}

impl ConnectionConfig {
    /// HTTPS configuration for the given host with SSL verification on.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.verify_ssl = verify_ssl;
        self
    }

    /// Overall per-request timeout handed to the transport.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the root URL of the repository.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the host is empty or the pieces do not
    /// form a valid URL.
    pub fn base_url(&self) -> Result<Url, Error> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(ValidationError::Config {
                value: self.host.clone(),
                reason: "host must not be empty".to_string(),
            }
            .into());
        }

        let raw = match self.port {
            Some(port) => format!("{}://{}:{}", self.scheme, host, port),
            None => format!("{}://{}", self.scheme, host),
        };

        let url = Url::parse(&raw).map_err(|e| ValidationError::Config {
            value: raw.clone(),
            reason: e.to_string(),
        })?;

        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(ValidationError::Config {
                value: raw,
                reason: "must be an absolute URL with a host".to_string(),
            }
            .into());
        }

        Ok(url)
    }

    /// Returns the URL of a service endpoint, percent-encoding each segment.
    pub fn endpoint_url<I, S>(&self, segments: I) -> Result<Url, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = self.base_url()?;
        {
            let mut path = url.path_segments_mut().map_err(|_| ValidationError::Config {
                value: self.host.clone(),
                reason: "URL cannot carry a path".to_string(),
            })?;
            path.clear().push(SERVICES_PATH);
            for segment in segments {
                path.push(segment.as_ref());
            }
        }
        Ok(url)
    }
}

impl fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        Ok(())
    }
}
