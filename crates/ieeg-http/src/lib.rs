//! ieeg-http - network access to the IEEG time-series repository.
//!
//! Provides [`HttpTransport`], a blocking reqwest client that authenticates
//! every request with HTTP basic auth, and shortcuts that build a
//! [`Session`] on top of it.
//!
//! ```no_run
//! use ieeg_core::{ConnectionConfig, Credentials};
//!
//! # fn example() -> Result<(), ieeg_core::Error> {
//! let labels = ieeg_http::with_session(
//!     ConnectionConfig::default(),
//!     Credentials::new("alice", "secret"),
//!     |session| {
//!         let dataset = session.open("Study 005")?;
//!         Ok(dataset.channel_labels().join(", "))
//!     },
//! )?;
//! println!("{labels}");
//! # Ok(())
//! # }
//! ```

mod transport;

pub use transport::{HttpTransport, transport_error};

use ieeg_core::{ConnectionConfig, Credentials, Error, Session};

/// Open a session against the server described by `config`.
///
/// No request is sent until the first dataset is opened, so bad credentials
/// surface there.
pub fn connect(config: ConnectionConfig, credentials: Credentials) -> Result<Session, Error> {
    let transport = HttpTransport::new(&config)?;
    Session::with_transport(config, credentials, transport)
}

/// Connect, run `f`, and close the session whether `f` succeeds or not.
pub fn with_session<T, F>(
    config: ConnectionConfig,
    credentials: Credentials,
    f: F,
) -> Result<T, Error>
where
    F: FnOnce(&Session) -> Result<T, Error>,
{
    connect(config, credentials)?.scoped(f)
}
