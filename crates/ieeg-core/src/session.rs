//! Session lifecycle and dataset resolution.

use std::fmt;

use tracing::{debug, info, instrument};

use crate::api::{ApiClient, Transport};
use crate::config::ConnectionConfig;
use crate::credentials::Credentials;
use crate::dataset::Dataset;
use crate::error::Error;

/// One authenticated connection to the repository.
///
/// A session owns exactly one [`ApiClient`]. It is closed explicitly with
/// [`close`](Self::close), by [`scoped`](Self::scoped), or when dropped; the
/// underlying transport is released once, whichever happens first. Opening
/// a dataset on a closed session fails with [`Error::Closed`].
///
/// Datasets borrow the session, so the borrow checker keeps a session open
/// for as long as any of its datasets is alive.
///
/// # Example
///
/// ```no_run
/// use ieeg_core::{ConnectionConfig, Credentials, Session, Transport};
///
/// # fn example(transport: impl Transport + 'static) -> Result<(), ieeg_core::Error> {
/// let session = Session::with_transport(
///     ConnectionConfig::default(),
///     Credentials::new("alice", "secret"),
///     transport,
/// )?;
///
/// session.scoped(|session| {
///     let dataset = session.open("Study 005")?;
///     println!("{:?}", dataset.channel_labels());
///     Ok(())
/// })
/// # }
/// ```
pub struct Session {
    client: Option<ApiClient>,
    username: String,
    config: ConnectionConfig,
}

impl Session {
    /// Create a session that sends its requests through `transport`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the configuration cannot form a URL.
    #[instrument(
        skip(credentials, transport),
        fields(host = %config, user = %credentials.username())
    )]
    pub fn with_transport(
        config: ConnectionConfig,
        credentials: Credentials,
        transport: impl Transport + 'static,
    ) -> Result<Self, Error> {
        let username = credentials.username().to_string();
        let client = ApiClient::new(config.clone(), credentials, transport)?;
        info!("session created");

        Ok(Self {
            client: Some(client),
            username,
            config,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.client.is_none()
    }

    /// Open a dataset by name.
    ///
    /// Resolves the name to a snapshot id, then fetches and parses that
    /// snapshot's details. Either both steps succeed or no dataset is
    /// returned.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown name, [`Error::Closed`] after
    /// [`close`](Self::close), otherwise whatever the failing call raised.
    #[instrument(skip(self), fields(user = %self.username))]
    pub fn open(&self, name: &str) -> Result<Dataset<'_>, Error> {
        let client = self.client()?;

        let snapshot_id = client.resolve_dataset_id(name)?;
        debug!(%snapshot_id, "resolved dataset");

        let details = client.fetch_time_series_details(&snapshot_id)?;
        info!(
            %snapshot_id,
            channels = details.channels.len(),
            "opened dataset"
        );

        Ok(Dataset::new(client, name.to_string(), snapshot_id, details))
    }

    /// Release the connection. Calling this again is a no-op.
    pub fn close(&mut self) {
        if let Some(client) = self.client.take() {
            client.close();
            info!(user = %self.username, "session closed");
        }
    }

    /// Run `f` with this session, then close it on every exit path.
    pub fn scoped<T, F>(mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&Session) -> Result<T, Error>,
    {
        let result = f(&self);
        self.close();
        result
    }

    pub(crate) fn client(&self) -> Result<&ApiClient, Error> {
        self.client.as_ref().ok_or(Error::Closed)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("config", &self.config)
            .field("closed", &self.is_closed())
            .finish()
    }
}
