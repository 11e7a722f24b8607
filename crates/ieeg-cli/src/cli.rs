//! CLI argument definitions.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ieeg_core::{ConnectionConfig, Credentials, Scheme};
use tracing::warn;

use crate::commands::annotations::AnnotationsCommand;
use crate::commands::{export, metadata};

/// Command-line access to the IEEG time-series repository.
#[derive(Parser, Debug)]
#[command(name = "ieeg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print channel details, annotation layers and the current montage
    Metadata(metadata::MetadataArgs),

    /// Write a window of raw samples, with labels and annotations, to a file
    Export(export::ExportArgs),

    /// Read, add, move or delete annotation layers
    Annotations(AnnotationsCommand),
}

/// Where to connect and as whom.
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Username
    #[arg(short, long, env = "IEEG_USER")]
    pub user: String,

    /// Password (prompted if omitted)
    #[arg(short, long, env = "IEEG_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Server host name
    #[arg(long, env = "IEEG_HOST")]
    pub host: Option<String>,

    /// Server port. Ignored unless --host is set.
    #[arg(long, env = "IEEG_PORT")]
    pub port: Option<u16>,

    /// Use http instead of https. Ignored unless --host is set.
    #[arg(long)]
    pub http: bool,

    /// Accept any TLS certificate
    #[arg(long)]
    pub no_verify_ssl: bool,

    /// Per-request timeout in seconds
    #[arg(long, env = "IEEG_TIMEOUT")]
    pub timeout: Option<u64>,
}

impl ConnectionArgs {
    pub fn config(&self) -> ConnectionConfig {
        let mut config = match &self.host {
            Some(host) => {
                let mut config = ConnectionConfig::new(host.clone());
                if let Some(port) = self.port {
                    config = config.with_port(port);
                }
                if self.http {
                    config = config.with_scheme(Scheme::Http);
                }
                config
            }
            None => {
                if self.port.is_some() || self.http {
                    warn!("--port and --http are ignored without --host");
                }
                ConnectionConfig::default()
            }
        };

        config = config.with_verify_ssl(!self.no_verify_ssl);
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }

    /// The credentials to use, prompting for the password if none was given.
    pub fn credentials(&self) -> Result<Credentials> {
        let password = match &self.password {
            Some(password) => password.clone(),
            None => dialoguer::Password::new()
                .with_prompt(format!("Password for {}", self.user))
                .interact()
                .context("Failed to read password")?,
        };
        Ok(Credentials::new(&self.user, password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn host_options_build_config() {
        let cli = Cli::try_parse_from([
            "ieeg", "-u", "alice", "-p", "pw", "--host", "localhost", "--port", "8080", "--http",
            "metadata", "Study 005",
        ])
        .unwrap();

        let config = cli.connection.config();
        assert_eq!(config.to_string(), "http://localhost:8080");
        assert!(config.verify_ssl);
    }

    #[test]
    fn port_without_host_is_ignored() {
        let cli = Cli::try_parse_from([
            "ieeg", "-u", "alice", "-p", "pw", "--port", "8080", "--no-verify-ssl", "metadata",
            "Study 005",
        ])
        .unwrap();

        let config = cli.connection.config();
        assert_eq!(config.to_string(), "https://www.ieeg.org");
        assert!(!config.verify_ssl);
    }

    #[test]
    fn move_needs_both_layers_or_neither() {
        let base = ["ieeg", "-u", "alice", "-p", "pw", "annotations", "move", "Study 005"];

        assert!(Cli::try_parse_from(base).is_ok());
        assert!(Cli::try_parse_from(base.iter().chain(&["A", "B"])).is_ok());

        let err = Cli::try_parse_from(base.iter().chain(&["A"])).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
