//! CLI command implementations.

pub mod check;
pub mod classify;
pub mod delete;
pub mod fetch;
pub mod upload;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use nightsync_client::{ClientConfig, HttpTransport, NightscoutClient, SyncError};
use nightsync_protocol::{time::parse_iso8601, ProtocolError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the CLI itself.
#[derive(Error, Debug)]
pub enum CliError {
    /// No base URL on the command line or in the environment.
    #[error("Nightscout URL required (--url or NIGHTSCOUT_URL)")]
    MissingUrl,

    /// An input file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// An input file is not valid JSON for the chosen kind.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// Writing output failed.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),

    /// Unknown event type tag.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Remote operation failed.
    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Record families that can be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FetchKind {
    /// Sensor glucose entries
    Glucose,
    /// Carb treatments from other sources
    Carbs,
    /// Temporary targets from other sources
    TempTargets,
    /// Overrides uploaded by this app
    Overrides,
    /// Remote-command announcements
    Announcements,
}

/// Record families that can be uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UploadKind {
    /// A JSON array of treatments
    Treatments,
    /// A JSON array of glucose entries
    Glucose,
    /// A device status document
    Status,
    /// A profile store document
    Profile,
}

/// Treatment families that can be deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeleteKind {
    /// Carb treatment
    Carbs,
    /// Insulin treatment
    Insulin,
    /// Override treatment
    Override,
}

/// Parses an RFC 3339 command-line timestamp.
pub fn parse_time(value: &str) -> Result<DateTime<Utc>, ProtocolError> {
    parse_iso8601(value)
}

/// Builds an HTTP-backed client from the global options.
pub fn connect(
    url: Option<String>,
    secret: Option<String>,
) -> CliResult<NightscoutClient<HttpTransport>> {
    let url = url.filter(|u| !u.trim().is_empty()).ok_or(CliError::MissingUrl)?;
    let mut config = ClientConfig::new(url);
    if let Some(secret) = secret {
        config = config.with_secret(secret);
    }
    Ok(NightscoutClient::new(config, HttpTransport::new()?)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_time_normalizes_offsets() {
        let at = parse_time("2026-10-18T10:30:00+02:00").unwrap();
        assert_eq!(at.to_rfc3339(), "2026-10-18T08:30:00+00:00");
        assert!(parse_time("yesterday").is_err());
    }

    #[test]
    fn connect_requires_url() {
        assert!(matches!(connect(None, None), Err(CliError::MissingUrl)));
        assert!(matches!(
            connect(Some("  ".into()), Some("secret".into())),
            Err(CliError::MissingUrl)
        ));
        assert!(matches!(
            connect(Some("ftp://ns.example.com".into()), None),
            Err(CliError::Sync(SyncError::MissingUrl(_)))
        ));
    }

    #[test]
    fn connect_builds_client() {
        let client = connect(Some("https://ns.example.com".into()), Some("s3cret".into())).unwrap();
        assert_eq!(client.base_url().host_str(), Some("ns.example.com"));
        assert_eq!(client.config().secret.as_deref(), Some("s3cret"));
    }
}
