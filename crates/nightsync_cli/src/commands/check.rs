//! Check command implementation.

use super::CliResult;
use nightsync_client::{NightscoutClient, Transport};
use std::io::Write;
use tracing::info;

/// Runs the check command.
pub async fn run<T: Transport>(
    client: &NightscoutClient<T>,
    out: &mut impl Write,
) -> CliResult<()> {
    let url = client.base_url().as_str();
    info!(url, authenticated = client.config().secret.is_some(), "checking connection");

    client.check_connection().await?;
    writeln!(out, "OK: {url}")?;
    Ok(())
}
