//! Delete command implementation.

use super::{CliResult, DeleteKind};
use chrono::{DateTime, Utc};
use nightsync_client::{NightscoutClient, Transport};
use nightsync_protocol::time::format_iso8601;
use std::io::Write;

/// Runs the delete command.
pub async fn run<T: Transport>(
    client: &NightscoutClient<T>,
    kind: DeleteKind,
    at: DateTime<Utc>,
    out: &mut impl Write,
) -> CliResult<()> {
    match kind {
        DeleteKind::Carbs => client.delete_carbs(at).await?,
        DeleteKind::Insulin => client.delete_insulin(at).await?,
        DeleteKind::Override => client.delete_override(at).await?,
    }
    writeln!(out, "Deleted {kind:?} created at {}", format_iso8601(&at))?;
    Ok(())
}
