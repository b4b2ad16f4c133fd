//! Fetch command implementation.

use super::{CliResult, FetchKind};
use chrono::{DateTime, Utc};
use nightsync_client::{NightscoutClient, Transport};
use serde::Serialize;
use std::io::Write;
use tracing::info;

/// Runs the fetch command, printing the records as pretty JSON.
pub async fn run<T: Transport>(
    client: &NightscoutClient<T>,
    kind: FetchKind,
    since: Option<DateTime<Utc>>,
    out: &mut impl Write,
) -> CliResult<()> {
    let count = match kind {
        FetchKind::Glucose => print(out, &client.fetch_glucose(since).await)?,
        FetchKind::Carbs => print(out, &client.fetch_carbs(since).await)?,
        FetchKind::TempTargets => print(out, &client.fetch_temp_targets(since).await)?,
        FetchKind::Overrides => print(out, &client.fetch_overrides(since).await)?,
        FetchKind::Announcements => print(out, &client.fetch_announcements(since).await?)?,
    };
    info!(?kind, count, "fetched");
    Ok(())
}

fn print<R: Serialize>(out: &mut impl Write, records: &[R]) -> CliResult<usize> {
    serde_json::to_writer_pretty(&mut *out, records).map_err(std::io::Error::from)?;
    writeln!(out)?;
    Ok(records.len())
}
