//! Upload command implementation.

use super::{CliError, CliResult, UploadKind};
use nightsync_client::{NightscoutClient, Transport};
use nightsync_protocol::{BloodGlucose, Treatment};
use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Runs the upload command.
pub async fn run<T: Transport>(
    client: &NightscoutClient<T>,
    kind: UploadKind,
    file: &Path,
    out: &mut impl Write,
) -> CliResult<()> {
    let count = match kind {
        UploadKind::Treatments => {
            let treatments: Vec<Treatment> = load_json(file)?;
            client.upload_treatments(&treatments).await?;
            treatments.len()
        }
        UploadKind::Glucose => {
            let glucose: Vec<BloodGlucose> = load_json(file)?;
            client.upload_glucose(&glucose).await?;
            glucose.len()
        }
        UploadKind::Status => {
            let status: serde_json::Value = load_json(file)?;
            client.upload_status(&status).await?;
            1
        }
        UploadKind::Profile => {
            let profile: serde_json::Value = load_json(file)?;
            client.upload_profile(&profile).await?;
            1
        }
    };

    info!(?kind, count, file = %file.display(), "uploaded");
    writeln!(out, "Uploaded {count} record(s)")?;
    Ok(())
}

/// Reads and decodes a JSON file.
pub fn load_json<R: DeserializeOwned>(path: &Path) -> CliResult<R> {
    let bytes = std::fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nightsync_client::{paths, ClientConfig, MockTransport};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn setup() -> (NightscoutClient<Arc<MockTransport>>, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new());
        transport.set_fallback(Ok(Vec::new()));
        let client = NightscoutClient::new(
            ClientConfig::new("https://ns.example.com").with_secret("s3cret"),
            Arc::clone(&transport),
        )
        .unwrap();
        (client, transport)
    }

    #[tokio::test]
    async fn uploads_treatments_from_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("treatments.json");
        std::fs::write(
            &file,
            r#"[
                {"eventType": "Site Change", "created_at": "2026-10-18T08:30:00.000Z"},
                {"eventType": "Temp Basal", "created_at": "2026-10-18T08:35:00.000Z", "absolute": 0.5, "duration": 30}
            ]"#,
        )
        .unwrap();
        let (client, transport) = setup();

        let mut out = Vec::new();
        run(&client, UploadKind::Treatments, &file, &mut out).await.unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.path(), paths::TREATMENTS);
        let body: serde_json::Value =
            serde_json::from_slice(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body.as_array().map(Vec::len), Some(2));
        assert_eq!(String::from_utf8(out).unwrap(), "Uploaded 2 record(s)\n");
    }

    #[tokio::test]
    async fn uploads_status_document() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("status.json");
        std::fs::write(
            &file,
            r#"{"device": "openaps://phone", "pump": {"battery": {"percent": 80}}}"#,
        )
        .unwrap();
        let (client, transport) = setup();

        let mut out = Vec::new();
        run(&client, UploadKind::Status, &file, &mut out).await.unwrap();
        assert_eq!(transport.last_request().unwrap().path(), paths::DEVICE_STATUS);
    }

    #[tokio::test]
    async fn rejects_bad_input() {
        let dir = TempDir::new().unwrap();
        let (client, transport) = setup();
        let mut out = Vec::new();

        let missing = dir.path().join("missing.json");
        let result = run(&client, UploadKind::Profile, &missing, &mut out).await;
        assert!(matches!(result, Err(CliError::Read { .. })));

        let invalid = dir.path().join("glucose.json");
        std::fs::write(&invalid, r#"[{"sgv": "high"}]"#).unwrap();
        let result = run(&client, UploadKind::Glucose, &invalid, &mut out).await;
        assert!(matches!(result, Err(CliError::Json { .. })));

        assert_eq!(transport.request_count(), 0);
    }
}
