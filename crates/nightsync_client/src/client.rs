//! Nightscout sync client.

use crate::auth::{api_secret_digest, API_SECRET_HEADER};
use crate::config::ClientConfig;
use crate::error::{SyncError, SyncResult};
use crate::request::{Bound, Method, Query, Request};
use crate::retry::with_retry;
use crate::transport::Transport;
use chrono::{DateTime, Utc};
use nightsync_protocol::{
    Announcement, BloodGlucose, CarbsEntry, EventType, OverrideTreatment, TempTarget, Treatment,
    OVERRIDE_EVENT_TYPE,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

/// Fixed resource paths of the remote store.
pub mod paths {
    /// Glucose entries (fetch).
    pub const ENTRIES: &str = "/api/v1/entries/sgv.json";
    /// Glucose entries (upload).
    pub const UPLOAD_ENTRIES: &str = "/api/v1/entries.json";
    /// Treatments.
    pub const TREATMENTS: &str = "/api/v1/treatments.json";
    /// Device status, preferences, settings and stats.
    pub const DEVICE_STATUS: &str = "/api/v1/devicestatus.json";
    /// Profile.
    pub const PROFILE: &str = "/api/v1/profile.json";
}

/// Body of the connectivity note posted by `check_connection`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionCheck {
    event_type: &'static str,
    entered_by: &'static str,
    notes: &'static str,
}

const CONNECTION_CHECK: ConnectionCheck = ConnectionCheck {
    event_type: "Note",
    entered_by: "feeeeeeeeeeeeed",
    notes: "test",
};

/// Client for a Nightscout remote store.
///
/// Each call builds its own request and carries no state across calls, so
/// a single client can serve concurrent operations.
pub struct NightscoutClient<T: Transport> {
    config: ClientConfig,
    base_url: Url,
    api_secret: Option<String>,
    transport: T,
}

impl<T: Transport> NightscoutClient<T> {
    /// Creates a new client.
    ///
    /// Fails with [`SyncError::MissingUrl`] if the configured address is
    /// not an absolute http(s) URL.
    pub fn new(config: ClientConfig, transport: T) -> SyncResult<Self> {
        let base_url = config.base_url()?;
        let api_secret = config.secret.as_deref().map(api_secret_digest);
        Ok(Self {
            config,
            base_url,
            api_secret,
            transport,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the validated base address.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ---- request plumbing ----

    fn request(&self, method: Method, path: &str, query: &Query) -> Request {
        let request = Request::new(method, &self.base_url, path, query, self.config.timeout);
        match &self.api_secret {
            Some(digest) => request.with_header(API_SECRET_HEADER, digest.clone()),
            None => request,
        }
    }

    fn json_request<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> SyncResult<Request> {
        let bytes = serde_json::to_vec(body).map_err(|e| SyncError::Encode(e.to_string()))?;
        Ok(self
            .request(Method::Post, path, &Query::new())
            .with_json_body(bytes))
    }

    async fn send_once(&self, request: Request) -> SyncResult<Vec<u8>> {
        debug!(method = %request.method, path = request.path(), "nightscout request");
        match tokio::time::timeout(self.config.timeout, self.transport.send(request)).await {
            Ok(result) => result.map_err(SyncError::from),
            Err(_) => Err(SyncError::Timeout),
        }
    }

    async fn send(&self, operation: &str, request: Request) -> SyncResult<Vec<u8>> {
        with_retry(&self.config.retry, operation, move || self.send_once(request.clone())).await
    }

    async fn fetch<R: DeserializeOwned>(
        &self,
        operation: &str,
        request: Request,
    ) -> SyncResult<Vec<R>> {
        let body = self.send(operation, request).await?;
        serde_json::from_slice(&body).map_err(|e| SyncError::Decode(e.to_string()))
    }

    /// Turns a failed background pull into "no new data".
    fn or_empty<R>(operation: &str, result: SyncResult<Vec<R>>) -> Vec<R> {
        result.unwrap_or_else(|e| {
            warn!(operation, error = %e, "fetch failed, treating as no new data");
            Vec::new()
        })
    }

    async fn upload<B: Serialize + ?Sized>(
        &self,
        operation: &str,
        path: &str,
        body: &B,
    ) -> SyncResult<()> {
        let request = self.json_request(path, body)?;
        self.send(operation, request).await.map(|_| ())
    }

    async fn delete_treatments(&self, operation: &str, query: Query) -> SyncResult<()> {
        let request = self.request(Method::Delete, paths::TREATMENTS, &query);
        self.send(operation, request).await.map(|_| ())
    }

    // ---- operations ----

    /// Verifies that the remote is reachable and accepts our credentials.
    ///
    /// With a secret this writes a short note to the treatments collection;
    /// without one it only reads. Failures propagate after one retry.
    pub async fn check_connection(&self) -> SyncResult<()> {
        let request = if self.api_secret.is_some() {
            self.json_request(paths::TREATMENTS, &CONNECTION_CHECK)?
        } else {
            self.request(Method::Get, paths::TREATMENTS, &Query::new())
        };
        self.send("check_connection", request).await.map(|_| ())
    }

    /// Fetches glucose entries with `dateString >= since`.
    ///
    /// Never fails: errors are logged and yield an empty list.
    pub async fn fetch_glucose(&self, since: Option<DateTime<Utc>>) -> Vec<BloodGlucose> {
        let query = Query::new()
            .param("count", self.config.glucose_count)
            .since("dateString", since.as_ref(), Bound::Inclusive);
        let request = self.request(Method::Get, paths::ENTRIES, &query);

        let result = self.fetch::<BloodGlucose>("fetch_glucose", request).await;
        Self::or_empty("fetch_glucose", result)
            .into_iter()
            .map(BloodGlucose::normalized)
            .collect()
    }

    /// Fetches carb entries created strictly after `since`, excluding
    /// entries this app uploaded.
    ///
    /// Never fails: errors are logged and yield an empty list.
    pub async fn fetch_carbs(&self, since: Option<DateTime<Utc>>) -> Vec<CarbsEntry> {
        let origins = &self.config.origins;
        let query = Query::new()
            .exists("carbs")
            .not_equal("enteredBy", &origins.carbs)
            .not_equal("enteredBy", &origins.treatment)
            .since("created_at", since.as_ref(), Bound::Exclusive);
        let request = self.request(Method::Get, paths::TREATMENTS, &query);

        Self::or_empty("fetch_carbs", self.fetch("fetch_carbs", request).await)
    }

    /// Fetches temporary targets created strictly after `since`, excluding
    /// targets this app uploaded.
    ///
    /// Never fails: errors are logged and yield an empty list.
    pub async fn fetch_temp_targets(&self, since: Option<DateTime<Utc>>) -> Vec<TempTarget> {
        let origins = &self.config.origins;
        let query = Query::new()
            .equals("eventType", EventType::NsTempTarget.as_str())
            .not_equal("enteredBy", &origins.carbs)
            .not_equal("enteredBy", &origins.treatment)
            .exists("duration")
            .since("created_at", since.as_ref(), Bound::Exclusive);
        let request = self.request(Method::Get, paths::TREATMENTS, &query);

        Self::or_empty(
            "fetch_temp_targets",
            self.fetch("fetch_temp_targets", request).await,
        )
    }

    /// Fetches overrides this app uploaded, created strictly after `since`.
    ///
    /// Unlike the other treatment fetches this one *includes* only our own
    /// records: overrides are read back, not ingested from other sources.
    /// Never fails: errors are logged and yield an empty list.
    pub async fn fetch_overrides(&self, since: Option<DateTime<Utc>>) -> Vec<OverrideTreatment> {
        let query = Query::new()
            .equals("eventType", OVERRIDE_EVENT_TYPE)
            .equals("enteredBy", &self.config.origins.treatment)
            .since("created_at", since.as_ref(), Bound::Exclusive);
        let request = self.request(Method::Get, paths::TREATMENTS, &query);

        Self::or_empty("fetch_overrides", self.fetch("fetch_overrides", request).await)
    }

    /// Fetches remote-command announcements created at or after `since`.
    ///
    /// Failures propagate.
    pub async fn fetch_announcements(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> SyncResult<Vec<Announcement>> {
        let query = Query::new()
            .equals("eventType", EventType::NsAnnouncement.as_str())
            .equals("enteredBy", &self.config.origins.announcement)
            .since("created_at", since.as_ref(), Bound::Inclusive);
        let request = self.request(Method::Get, paths::TREATMENTS, &query);

        self.fetch("fetch_announcements", request).await
    }

    /// Deletes the carb treatment created exactly at `at`.
    pub async fn delete_carbs(&self, at: DateTime<Utc>) -> SyncResult<()> {
        let query = Query::new().exists("carbs").at("created_at", &at);
        self.delete_treatments("delete_carbs", query).await
    }

    /// Deletes the insulin treatment created exactly at `at`.
    pub async fn delete_insulin(&self, at: DateTime<Utc>) -> SyncResult<()> {
        let query = Query::new().exists("bolus").at("created_at", &at);
        self.delete_treatments("delete_insulin", query).await
    }

    /// Deletes the override created exactly at `at`.
    pub async fn delete_override(&self, at: DateTime<Utc>) -> SyncResult<()> {
        let query = Query::new()
            .equals("eventType", OVERRIDE_EVENT_TYPE)
            .at("created_at", &at);
        self.delete_treatments("delete_override", query).await
    }

    /// Uploads treatments.
    pub async fn upload_treatments(&self, treatments: &[Treatment]) -> SyncResult<()> {
        self.upload("upload_treatments", paths::TREATMENTS, treatments).await
    }

    /// Uploads overrides.
    pub async fn upload_overrides(&self, overrides: &[OverrideTreatment]) -> SyncResult<()> {
        self.upload("upload_overrides", paths::TREATMENTS, overrides).await
    }

    /// Uploads glucose entries.
    pub async fn upload_glucose(&self, glucose: &[BloodGlucose]) -> SyncResult<()> {
        self.upload("upload_glucose", paths::UPLOAD_ENTRIES, glucose).await
    }

    /// Uploads loop statistics.
    pub async fn upload_stats<S: Serialize + ?Sized>(&self, stats: &S) -> SyncResult<()> {
        self.upload("upload_stats", paths::DEVICE_STATUS, stats).await
    }

    /// Uploads a device status record.
    pub async fn upload_status<S: Serialize + ?Sized>(&self, status: &S) -> SyncResult<()> {
        self.upload("upload_status", paths::DEVICE_STATUS, status).await
    }

    /// Uploads preferences.
    pub async fn upload_prefs<P: Serialize + ?Sized>(&self, prefs: &P) -> SyncResult<()> {
        self.upload("upload_prefs", paths::DEVICE_STATUS, prefs).await
    }

    /// Uploads pump settings.
    pub async fn upload_settings<S: Serialize + ?Sized>(&self, settings: &S) -> SyncResult<()> {
        self.upload("upload_settings", paths::DEVICE_STATUS, settings).await
    }

    /// Uploads a profile store.
    pub async fn upload_profile<P: Serialize + ?Sized>(&self, profile: &P) -> SyncResult<()> {
        self.upload("upload_profile", paths::PROFILE, profile).await
    }
}
