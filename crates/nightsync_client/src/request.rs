//! Request and query construction.
//!
//! Nightscout filters are MongoDB-style query parameters:
//! `find[<field>][<op>]=<value>`. Repeated keys are ANDed by the remote, so
//! [`Query`] keeps every pair in insertion order, duplicates included.

use chrono::{DateTime, Utc};
use nightsync_protocol::time::format_iso8601;
use std::fmt;
use std::time::Duration;
use url::Url;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// DELETE
    Delete,
}

impl Method {
    /// Returns the method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a date lower bound includes its instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// `$gte`
    Inclusive,
    /// `$gt`
    Exclusive,
}

impl Bound {
    fn operator(&self) -> &'static str {
        match self {
            Bound::Inclusive => "$gte",
            Bound::Exclusive => "$gt",
        }
    }
}

/// Ordered list of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plain parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    /// `find[field]=value`
    pub fn equals(self, field: &str, value: &str) -> Self {
        self.param(format!("find[{field}]"), value)
    }

    /// `find[field][$exists]=true`
    pub fn exists(self, field: &str) -> Self {
        self.param(format!("find[{field}][$exists]"), "true")
    }

    /// `find[field][$ne]=value`
    pub fn not_equal(self, field: &str, value: &str) -> Self {
        self.param(format!("find[{field}][$ne]"), value)
    }

    /// `find[field][$eq]=<timestamp>`
    pub fn at(self, field: &str, at: &DateTime<Utc>) -> Self {
        self.param(format!("find[{field}][$eq]"), format_iso8601(at))
    }

    /// Adds a date lower bound when `since` is set.
    pub fn since(self, field: &str, since: Option<&DateTime<Utc>>, bound: Bound) -> Self {
        match since {
            Some(at) => self.param(
                format!("find[{field}][{}]", bound.operator()),
                format_iso8601(at),
            ),
            None => self,
        }
    }

    /// Returns the parameters in insertion order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Returns true if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// A fully-formed request handed to a [`Transport`](crate::Transport).
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including the query string.
    pub url: Url,
    /// Header name/value pairs.
    pub headers: Vec<(&'static str, String)>,
    /// Request body.
    pub body: Option<Vec<u8>>,
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Whether the request may use a constrained (low-data) network path.
    pub allow_constrained_network: bool,
}

impl Request {
    /// Creates a request against `base` joined with `path`.
    pub fn new(method: Method, base: &Url, path: &str, query: &Query, timeout: Duration) -> Self {
        let mut url = base.clone();
        let prefix = base.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{prefix}{path}"));
        url.set_query(None);
        url.set_fragment(None);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.pairs());
        }

        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
            timeout,
            allow_constrained_network: false,
        }
    }

    /// Adds a header.
    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Sets a JSON body and its content type.
    pub fn with_json_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self.with_header("Content-Type", "application/json")
    }

    /// Returns the first value of a header (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the decoded query parameters in order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// Returns every value of a query parameter.
    pub fn query_values(&self, key: &str) -> Vec<String> {
        self.url
            .query_pairs()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .collect()
    }

    /// Returns the URL path.
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn base() -> Url {
        Url::parse("https://ns.example.com").unwrap()
    }

    #[test]
    fn query_keeps_duplicates_in_order() {
        let query = Query::new()
            .exists("carbs")
            .not_equal("enteredBy", "a")
            .not_equal("enteredBy", "b");

        assert_eq!(
            query.pairs(),
            &[
                ("find[carbs][$exists]".to_string(), "true".to_string()),
                ("find[enteredBy][$ne]".to_string(), "a".to_string()),
                ("find[enteredBy][$ne]".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn since_bounds() {
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 8, 30, 0).unwrap();

        let inclusive = Query::new().since("dateString", Some(&at), Bound::Inclusive);
        assert_eq!(inclusive.pairs()[0].0, "find[dateString][$gte]");
        assert_eq!(inclusive.pairs()[0].1, "2026-10-18T08:30:00.000Z");

        let exclusive = Query::new().since("created_at", Some(&at), Bound::Exclusive);
        assert_eq!(exclusive.pairs()[0].0, "find[created_at][$gt]");

        assert!(Query::new().since("created_at", None, Bound::Exclusive).is_empty());
    }

    #[test]
    fn request_url_round_trips_filters() {
        let query = Query::new()
            .equals("eventType", "Temporary Target")
            .exists("duration");
        let request = Request::new(
            Method::Get,
            &base(),
            "/api/v1/treatments.json",
            &query,
            Duration::from_secs(60),
        );

        assert_eq!(request.path(), "/api/v1/treatments.json");
        assert_eq!(request.query_pairs(), query.pairs().to_vec());
        assert_eq!(request.query_values("find[eventType]"), vec!["Temporary Target"]);
        assert!(!request.allow_constrained_network);
    }

    #[test]
    fn request_joins_base_path() {
        let base = Url::parse("https://example.com/nightscout/?token=x").unwrap();
        let request = Request::new(
            Method::Get,
            &base,
            "/api/v1/entries/sgv.json",
            &Query::new(),
            Duration::from_secs(1),
        );
        assert_eq!(
            request.url.as_str(),
            "https://example.com/nightscout/api/v1/entries/sgv.json"
        );
    }

    #[test]
    fn headers_are_case_insensitive() {
        let request = Request::new(Method::Post, &base(), "/x", &Query::new(), Duration::ZERO)
            .with_json_body(b"{}".to_vec());
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.body.as_deref(), Some(&b"{}"[..]));
    }
}
