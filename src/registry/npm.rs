use crate::error::RegistryError;
use crate::model::{LookupOutcome, RegistryRecord};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

const USER_AGENT: &str = concat!("depgrave/", env!("CARGO_PKG_VERSION"));

pub struct NpmRegistry {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct NpmPackageDocument {
    // Unpublished packages carry an object under `time.unpublished`, so
    // values are read loosely and non-strings are dropped.
    #[serde(default)]
    time: HashMap<String, serde_json::Value>,
    #[serde(rename = "dist-tags")]
    dist_tags: Option<DistTags>,
}

#[derive(Deserialize)]
struct DistTags {
    latest: Option<String>,
}

impl NpmRegistry {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(DEFAULT_REGISTRY_URL, timeout)
    }

    /// Points the client at another host serving the npm document format.
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::from_client(client, base_url))
    }

    /// Uses a caller-built client as-is.
    pub fn from_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn package_url(&self, package: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(package))
    }

    async fn fetch(&self, package: &str) -> Result<RegistryRecord, RegistryError> {
        let url = self.package_url(package);
        tracing::debug!(%url, "querying registry");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound);
        }
        if !status.is_success() {
            return Err(RegistryError::Transport(format!(
                "registry returned {}",
                status
            )));
        }

        let body = response.bytes().await?;
        parse_record(&body)
    }
}

/// Parses an npm package document into a [`RegistryRecord`].
///
/// Timestamps that are not RFC 3339 strings are skipped, so a record may
/// lack an entry for its own `latest` tag.
///
/// # Errors
///
/// Returns [`RegistryError::Malformed`] if the body is not JSON or has no
/// `dist-tags.latest`.
pub fn parse_record(body: &[u8]) -> Result<RegistryRecord, RegistryError> {
    let document: NpmPackageDocument =
        serde_json::from_slice(body).map_err(|e| RegistryError::Malformed(e.to_string()))?;

    let latest_tag = document
        .dist_tags
        .and_then(|tags| tags.latest)
        .ok_or_else(|| RegistryError::Malformed("missing `dist-tags.latest`".to_string()))?;

    let release_times = document
        .time
        .into_iter()
        .filter_map(|(version, value)| {
            let raw = value.as_str()?;
            let parsed = DateTime::parse_from_rfc3339(raw).ok()?;
            Some((version, parsed.with_timezone(&Utc)))
        })
        .collect();

    Ok(RegistryRecord::new(release_times, latest_tag))
}

#[async_trait]
impl super::RegistryClient for NpmRegistry {
    fn name(&self) -> &'static str {
        "npm"
    }

    async fn lookup(&self, package: &str) -> LookupOutcome {
        let outcome = LookupOutcome::from(self.fetch(package).await);
        if let LookupOutcome::TransportError(ref message) = outcome {
            tracing::debug!(package, %message, "registry lookup failed");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryClient;
    use chrono::TimeZone;

    #[test]
    fn test_parse_record_basic() {
        let body = br#"{
            "name": "left-pad",
            "dist-tags": { "latest": "1.3.0" },
            "time": {
                "created": "2014-03-14T04:17:07.201Z",
                "modified": "2022-06-19T11:20:35.124Z",
                "1.3.0": "2018-04-09T01:20:04.853Z"
            }
        }"#;

        let record = parse_record(body).unwrap();
        assert_eq!(record.latest_tag, "1.3.0");
        assert_eq!(record.release_times.len(), 3);
        assert_eq!(
            record.latest_release().map(|t| t.date_naive()),
            Some(Utc.with_ymd_and_hms(2018, 4, 9, 0, 0, 0).unwrap().date_naive())
        );
    }

    #[test]
    fn test_parse_record_missing_time_is_empty() {
        let body = br#"{ "dist-tags": { "latest": "0.1.0" } }"#;
        let record = parse_record(body).unwrap();
        assert!(record.release_times.is_empty());
        assert_eq!(record.latest_release(), None);
    }

    #[test]
    fn test_parse_record_skips_non_string_times() {
        let body = br#"{
            "dist-tags": { "latest": "2.0.0" },
            "time": {
                "2.0.0": "2025-12-01T00:00:00Z",
                "unpublished": { "time": "2025-12-02T00:00:00Z", "versions": ["2.0.0"] },
                "1.0.0": "not a date"
            }
        }"#;
        let record = parse_record(body).unwrap();
        assert_eq!(record.release_times.len(), 1);
        assert!(record.latest_release().is_some());
    }

    #[test]
    fn test_parse_record_missing_dist_tags() {
        let body = br#"{ "time": { "1.0.0": "2015-01-01T00:00:00Z" } }"#;
        let err = parse_record(body).unwrap_err();
        assert!(matches!(err, RegistryError::Malformed(_)));
        assert!(err.to_string().contains("dist-tags.latest"));
    }

    #[test]
    fn test_parse_record_not_json() {
        let err = parse_record(b"<html>Service Unavailable</html>").unwrap_err();
        assert!(matches!(err, RegistryError::Malformed(_)));
    }

    #[test]
    fn test_package_url_encodes_scoped_names() {
        let registry = NpmRegistry::new(Duration::from_secs(5)).unwrap();
        assert_eq!(
            registry.package_url("left-pad"),
            "https://registry.npmjs.org/left-pad"
        );
        assert_eq!(
            registry.package_url("@types/node"),
            "https://registry.npmjs.org/%40types%2Fnode"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let registry =
            NpmRegistry::with_base_url("http://127.0.0.1:4873/", Duration::from_secs(5)).unwrap();
        assert_eq!(registry.package_url("react"), "http://127.0.0.1:4873/react");
        assert_eq!(registry.name(), "npm");
    }
}
