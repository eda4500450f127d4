use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Publish times and the `latest` dist-tag for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryRecord {
    pub release_times: HashMap<String, DateTime<Utc>>,
    pub latest_tag: String,
}

impl RegistryRecord {
    pub fn new(release_times: HashMap<String, DateTime<Utc>>, latest_tag: impl Into<String>) -> Self {
        Self {
            release_times,
            latest_tag: latest_tag.into(),
        }
    }

    /// Publish time of the version tagged `latest`, if the registry reported one.
    pub fn latest_release(&self) -> Option<DateTime<Utc>> {
        self.release_times.get(&self.latest_tag).copied()
    }
}

/// What a single registry lookup produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(RegistryRecord),
    NotFound,
    TransportError(String),
}

/// Verdict for one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Classification {
    Dead {
        days_since_release: i64,
        last_release: DateTime<Utc>,
    },
    Alive,
    Unknown {
        reason: String,
    },
}

impl Classification {
    pub fn unknown(reason: impl Into<String>) -> Self {
        Classification::Unknown {
            reason: reason.into(),
        }
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, Classification::Dead { .. })
    }

    pub fn is_alive(&self) -> bool {
        matches!(self, Classification::Alive)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Classification::Unknown { .. })
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Dead {
                days_since_release,
                last_release,
            } => write!(
                f,
                "last update {} days ago ({})",
                days_since_release,
                last_release.format("%Y-%m-%d")
            ),
            Classification::Alive => write!(f, "active"),
            Classification::Unknown { reason } => write!(f, "unknown: {}", reason),
        }
    }
}
