//! Staleness classification and scan aggregation.
//!
//! [`classify`] turns one [`LookupOutcome`] into a [`Classification`] and
//! performs no I/O. [`Scanner`] drives a [`RegistryClient`] over a list of
//! package names, one request at a time, and folds each verdict into a
//! [`ScanSummary`].
//!
//! # Example
//!
//! ```no_run
//! use depgrave::classifier::{ScanOptions, Scanner, TokioDelay};
//! use depgrave::registry::NpmRegistry;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let registry = NpmRegistry::new(Duration::from_secs(30))?;
//!     let scanner = Scanner::new(registry, TokioDelay, ScanOptions::default());
//!
//!     let summary = scanner.scan(&["left-pad", "react"], chrono::Utc::now()).await;
//!     println!("{} dead of {}", summary.dead_count(), summary.total());
//!     Ok(())
//! }
//! ```

mod delay;

pub use delay::{Delay, NoDelay, TokioDelay};

use crate::model::{Classification, LookupOutcome, PackageReport, ScanSummary};
use crate::registry::RegistryClient;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;

/// Age, in days, past which a package's latest release counts as dead.
pub const DEFAULT_THRESHOLD_DAYS: u32 = 365;

/// Pause between consecutive registry requests.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(100);

pub const NOT_FOUND_REASON: &str = "not found in registry";
pub const MISSING_TIMESTAMP_REASON: &str = "missing release timestamp";
pub const EMPTY_NAME_REASON: &str = "empty package name";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub threshold_days: u32,
    pub request_delay: Duration,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            threshold_days: DEFAULT_THRESHOLD_DAYS,
            request_delay: DEFAULT_REQUEST_DELAY,
        }
    }
}

/// Classifies a lookup outcome against `now` and a threshold in days.
///
/// A release exactly `threshold_days` old is still alive; only strictly
/// older releases are dead.
pub fn classify(outcome: LookupOutcome, now: DateTime<Utc>, threshold_days: u32) -> Classification {
    let record = match outcome {
        LookupOutcome::Found(record) => record,
        LookupOutcome::NotFound => return Classification::unknown(NOT_FOUND_REASON),
        LookupOutcome::TransportError(message) => return Classification::unknown(message),
    };

    let Some(released) = record.latest_release() else {
        return Classification::unknown(MISSING_TIMESTAMP_REASON);
    };

    // A cutoff before the earliest representable date leaves nothing older.
    let cutoff = ChronoDuration::try_days(i64::from(threshold_days))
        .and_then(|threshold| now.checked_sub_signed(threshold));
    let Some(cutoff) = cutoff else {
        return Classification::Alive;
    };

    if released < cutoff {
        Classification::Dead {
            days_since_release: (now - released).num_days(),
            last_release: released,
        }
    } else {
        Classification::Alive
    }
}

pub struct Scanner<C, D> {
    client: C,
    delay: D,
    options: ScanOptions,
}

impl<C: RegistryClient, D: Delay> Scanner<C, D> {
    pub fn new(client: C, delay: D, options: ScanOptions) -> Self {
        Self {
            client,
            delay,
            options,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Looks up and classifies every name in order.
    ///
    /// `now` is the single reference time used for every package. Failures
    /// never abort the scan; they are reported as
    /// [`Classification::Unknown`].
    pub async fn scan<S: AsRef<str>>(&self, names: &[S], now: DateTime<Utc>) -> ScanSummary {
        self.scan_with_progress(names, now, |_| {}).await
    }

    /// Like [`scan`](Self::scan), calling `on_result` after each package.
    pub async fn scan_with_progress<S, F>(
        &self,
        names: &[S],
        now: DateTime<Utc>,
        mut on_result: F,
    ) -> ScanSummary
    where
        S: AsRef<str>,
        F: FnMut(&PackageReport),
    {
        let mut summary = ScanSummary::default();

        for (index, name) in names.iter().enumerate() {
            let name = name.as_ref();

            let classification = if name.is_empty() {
                Classification::unknown(EMPTY_NAME_REASON)
            } else {
                let outcome = self.client.lookup(name).await;
                classify(outcome, now, self.options.threshold_days)
            };

            match &classification {
                Classification::Dead {
                    days_since_release, ..
                } => tracing::info!(package = name, days_since_release, "dead dependency"),
                Classification::Alive => tracing::debug!(package = name, "active"),
                Classification::Unknown { reason } => {
                    tracing::warn!(package = name, %reason, "could not classify")
                }
            }

            let report = PackageReport::new(name, classification);
            on_result(&report);
            summary.push(report);

            let is_last = index + 1 == names.len();
            if !is_last && !self.options.request_delay.is_zero() {
                self.delay.pause(self.options.request_delay).await;
            }
        }

        tracing::info!(
            registry = self.client.name(),
            dead = summary.dead_count(),
            unknown = summary.unknown_count(),
            alive = summary.alive_count(),
            "scan complete"
        );

        summary
    }
}
