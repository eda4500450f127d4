//! Core data types for registry lookups and scan results.
//!
//! - [`RegistryRecord`] - The slice of registry metadata used for classification
//! - [`LookupOutcome`] - Result of resolving one package name
//! - [`Classification`] - Dead, alive, or unknown verdict for a package
//! - [`ScanSummary`] - Ordered per-package verdicts plus running counters
//!
//! # Example
//!
//! ```
//! use depgrave::model::{Classification, PackageReport, ScanSummary};
//!
//! let mut summary = ScanSummary::default();
//! summary.push(PackageReport::new("react", Classification::Alive));
//!
//! assert_eq!(summary.alive_count(), 1);
//! assert_eq!(summary.total(), 1);
//! ```

mod record;
mod summary;

pub use record::*;
pub use summary::*;
