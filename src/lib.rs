pub mod classifier;
pub mod config;
pub mod error;
pub mod manifest;
pub mod model;
pub mod output;
pub mod registry;

pub use classifier::{classify, Delay, NoDelay, ScanOptions, Scanner, TokioDelay};
pub use config::Config;
pub use error::{ManifestError, RegistryError};
pub use manifest::{read_manifest, Manifest};
pub use model::{Classification, LookupOutcome, PackageReport, RegistryRecord, ScanSummary};
pub use registry::{NpmRegistry, RegistryClient};
