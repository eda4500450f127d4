//! Package registry clients.
//!
//! A [`RegistryClient`] resolves one package name to a [`LookupOutcome`].
//! Implementations issue exactly one request per call and never surface an
//! error to the caller: every failure is reported as
//! [`LookupOutcome::NotFound`] or [`LookupOutcome::TransportError`].

mod npm;

pub use npm::{parse_record, NpmRegistry, DEFAULT_REGISTRY_URL};

use crate::model::LookupOutcome;
use async_trait::async_trait;

#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Returns the human-readable name of the registry.
    fn name(&self) -> &'static str;

    /// Resolves `package` to its published-release metadata.
    async fn lookup(&self, package: &str) -> LookupOutcome;
}
