pub mod fixture;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use fixture::{AccountFixture, FixtureAuditClient};

/// One page of a paginated listing. `next_token` is `Some` while more pages
/// remain; callers must drain every page.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailSummary {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailStatus {
    pub is_logging: bool,
}

/// Severity filter applied server-side when listing findings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindingCriteria {
    pub min_severity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessKeyMetadata {
    pub access_key_id: String,
    pub status: KeyStatus,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub user_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyEntry {
    pub key_id: String,
}

/// Who controls a cryptographic key's lifecycle. Only `Customer` keys count
/// toward rotation compliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyManager {
    Customer,
    Aws,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyMetadata {
    pub key_id: String,
    pub manager: KeyManager,
}

/// Read-only boundary to the cloud account's audit/security services.
///
/// Constructed once at startup and handed to each check explicitly; never
/// mutates cloud state. Every call may fail with a transport-level or
/// service-level error.
#[async_trait]
pub trait AuditClient: Send + Sync {
    /// List the account's audit trails.
    async fn describe_trails(&self) -> Result<Vec<TrailSummary>>;

    /// Live logging status for a single trail.
    async fn trail_status(&self, trail_name: &str) -> Result<TrailStatus>;

    /// List enabled threat-detection detector ids.
    async fn list_detectors(&self) -> Result<Vec<String>>;

    /// List finding ids for a detector matching the severity criteria.
    async fn list_findings(
        &self,
        detector_id: &str,
        criteria: &FindingCriteria,
    ) -> Result<Vec<String>>;

    /// One page of the identity inventory.
    async fn list_identities(&self, page_token: Option<&str>) -> Result<Page<Identity>>;

    /// Access credentials belonging to one identity.
    async fn list_access_keys(&self, user_name: &str) -> Result<Vec<AccessKeyMetadata>>;

    /// One page of the cryptographic key inventory.
    async fn list_keys(&self, page_token: Option<&str>) -> Result<Page<KeyEntry>>;

    /// Metadata for a single key.
    async fn describe_key(&self, key_id: &str) -> Result<KeyMetadata>;

    /// Whether automatic rotation is enabled for a key.
    async fn key_rotation_status(&self, key_id: &str) -> Result<bool>;
}

pub type DynAuditClient = Arc<dyn AuditClient>;
