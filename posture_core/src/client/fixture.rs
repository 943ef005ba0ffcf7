use super::{
    AccessKeyMetadata, AuditClient, FindingCriteria, Identity, KeyEntry, KeyManager, KeyMetadata,
    Page, TrailStatus, TrailSummary,
};
use crate::error::{AuditError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete description of one account's audit surface, as seen by the
/// [`FixtureAuditClient`]. Deserializable from JSON so local runs can point
/// the exporter at a fixture file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountFixture {
    #[serde(default)]
    pub trails: Vec<TrailFixture>,
    #[serde(default)]
    pub detectors: Vec<DetectorFixture>,
    #[serde(default)]
    pub identities: Vec<IdentityFixture>,
    #[serde(default)]
    pub keys: Vec<KeyFixture>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailFixture {
    pub name: String,
    pub is_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorFixture {
    pub detector_id: String,
    #[serde(default)]
    pub findings: Vec<FindingFixture>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindingFixture {
    pub finding_id: String,
    pub severity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityFixture {
    pub user_name: String,
    #[serde(default)]
    pub access_keys: Vec<AccessKeyMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyFixture {
    pub key_id: String,
    pub manager: KeyManager,
    pub rotation_enabled: bool,
}

/// Service groups that can be told to fail, for exercising degraded states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceGroup {
    Trails,
    Findings,
    Identities,
    Keys,
}

/// In-memory [`AuditClient`] backed by an [`AccountFixture`].
///
/// Listings are served in pages of `page_size` so pagination handling is
/// exercised for real. Individual service groups can be configured to fail
/// with a given error, standing in for transport and service outages.
pub struct FixtureAuditClient {
    fixture: AccountFixture,
    page_size: usize,
    failures: HashMap<ServiceGroup, AuditError>,
}

const DEFAULT_PAGE_SIZE: usize = 100;

impl FixtureAuditClient {
    pub fn new(fixture: AccountFixture) -> Self {
        Self {
            fixture,
            page_size: DEFAULT_PAGE_SIZE,
            failures: HashMap::new(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_failure(mut self, group: ServiceGroup, error: AuditError) -> Self {
        self.failures.insert(group, error);
        self
    }

    fn check_available(&self, group: ServiceGroup) -> Result<()> {
        match self.failures.get(&group) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn paginate<T: Clone>(&self, items: &[T], page_token: Option<&str>) -> Page<T> {
        let start = page_token
            .and_then(|token| token.parse::<usize>().ok())
            .unwrap_or(0)
            .min(items.len());
        let end = (start + self.page_size).min(items.len());
        let next_token = if end < items.len() {
            Some(end.to_string())
        } else {
            None
        };

        Page {
            items: items[start..end].to_vec(),
            next_token,
        }
    }
}

#[async_trait]
impl AuditClient for FixtureAuditClient {
    async fn describe_trails(&self) -> Result<Vec<TrailSummary>> {
        self.check_available(ServiceGroup::Trails)?;
        Ok(self
            .fixture
            .trails
            .iter()
            .map(|trail| TrailSummary {
                name: trail.name.clone(),
            })
            .collect())
    }

    async fn trail_status(&self, trail_name: &str) -> Result<TrailStatus> {
        self.check_available(ServiceGroup::Trails)?;
        self.fixture
            .trails
            .iter()
            .find(|trail| trail.name == trail_name)
            .map(|trail| TrailStatus {
                is_logging: trail.is_logging,
            })
            .ok_or_else(|| {
                AuditError::service("TrailNotFoundException", format!("no trail '{trail_name}'"))
            })
    }

    async fn list_detectors(&self) -> Result<Vec<String>> {
        self.check_available(ServiceGroup::Findings)?;
        Ok(self
            .fixture
            .detectors
            .iter()
            .map(|detector| detector.detector_id.clone())
            .collect())
    }

    async fn list_findings(
        &self,
        detector_id: &str,
        criteria: &FindingCriteria,
    ) -> Result<Vec<String>> {
        self.check_available(ServiceGroup::Findings)?;
        let detector = self
            .fixture
            .detectors
            .iter()
            .find(|detector| detector.detector_id == detector_id)
            .ok_or_else(|| {
                AuditError::service("BadRequestException", format!("no detector '{detector_id}'"))
            })?;

        Ok(detector
            .findings
            .iter()
            .filter(|finding| finding.severity >= criteria.min_severity)
            .map(|finding| finding.finding_id.clone())
            .collect())
    }

    async fn list_identities(&self, page_token: Option<&str>) -> Result<Page<Identity>> {
        self.check_available(ServiceGroup::Identities)?;
        let identities: Vec<Identity> = self
            .fixture
            .identities
            .iter()
            .map(|identity| Identity {
                user_name: identity.user_name.clone(),
            })
            .collect();
        Ok(self.paginate(&identities, page_token))
    }

    async fn list_access_keys(&self, user_name: &str) -> Result<Vec<AccessKeyMetadata>> {
        self.check_available(ServiceGroup::Identities)?;
        self.fixture
            .identities
            .iter()
            .find(|identity| identity.user_name == user_name)
            .map(|identity| identity.access_keys.clone())
            .ok_or_else(|| {
                AuditError::service("NoSuchEntity", format!("no identity '{user_name}'"))
            })
    }

    async fn list_keys(&self, page_token: Option<&str>) -> Result<Page<KeyEntry>> {
        self.check_available(ServiceGroup::Keys)?;
        let keys: Vec<KeyEntry> = self
            .fixture
            .keys
            .iter()
            .map(|key| KeyEntry {
                key_id: key.key_id.clone(),
            })
            .collect();
        Ok(self.paginate(&keys, page_token))
    }

    async fn describe_key(&self, key_id: &str) -> Result<KeyMetadata> {
        self.check_available(ServiceGroup::Keys)?;
        self.fixture
            .keys
            .iter()
            .find(|key| key.key_id == key_id)
            .map(|key| KeyMetadata {
                key_id: key.key_id.clone(),
                manager: key.manager,
            })
            .ok_or_else(|| AuditError::service("NotFoundException", format!("no key '{key_id}'")))
    }

    async fn key_rotation_status(&self, key_id: &str) -> Result<bool> {
        self.check_available(ServiceGroup::Keys)?;
        self.fixture
            .keys
            .iter()
            .find(|key| key.key_id == key_id)
            .map(|key| key.rotation_enabled)
            .ok_or_else(|| AuditError::service("NotFoundException", format!("no key '{key_id}'")))
    }
}
