use crate::checks::PostureCheck;
use crate::client::{DynAuditClient, FindingCriteria};
use crate::error::Result;
use async_trait::async_trait;
use tracing::debug;

/// Findings at or above this severity count as high.
pub const HIGH_SEVERITY_THRESHOLD: f64 = 7.0;

/// Counts high-severity threat findings across all detectors. Zero detectors
/// means the feature is not provisioned and counts as 0; a query failure is
/// exposed as the -1 "count unavailable" sentinel.
pub struct HighSeverityFindingsCheck {
    client: DynAuditClient,
}

impl HighSeverityFindingsCheck {
    pub fn new(client: DynAuditClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PostureCheck for HighSeverityFindingsCheck {
    fn gauge_name(&self) -> &'static str {
        "aws_guardduty_high_findings"
    }

    fn gauge_help(&self) -> &'static str {
        "Number of high severity GuardDuty findings (severity >= 7), or -1 when unavailable"
    }

    async fn evaluate(&self) -> Result<f64> {
        let detectors = self.client.list_detectors().await?;

        if detectors.is_empty() {
            debug!("No detectors provisioned");
            return Ok(0.0);
        }

        let criteria = FindingCriteria {
            min_severity: HIGH_SEVERITY_THRESHOLD,
        };

        let mut total_high = 0usize;
        for detector_id in &detectors {
            let findings = self.client.list_findings(detector_id, &criteria).await?;
            total_high += findings.len();
        }

        Ok(total_high as f64)
    }

    fn fallback(&self) -> f64 {
        -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixture::{
        AccountFixture, DetectorFixture, FindingFixture, FixtureAuditClient, ServiceGroup,
    };
    use crate::error::AuditError;
    use std::sync::Arc;

    fn detector(id: &str, severities: &[f64]) -> DetectorFixture {
        DetectorFixture {
            detector_id: id.to_string(),
            findings: severities
                .iter()
                .enumerate()
                .map(|(i, severity)| FindingFixture {
                    finding_id: format!("{id}-finding-{i}"),
                    severity: *severity,
                })
                .collect(),
        }
    }

    fn check_for(detectors: Vec<DetectorFixture>) -> HighSeverityFindingsCheck {
        let fixture = AccountFixture {
            detectors,
            ..AccountFixture::default()
        };
        HighSeverityFindingsCheck::new(Arc::new(FixtureAuditClient::new(fixture)))
    }

    #[tokio::test]
    async fn test_zero_detectors() {
        let check = check_for(vec![]);
        assert_eq!(check.evaluate().await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_counts_sum_across_detectors() {
        let check = check_for(vec![
            detector("det-1", &[7.0, 8.0, 9.9]),
            detector("det-2", &[7.5, 8.1, 8.2, 9.0, 7.0]),
        ]);
        assert_eq!(check.evaluate().await.unwrap(), 8.0);
    }

    #[tokio::test]
    async fn test_low_severity_findings_excluded() {
        let check = check_for(vec![detector("det-1", &[1.0, 4.5, 6.9, 7.0])]);
        assert_eq!(check.evaluate().await.unwrap(), 1.0);
    }

    #[tokio::test]
    async fn test_not_subscribed_maps_to_sentinel() {
        let client = FixtureAuditClient::new(AccountFixture::default()).with_failure(
            ServiceGroup::Findings,
            AuditError::not_subscribed("GuardDuty is not enabled"),
        );
        let check = HighSeverityFindingsCheck::new(Arc::new(client));

        let err = check.evaluate().await.unwrap_err();
        assert!(err.is_feature_disabled());
        assert_eq!(check.fallback(), -1.0);
    }

    #[tokio::test]
    async fn test_other_failure_maps_to_sentinel() {
        let client = FixtureAuditClient::new(AccountFixture::default()).with_failure(
            ServiceGroup::Findings,
            AuditError::service("InternalError", "boom"),
        );
        let check = HighSeverityFindingsCheck::new(Arc::new(client));

        let err = check.evaluate().await.unwrap_err();
        assert!(!err.is_feature_disabled());
        assert_eq!(check.fallback(), -1.0);
    }
}
