use crate::checks::PostureCheck;
use crate::client::DynAuditClient;
use crate::error::Result;
use async_trait::async_trait;
use tracing::debug;

/// Reports 1 when at least one audit trail has live logging enabled, 0
/// otherwise. Failure is collapsed into 0: non-compliant until proven
/// otherwise.
pub struct TrailLoggingCheck {
    client: DynAuditClient,
}

impl TrailLoggingCheck {
    pub fn new(client: DynAuditClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PostureCheck for TrailLoggingCheck {
    fn gauge_name(&self) -> &'static str {
        "aws_cloudtrail_logging_enabled"
    }

    fn gauge_help(&self) -> &'static str {
        "If CloudTrail logging is enabled for at least one trail, value is 1, else is 0"
    }

    async fn evaluate(&self) -> Result<f64> {
        let trails = self.client.describe_trails().await?;

        for trail in &trails {
            let status = self.client.trail_status(&trail.name).await?;
            if status.is_logging {
                debug!("Trail '{}' reports active logging", trail.name);
                return Ok(1.0);
            }
        }

        Ok(0.0)
    }

    fn fallback(&self) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixture::{AccountFixture, FixtureAuditClient, ServiceGroup, TrailFixture};
    use crate::error::AuditError;
    use std::sync::Arc;

    fn check_for(trails: Vec<TrailFixture>) -> TrailLoggingCheck {
        let fixture = AccountFixture {
            trails,
            ..AccountFixture::default()
        };
        TrailLoggingCheck::new(Arc::new(FixtureAuditClient::new(fixture)))
    }

    fn trail(name: &str, is_logging: bool) -> TrailFixture {
        TrailFixture {
            name: name.to_string(),
            is_logging,
        }
    }

    #[tokio::test]
    async fn test_one_active_trail_among_many() {
        let check = check_for(vec![
            trail("inactive-a", false),
            trail("active", true),
            trail("inactive-b", false),
        ]);
        assert_eq!(check.evaluate().await.unwrap(), 1.0);
    }

    #[tokio::test]
    async fn test_active_trail_order_does_not_matter() {
        let check = check_for(vec![trail("active", true), trail("inactive", false)]);
        assert_eq!(check.evaluate().await.unwrap(), 1.0);

        let check = check_for(vec![trail("inactive", false), trail("active", true)]);
        assert_eq!(check.evaluate().await.unwrap(), 1.0);
    }

    #[tokio::test]
    async fn test_no_active_trails() {
        let check = check_for(vec![trail("a", false), trail("b", false)]);
        assert_eq!(check.evaluate().await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_zero_trails() {
        let check = check_for(vec![]);
        assert_eq!(check.evaluate().await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_query_failure_maps_to_zero() {
        let fixture = AccountFixture::default();
        let client = FixtureAuditClient::new(fixture)
            .with_failure(ServiceGroup::Trails, AuditError::transport("unreachable"));
        let check = TrailLoggingCheck::new(Arc::new(client));

        assert!(check.evaluate().await.is_err());
        assert_eq!(check.fallback(), 0.0);
    }
}
