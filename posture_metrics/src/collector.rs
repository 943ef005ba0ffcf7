use crate::gauges::{GaugeBoard, MetricsError};
use posture_core::DynPostureCheck;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Drives the fixed-interval collection loop: every cycle runs all checks
/// and feeds their results into the gauge board.
///
/// Checks are isolated from each other: a failure is logged and mapped to
/// the owning check's sentinel, and the remaining checks still run. Nothing
/// a check does can terminate the loop.
pub struct Collector {
    checks: Vec<DynPostureCheck>,
    board: Arc<GaugeBoard>,
}

impl Collector {
    /// Registers every check's gauge up front, so by the time a cycle runs
    /// every `set` target exists.
    pub fn new(checks: Vec<DynPostureCheck>, board: Arc<GaugeBoard>) -> Result<Self, MetricsError> {
        for check in &checks {
            board.register(check.gauge_name(), check.gauge_help())?;
        }
        Ok(Self { checks, board })
    }

    /// Run one collection cycle. Independently testable: no timing, no loop.
    ///
    /// Checks run sequentially; each gauge is updated the moment its check
    /// completes, so a scrape mid-cycle sees fresh values for finished checks
    /// and last-cycle values for the rest.
    pub async fn run_cycle(&self) {
        for check in &self.checks {
            let value = match check.evaluate().await {
                Ok(value) => value,
                Err(err) if err.is_feature_disabled() => {
                    warn!("Check '{}': {}", check.gauge_name(), err);
                    check.fallback()
                }
                Err(err) => {
                    error!("Check '{}' failed: {}", check.gauge_name(), err);
                    check.fallback()
                }
            };
            self.board.set(check.gauge_name(), value);
        }

        info!("Metrics collected");
    }

    /// Production driver: collect, sleep for the interval, repeat. An
    /// overrunning cycle is not compensated for; the next one starts a full
    /// interval after the previous one finishes.
    pub async fn run(&self, interval: Duration) {
        info!("Collection loop started (interval: {:?})", interval);
        loop {
            self.run_cycle().await;
            tokio::time::sleep(interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posture_core::client::fixture::{
        AccountFixture, DetectorFixture, FindingFixture, FixtureAuditClient, ServiceGroup,
        TrailFixture,
    };
    use posture_core::error::AuditError;
    use posture_core::{async_trait, default_checks, PostureCheck, Result as CoreResult};

    struct FailingCheck;

    #[async_trait]
    impl PostureCheck for FailingCheck {
        fn gauge_name(&self) -> &'static str {
            "posture_failing_check"
        }

        fn gauge_help(&self) -> &'static str {
            "always fails"
        }

        async fn evaluate(&self) -> CoreResult<f64> {
            Err(AuditError::transport("wire cut"))
        }

        fn fallback(&self) -> f64 {
            -1.0
        }
    }

    struct ConstantCheck(f64);

    #[async_trait]
    impl PostureCheck for ConstantCheck {
        fn gauge_name(&self) -> &'static str {
            "posture_constant_check"
        }

        fn gauge_help(&self) -> &'static str {
            "always succeeds"
        }

        async fn evaluate(&self) -> CoreResult<f64> {
            Ok(self.0)
        }

        fn fallback(&self) -> f64 {
            -1.0
        }
    }

    #[tokio::test]
    async fn test_failure_is_isolated_from_other_checks() {
        let board = Arc::new(GaugeBoard::new());
        let collector = Collector::new(
            vec![Arc::new(FailingCheck), Arc::new(ConstantCheck(5.0))],
            board.clone(),
        )
        .unwrap();

        collector.run_cycle().await;

        let snapshot = board.snapshot();
        assert_eq!(snapshot["posture_failing_check"], -1.0);
        assert_eq!(snapshot["posture_constant_check"], 5.0);
    }

    #[tokio::test]
    async fn test_full_cycle_updates_all_four_gauges() {
        let fixture = AccountFixture {
            trails: vec![TrailFixture {
                name: "main".to_string(),
                is_logging: true,
            }],
            detectors: vec![DetectorFixture {
                detector_id: "det-1".to_string(),
                findings: vec![FindingFixture {
                    finding_id: "f-1".to_string(),
                    severity: 8.0,
                }],
            }],
            ..AccountFixture::default()
        };

        let board = Arc::new(GaugeBoard::new());
        let checks = default_checks(Arc::new(FixtureAuditClient::new(fixture)));
        let collector = Collector::new(checks, board.clone()).unwrap();

        collector.run_cycle().await;

        let snapshot = board.snapshot();
        assert_eq!(snapshot["aws_cloudtrail_logging_enabled"], 1.0);
        assert_eq!(snapshot["aws_guardduty_high_findings"], 1.0);
        assert_eq!(snapshot["aws_iam_access_key_max_age_days"], 0.0);
        assert_eq!(snapshot["aws_kms_rotation_all_enabled"], 1.0);
    }

    #[tokio::test]
    async fn test_not_subscribed_yields_sentinel_without_propagating() {
        let client = FixtureAuditClient::new(AccountFixture::default()).with_failure(
            ServiceGroup::Findings,
            AuditError::not_subscribed("GuardDuty is not enabled"),
        );

        let board = Arc::new(GaugeBoard::new());
        let checks = default_checks(Arc::new(client));
        let collector = Collector::new(checks, board.clone()).unwrap();

        collector.run_cycle().await;

        let snapshot = board.snapshot();
        assert_eq!(snapshot["aws_guardduty_high_findings"], -1.0);
        // The other checks still ran against their healthy services.
        assert_eq!(snapshot["aws_cloudtrail_logging_enabled"], 0.0);
        assert_eq!(snapshot["aws_kms_rotation_all_enabled"], 1.0);
    }
}
