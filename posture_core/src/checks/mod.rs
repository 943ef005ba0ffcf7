pub mod access_keys;
pub mod findings;
pub mod key_rotation;
pub mod trail_logging;

use crate::client::DynAuditClient;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub use access_keys::AccessKeyAgeCheck;
pub use findings::HighSeverityFindingsCheck;
pub use key_rotation::KeyRotationCheck;
pub use trail_logging::TrailLoggingCheck;

/// One security signal: a set of remote queries reduced to a single gauge
/// value.
#[async_trait]
pub trait PostureCheck: Send + Sync {
    /// Wire name of the gauge this check owns.
    fn gauge_name(&self) -> &'static str;

    /// Static help text registered with the gauge.
    fn gauge_help(&self) -> &'static str;

    /// Run the remote queries and derive the gauge value.
    async fn evaluate(&self) -> Result<f64>;

    /// Sentinel exposed in place of a value when `evaluate` fails.
    fn fallback(&self) -> f64;
}

pub type DynPostureCheck = Arc<dyn PostureCheck>;

/// The standard check set, in collection order.
pub fn default_checks(client: DynAuditClient) -> Vec<DynPostureCheck> {
    vec![
        Arc::new(TrailLoggingCheck::new(client.clone())),
        Arc::new(HighSeverityFindingsCheck::new(client.clone())),
        Arc::new(AccessKeyAgeCheck::new(client.clone())),
        Arc::new(KeyRotationCheck::new(client)),
    ]
}
