use thiserror::Error;

/// Service-level error code returned when the threat-detection service is not
/// subscribed for the account/region.
pub const SUBSCRIPTION_REQUIRED: &str = "SubscriptionRequiredException";

#[derive(Error, Debug, Clone)]
pub enum AuditError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("service failure ({code}): {message}")]
    Service { code: String, message: String },
}

impl AuditError {
    pub fn transport(message: impl Into<String>) -> Self {
        AuditError::Transport(message.into())
    }

    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        AuditError::Service {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_subscribed(message: impl Into<String>) -> Self {
        Self::service(SUBSCRIPTION_REQUIRED, message)
    }

    /// Whether this is the distinguished "feature not enabled for this
    /// account/region" condition, which is benign and logged as a warning.
    pub fn is_feature_disabled(&self) -> bool {
        matches!(self, AuditError::Service { code, .. } if code == SUBSCRIPTION_REQUIRED)
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;
