pub mod checks;
pub mod client;
pub mod error;

pub use checks::{default_checks, DynPostureCheck, PostureCheck};
pub use client::{AuditClient, DynAuditClient, FixtureAuditClient};
pub use error::{AuditError, Result};

// Re-export commonly used types
pub use async_trait::async_trait;
