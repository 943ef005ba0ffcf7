use crate::checks::PostureCheck;
use crate::client::{DynAuditClient, KeyManager};
use crate::error::Result;
use async_trait::async_trait;
use tracing::debug;

/// Reports 1 when every customer-managed cryptographic key has automatic
/// rotation enabled (vacuously true for zero customer-managed keys), 0
/// otherwise. Failure is collapsed into 0, like the trail check. The full
/// inventory is scanned even after the first non-rotating key.
pub struct KeyRotationCheck {
    client: DynAuditClient,
}

impl KeyRotationCheck {
    pub fn new(client: DynAuditClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PostureCheck for KeyRotationCheck {
    fn gauge_name(&self) -> &'static str {
        "aws_kms_rotation_all_enabled"
    }

    fn gauge_help(&self) -> &'static str {
        "If KMS automatic rotation is enabled for all customer-managed keys, value is 1, else is 0"
    }

    async fn evaluate(&self) -> Result<f64> {
        let mut all_enabled = true;

        let mut page_token: Option<String> = None;
        loop {
            let page = self.client.list_keys(page_token.as_deref()).await?;

            for entry in &page.items {
                let metadata = self.client.describe_key(&entry.key_id).await?;
                if metadata.manager != KeyManager::Customer {
                    continue;
                }

                if !self.client.key_rotation_status(&entry.key_id).await? {
                    debug!("Key '{}' has automatic rotation disabled", entry.key_id);
                    all_enabled = false;
                }
            }

            match page.next_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(if all_enabled { 1.0 } else { 0.0 })
    }

    fn fallback(&self) -> f64 {
        0.0
    }
}
