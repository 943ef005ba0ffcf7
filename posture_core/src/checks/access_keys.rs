use crate::checks::PostureCheck;
use crate::client::{DynAuditClient, KeyStatus};
use crate::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

/// Tracks the oldest active access credential across the whole identity
/// inventory, in whole days. Inactive credentials are ignored; no active
/// credential anywhere yields 0. A query failure is exposed as -1.
pub struct AccessKeyAgeCheck {
    client: DynAuditClient,
}

impl AccessKeyAgeCheck {
    pub fn new(client: DynAuditClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PostureCheck for AccessKeyAgeCheck {
    fn gauge_name(&self) -> &'static str {
        "aws_iam_access_key_max_age_days"
    }

    fn gauge_help(&self) -> &'static str {
        "Maximum age in days among all active IAM access keys, or -1 when unavailable"
    }

    async fn evaluate(&self) -> Result<f64> {
        let now = Utc::now();
        let mut max_age_days: i64 = 0;

        let mut page_token: Option<String> = None;
        loop {
            let page = self.client.list_identities(page_token.as_deref()).await?;

            for identity in &page.items {
                let keys = self.client.list_access_keys(&identity.user_name).await?;
                for key in &keys {
                    if key.status != KeyStatus::Active {
                        debug!(
                            "Skipping inactive access key '{}' of '{}'",
                            key.access_key_id, identity.user_name
                        );
                        continue;
                    }

                    let age_days = (now - key.created).num_days();
                    if age_days > max_age_days {
                        max_age_days = age_days;
                    }
                }
            }

            match page.next_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(max_age_days as f64)
    }

    fn fallback(&self) -> f64 {
        -1.0
    }
}
