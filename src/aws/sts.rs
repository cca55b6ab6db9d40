use super::AwsSession;
use crate::error::{HygieneError, Result};
use crate::provider::IdentityProvider;
use async_trait::async_trait;
use aws_sdk_sts::error::DisplayErrorContext;
use aws_sdk_sts::Client as StsClient;

pub struct StsIdentity {
    client: StsClient,
}

impl StsIdentity {
    pub fn new(session: &AwsSession) -> Self {
        Self {
            client: StsClient::new(session.sdk_config()),
        }
    }
}

#[async_trait]
impl IdentityProvider for StsIdentity {
    async fn account_id(&self) -> Result<String> {
        let identity = self
            .client
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| {
                HygieneError::provider("sts", "GetCallerIdentity", DisplayErrorContext(e))
            })?;

        identity
            .account()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                HygieneError::provider("sts", "GetCallerIdentity", "no account ID in response")
            })
    }
}
