//! CDN access identity creation

use async_trait::async_trait;
use tracing::info;

use brokkr_cloud::CloudApi;
use brokkr_core::Result;

use crate::context::ProvisionContext;
use crate::graph::StepId;
use crate::steps::ProvisionStep;

/// Creates the identity the CDN uses to read the content bucket. The
/// bucket stays private; this identity is the only principal granted read
/// access.
pub struct AccessIdentityCreator;

#[async_trait]
impl ProvisionStep for AccessIdentityCreator {
    fn id(&self) -> StepId {
        StepId::AccessIdentity
    }

    fn describe(&self, ctx: &ProvisionContext) -> String {
        format!("create CDN access identity for {}", ctx.site_domain())
    }

    async fn run(&self, ctx: &mut ProvisionContext, cloud: &dyn CloudApi) -> Result<()> {
        let comment = format!("Access from CDN to {} bucket", ctx.site_domain());
        let identity = cloud.create_access_identity(&comment).await?;
        info!(identity = %identity.id, "created access identity");
        ctx.record_access_identity(identity);
        Ok(())
    }
}
