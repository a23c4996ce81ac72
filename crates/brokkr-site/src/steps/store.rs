//! Content bucket creation and read grant

use async_trait::async_trait;
use tracing::info;

use brokkr_cloud::CloudApi;
use brokkr_core::Result;

use crate::context::ProvisionContext;
use crate::graph::StepId;
use crate::steps::ProvisionStep;

/// Creates the bucket named after the site domain and grants the access
/// identity read-only access to its objects. A name collision with a
/// bucket owned by someone else aborts the run.
pub struct ContentStoreBuilder;

#[async_trait]
impl ProvisionStep for ContentStoreBuilder {
    fn id(&self) -> StepId {
        StepId::Bucket
    }

    fn describe(&self, ctx: &ProvisionContext) -> String {
        format!("create content bucket {}", ctx.site_domain())
    }

    async fn run(&self, ctx: &mut ProvisionContext, cloud: &dyn CloudApi) -> Result<()> {
        let identity = ctx.access_identity(self.id())?.clone();
        let bucket = cloud.create_bucket(ctx.site_domain()).await?;
        cloud.grant_read(&bucket, &identity).await?;
        info!(bucket = %bucket.name, identity = %identity.id, "created content bucket with read grant");
        ctx.record_bucket(bucket);
        Ok(())
    }
}
