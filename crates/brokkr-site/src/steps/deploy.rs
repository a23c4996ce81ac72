//! Asset upload and cache invalidation

use async_trait::async_trait;
use tracing::info;

use brokkr_cloud::CloudApi;
use brokkr_core::Result;

use crate::context::ProvisionContext;
use crate::graph::StepId;
use crate::steps::ProvisionStep;

/// Paths invalidated on every deployment. Always the full path space;
/// narrowing to changed paths would alter observable cache-staleness
/// behavior.
const INVALIDATION_PATHS: &[&str] = &["/*"];

/// Uploads the built site assets into the content bucket, then invalidates
/// the distribution's caches. Invalidation runs only after the upload
/// completes; a failed upload short-circuits it, since invalidating ahead
/// of content would let edge caches repopulate with stale objects.
pub struct Deployer;

#[async_trait]
impl ProvisionStep for Deployer {
    fn id(&self) -> StepId {
        StepId::Deployment
    }

    fn describe(&self, ctx: &ProvisionContext) -> String {
        format!(
            "upload {} to the content bucket and invalidate cached paths",
            ctx.source()
        )
    }

    async fn run(&self, ctx: &mut ProvisionContext, cloud: &dyn CloudApi) -> Result<()> {
        let bucket = ctx.bucket(self.id())?.clone();
        let distribution = ctx.distribution(self.id())?.clone();

        let summary = cloud.sync_assets(ctx.source(), &bucket).await?;
        info!(
            uploaded = summary.uploaded,
            deleted = summary.deleted,
            bucket = %bucket.name,
            "assets uploaded"
        );

        let paths: Vec<String> = INVALIDATION_PATHS.iter().map(|p| p.to_string()).collect();
        let invalidation = cloud.create_invalidation(&distribution, &paths).await?;
        info!(invalidation = %invalidation, distribution = %distribution.id, "cache invalidation issued");

        ctx.record_upload(summary);
        Ok(())
    }
}
