//! DNS alias record binding

use async_trait::async_trait;
use tracing::info;

use brokkr_cloud::CloudApi;
use brokkr_core::types::RecordChange;
use brokkr_core::Result;

use crate::context::ProvisionContext;
use crate::graph::StepId;
use crate::steps::ProvisionStep;

/// Points the site domain at the distribution with an alias record.
/// Re-running against the same distribution is a no-op; a replaced
/// distribution gets the record re-pointed.
pub struct AliasRecordBinder;

#[async_trait]
impl ProvisionStep for AliasRecordBinder {
    fn id(&self) -> StepId {
        StepId::AliasRecord
    }

    fn describe(&self, ctx: &ProvisionContext) -> String {
        format!("bind alias record {} to the distribution", ctx.site_domain())
    }

    async fn run(&self, ctx: &mut ProvisionContext, cloud: &dyn CloudApi) -> Result<()> {
        let zone = ctx.zone(self.id())?.clone();
        let distribution = ctx.distribution(self.id())?.clone();
        let record = cloud
            .upsert_alias(&zone, ctx.site_domain(), &distribution)
            .await?;
        match record.change {
            RecordChange::Unchanged => {
                info!(name = %record.name, "alias record already targets the distribution");
            }
            change => {
                info!(name = %record.name, target = %record.target, %change, "alias record bound");
            }
        }
        ctx.record_alias(record);
        Ok(())
    }
}
