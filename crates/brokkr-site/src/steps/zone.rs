//! Hosted zone lookup

use async_trait::async_trait;
use tracing::info;

use brokkr_cloud::CloudApi;
use brokkr_core::Result;

use crate::context::ProvisionContext;
use crate::graph::StepId;
use crate::steps::ProvisionStep;

/// Resolves the existing DNS zone for the apex domain. Certificate
/// validation and alias binding both write records into this zone, so the
/// whole run aborts if it cannot be found.
pub struct DomainResolver;

#[async_trait]
impl ProvisionStep for DomainResolver {
    fn id(&self) -> StepId {
        StepId::Zone
    }

    fn describe(&self, ctx: &ProvisionContext) -> String {
        format!("look up hosted zone for {}", ctx.domain_name())
    }

    async fn run(&self, ctx: &mut ProvisionContext, cloud: &dyn CloudApi) -> Result<()> {
        let zone = cloud.lookup_zone(ctx.domain_name()).await?;
        info!(zone = %zone.id, domain = %zone.name, "resolved hosted zone");
        ctx.record_zone(zone);
        Ok(())
    }
}
