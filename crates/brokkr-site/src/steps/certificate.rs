//! TLS certificate issuance with DNS validation

use async_trait::async_trait;
use tracing::info;

use brokkr_cloud::CloudApi;
use brokkr_core::Result;

use crate::context::ProvisionContext;
use crate::graph::StepId;
use crate::steps::ProvisionStep;

/// Requests a DNS-validated certificate for the site domain and blocks
/// until the certificate authority confirms control. Every dependent of
/// the certificate is ordered after this step, so the long wait happens
/// exactly once, here.
pub struct CertificateIssuer;

#[async_trait]
impl ProvisionStep for CertificateIssuer {
    fn id(&self) -> StepId {
        StepId::Certificate
    }

    fn describe(&self, ctx: &ProvisionContext) -> String {
        format!(
            "request DNS-validated certificate for {} and await issuance",
            ctx.site_domain()
        )
    }

    async fn run(&self, ctx: &mut ProvisionContext, cloud: &dyn CloudApi) -> Result<()> {
        let zone = ctx.zone(self.id())?.clone();
        let pending = cloud.request_certificate(ctx.site_domain(), &zone).await?;
        info!(arn = %pending.arn, "certificate requested, awaiting DNS validation");
        let issued = cloud.await_validation(&pending).await?;
        info!(arn = %issued.arn, state = %issued.state, "certificate issued");
        ctx.record_certificate(issued);
        Ok(())
    }
}
