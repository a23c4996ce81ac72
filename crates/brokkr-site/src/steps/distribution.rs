//! CDN distribution assembly

use async_trait::async_trait;
use tracing::info;

use brokkr_cloud::CloudApi;
use brokkr_core::error::{Error, Result};
use brokkr_core::types::{DistributionConfig, ErrorResponse, MinimumProtocolVersion};

use crate::context::ProvisionContext;
use crate::graph::StepId;
use crate::steps::ProvisionStep;

/// Builds the CDN distribution: a single private-bucket origin read via
/// the access identity, TLS bound to the issued certificate with the site
/// domain as the only alias, and origin 403/404 both remapped to the error
/// page.
pub struct DistributionBuilder;

impl DistributionBuilder {
    /// Origin 404 and 403 are both presented to viewers as 404, hiding the
    /// distinction between missing and forbidden objects.
    fn error_responses(error_page: &str) -> Vec<ErrorResponse> {
        [404, 403]
            .iter()
            .map(|&error_code| ErrorResponse {
                error_code,
                response_code: 404,
                response_page_path: error_page.to_string(),
            })
            .collect()
    }
}

#[async_trait]
impl ProvisionStep for DistributionBuilder {
    fn id(&self) -> StepId {
        StepId::Distribution
    }

    fn describe(&self, ctx: &ProvisionContext) -> String {
        format!(
            "create CDN distribution for {} with error page {}",
            ctx.site_domain(),
            ctx.error_page()
        )
    }

    async fn run(&self, ctx: &mut ProvisionContext, cloud: &dyn CloudApi) -> Result<()> {
        let bucket = ctx.bucket(self.id())?.clone();
        let identity = ctx.access_identity(self.id())?.clone();
        let certificate = ctx.certificate(self.id())?;

        // Attaching a certificate that never reached "issued" is an
        // ordering violation, not a retryable provider error
        if !certificate.is_issued() {
            return Err(Error::distribution_create_failed(format!(
                "certificate {} for {} is {}, not issued",
                certificate.arn, certificate.domain, certificate.state
            )));
        }

        let config = DistributionConfig {
            origin_bucket: bucket,
            origin_identity: identity,
            certificate_arn: certificate.arn.clone(),
            aliases: vec![ctx.site_domain().to_string()],
            error_responses: Self::error_responses(ctx.error_page()),
            minimum_protocol: MinimumProtocolVersion::TlsV1_1_2016,
        };

        let distribution = cloud.create_distribution(&config).await?;
        info!(
            id = %distribution.id,
            domain = %distribution.domain,
            "created distribution"
        );
        ctx.record_distribution(distribution);
        Ok(())
    }
}
