//! Explicit provisioning context threaded through each step
//!
//! Replaces ambient global provisioning state: each step receives the
//! context by reference, reads the outputs of its dependencies, and records
//! its own. Reading an output that has not been recorded is a
//! `MissingDependency` error naming both steps.

use camino::{Utf8Path, Utf8PathBuf};

use brokkr_core::error::{Error, Result};
use brokkr_core::types::{
    AccessIdentity, AliasRecord, Bucket, Certificate, Distribution, HostedZone, ProvisionOutputs,
    UploadSummary,
};
use brokkr_core::SiteConfig;

use crate::graph::StepId;

/// Per-run state: configuration-derived inputs plus the identifiers
/// produced by completed steps
#[derive(Debug, Clone)]
pub struct ProvisionContext {
    domain_name: String,
    site_domain: String,
    source: Utf8PathBuf,
    error_page: String,

    zone: Option<HostedZone>,
    access_identity: Option<AccessIdentity>,
    bucket: Option<Bucket>,
    certificate: Option<Certificate>,
    distribution: Option<Distribution>,
    alias: Option<AliasRecord>,
    upload: Option<UploadSummary>,
}

impl ProvisionContext {
    /// Derive the run inputs from configuration. `site_domain` is computed
    /// here, once; steps only ever read the stored value.
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            domain_name: config.domain_name.clone(),
            site_domain: config.site_domain(),
            source: config.source.clone(),
            error_page: config.error_page.clone(),
            zone: None,
            access_identity: None,
            bucket: None,
            certificate: None,
            distribution: None,
            alias: None,
            upload: None,
        }
    }

    pub fn domain_name(&self) -> &str {
        &self.domain_name
    }

    pub fn site_domain(&self) -> &str {
        &self.site_domain
    }

    pub fn source(&self) -> &Utf8Path {
        &self.source
    }

    pub fn error_page(&self) -> &str {
        &self.error_page
    }

    pub fn record_zone(&mut self, zone: HostedZone) {
        self.zone = Some(zone);
    }

    pub fn zone(&self, step: StepId) -> Result<&HostedZone> {
        self.zone
            .as_ref()
            .ok_or_else(|| Error::missing_dependency(step.to_string(), StepId::Zone.to_string()))
    }

    pub fn record_access_identity(&mut self, identity: AccessIdentity) {
        self.access_identity = Some(identity);
    }

    pub fn access_identity(&self, step: StepId) -> Result<&AccessIdentity> {
        self.access_identity.as_ref().ok_or_else(|| {
            Error::missing_dependency(step.to_string(), StepId::AccessIdentity.to_string())
        })
    }

    pub fn record_bucket(&mut self, bucket: Bucket) {
        self.bucket = Some(bucket);
    }

    pub fn bucket(&self, step: StepId) -> Result<&Bucket> {
        self.bucket
            .as_ref()
            .ok_or_else(|| Error::missing_dependency(step.to_string(), StepId::Bucket.to_string()))
    }

    pub fn record_certificate(&mut self, certificate: Certificate) {
        self.certificate = Some(certificate);
    }

    pub fn certificate(&self, step: StepId) -> Result<&Certificate> {
        self.certificate.as_ref().ok_or_else(|| {
            Error::missing_dependency(step.to_string(), StepId::Certificate.to_string())
        })
    }

    pub fn record_distribution(&mut self, distribution: Distribution) {
        self.distribution = Some(distribution);
    }

    pub fn distribution(&self, step: StepId) -> Result<&Distribution> {
        self.distribution.as_ref().ok_or_else(|| {
            Error::missing_dependency(step.to_string(), StepId::Distribution.to_string())
        })
    }

    pub fn record_alias(&mut self, alias: AliasRecord) {
        self.alias = Some(alias);
    }

    pub fn alias(&self) -> Option<&AliasRecord> {
        self.alias.as_ref()
    }

    pub fn record_upload(&mut self, upload: UploadSummary) {
        self.upload = Some(upload);
    }

    pub fn upload(&self) -> Option<&UploadSummary> {
        self.upload.as_ref()
    }

    /// Assemble the observable outputs of a completed run
    pub fn outputs(&self) -> Result<ProvisionOutputs> {
        let bucket = self.require_for_outputs(self.bucket.as_ref(), StepId::Bucket)?;
        let certificate = self.require_for_outputs(self.certificate.as_ref(), StepId::Certificate)?;
        let distribution =
            self.require_for_outputs(self.distribution.as_ref(), StepId::Distribution)?;

        Ok(ProvisionOutputs {
            site_url: format!("https://{}", self.site_domain),
            bucket: bucket.name.clone(),
            certificate_arn: certificate.arn.clone(),
            distribution_id: distribution.id.clone(),
            distribution_domain: distribution.domain.clone(),
        })
    }

    fn require_for_outputs<'a, T>(&self, value: Option<&'a T>, step: StepId) -> Result<&'a T> {
        value.ok_or_else(|| Error::missing_dependency("outputs", step.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brokkr_core::types::CertificateState;

    fn context() -> ProvisionContext {
        ProvisionContext::new(&SiteConfig {
            domain_name: "example.com".to_string(),
            site_sub_domain: "www".to_string(),
            source: Utf8PathBuf::from("./site"),
            error_page: "/error.html".to_string(),
        })
    }

    #[test]
    fn test_unrecorded_dependency_is_an_error() {
        let ctx = context();
        let err = ctx.zone(StepId::Certificate).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingDependency { step, dependency }
                if step == "certificate" && dependency == "zone"
        ));
    }

    #[test]
    fn test_recorded_dependency_is_readable() {
        let mut ctx = context();
        ctx.record_zone(HostedZone {
            id: "Z123".to_string(),
            name: "example.com".to_string(),
        });
        assert_eq!(ctx.zone(StepId::Certificate).unwrap().id, "Z123");
    }

    #[test]
    fn test_outputs_require_created_resources() {
        let ctx = context();
        assert!(matches!(
            ctx.outputs(),
            Err(Error::MissingDependency { step, .. }) if step == "outputs"
        ));
    }

    #[test]
    fn test_outputs_assemble_from_recorded_handles() {
        let mut ctx = context();
        ctx.record_bucket(Bucket {
            name: "www.example.com".to_string(),
        });
        ctx.record_certificate(Certificate {
            arn: "arn:cert/1".to_string(),
            domain: "www.example.com".to_string(),
            state: CertificateState::Issued,
        });
        ctx.record_distribution(Distribution {
            id: "D123".to_string(),
            domain: "d123.cdn.example.net".to_string(),
        });

        let outputs = ctx.outputs().unwrap();
        assert_eq!(outputs.site_url, "https://www.example.com");
        assert_eq!(outputs.bucket, "www.example.com");
        assert_eq!(outputs.distribution_id, "D123");
    }
}
