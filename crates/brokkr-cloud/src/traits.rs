//! Cloud API trait definition
//!
//! The stable interface between the provisioning core and the cloud
//! provider. The core owns call ordering; implementations own transport,
//! polling, and timeout policy.

use async_trait::async_trait;
use camino::Utf8Path;

use brokkr_core::types::{
    AccessIdentity, AliasRecord, Bucket, Certificate, Distribution, DistributionConfig,
    HostedZone, PrerequisiteStatus, UploadSummary,
};
use brokkr_core::Result;

/// Cloud provisioning operations required to stand up a static site
#[async_trait]
pub trait CloudApi: Send + Sync {
    /// Provider name for diagnostics
    fn name(&self) -> &'static str;

    /// Check that the provider's tooling and credentials are available
    fn check_prerequisites(&self) -> Result<PrerequisiteStatus>;

    /// Look up an existing hosted zone whose name matches `domain_name`
    /// exactly. Zones are never created here.
    async fn lookup_zone(&self, domain_name: &str) -> Result<HostedZone>;

    /// Create the identity the CDN uses to read bucket objects
    async fn create_access_identity(&self, comment: &str) -> Result<AccessIdentity>;

    /// Create the content bucket. Collision with a bucket owned by someone
    /// else is fatal and not retried.
    async fn create_bucket(&self, name: &str) -> Result<Bucket>;

    /// Grant `identity` read-only access to `bucket`'s objects. No other
    /// principal receives read access.
    async fn grant_read(&self, bucket: &Bucket, identity: &AccessIdentity) -> Result<()>;

    /// Request a DNS-validated certificate for `domain`, placing the
    /// validation records in `zone`. The returned certificate is usually
    /// still pending validation.
    async fn request_certificate(&self, domain: &str, zone: &HostedZone) -> Result<Certificate>;

    /// Block until the certificate authority confirms control of the
    /// domain. The one long-running suspension point in a provisioning run;
    /// everything that needs the certificate is ordered after it.
    async fn await_validation(&self, certificate: &Certificate) -> Result<Certificate>;

    /// Create the CDN distribution
    async fn create_distribution(&self, config: &DistributionConfig) -> Result<Distribution>;

    /// Create or re-point the alias record `name` in `zone` so it targets
    /// the distribution's domain. A record already targeting it is left
    /// untouched.
    async fn upsert_alias(
        &self,
        zone: &HostedZone,
        name: &str,
        distribution: &Distribution,
    ) -> Result<AliasRecord>;

    /// Upload the contents of `source` into `bucket`, adding, replacing,
    /// and removing objects so the bucket mirrors the source.
    async fn sync_assets(&self, source: &Utf8Path, bucket: &Bucket) -> Result<UploadSummary>;

    /// Discard cached copies of `paths` so edge caches refetch from the
    /// origin. Returns the provider's invalidation ID.
    async fn create_invalidation(
        &self,
        distribution: &Distribution,
        paths: &[String],
    ) -> Result<String>;
}
