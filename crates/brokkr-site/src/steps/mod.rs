//! Provisioning step implementations
//!
//! One module per resource. Each step reads the outputs of its
//! dependencies from the context, calls the cloud API, and records its own
//! output for downstream steps.

mod alias;
mod certificate;
mod deploy;
mod distribution;
mod identity;
mod store;
mod zone;

pub use alias::AliasRecordBinder;
pub use certificate::CertificateIssuer;
pub use deploy::Deployer;
pub use distribution::DistributionBuilder;
pub use identity::AccessIdentityCreator;
pub use store::ContentStoreBuilder;
pub use zone::DomainResolver;

use async_trait::async_trait;

use brokkr_cloud::CloudApi;
use brokkr_core::Result;

use crate::context::ProvisionContext;
use crate::graph::StepId;

/// A single provisioning step
#[async_trait]
pub trait ProvisionStep: Send + Sync {
    /// Graph node this step implements
    fn id(&self) -> StepId;

    /// One-line description for plan output
    fn describe(&self, ctx: &ProvisionContext) -> String;

    /// Execute the step against the cloud API, recording outputs in `ctx`
    async fn run(&self, ctx: &mut ProvisionContext, cloud: &dyn CloudApi) -> Result<()>;
}
