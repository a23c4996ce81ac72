//! Sequential graph evaluation

use tracing::info;

use brokkr_cloud::CloudApi;
use brokkr_core::error::{Error, Result};
use brokkr_core::types::{PlannedStep, ProvisionOutputs};
use brokkr_core::SiteConfig;

use crate::context::ProvisionContext;
use crate::graph::{ProvisionGraph, StepId};
use crate::steps::{self, ProvisionStep};

/// Executes the provisioning graph against a cloud API
pub struct ProvisionRunner {
    graph: ProvisionGraph,
    steps: Vec<Box<dyn ProvisionStep>>,
}

impl ProvisionRunner {
    /// Runner for the full static-site stack
    pub fn site() -> Self {
        Self {
            graph: ProvisionGraph::site(),
            steps: vec![
                Box::new(steps::DomainResolver),
                Box::new(steps::AccessIdentityCreator),
                Box::new(steps::ContentStoreBuilder),
                Box::new(steps::CertificateIssuer),
                Box::new(steps::DistributionBuilder),
                Box::new(steps::AliasRecordBinder),
                Box::new(steps::Deployer),
            ],
        }
    }

    pub fn graph(&self) -> &ProvisionGraph {
        &self.graph
    }

    fn step(&self, id: StepId) -> Result<&dyn ProvisionStep> {
        self.steps
            .iter()
            .map(Box::as_ref)
            .find(|step| step.id() == id)
            .ok_or_else(|| Error::step_not_registered(id.to_string()))
    }

    /// Resolved execution order with per-step descriptions
    pub fn plan(&self, config: &SiteConfig) -> Result<Vec<PlannedStep>> {
        let ctx = ProvisionContext::new(config);
        let mut planned = Vec::new();
        for id in self.graph.execution_order()? {
            let step = self.step(id)?;
            planned.push(PlannedStep {
                step: id.to_string(),
                description: step.describe(&ctx),
            });
        }
        Ok(planned)
    }

    /// Run every step in dependency order. A failed step aborts the run;
    /// nothing downstream of it executes.
    pub async fn run(
        &self,
        config: &SiteConfig,
        cloud: &dyn CloudApi,
    ) -> Result<ProvisionOutputs> {
        let order = self.graph.execution_order()?;
        let mut ctx = ProvisionContext::new(config);

        info!(
            provider = cloud.name(),
            site = %ctx.site_domain(),
            steps = order.len(),
            "provisioning site"
        );

        for id in order {
            let step = self.step(id)?;
            info!(step = %id, "running step");
            step.run(&mut ctx, cloud).await?;
        }

        ctx.outputs()
    }
}
