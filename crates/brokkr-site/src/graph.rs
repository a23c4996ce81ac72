//! Step ordering via topological sort with DFS

use std::collections::{HashMap, HashSet};

use brokkr_core::error::{Error, Result};

/// Node in the provisioning dependency graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StepId {
    Zone,
    AccessIdentity,
    Bucket,
    Certificate,
    Distribution,
    AliasRecord,
    Deployment,
}

impl StepId {
    /// All steps in declaration order. Zone is first so a failed zone
    /// lookup aborts the run before any resource-creating step executes.
    pub const ALL: [StepId; 7] = [
        StepId::Zone,
        StepId::AccessIdentity,
        StepId::Bucket,
        StepId::Certificate,
        StepId::Distribution,
        StepId::AliasRecord,
        StepId::Deployment,
    ];
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepId::Zone => write!(f, "zone"),
            StepId::AccessIdentity => write!(f, "access-identity"),
            StepId::Bucket => write!(f, "bucket"),
            StepId::Certificate => write!(f, "certificate"),
            StepId::Distribution => write!(f, "distribution"),
            StepId::AliasRecord => write!(f, "alias-record"),
            StepId::Deployment => write!(f, "deployment"),
        }
    }
}

/// Directed dependency graph over provisioning steps
///
/// Steps and edges are plain data; evaluation is a separate concern
/// (`ProvisionRunner`). An edge `step -> dependency` means the step cannot
/// run before the dependency has produced its output.
#[derive(Debug, Default)]
pub struct ProvisionGraph {
    requires: HashMap<StepId, Vec<StepId>>,
}

impl ProvisionGraph {
    pub fn new() -> Self {
        Self {
            requires: HashMap::new(),
        }
    }

    /// The static-site stack wiring
    pub fn site() -> Self {
        let mut graph = Self::new();
        // the bucket grant needs the identity
        graph.require(StepId::Bucket, StepId::AccessIdentity);
        // validation records go into the zone
        graph.require(StepId::Certificate, StepId::Zone);
        // origin, read identity, and TLS certificate
        graph.require(StepId::Distribution, StepId::Bucket);
        graph.require(StepId::Distribution, StepId::AccessIdentity);
        graph.require(StepId::Distribution, StepId::Certificate);
        // never leave an alias pointing at a distribution that was not created
        graph.require(StepId::AliasRecord, StepId::Zone);
        graph.require(StepId::AliasRecord, StepId::Distribution);
        // upload destination and invalidation target
        graph.require(StepId::Deployment, StepId::Bucket);
        graph.require(StepId::Deployment, StepId::Distribution);
        graph
    }

    /// Declare that `step` cannot run before `dependency`
    pub fn require(&mut self, step: StepId, dependency: StepId) {
        self.requires.entry(step).or_default().push(dependency);
    }

    /// Dependencies declared for `step`
    pub fn requires(&self, step: StepId) -> &[StepId] {
        self.requires
            .get(&step)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Resolve the execution order: every dependency before its dependents,
    /// each step exactly once. Deterministic because steps are visited in
    /// `StepId::ALL` order.
    pub fn execution_order(&self) -> Result<Vec<StepId>> {
        let mut resolved = Vec::new();
        let mut seen = HashSet::new();
        let mut visiting = HashSet::new();

        for step in StepId::ALL {
            self.visit(step, &mut resolved, &mut seen, &mut visiting)?;
        }
        Ok(resolved)
    }

    /// Visit a step node using DFS
    fn visit(
        &self,
        step: StepId,
        resolved: &mut Vec<StepId>,
        seen: &mut HashSet<StepId>,
        visiting: &mut HashSet<StepId>,
    ) -> Result<()> {
        // Cycle detection
        if visiting.contains(&step) {
            return Err(Error::circular_dependency(step.to_string()));
        }

        // Already resolved
        if seen.contains(&step) {
            return Ok(());
        }

        visiting.insert(step);

        // Visit dependencies first
        for dependency in self.requires(step) {
            self.visit(*dependency, resolved, seen, visiting)?;
        }

        visiting.remove(&step);
        seen.insert(step);
        resolved.push(step);

        Ok(())
    }
}
