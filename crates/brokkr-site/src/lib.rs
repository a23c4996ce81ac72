//! Static-site provisioning core for Brokkr
//!
//! The hosting stack is declared as a dependency graph of provisioning
//! steps: [`ProvisionGraph`] holds the steps and their ordering edges and
//! resolves a topological execution order; [`ProvisionRunner`] executes the
//! steps against a [`brokkr_cloud::CloudApi`]; [`ProvisionContext`] carries
//! the generated identifiers (zone ID, bucket name, certificate ARN,
//! distribution ID) from producers to consumers. A failed step aborts the
//! run; nothing downstream of it executes.

pub mod context;
pub mod graph;
pub mod runner;
pub mod steps;

pub use context::ProvisionContext;
pub use graph::{ProvisionGraph, StepId};
pub use runner::ProvisionRunner;
