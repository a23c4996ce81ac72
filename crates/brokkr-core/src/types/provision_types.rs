//! Provisioning run result types

use serde::{Deserialize, Serialize};

/// Summary of an asset upload into the content bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSummary {
    /// Objects uploaded or replaced
    pub uploaded: usize,
    /// Objects removed because they no longer exist in the source
    pub deleted: usize,
}

/// Observable outputs of a successful provisioning run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionOutputs {
    /// Site URL (https://{site_sub_domain}.{domain_name})
    pub site_url: String,
    /// Content bucket name
    pub bucket: String,
    /// Certificate identifier
    pub certificate_arn: String,
    /// Distribution identifier
    pub distribution_id: String,
    /// Public domain the distribution serves from
    pub distribution_domain: String,
}

/// A step in the resolved execution order (plan / dry-run display)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedStep {
    /// Graph node name
    pub step: String,
    /// What running the step would do
    pub description: String,
}

/// Prerequisite check result
#[derive(Debug, Clone, Default)]
pub struct PrerequisiteStatus {
    /// All prerequisites met
    pub satisfied: bool,
    /// Missing prerequisites
    pub missing: Vec<Prerequisite>,
}

/// A single provider prerequisite
#[derive(Debug, Clone)]
pub struct Prerequisite {
    /// Name
    pub name: String,
    /// Description
    pub description: String,
    /// Install instructions
    pub install_hint: Option<String>,
}
