//! Resource handle types returned by the cloud provisioning API
//!
//! Plain data structures; cross-step coordination happens by passing these
//! handles downstream, never by sharing mutable state.

use serde::{Deserialize, Serialize};

/// Reference to an existing DNS hosted zone. Looked up, never created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedZone {
    /// Provider-assigned zone ID
    pub id: String,
    /// Zone name without trailing dot (e.g. "example.com")
    pub name: String,
}

/// Identity the CDN uses to read bucket objects privately
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessIdentity {
    /// Provider-assigned identity ID
    pub id: String,
    /// Human-readable comment attached to the identity
    pub comment: String,
}

/// Storage bucket holding the site assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Globally unique bucket name; equals the site domain
    pub name: String,
}

/// Certificate lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateState {
    PendingValidation,
    Issued,
    Failed,
}

impl std::fmt::Display for CertificateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CertificateState::PendingValidation => write!(f, "pending validation"),
            CertificateState::Issued => write!(f, "issued"),
            CertificateState::Failed => write!(f, "failed"),
        }
    }
}

/// Managed TLS certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Provider identifier (ARN)
    pub arn: String,
    /// Domain the certificate covers; equals the site domain exactly
    pub domain: String,
    /// Lifecycle state; must be `Issued` before attachment to a distribution
    pub state: CertificateState,
}

impl Certificate {
    pub fn is_issued(&self) -> bool {
        self.state == CertificateState::Issued
    }
}

/// Minimum TLS protocol the distribution accepts from viewers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinimumProtocolVersion {
    /// TLSv1.1_2016 security policy
    #[default]
    TlsV1_1_2016,
    /// TLSv1.2_2021 security policy
    TlsV1_2_2021,
}

impl MinimumProtocolVersion {
    /// Provider-side policy name
    pub fn as_policy_name(&self) -> &'static str {
        match self {
            MinimumProtocolVersion::TlsV1_1_2016 => "TLSv1.1_2016",
            MinimumProtocolVersion::TlsV1_2_2021 => "TLSv1.2_2021",
        }
    }
}

/// Custom error-code remapping entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Origin error code being remapped
    pub error_code: u16,
    /// Status code presented to the viewer
    pub response_code: u16,
    /// Object key of the page returned instead
    pub response_page_path: String,
}

/// Configuration for creating the CDN distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// Origin bucket; the single default behavior sources from it
    pub origin_bucket: Bucket,
    /// Identity used to read the origin bucket privately
    pub origin_identity: AccessIdentity,
    /// ARN of the issued certificate bound for TLS
    pub certificate_arn: String,
    /// Alternate domain names; exactly the site domain
    pub aliases: Vec<String>,
    /// Origin error-code remappings
    pub error_responses: Vec<ErrorResponse>,
    /// Viewer TLS floor
    pub minimum_protocol: MinimumProtocolVersion,
}

/// Created CDN distribution handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    /// Stable distribution identifier
    pub id: String,
    /// Public domain name the CDN serves from
    pub domain: String,
}

/// Outcome of an alias record upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordChange {
    Created,
    Updated,
    Unchanged,
}

impl std::fmt::Display for RecordChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordChange::Created => write!(f, "created"),
            RecordChange::Updated => write!(f, "updated"),
            RecordChange::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// DNS alias record pointing the site domain at the distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRecord {
    /// Record name; equals the site domain
    pub name: String,
    /// Target domain; equals the distribution's domain
    pub target: String,
    /// Zone the record lives in
    pub zone_id: String,
    /// Whether the upsert wrote anything
    pub change: RecordChange,
}
