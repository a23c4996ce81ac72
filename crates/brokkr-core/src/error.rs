//! Error types for brokkr-core

use thiserror::Error;

/// Result type alias using brokkr-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Brokkr
///
/// Every provisioning failure is terminal for the current run; errors carry
/// the resource name involved so the caller can diagnose and re-run.
#[derive(Error, Debug)]
pub enum Error {
    /// No hosted zone matches the configured domain
    #[error("No hosted zone found for domain: {domain}")]
    ZoneNotFound { domain: String },

    /// Bucket name is taken by another owner
    #[error("Bucket name already in use by another owner: {bucket}")]
    NameCollision { bucket: String },

    /// DNS-based proof of domain control was not confirmed in time
    #[error("Certificate validation timed out for domain: {domain}")]
    ValidationTimeout { domain: String },

    /// Distribution creation rejected by the provider
    #[error("Distribution creation failed: {reason}")]
    DistributionCreateFailed { reason: String },

    /// A non-alias record already occupies the site domain name
    #[error("Record '{name}' exists and is not an alias record")]
    AliasConflict { name: String },

    /// Asset upload into the content bucket failed
    #[error("Upload to bucket '{bucket}' failed: {reason}")]
    UploadFailed { bucket: String, reason: String },

    /// Cache invalidation was rejected or failed
    #[error("Invalidation on distribution '{distribution_id}' failed: {reason}")]
    InvalidationFailed {
        distribution_id: String,
        reason: String,
    },

    /// A step ran before the step that produces its input
    #[error("Step '{step}' requires output of '{dependency}' which has not run")]
    MissingDependency { step: String, dependency: String },

    /// Circular dependency in the provisioning graph
    #[error("Circular dependency detected at step: {step}")]
    CircularDependency { step: String },

    /// Graph names a step with no registered implementation
    #[error("No step registered for graph node: {step}")]
    StepNotRegistered { step: String },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Provider transport error (CLI invocation, malformed response)
    #[error("Cloud API error: {message}")]
    Cloud { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a zone not found error
    pub fn zone_not_found(domain: impl Into<String>) -> Self {
        Self::ZoneNotFound {
            domain: domain.into(),
        }
    }

    /// Create a bucket name collision error
    pub fn name_collision(bucket: impl Into<String>) -> Self {
        Self::NameCollision {
            bucket: bucket.into(),
        }
    }

    /// Create a validation timeout error
    pub fn validation_timeout(domain: impl Into<String>) -> Self {
        Self::ValidationTimeout {
            domain: domain.into(),
        }
    }

    /// Create a distribution create failed error
    pub fn distribution_create_failed(reason: impl Into<String>) -> Self {
        Self::DistributionCreateFailed {
            reason: reason.into(),
        }
    }

    /// Create an alias conflict error
    pub fn alias_conflict(name: impl Into<String>) -> Self {
        Self::AliasConflict { name: name.into() }
    }

    /// Create an upload failed error
    pub fn upload_failed(bucket: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UploadFailed {
            bucket: bucket.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalidation failed error
    pub fn invalidation_failed(
        distribution_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidationFailed {
            distribution_id: distribution_id.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing dependency error
    pub fn missing_dependency(step: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self::MissingDependency {
            step: step.into(),
            dependency: dependency.into(),
        }
    }

    /// Create a circular dependency error
    pub fn circular_dependency(step: impl Into<String>) -> Self {
        Self::CircularDependency { step: step.into() }
    }

    /// Create a step not registered error
    pub fn step_not_registered(step: impl Into<String>) -> Self {
        Self::StepNotRegistered { step: step.into() }
    }

    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a cloud API error
    pub fn cloud(message: impl Into<String>) -> Self {
        Self::Cloud {
            message: message.into(),
        }
    }
}
