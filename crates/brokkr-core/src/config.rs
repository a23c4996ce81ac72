//! Site configuration loading and validation

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name
pub const CONFIG_FILE: &str = "brokkr.yaml";

fn default_error_page() -> String {
    "/error.html".to_string()
}

/// Caller-supplied site configuration (brokkr.yaml)
///
/// The sole input to a provisioning run. Every resource (zone, bucket,
/// certificate, distribution, alias record) is derived or created from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Apex domain that owns the hosted zone (e.g. "example.com")
    pub domain_name: String,

    /// Subdomain the site is served from (e.g. "www")
    pub site_sub_domain: String,

    /// Directory containing the built site assets
    pub source: Utf8PathBuf,

    /// Object key served in place of missing or forbidden content
    #[serde(default = "default_error_page")]
    pub error_page: String,
}

impl SiteConfig {
    /// Load configuration from an explicit path or `brokkr.yaml` in the
    /// current directory. Validates on load.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let path = path
            .map(Utf8Path::to_path_buf)
            .unwrap_or_else(|| Utf8PathBuf::from(CONFIG_FILE));

        if !path.exists() {
            return Err(Error::config_not_found(path.as_str()));
        }

        let raw = std::fs::read_to_string(&path)?;
        let config: SiteConfig = serde_yaml_ng::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// The fully-qualified domain the site is served from.
    ///
    /// The only derivation point; downstream consumers read the derived
    /// value from the provisioning context instead of re-deriving it.
    pub fn site_domain(&self) -> String {
        format!("{}.{}", self.site_sub_domain, self.domain_name)
    }

    /// Validate field contents
    pub fn validate(&self) -> Result<()> {
        if self.domain_name.trim().is_empty() {
            return Err(Error::missing_field("domain_name"));
        }
        if self.site_sub_domain.trim().is_empty() {
            return Err(Error::missing_field("site_sub_domain"));
        }
        for (field, value) in [
            ("domain_name", &self.domain_name),
            ("site_sub_domain", &self.site_sub_domain),
        ] {
            if value.starts_with('.') || value.ends_with('.') {
                return Err(Error::invalid_config(format!(
                    "{field} must not start or end with '.': {value}"
                )));
            }
        }
        if self.source.as_str().is_empty() {
            return Err(Error::missing_field("source"));
        }
        if !self.error_page.starts_with('/') {
            return Err(Error::invalid_config(format!(
                "error_page must be an absolute object key: {}",
                self.error_page
            )));
        }
        Ok(())
    }
}
