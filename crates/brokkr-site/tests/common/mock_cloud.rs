//! In-memory cloud API for exercising provisioning order
//!
//! Records every API call in sequence so tests can assert ordering
//! constraints, and tracks created resources so failure tests can assert
//! nothing was left behind.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use camino::Utf8Path;

use brokkr_cloud::CloudApi;
use brokkr_core::error::{Error, Result};
use brokkr_core::types::{
    AccessIdentity, AliasRecord, Bucket, Certificate, CertificateState, Distribution,
    DistributionConfig, HostedZone, PrerequisiteStatus, RecordChange, UploadSummary,
};

/// A DNS record occupying a name in the mock zone
#[derive(Clone)]
pub enum MockRecord {
    /// Alias record pointing at a domain
    Alias { target: String },
    /// Any non-alias record (e.g. a pre-existing TXT)
    Plain,
}

#[derive(Default)]
struct MockState {
    zones: HashMap<String, HostedZone>,
    foreign_buckets: Vec<String>,
    buckets: Vec<String>,
    grants: Vec<(String, String)>,
    certificates: HashMap<String, String>,
    validated: Vec<String>,
    distributions: Vec<Distribution>,
    distribution_configs: Vec<DistributionConfig>,
    records: HashMap<String, MockRecord>,
    record_writes: usize,
    uploads: Vec<(String, String)>,
    invalidations: Vec<(String, Vec<String>)>,
    calls: Vec<String>,
    fail_upload: Option<String>,
    fail_validation: bool,
    counter: usize,
}

impl MockState {
    fn log(&mut self, call: impl Into<String>) {
        self.calls.push(call.into());
    }

    fn next_id(&mut self) -> usize {
        self.counter += 1;
        self.counter
    }
}

/// Mock cloud provisioning API
pub struct MockCloud {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockCloud {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCloud {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Preset an existing hosted zone
    pub fn with_zone(self, domain: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = format!("ZMOCK{}", state.next_id());
            state.zones.insert(
                domain.to_string(),
                HostedZone {
                    id,
                    name: domain.to_string(),
                },
            );
        }
        self
    }

    /// Preset a bucket owned by someone else
    pub fn with_foreign_bucket(self, name: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .foreign_buckets
            .push(name.to_string());
        self
    }

    /// Preset a DNS record occupying a name
    pub fn with_record(self, name: &str, record: MockRecord) -> Self {
        self.state
            .lock()
            .unwrap()
            .records
            .insert(name.to_string(), record);
        self
    }

    /// Make the upload step fail
    pub fn fail_upload(self, reason: &str) -> Self {
        self.state.lock().unwrap().fail_upload = Some(reason.to_string());
        self
    }

    /// Make certificate validation time out
    pub fn fail_validation(self) -> Self {
        self.state.lock().unwrap().fail_validation = true;
        self
    }

    /// All API calls, in order
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Whether any call matching `api_name` was made
    pub fn was_called(&self, api_name: &str) -> bool {
        self.calls().iter().any(|c| c.contains(api_name))
    }

    /// Position of the first call matching `api_name`
    pub fn call_position(&self, api_name: &str) -> Option<usize> {
        self.calls().iter().position(|c| c.contains(api_name))
    }

    pub fn created_buckets(&self) -> Vec<String> {
        self.state.lock().unwrap().buckets.clone()
    }

    pub fn created_distributions(&self) -> Vec<Distribution> {
        self.state.lock().unwrap().distributions.clone()
    }

    pub fn distribution_configs(&self) -> Vec<DistributionConfig> {
        self.state.lock().unwrap().distribution_configs.clone()
    }

    pub fn requested_certificates(&self) -> Vec<String> {
        self.state.lock().unwrap().certificates.keys().cloned().collect()
    }

    pub fn certificate_domain(&self, arn: &str) -> Option<String> {
        self.state.lock().unwrap().certificates.get(arn).cloned()
    }

    pub fn grants(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().grants.clone()
    }

    /// Alias target currently bound to `name`, if any
    pub fn alias_target(&self, name: &str) -> Option<String> {
        match self.state.lock().unwrap().records.get(name) {
            Some(MockRecord::Alias { target }) => Some(target.clone()),
            _ => None,
        }
    }

    /// Number of record writes performed (upserts that changed anything)
    pub fn record_writes(&self) -> usize {
        self.state.lock().unwrap().record_writes
    }

    /// (source, bucket) pairs for each completed upload
    pub fn uploads(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().uploads.clone()
    }

    pub fn invalidations(&self) -> Vec<(String, Vec<String>)> {
        self.state.lock().unwrap().invalidations.clone()
    }
}

#[async_trait]
impl CloudApi for MockCloud {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn check_prerequisites(&self) -> Result<PrerequisiteStatus> {
        Ok(PrerequisiteStatus {
            satisfied: true,
            missing: Vec::new(),
        })
    }

    async fn lookup_zone(&self, domain_name: &str) -> Result<HostedZone> {
        let mut state = self.state.lock().unwrap();
        state.log(format!("lookup_zone({domain_name})"));
        state
            .zones
            .get(domain_name)
            .cloned()
            .ok_or_else(|| Error::zone_not_found(domain_name))
    }

    async fn create_access_identity(&self, comment: &str) -> Result<AccessIdentity> {
        let mut state = self.state.lock().unwrap();
        state.log(format!("create_access_identity({comment})"));
        let id = format!("EMOCK{}", state.next_id());
        Ok(AccessIdentity {
            id,
            comment: comment.to_string(),
        })
    }

    async fn create_bucket(&self, name: &str) -> Result<Bucket> {
        let mut state = self.state.lock().unwrap();
        state.log(format!("create_bucket({name})"));
        if state.foreign_buckets.iter().any(|b| b == name) {
            return Err(Error::name_collision(name));
        }
        state.buckets.push(name.to_string());
        Ok(Bucket {
            name: name.to_string(),
        })
    }

    async fn grant_read(&self, bucket: &Bucket, identity: &AccessIdentity) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.log(format!("grant_read({}, {})", bucket.name, identity.id));
        state
            .grants
            .push((bucket.name.clone(), identity.id.clone()));
        Ok(())
    }

    async fn request_certificate(&self, domain: &str, zone: &HostedZone) -> Result<Certificate> {
        let mut state = self.state.lock().unwrap();
        state.log(format!("request_certificate({domain}, {})", zone.id));
        let arn = format!("arn:mock:acm:certificate/{}", state.next_id());
        state.certificates.insert(arn.clone(), domain.to_string());
        Ok(Certificate {
            arn,
            domain: domain.to_string(),
            state: CertificateState::PendingValidation,
        })
    }

    async fn await_validation(&self, certificate: &Certificate) -> Result<Certificate> {
        let mut state = self.state.lock().unwrap();
        state.log(format!("await_validation({})", certificate.arn));
        if state.fail_validation {
            return Err(Error::validation_timeout(&certificate.domain));
        }
        state.validated.push(certificate.arn.clone());
        Ok(Certificate {
            state: CertificateState::Issued,
            ..certificate.clone()
        })
    }

    async fn create_distribution(&self, config: &DistributionConfig) -> Result<Distribution> {
        let mut state = self.state.lock().unwrap();
        state.log(format!("create_distribution({})", config.origin_bucket.name));
        // An unvalidated certificate reference is a hard dependency-order
        // violation, exactly like the real provider rejecting the ARN
        if !state.validated.contains(&config.certificate_arn) {
            return Err(Error::distribution_create_failed(format!(
                "certificate {} is not issued",
                config.certificate_arn
            )));
        }
        let id = format!("DMOCK{}", state.next_id());
        let distribution = Distribution {
            domain: format!("{}.cdn.mock.net", id.to_lowercase()),
            id,
        };
        state.distributions.push(distribution.clone());
        state.distribution_configs.push(config.clone());
        Ok(distribution)
    }

    async fn upsert_alias(
        &self,
        zone: &HostedZone,
        name: &str,
        distribution: &Distribution,
    ) -> Result<AliasRecord> {
        let mut state = self.state.lock().unwrap();
        state.log(format!("upsert_alias({name})"));
        let change = match state.records.get(name) {
            Some(MockRecord::Plain) => return Err(Error::alias_conflict(name)),
            Some(MockRecord::Alias { target }) if *target == distribution.domain => {
                RecordChange::Unchanged
            }
            Some(MockRecord::Alias { .. }) => RecordChange::Updated,
            None => RecordChange::Created,
        };
        if change != RecordChange::Unchanged {
            state.records.insert(
                name.to_string(),
                MockRecord::Alias {
                    target: distribution.domain.clone(),
                },
            );
            state.record_writes += 1;
        }
        Ok(AliasRecord {
            name: name.to_string(),
            target: distribution.domain.clone(),
            zone_id: zone.id.clone(),
            change,
        })
    }

    async fn sync_assets(&self, source: &Utf8Path, bucket: &Bucket) -> Result<UploadSummary> {
        let mut state = self.state.lock().unwrap();
        state.log(format!("sync_assets({source}, {})", bucket.name));
        if let Some(reason) = state.fail_upload.clone() {
            return Err(Error::upload_failed(&bucket.name, reason));
        }
        state
            .uploads
            .push((source.to_string(), bucket.name.clone()));
        Ok(UploadSummary {
            uploaded: 3,
            deleted: 0,
        })
    }

    async fn create_invalidation(
        &self,
        distribution: &Distribution,
        paths: &[String],
    ) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.log(format!("create_invalidation({})", distribution.id));
        state
            .invalidations
            .push((distribution.id.clone(), paths.to_vec()));
        let id = format!("IMOCK{}", state.next_id());
        Ok(id)
    }
}
