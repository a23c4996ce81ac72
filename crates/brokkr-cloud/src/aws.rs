//! AWS adapter driving the `aws` CLI
//!
//! Shells out to `route53` / `s3api` / `s3` / `acm` / `cloudfront`
//! subcommands and maps provider failures onto the provisioning error
//! taxonomy. Request payloads are built as JSON values; responses are
//! parsed by pure helpers so they stay testable without credentials.

use std::time::Duration;

use async_trait::async_trait;
use camino::Utf8Path;
use serde_json::{json, Value};
use tokio::process::Command;
use tracing::{debug, info};
use uuid::Uuid;

use brokkr_core::error::{Error, Result};
use brokkr_core::types::{
    AccessIdentity, AliasRecord, Bucket, Certificate, CertificateState, Distribution,
    DistributionConfig, HostedZone, Prerequisite, PrerequisiteStatus, RecordChange, UploadSummary,
};

use crate::traits::CloudApi;
use crate::utils::{command_exists, command_version};

/// Hosted zone ID shared by every CloudFront alias target
const CLOUDFRONT_ZONE_ID: &str = "Z2FDTNDATAQYW2";

/// Certificates attached to a distribution must live in us-east-1
const CERTIFICATE_REGION: &str = "us-east-1";

/// Upper bound on DNS validation before the run is abandoned
const VALIDATION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// CloudApi implementation backed by the `aws` CLI
pub struct AwsCloud {
    region: String,
}

impl AwsCloud {
    pub fn new() -> Self {
        Self {
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
        }
    }

    pub fn with_region(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }

    /// Run an aws CLI command, returning stdout on success. Output is
    /// forced to JSON regardless of the user's CLI configuration.
    async fn run(&self, args: &[&str]) -> Result<String> {
        debug!(command = %format!("aws {}", args.join(" ")), "running aws CLI");
        let output = Command::new("aws")
            .args(args)
            .args(["--output", "json"])
            .output()
            .await?;
        if !output.status.success() {
            return Err(Error::cloud(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn check_credentials(&self) -> bool {
        let result = std::process::Command::new("aws")
            .args(["sts", "get-caller-identity"])
            .output();

        match result {
            Ok(output) => output.status.success(),
            Err(_) => false,
        }
    }

    /// Fetch the CNAME the certificate authority wants to see in the zone.
    /// The record appears on the certificate shortly after the request.
    async fn validation_record(&self, arn: &str) -> Result<Value> {
        for _ in 0..30 {
            let stdout = self
                .run(&[
                    "acm",
                    "describe-certificate",
                    "--region",
                    CERTIFICATE_REGION,
                    "--certificate-arn",
                    arn,
                ])
                .await?;
            let value: Value = serde_json::from_str(&stdout)?;
            if let Some(record) = parse_validation_record(&value) {
                return Ok(record);
            }
            tokio::time::sleep(Duration::from_secs(2)).await;
        }
        Err(Error::cloud(format!(
            "validation record for {arn} never appeared"
        )))
    }

    async fn change_record_set(&self, zone_id: &str, change_batch: &Value) -> Result<()> {
        self.run(&[
            "route53",
            "change-resource-record-sets",
            "--hosted-zone-id",
            zone_id,
            "--change-batch",
            &change_batch.to_string(),
        ])
        .await?;
        Ok(())
    }

    /// Find the record set currently occupying `name`, if any
    async fn find_record(&self, zone: &HostedZone, name: &str) -> Result<Option<Value>> {
        let stdout = self
            .run(&[
                "route53",
                "list-resource-record-sets",
                "--hosted-zone-id",
                &zone.id,
                "--start-record-name",
                name,
                "--max-items",
                "1",
            ])
            .await?;
        let value: Value = serde_json::from_str(&stdout)?;
        Ok(parse_record_set(&value, name))
    }
}

impl Default for AwsCloud {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CloudApi for AwsCloud {
    fn name(&self) -> &'static str {
        "aws"
    }

    fn check_prerequisites(&self) -> Result<PrerequisiteStatus> {
        let mut missing = Vec::new();

        if !command_exists("aws") {
            missing.push(Prerequisite {
                name: "aws".to_string(),
                description: "AWS CLI v2".to_string(),
                install_hint: Some(
                    "https://docs.aws.amazon.com/cli/latest/userguide/getting-started-install.html"
                        .to_string(),
                ),
            });
        } else {
            if let Some(version) = command_version("aws", &["--version"]) {
                debug!(%version, "aws CLI detected");
            }
            if !self.check_credentials() {
                missing.push(Prerequisite {
                    name: "credentials".to_string(),
                    description: "AWS credentials ('aws sts get-caller-identity' failed)"
                        .to_string(),
                    install_hint: Some("aws configure".to_string()),
                });
            }
        }

        Ok(PrerequisiteStatus {
            satisfied: missing.is_empty(),
            missing,
        })
    }

    async fn lookup_zone(&self, domain_name: &str) -> Result<HostedZone> {
        let dns_name = format!("{domain_name}.");
        let stdout = self
            .run(&[
                "route53",
                "list-hosted-zones-by-name",
                "--dns-name",
                &dns_name,
                "--max-items",
                "1",
            ])
            .await?;
        let value: Value = serde_json::from_str(&stdout)?;
        parse_hosted_zone(&value, domain_name).ok_or_else(|| Error::zone_not_found(domain_name))
    }

    async fn create_access_identity(&self, comment: &str) -> Result<AccessIdentity> {
        let config = json!({
            "CallerReference": Uuid::new_v4().to_string(),
            "Comment": comment,
        });
        let stdout = self
            .run(&[
                "cloudfront",
                "create-cloud-front-origin-access-identity",
                "--cloud-front-origin-access-identity-config",
                &config.to_string(),
            ])
            .await?;
        let value: Value = serde_json::from_str(&stdout)?;
        let id = value
            .pointer("/CloudFrontOriginAccessIdentity/Id")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::cloud("access identity response missing Id"))?;
        Ok(AccessIdentity {
            id: id.to_string(),
            comment: comment.to_string(),
        })
    }

    async fn create_bucket(&self, name: &str) -> Result<Bucket> {
        let mut args = vec!["s3api", "create-bucket", "--bucket", name];
        let constraint;
        // us-east-1 rejects an explicit LocationConstraint
        if self.region != "us-east-1" {
            constraint = format!("LocationConstraint={}", self.region);
            args.extend(["--create-bucket-configuration", constraint.as_str()]);
        }

        match self.run(&args).await {
            Ok(_) => Ok(Bucket {
                name: name.to_string(),
            }),
            // Re-running against our own bucket is fine; someone else's is fatal
            Err(Error::Cloud { message }) if message.contains("BucketAlreadyOwnedByYou") => {
                Ok(Bucket {
                    name: name.to_string(),
                })
            }
            Err(Error::Cloud { message }) if message.contains("BucketAlreadyExists") => {
                Err(Error::name_collision(name))
            }
            Err(e) => Err(e),
        }
    }

    async fn grant_read(&self, bucket: &Bucket, identity: &AccessIdentity) -> Result<()> {
        let policy = read_grant_policy(bucket, identity);
        self.run(&[
            "s3api",
            "put-bucket-policy",
            "--bucket",
            &bucket.name,
            "--policy",
            &policy.to_string(),
        ])
        .await?;
        Ok(())
    }

    async fn request_certificate(&self, domain: &str, zone: &HostedZone) -> Result<Certificate> {
        let stdout = self
            .run(&[
                "acm",
                "request-certificate",
                "--region",
                CERTIFICATE_REGION,
                "--domain-name",
                domain,
                "--validation-method",
                "DNS",
            ])
            .await?;
        let value: Value = serde_json::from_str(&stdout)?;
        let arn = value
            .get("CertificateArn")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::cloud("certificate response missing CertificateArn"))?
            .to_string();

        // Place the CA's proof-of-control CNAME in the zone
        let record = self.validation_record(&arn).await?;
        self.change_record_set(&zone.id, &validation_change_batch(&record))
            .await?;
        info!(%arn, %domain, "requested certificate, validation record placed");

        Ok(Certificate {
            arn,
            domain: domain.to_string(),
            state: CertificateState::PendingValidation,
        })
    }

    async fn await_validation(&self, certificate: &Certificate) -> Result<Certificate> {
        info!(domain = %certificate.domain, "waiting for certificate validation");
        let args = [
            "acm",
            "wait",
            "certificate-validated",
            "--region",
            CERTIFICATE_REGION,
            "--certificate-arn",
            certificate.arn.as_str(),
        ];
        match tokio::time::timeout(VALIDATION_TIMEOUT, self.run(&args)).await {
            Ok(Ok(_)) => Ok(Certificate {
                state: CertificateState::Issued,
                ..certificate.clone()
            }),
            // The waiter gives up on its own after enough failed polls
            Ok(Err(Error::Cloud { .. })) | Err(_) => {
                Err(Error::validation_timeout(&certificate.domain))
            }
            Ok(Err(e)) => Err(e),
        }
    }

    async fn create_distribution(&self, config: &DistributionConfig) -> Result<Distribution> {
        let request = distribution_request(config, &Uuid::new_v4().to_string());
        match self
            .run(&[
                "cloudfront",
                "create-distribution",
                "--distribution-config",
                &request.to_string(),
            ])
            .await
        {
            Ok(stdout) => {
                let value: Value = serde_json::from_str(&stdout)?;
                parse_distribution(&value)
                    .ok_or_else(|| Error::cloud("distribution response missing Id or DomainName"))
            }
            Err(Error::Cloud { message }) => Err(Error::distribution_create_failed(message)),
            Err(e) => Err(e),
        }
    }

    async fn upsert_alias(
        &self,
        zone: &HostedZone,
        name: &str,
        distribution: &Distribution,
    ) -> Result<AliasRecord> {
        let existing = self.find_record(zone, name).await?;

        let change = match &existing {
            Some(record) if alias_target(record) == Some(distribution.domain.as_str()) => {
                return Ok(AliasRecord {
                    name: name.to_string(),
                    target: distribution.domain.clone(),
                    zone_id: zone.id.clone(),
                    change: RecordChange::Unchanged,
                });
            }
            Some(record) if alias_target(record).is_none() => {
                return Err(Error::alias_conflict(name));
            }
            Some(_) => RecordChange::Updated,
            None => RecordChange::Created,
        };

        self.change_record_set(&zone.id, &alias_change_batch(name, &distribution.domain))
            .await?;
        Ok(AliasRecord {
            name: name.to_string(),
            target: distribution.domain.clone(),
            zone_id: zone.id.clone(),
            change,
        })
    }

    async fn sync_assets(&self, source: &Utf8Path, bucket: &Bucket) -> Result<UploadSummary> {
        let destination = format!("s3://{}", bucket.name);
        let output = Command::new("aws")
            .args(["s3", "sync", source.as_str(), &destination, "--delete"])
            .output()
            .await?;
        if !output.status.success() {
            return Err(Error::upload_failed(
                &bucket.name,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(parse_sync_summary(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn create_invalidation(
        &self,
        distribution: &Distribution,
        paths: &[String],
    ) -> Result<String> {
        let batch = json!({
            "Paths": { "Quantity": paths.len(), "Items": paths },
            "CallerReference": Uuid::new_v4().to_string(),
        });
        match self
            .run(&[
                "cloudfront",
                "create-invalidation",
                "--distribution-id",
                &distribution.id,
                "--invalidation-batch",
                &batch.to_string(),
            ])
            .await
        {
            Ok(stdout) => {
                let value: Value = serde_json::from_str(&stdout)?;
                value
                    .pointer("/Invalidation/Id")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| Error::cloud("invalidation response missing Id"))
            }
            Err(Error::Cloud { message }) => {
                Err(Error::invalidation_failed(&distribution.id, message))
            }
            Err(e) => Err(e),
        }
    }
}

/// Extract the first zone from a list-hosted-zones-by-name response, only
/// if its name matches the requested domain exactly
fn parse_hosted_zone(value: &Value, domain_name: &str) -> Option<HostedZone> {
    let zone = value.get("HostedZones")?.as_array()?.first()?;
    let name = zone.get("Name")?.as_str()?;
    if name.trim_end_matches('.') != domain_name {
        return None;
    }
    let id = zone.get("Id")?.as_str()?.rsplit('/').next()?;
    Some(HostedZone {
        id: id.to_string(),
        name: name.trim_end_matches('.').to_string(),
    })
}

/// Extract the record set occupying `name`, if the listing starts with it
fn parse_record_set(value: &Value, name: &str) -> Option<Value> {
    let record = value.get("ResourceRecordSets")?.as_array()?.first()?;
    let record_name = record.get("Name")?.as_str()?;
    if record_name.trim_end_matches('.') != name.trim_end_matches('.') {
        return None;
    }
    Some(record.clone())
}

/// The domain an alias record points at, or None for non-alias records
fn alias_target(record: &Value) -> Option<&str> {
    record
        .pointer("/AliasTarget/DNSName")
        .and_then(Value::as_str)
        .map(|target| target.trim_end_matches('.'))
}

/// The DNS validation record ACM wants placed in the zone
fn parse_validation_record(value: &Value) -> Option<Value> {
    value
        .pointer("/Certificate/DomainValidationOptions/0/ResourceRecord")
        .cloned()
}

fn validation_change_batch(record: &Value) -> Value {
    json!({
        "Changes": [{
            "Action": "UPSERT",
            "ResourceRecordSet": {
                "Name": record.get("Name"),
                "Type": record.get("Type"),
                "TTL": 300,
                "ResourceRecords": [{ "Value": record.get("Value") }],
            }
        }]
    })
}

fn alias_change_batch(name: &str, target: &str) -> Value {
    json!({
        "Changes": [{
            "Action": "UPSERT",
            "ResourceRecordSet": {
                "Name": name,
                "Type": "A",
                "AliasTarget": {
                    "HostedZoneId": CLOUDFRONT_ZONE_ID,
                    "DNSName": target,
                    "EvaluateTargetHealth": false,
                }
            }
        }]
    })
}

/// Bucket policy granting the access identity read access to objects,
/// and nothing else to anyone
fn read_grant_policy(bucket: &Bucket, identity: &AccessIdentity) -> Value {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Sid": "CdnRead",
            "Effect": "Allow",
            "Principal": {
                "AWS": format!(
                    "arn:aws:iam::cloudfront:user/CloudFront Origin Access Identity {}",
                    identity.id
                )
            },
            "Action": "s3:GetObject",
            "Resource": format!("arn:aws:s3:::{}/*", bucket.name),
        }]
    })
}

/// Full CloudFront distribution config for the site
fn distribution_request(config: &DistributionConfig, caller_reference: &str) -> Value {
    let origin_id = format!("s3-{}", config.origin_bucket.name);
    json!({
        "CallerReference": caller_reference,
        "Comment": format!(
            "Static site {}",
            config.aliases.first().map(String::as_str).unwrap_or_default()
        ),
        "Enabled": true,
        "Aliases": {
            "Quantity": config.aliases.len(),
            "Items": config.aliases,
        },
        "Origins": {
            "Quantity": 1,
            "Items": [{
                "Id": origin_id,
                "DomainName": format!("{}.s3.amazonaws.com", config.origin_bucket.name),
                "S3OriginConfig": {
                    "OriginAccessIdentity": format!(
                        "origin-access-identity/cloudfront/{}",
                        config.origin_identity.id
                    )
                }
            }]
        },
        "DefaultCacheBehavior": {
            "TargetOriginId": origin_id,
            "ViewerProtocolPolicy": "redirect-to-https",
            "ForwardedValues": {
                "QueryString": false,
                "Cookies": { "Forward": "none" }
            },
            "MinTTL": 0,
            "TrustedSigners": { "Enabled": false, "Quantity": 0 }
        },
        "CustomErrorResponses": {
            "Quantity": config.error_responses.len(),
            "Items": config.error_responses.iter().map(|e| json!({
                "ErrorCode": e.error_code,
                "ResponseCode": e.response_code.to_string(),
                "ResponsePagePath": e.response_page_path,
                "ErrorCachingMinTTL": 300,
            })).collect::<Vec<_>>()
        },
        "ViewerCertificate": {
            "ACMCertificateArn": config.certificate_arn,
            "SSLSupportMethod": "sni-only",
            "MinimumProtocolVersion": config.minimum_protocol.as_policy_name(),
        }
    })
}

fn parse_distribution(value: &Value) -> Option<Distribution> {
    let id = value.pointer("/Distribution/Id")?.as_str()?;
    let domain = value.pointer("/Distribution/DomainName")?.as_str()?;
    Some(Distribution {
        id: id.to_string(),
        domain: domain.to_string(),
    })
}

/// Count uploads and deletions from `aws s3 sync` output lines
fn parse_sync_summary(stdout: &str) -> UploadSummary {
    let mut summary = UploadSummary::default();
    for line in stdout.lines() {
        let line = line.trim_start();
        if line.starts_with("upload:") || line.starts_with("copy:") {
            summary.uploaded += 1;
        } else if line.starts_with("delete:") {
            summary.deleted += 1;
        }
    }
    summary
}
