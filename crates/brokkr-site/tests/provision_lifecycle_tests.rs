//! Provisioning lifecycle integration tests
//!
//! Runs the step graph against an in-memory cloud and asserts the ordering
//! contracts: certificate validation before distribution creation, upload
//! before invalidation, alias binding only after the distribution exists,
//! and short-circuit on failure.

mod common;

use camino::Utf8PathBuf;
use common::mock_cloud::{MockCloud, MockRecord};

use brokkr_core::error::Error;
use brokkr_core::types::{Distribution, HostedZone, MinimumProtocolVersion};
use brokkr_core::SiteConfig;
use brokkr_site::steps::{AliasRecordBinder, ProvisionStep};
use brokkr_site::{ProvisionContext, ProvisionRunner};

fn site_config() -> SiteConfig {
    SiteConfig {
        domain_name: "example.com".to_string(),
        site_sub_domain: "www".to_string(),
        source: Utf8PathBuf::from("./site"),
        error_page: "/error.html".to_string(),
    }
}

#[tokio::test]
async fn test_end_to_end_provisioning() {
    let cloud = MockCloud::new().with_zone("example.com");
    let runner = ProvisionRunner::site();

    let outputs = runner.run(&site_config(), &cloud).await.unwrap();

    assert_eq!(outputs.site_url, "https://www.example.com");
    assert_eq!(outputs.bucket, "www.example.com");
    assert_eq!(outputs.distribution_domain, cloud.created_distributions()[0].domain);

    // the certificate covers exactly the site domain
    assert_eq!(
        cloud.certificate_domain(&outputs.certificate_arn).as_deref(),
        Some("www.example.com")
    );

    // the alias record name is the site domain and targets the distribution
    assert_eq!(
        cloud.alias_target("www.example.com").as_deref(),
        Some(outputs.distribution_domain.as_str())
    );

    // the only read grant goes to the access identity on the site bucket
    let grants = cloud.grants();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].0, "www.example.com");

    // assets land in the bucket the distribution serves from
    let uploads = cloud.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0], ("./site".to_string(), "www.example.com".to_string()));
}

#[tokio::test]
async fn test_distribution_waits_for_certificate_validation() {
    let cloud = MockCloud::new().with_zone("example.com");
    let runner = ProvisionRunner::site();

    runner.run(&site_config(), &cloud).await.unwrap();

    let validated = cloud.call_position("await_validation").unwrap();
    let created = cloud.call_position("create_distribution").unwrap();
    assert!(
        validated < created,
        "distribution must not be created before validation completes"
    );
}

#[tokio::test]
async fn test_invalidation_strictly_follows_upload() {
    let cloud = MockCloud::new().with_zone("example.com");
    let runner = ProvisionRunner::site();

    runner.run(&site_config(), &cloud).await.unwrap();

    let upload = cloud.call_position("sync_assets").unwrap();
    let invalidation = cloud.call_position("create_invalidation").unwrap();
    assert!(upload < invalidation);

    let invalidations = cloud.invalidations();
    assert_eq!(invalidations.len(), 1);
    assert_eq!(invalidations[0].1, vec!["/*".to_string()]);
}

#[tokio::test]
async fn test_alias_binding_follows_distribution_creation() {
    let cloud = MockCloud::new().with_zone("example.com");
    let runner = ProvisionRunner::site();

    runner.run(&site_config(), &cloud).await.unwrap();

    let created = cloud.call_position("create_distribution").unwrap();
    let bound = cloud.call_position("upsert_alias").unwrap();
    assert!(created < bound);
}

#[tokio::test]
async fn test_zone_not_found_aborts_before_any_resource_creation() {
    // no zone preset: the lookup fails
    let cloud = MockCloud::new();
    let runner = ProvisionRunner::site();

    let err = runner.run(&site_config(), &cloud).await.unwrap_err();
    assert!(matches!(err, Error::ZoneNotFound { domain } if domain == "example.com"));

    assert!(cloud.created_buckets().is_empty());
    assert!(cloud.requested_certificates().is_empty());
    assert!(cloud.created_distributions().is_empty());
    assert!(!cloud.was_called("create_bucket"));
    assert!(!cloud.was_called("request_certificate"));
    assert!(!cloud.was_called("create_distribution"));
}

#[tokio::test]
async fn test_upload_failure_short_circuits_invalidation() {
    let cloud = MockCloud::new()
        .with_zone("example.com")
        .fail_upload("connection reset");
    let runner = ProvisionRunner::site();

    let err = runner.run(&site_config(), &cloud).await.unwrap_err();
    assert!(matches!(err, Error::UploadFailed { bucket, .. } if bucket == "www.example.com"));
    assert!(!cloud.was_called("create_invalidation"));
    assert!(cloud.invalidations().is_empty());
}

#[tokio::test]
async fn test_validation_timeout_stops_distribution_and_alias() {
    let cloud = MockCloud::new().with_zone("example.com").fail_validation();
    let runner = ProvisionRunner::site();

    let err = runner.run(&site_config(), &cloud).await.unwrap_err();
    assert!(matches!(err, Error::ValidationTimeout { domain } if domain == "www.example.com"));

    assert!(cloud.created_distributions().is_empty());
    assert!(!cloud.was_called("upsert_alias"));
    assert_eq!(cloud.record_writes(), 0);
}

#[tokio::test]
async fn test_bucket_collision_is_fatal() {
    let cloud = MockCloud::new()
        .with_zone("example.com")
        .with_foreign_bucket("www.example.com");
    let runner = ProvisionRunner::site();

    let err = runner.run(&site_config(), &cloud).await.unwrap_err();
    assert!(matches!(err, Error::NameCollision { bucket } if bucket == "www.example.com"));
    assert!(cloud.created_distributions().is_empty());
}

#[tokio::test]
async fn test_error_page_mapping_hides_forbidden_objects() {
    let cloud = MockCloud::new().with_zone("example.com");
    let runner = ProvisionRunner::site();

    runner.run(&site_config(), &cloud).await.unwrap();

    let configs = cloud.distribution_configs();
    assert_eq!(configs.len(), 1);
    let config = &configs[0];

    assert_eq!(config.aliases, vec!["www.example.com".to_string()]);
    assert_eq!(config.minimum_protocol, MinimumProtocolVersion::TlsV1_1_2016);

    for origin_code in [403u16, 404] {
        let response = config
            .error_responses
            .iter()
            .find(|r| r.error_code == origin_code)
            .unwrap();
        assert_eq!(response.response_code, 404);
        assert_eq!(response.response_page_path, "/error.html");
    }
}

#[tokio::test]
async fn test_alias_rebinding_is_idempotent() {
    let cloud = MockCloud::new();
    let binder = AliasRecordBinder;

    let mut ctx = ProvisionContext::new(&site_config());
    ctx.record_zone(HostedZone {
        id: "ZMOCK1".to_string(),
        name: "example.com".to_string(),
    });
    ctx.record_distribution(Distribution {
        id: "DMOCK1".to_string(),
        domain: "dmock1.cdn.mock.net".to_string(),
    });

    binder.run(&mut ctx, &cloud).await.unwrap();
    assert_eq!(cloud.record_writes(), 1);

    // same distribution target: no additional write
    binder.run(&mut ctx, &cloud).await.unwrap();
    assert_eq!(cloud.record_writes(), 1);

    // replaced distribution: the record is re-pointed
    ctx.record_distribution(Distribution {
        id: "DMOCK2".to_string(),
        domain: "dmock2.cdn.mock.net".to_string(),
    });
    binder.run(&mut ctx, &cloud).await.unwrap();
    assert_eq!(cloud.record_writes(), 2);
    assert_eq!(
        cloud.alias_target("www.example.com").as_deref(),
        Some("dmock2.cdn.mock.net")
    );
}

#[tokio::test]
async fn test_alias_conflict_with_non_alias_record() {
    let cloud = MockCloud::new().with_record("www.example.com", MockRecord::Plain);
    let binder = AliasRecordBinder;

    let mut ctx = ProvisionContext::new(&site_config());
    ctx.record_zone(HostedZone {
        id: "ZMOCK1".to_string(),
        name: "example.com".to_string(),
    });
    ctx.record_distribution(Distribution {
        id: "DMOCK1".to_string(),
        domain: "dmock1.cdn.mock.net".to_string(),
    });

    let err = binder.run(&mut ctx, &cloud).await.unwrap_err();
    assert!(matches!(err, Error::AliasConflict { name } if name == "www.example.com"));
    assert_eq!(cloud.record_writes(), 0);
}

#[tokio::test]
async fn test_rerun_after_success_leaves_alias_untouched() {
    let cloud = MockCloud::new().with_zone("example.com");
    let runner = ProvisionRunner::site();

    let first = runner.run(&site_config(), &cloud).await.unwrap();
    let writes_after_first = cloud.record_writes();

    // a second full run creates a fresh distribution, so the alias is
    // re-pointed rather than left stale
    let second = runner.run(&site_config(), &cloud).await.unwrap();
    assert_ne!(first.distribution_id, second.distribution_id);
    assert_eq!(cloud.record_writes(), writes_after_first + 1);
    assert_eq!(
        cloud.alias_target("www.example.com").as_deref(),
        Some(second.distribution_domain.as_str())
    );
}
