//! Provision command

use anyhow::Result;
use camino::Utf8Path;

use brokkr_cloud::{AwsCloud, CloudApi};
use brokkr_core::SiteConfig;
use brokkr_site::ProvisionRunner;

use crate::cli::ProvisionArgs;
use crate::output;

pub async fn run(args: ProvisionArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    // Load config
    let config = SiteConfig::load(config_path)?;
    let runner = ProvisionRunner::site();

    output::header(&format!("Provisioning {}", config.site_domain()));

    // Dry run
    if args.dry_run {
        let plan = runner.plan(&config)?;
        output::info("Dry run - would execute:");
        for step in &plan {
            output::kv(&step.step, &step.description);
        }
        return Ok(());
    }

    let cloud = AwsCloud::new();

    // Check prerequisites
    if !args.skip_prerequisites {
        let prereqs = cloud.check_prerequisites()?;
        if !prereqs.satisfied {
            output::error("Missing prerequisites:");
            for p in &prereqs.missing {
                output::kv(&p.name, &p.description);
                if let Some(hint) = &p.install_hint {
                    output::info(&format!("  Install: {}", hint));
                }
            }
            return Err(anyhow::anyhow!("Prerequisites not satisfied"));
        }
    }

    // Provision; certificate validation makes this the long part
    let spinner = output::spinner("Provisioning...");
    let result = runner.run(&config, &cloud).await;
    spinner.finish_and_clear();

    let outputs = result?;

    output::success("Provisioning complete");
    output::kv("Site", &outputs.site_url);
    output::kv("Bucket", &outputs.bucket);
    output::kv("Certificate", &outputs.certificate_arn);
    output::kv("Distribution", &outputs.distribution_id);
    output::kv("CDN domain", &outputs.distribution_domain);

    Ok(())
}
