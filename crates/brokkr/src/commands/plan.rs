//! Plan command

use anyhow::Result;
use camino::Utf8Path;

use brokkr_core::SiteConfig;
use brokkr_site::ProvisionRunner;

use crate::cli::PlanArgs;
use crate::output;

pub fn run(args: PlanArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = SiteConfig::load(config_path)?;
    let runner = ProvisionRunner::site();
    let plan = runner.plan(&config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    output::header(&format!("Provisioning plan for {}", config.site_domain()));
    for (index, step) in plan.iter().enumerate() {
        output::kv(&format!("{}. {}", index + 1, step.step), &step.description);
    }
    Ok(())
}
