//! Config command

use anyhow::Result;
use camino::Utf8Path;

use brokkr_core::SiteConfig;

use crate::cli::{ConfigCommands, ConfigInitArgs};
use crate::output;

pub fn run(args: ConfigCommands, config_path: Option<&Utf8Path>) -> Result<()> {
    match args {
        ConfigCommands::Init(args) => init(args),
        ConfigCommands::Validate => validate(config_path),
        ConfigCommands::Show => show(config_path),
    }
}

fn init(args: ConfigInitArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "{} already exists (use --force to overwrite)",
            args.output
        ));
    }

    let config = SiteConfig {
        domain_name: args.domain,
        site_sub_domain: args.sub_domain,
        source: args.source,
        error_page: "/error.html".to_string(),
    };
    config.validate()?;

    std::fs::write(&args.output, serde_yaml_ng::to_string(&config)?)?;
    output::success(&format!("Wrote {}", args.output));
    output::info(&format!(
        "Site will be served at https://{}",
        config.site_domain()
    ));
    Ok(())
}

fn validate(config_path: Option<&Utf8Path>) -> Result<()> {
    let config = SiteConfig::load(config_path)?;
    output::success(&format!("Configuration valid for {}", config.site_domain()));
    Ok(())
}

fn show(config_path: Option<&Utf8Path>) -> Result<()> {
    let config = SiteConfig::load(config_path)?;
    print!("{}", serde_yaml_ng::to_string(&config)?);
    Ok(())
}
