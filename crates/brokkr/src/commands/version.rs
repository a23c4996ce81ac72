//! Version command

use anyhow::Result;

use crate::cli::VersionArgs;

pub fn run(args: VersionArgs) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let build_date = env!("BUILD_DATE");
    let git_sha = option_env!("GIT_SHA").unwrap_or("unknown");

    if args.json {
        println!(
            "{}",
            serde_json::json!({
                "version": version,
                "build_date": build_date,
                "git_sha": git_sha,
            })
        );
    } else {
        println!("brokkr {version} ({git_sha} {build_date})");
    }
    Ok(())
}
