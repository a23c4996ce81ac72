//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Brokkr - Declarative static-site hosting provisioner
#[derive(Parser, Debug)]
#[command(name = "brokkr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to brokkr.yaml config file
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version(VersionArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Print the resolved provisioning order
    Plan(PlanArgs),

    /// Provision the hosting stack and deploy the site
    Provision(ProvisionArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// Version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Config commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a starter brokkr.yaml
    Init(ConfigInitArgs),

    /// Validate the configuration
    Validate,

    /// Show the resolved configuration
    Show,
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Apex domain that owns the hosted zone
    #[arg(long)]
    pub domain: String,

    /// Subdomain the site is served from
    #[arg(long, default_value = "www")]
    pub sub_domain: String,

    /// Directory containing the built site assets
    #[arg(long, default_value = "./site")]
    pub source: Utf8PathBuf,

    /// Output file path
    #[arg(short, long, default_value = "brokkr.yaml")]
    pub output: Utf8PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

// Plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Provision command
#[derive(Args, Debug)]
pub struct ProvisionArgs {
    /// Print the planned steps without calling the provider
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the provider prerequisite check
    #[arg(long)]
    pub skip_prerequisites: bool,
}

// Completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
