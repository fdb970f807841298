use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "guardrails",
    version,
    about = "Generate Terraform guardrails for Azure Policy"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Load the policy catalog from a JSON file instead of the embedded one"
    )]
    pub catalog: Option<PathBuf>,
    #[arg(
        short = 'v',
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase log verbosity (-v info, -vv debug)"
    )]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate Terraform policy assignments for the selected guardrails
    GenerateTerraform(GenerateArgs),
    /// List every service in the catalog with its policy count
    ListServices,
    /// List policy display names, optionally narrowed by service or mode
    ListPolicies {
        #[arg(short, long, help = "Restrict to one service")]
        service: Option<String>,
        #[arg(long, help = "Only policies that take no parameters")]
        no_params: bool,
        #[arg(long, help = "Only policies where every parameter has a default")]
        params_optional: bool,
        #[arg(long, help = "Only policies with at least one mandatory parameter")]
        params_required: bool,
    },
    /// Show the full catalog record for one policy display name
    DescribePolicy { name: String },
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("parameter_mode").required(true).multiple(false)))]
#[command(group(ArgGroup::new("scope_target").required(true).multiple(false)))]
pub struct GenerateArgs {
    #[arg(
        short,
        long,
        default_value = "all",
        help = "Service supported by Azure Policy definitions, or 'all' for all policies"
    )]
    pub service: String,
    #[arg(
        long,
        value_name = "CSV",
        help = "Exclude specific services (comma-separated) without using a config file"
    )]
    pub exclude_services: Option<String>,
    #[arg(short, long, value_name = "PATH", help = "TOML exclusion config file")]
    pub config_file: Option<PathBuf>,
    #[arg(
        long,
        group = "parameter_mode",
        help = "Only generate policies that do NOT require parameters"
    )]
    pub no_params: bool,
    #[arg(
        long,
        group = "parameter_mode",
        help = "Only generate policies where parameters are OPTIONAL"
    )]
    pub params_optional: bool,
    #[arg(
        long,
        group = "parameter_mode",
        help = "Only generate policies where parameters are REQUIRED"
    )]
    pub params_required: bool,
    #[arg(
        long,
        group = "scope_target",
        value_name = "NAME",
        help = "The name of a subscription. Supply either this or --management-group"
    )]
    pub subscription: Option<String>,
    #[arg(
        long,
        group = "scope_target",
        value_name = "NAME",
        help = "The name of a management group. Supply either this or --subscription"
    )]
    pub management_group: Option<String>,
    #[arg(short, long, help = "Deny bad actions instead of auditing them")]
    pub enforce: bool,
    #[arg(
        short,
        long,
        help = "Do not generate markdown or CSV summary files alongside the Terraform output"
    )]
    pub no_summary: bool,
}
