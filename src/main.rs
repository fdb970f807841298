use clap::Parser;
use std::process::ExitCode;

mod catalog;
mod cli;
mod commands;
mod domain;
mod services;

pub use catalog::{Catalog, GuardrailError, ParameterSpec, PolicyRecord};
pub use cli::{Cli, Commands, GenerateArgs};
pub use domain::models::*;
pub use services::compliance::*;
pub use services::config::*;
pub use services::output::*;
pub use services::render::*;
pub use services::selection::*;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, cli.json);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::embedded()?,
    };
    log::debug!("catalog loaded with {} policies", catalog.policies.len());

    match &cli.command {
        Commands::GenerateTerraform(args) => commands::handle_generate(cli, &catalog, args),
        _ => commands::handle_inventory(cli, &catalog),
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}
