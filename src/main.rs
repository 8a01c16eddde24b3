mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, OutputArgs};
use kcse_fit::config::{self, CONFIG_FILE_NAME, LoadedConfig};
use kcse_fit::core::{self, report};
use kcse_fit::utils::fs as input;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    init_tracing();

    let exit_code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("KCSEFIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Mean(args) => {
            let loaded = load_config(&args.output)?;
            let profile = input::load_profile(&args.profile)?;
            let report = core::evaluate_profile(&profile, &loaded.config);
            emit(&args.output, &loaded, &report, report::print_profile)?;
            Ok(exit_code(report.exit.ok))
        }
        Commands::Validate(args) => {
            let loaded = load_config(&args.output)?;
            let profile = input::load_profile(&args.profile)?;
            let report = core::evaluate_profile(&profile, &loaded.config);
            emit(&args.output, &loaded, &report, report::print_profile)?;
            Ok(exit_code(report.exit.ok && report.validation.is_valid))
        }
        Commands::Fit(args) => {
            let loaded = load_config(&args.profile.output)?;
            let profile = input::load_profile(&args.profile.profile)?;
            let courses = input::load_courses(&args.courses)?;
            let group = args.group || loaded.config.shortlist.group;
            let report = core::evaluate_shortlist(&profile, &courses, &loaded.config, group);
            emit(&args.profile.output, &loaded, &report, report::print_shortlist)?;
            Ok(exit_code(report.exit.ok))
        }
        Commands::Browse(args) => {
            let loaded = load_config(&args.profile.output)?;
            let profile = input::load_profile(&args.profile.profile)?;
            let courses = input::load_courses(&args.courses)?;
            let report = core::evaluate_browse(&profile, &courses, &loaded.config, args.points);
            emit(&args.profile.output, &loaded, &report, report::print_browse)?;
            Ok(exit_code(report.exit.ok))
        }
        Commands::Catalog(args) => {
            let loaded = load_config(&args)?;
            let report = report::CatalogReport::build();
            emit(&args, &loaded, &report, report::print_catalog)?;
            Ok(0)
        }
        Commands::Init(args) => {
            if args.config.is_some() {
                eprintln!(
                    "warning: --config is ignored by `kcsefit init`; writing ./{}",
                    CONFIG_FILE_NAME
                );
            }

            let path = std::env::current_dir()?.join(CONFIG_FILE_NAME);
            config::write_default_config(&path)?;
            println!("created {}", path.display());
            Ok(0)
        }
    }
}

fn load_config(args: &OutputArgs) -> Result<LoadedConfig> {
    let cwd = std::env::current_dir()?;
    let loaded = config::load_config(args.config.as_deref(), &cwd)?;
    if let Some(source) = &loaded.source {
        debug!(path = %source.display(), "using config");
    }
    Ok(loaded)
}

fn emit<T: Serialize>(
    args: &OutputArgs,
    loaded: &LoadedConfig,
    report: &T,
    print_human: fn(&T),
) -> Result<()> {
    if args.json || loaded.config.general.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_human(report);
    }
    Ok(())
}

fn exit_code(ok: bool) -> i32 {
    if ok { 0 } else { 1 }
}
