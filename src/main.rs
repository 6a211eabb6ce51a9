//! kernel-meta - Main entry point
//!
//! Thin command-line wrapper around the resolver: reads a package snapshot,
//! prints metapackage names on stdout, logs to stderr.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use kernel_meta::cli::{Cli, Commands, InputArgs};
use kernel_meta::config_file::ResolverConfig;
use kernel_meta::package_db;
use kernel_meta::{KernelResolver, PackageRecord, Target};

/// Initialize logging. `RUST_LOG` wins over `--verbose`.
fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logger(cli.verbose);
    debug!("CLI arguments parsed");

    match cli.command {
        Commands::Validate { config } => {
            info!("Validating configuration file: {:?}", config);
            match ResolverConfig::load_from_file(&config).and_then(|c| c.validate()) {
                Ok(()) => println!("✓ Configuration file is valid: {}", config.display()),
                Err(e) => {
                    error!("Configuration validation failed: {:#}", e);
                    eprintln!("✗ Configuration validation failed: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::InitConfig { path, force } => {
            if path.exists() && !force {
                anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
            }
            ResolverConfig::default().save_to_file(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }
        Commands::Resolve {
            input,
            target,
            json,
        } => {
            let resolver = KernelResolver::new(load_config(cli.config.as_deref())?);
            let packages = load_packages(&input)?;
            run_resolve(&resolver, &packages, target, json)?;
        }
        Commands::Inspect { input, json } => {
            let resolver = KernelResolver::new(load_config(cli.config.as_deref())?);
            let packages = load_packages(&input)?;
            run_inspect(&resolver, &packages, json)?;
        }
        Commands::Snapshot { input, output } => {
            let packages = load_packages(&input)?;
            package_db::save_snapshot(&output, &packages)
                .with_context(|| format!("Failed to write snapshot to {}", output.display()))?;
            println!("Saved {} packages to {}", packages.len(), output.display());
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ResolverConfig> {
    let Some(path) = path else {
        return Ok(ResolverConfig::default());
    };

    let config = ResolverConfig::load_from_file(path)?;
    config
        .validate()
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;
    Ok(config)
}

fn load_packages(input: &InputArgs) -> Result<Vec<PackageRecord>> {
    let packages = if let Some(path) = &input.snapshot {
        package_db::load_snapshot(path)
            .with_context(|| format!("Failed to load snapshot {}", path.display()))?
    } else if let Some(path) = &input.dpkg_output {
        package_db::load_dpkg_output(path)
            .with_context(|| format!("Failed to load dpkg-query output {}", path.display()))?
    } else {
        package_db::query_dpkg().context("Failed to query the package database")?
    };

    debug!("Loaded {} package records", packages.len());
    Ok(packages)
}

fn run_resolve(
    resolver: &KernelResolver,
    packages: &[PackageRecord],
    target: Target,
    json: bool,
) -> Result<()> {
    let result = resolver.resolve(packages, target);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if target.wants_kernel() {
        println!("{}", result.kernel);
    }
    if target.wants_headers() {
        println!("{}", result.headers);
    }
    Ok(())
}

fn run_inspect(resolver: &KernelResolver, packages: &[PackageRecord], json: bool) -> Result<()> {
    let (reports, skipped) = resolver.inspect(packages);

    if json {
        let skipped: Vec<serde_json::Value> = skipped
            .iter()
            .map(|s| serde_json::json!({ "name": s.name, "reason": s.reason.to_string() }))
            .collect();
        let report = serde_json::json!({ "facts": reports, "skipped": skipped });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for report in &reports {
        let marker = if report.selected { "*" } else { " " };
        let version = report
            .fact
            .version
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "meta".to_string());
        println!(
            "{} {:<40} {:<12} {:<16} {}",
            marker, report.fact.name, version, report.fact.flavour, report.stack
        );
    }
    for s in &skipped {
        println!("  {:<40} skipped ({})", s.name, s.reason);
    }
    Ok(())
}
