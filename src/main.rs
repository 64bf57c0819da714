// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

mod cli;
mod config;
mod filter;
mod kubernetes;
mod output;
mod progress;
mod report;
mod specifier;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::prelude::*;

use cli::{Args, Command};
use config::Config;
use filter::{Inventory, MatchMode};
use kubernetes::{GroupVersionResource, InventoryClient};
use output::Report;
use specifier::{SpecifierResult, parse_taint, parse_toleration};

/// Initialize logging to stderr, keeping stdout for the report
fn init_logging(verbose: bool) {
    let filter = if verbose { "ttsum=debug" } else { "ttsum=warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (aws-lc-rs)
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install rustls crypto provider"))?;

    let args = Args::parse();
    let config = Config::from_args(&args)?;
    init_logging(config.verbose);
    match args.command {
        Command::Taints { .. } => run_taints(config).await,
        Command::Tolerations {
            api_version,
            resource,
            ..
        } => {
            let gvr = GroupVersionResource::parse(&api_version, &resource);
            run_tolerations(config, gvr).await
        }
    }
}

/// Parse the configured match expression into a predicate, if any
fn parse_predicate<T>(
    config: &Config,
    parse: fn(&str) -> SpecifierResult<T>,
) -> Result<Option<(T, MatchMode)>> {
    config
        .filter
        .as_ref()
        .map(|filter| {
            let predicate = parse(&filter.expression)
                .with_context(|| format!("Invalid match expression '{}'", filter.expression))?;
            debug!(expression = %filter.expression, mode = ?filter.mode, "Parsed match expression");
            Ok((predicate, filter.mode))
        })
        .transpose()
}

fn apply_predicate<T: PartialEq>(
    inventory: Inventory<T>,
    predicate: Option<(T, MatchMode)>,
) -> Inventory<T> {
    match predicate {
        Some((predicate, mode)) => {
            let total = inventory.len();
            let filtered = filter::filter(inventory, &predicate, mode.keep_on_match());
            info!(total, retained = filtered.len(), mode = ?mode, "Applied match filter");
            filtered
        }
        None => inventory,
    }
}

fn print_report(config: &Config, report: &Report) {
    if report.is_empty() {
        debug!("No resources to report");
    }
    println!("{}", report.format(config.output, config.no_headers));
}

async fn run_taints(config: Config) -> Result<()> {
    // Validate the expression before touching the cluster
    let predicate = parse_predicate(&config, parse_taint)?;

    let spinner = progress::create_spinner("Listing nodes...");
    let client = InventoryClient::connect(config.kubeconfig.as_deref(), config.context.as_deref()).await;
    let inventory = match client {
        Ok(client) => client.node_taints().await,
        Err(e) => Err(e),
    };
    spinner.finish_and_clear();

    let inventory = apply_predicate(inventory?, predicate);
    print_report(&config, &report::taints_report(inventory));
    Ok(())
}

async fn run_tolerations(config: Config, gvr: GroupVersionResource) -> Result<()> {
    let predicate = parse_predicate(&config, parse_toleration)?;

    let spinner = progress::create_spinner(&format!("Listing {}...", gvr.resource));
    let client = InventoryClient::connect(config.kubeconfig.as_deref(), config.context.as_deref()).await;
    let inventory = match client {
        Ok(client) => {
            client
                .resource_tolerations(&gvr, config.namespace.as_deref())
                .await
        }
        Err(e) => Err(e),
    };
    spinner.finish_and_clear();

    let inventory = apply_predicate(inventory?, predicate);
    print_report(&config, &report::tolerations_report(inventory));
    Ok(())
}
