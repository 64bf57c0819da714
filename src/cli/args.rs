// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ttsum")]
#[command(author, version, about = "ttsum helps summarize tainted nodes and tolerating resources")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to kubeconfig. Defaults to in-cluster config, then the standard kubeconfig.
    #[arg(long, global = true, value_name = "PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// Kubernetes context to use instead of the kubeconfig's current context
    #[arg(long, global = true, value_name = "CONTEXT")]
    pub context: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Omit column headers in output
    #[arg(long, global = true)]
    pub no_headers: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Summarize taints for nodes, and whether they match a taint
    ///
    /// For example: ttsum taints --match dedicated=gpu:NoSchedule
    Taints {
        #[command(flatten)]
        filter: MatchArgs,
    },

    /// Summarize tolerations for a resource type
    ///
    /// For example: ttsum tolerations apps/v1 deployments --namespace kube-system
    Tolerations {
        /// API version of the resource, e.g. apps/v1 or v1
        api_version: String,

        /// Resource name, e.g. deployments or daemonsets
        resource: String,

        /// Target a specific namespace, defaults to all namespaces
        #[arg(short, long)]
        namespace: Option<String>,

        #[command(flatten)]
        filter: MatchArgs,
    },
}

/// `--match` / `--no-match` selectors shared by both commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct MatchArgs {
    /// Show resources with a match, in format Operator(key=value:effect) for
    /// tolerations or key=value:effect for taints
    #[arg(long = "match", value_name = "SPEC", conflicts_with = "no_match")]
    pub match_expr: Option<String>,

    /// Show resources without a match, same format as --match
    #[arg(long = "no-match", value_name = "SPEC")]
    pub no_match: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
    Yaml,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_parse_taints_with_match() {
        let args = Args::try_parse_from(["ttsum", "taints", "--match", "key=value:NoSchedule"]).unwrap();
        match args.command {
            Command::Taints { filter } => {
                assert_eq!(filter.match_expr.as_deref(), Some("key=value:NoSchedule"));
                assert!(filter.no_match.is_none());
            }
            _ => panic!("Expected taints command"),
        }
        assert_eq!(args.output, OutputFormat::Table);
    }

    #[test]
    fn test_parse_tolerations() {
        let args = Args::try_parse_from([
            "ttsum",
            "tolerations",
            "apps/v1",
            "deployments",
            "-n",
            "kube-system",
            "--no-match",
            "Exists(key4:NoSchedule)",
        ])
        .unwrap();
        match args.command {
            Command::Tolerations {
                api_version,
                resource,
                namespace,
                filter,
            } => {
                assert_eq!(api_version, "apps/v1");
                assert_eq!(resource, "deployments");
                assert_eq!(namespace.as_deref(), Some("kube-system"));
                assert_eq!(filter.no_match.as_deref(), Some("Exists(key4:NoSchedule)"));
            }
            _ => panic!("Expected tolerations command"),
        }
    }

    #[test]
    fn test_match_and_no_match_conflict() {
        let err = Args::try_parse_from(["ttsum", "taints", "--match", "a", "--no-match", "b"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_tolerations_requires_resource() {
        let err = Args::try_parse_from(["ttsum", "tolerations", "apps/v1"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let args = Args::try_parse_from([
            "ttsum",
            "taints",
            "--kubeconfig",
            "/tmp/kubeconfig",
            "-o",
            "json",
            "--no-headers",
            "-v",
        ])
        .unwrap();
        assert_eq!(args.kubeconfig, Some(PathBuf::from("/tmp/kubeconfig")));
        assert_eq!(args.output, OutputFormat::Json);
        assert!(args.no_headers);
        assert!(args.verbose);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
