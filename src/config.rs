// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Run configuration for ttsum
//!
//! Built once from the parsed command line and passed by value into the
//! report pipeline. Nothing here changes after construction.

use anyhow::{Result, bail};
use std::path::PathBuf;

use crate::cli::{Args, Command, MatchArgs, OutputFormat};
use crate::filter::MatchMode;

/// A match expression together with the direction of the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchFilter {
    /// Taint or toleration specifier, parsed by the command that uses it
    pub expression: String,
    pub mode: MatchMode,
}

impl MatchFilter {
    /// Read `--match` / `--no-match`. Empty values count as not given.
    pub fn from_args(args: &MatchArgs) -> Result<Option<Self>> {
        let matched = args.match_expr.as_deref().filter(|s| !s.is_empty());
        let unmatched = args.no_match.as_deref().filter(|s| !s.is_empty());

        match (matched, unmatched) {
            (Some(_), Some(_)) => bail!("--match and --no-match are mutually exclusive arguments"),
            (Some(expression), None) => Ok(Some(Self {
                expression: expression.to_string(),
                mode: MatchMode::Match,
            })),
            (None, Some(expression)) => Ok(Some(Self {
                expression: expression.to_string(),
                mode: MatchMode::NoMatch,
            })),
            (None, None) => Ok(None),
        }
    }
}

/// ttsum configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Explicit kubeconfig path
    pub kubeconfig: Option<PathBuf>,
    /// Context override
    pub context: Option<String>,
    /// Namespace to list tolerations in, all namespaces when unset
    pub namespace: Option<String>,
    pub filter: Option<MatchFilter>,
    pub output: OutputFormat,
    pub no_headers: bool,
    pub verbose: bool,
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Self> {
        let (namespace, filter) = match &args.command {
            Command::Taints { filter } => (None, filter),
            Command::Tolerations {
                namespace, filter, ..
            } => (namespace.clone().filter(|ns| !ns.is_empty()), filter),
        };

        Ok(Self {
            kubeconfig: args.kubeconfig.clone(),
            context: args.context.clone(),
            namespace,
            filter: MatchFilter::from_args(filter)?,
            output: args.output,
            no_headers: args.no_headers,
            verbose: args.verbose,
        })
    }
}
