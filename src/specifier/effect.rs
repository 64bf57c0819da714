// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Taint effects and toleration operators

use std::fmt;
use std::str::FromStr;

use super::error::{SpecifierError, SpecifierResult};

/// Scheduling effect of a taint (or the effect a toleration tolerates)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    NoSchedule,
    PreferNoSchedule,
    NoExecute,
}

impl Effect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::NoSchedule => "NoSchedule",
            Effect::PreferNoSchedule => "PreferNoSchedule",
            Effect::NoExecute => "NoExecute",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Effect {
    type Err = SpecifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_effect(s)
    }
}

/// Check an effect token against the supported set.
///
/// Matching is exact: `noschedule` is rejected just like an unknown token.
/// Callers only validate effects that were actually written, so an empty
/// token here is an error too.
pub fn validate_effect(effect: &str) -> SpecifierResult<Effect> {
    match effect {
        "NoSchedule" => Ok(Effect::NoSchedule),
        "PreferNoSchedule" => Ok(Effect::PreferNoSchedule),
        "NoExecute" => Ok(Effect::NoExecute),
        other => Err(SpecifierError::InvalidEffect(other.to_string())),
    }
}

/// Toleration comparison mode. `Equal` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operator {
    #[default]
    Equal,
    Exists,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "Equal",
            Operator::Exists => "Exists",
        }
    }

    /// Normalize an operator read from cluster data. Empty means `Equal`.
    pub fn from_inventory(operator: Option<&str>) -> SpecifierResult<Self> {
        match operator.unwrap_or_default() {
            "" | "Equal" => Ok(Operator::Equal),
            "Exists" => Ok(Operator::Exists),
            other => Err(SpecifierError::InvalidOperator(other.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
