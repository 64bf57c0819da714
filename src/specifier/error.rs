// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use thiserror::Error;

/// Errors produced while reading taint and toleration specifiers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecifierError {
    /// Effect token outside NoSchedule / PreferNoSchedule / NoExecute
    #[error("invalid taint effect: {0}, unsupported taint effect")]
    InvalidEffect(String),

    /// Too many `:` or `=` separators. Carries the full message, including the input.
    #[error("{0}")]
    MalformedSpecifier(String),

    /// Toleration operator other than Equal / Exists in cluster data
    #[error("invalid toleration operator: {0}, unsupported operator")]
    InvalidOperator(String),
}

pub type SpecifierResult<T> = Result<T, SpecifierError>;
