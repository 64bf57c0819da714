// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use std::fmt;

use super::{Body, Effect, SpecifierResult, parse_body, print_entries, write_body};

/// Node-side exclusion marker
#[derive(Debug, Clone, Default, Eq)]
pub struct Taint {
    pub key: String,
    pub value: String,
    /// `None` only when a specifier left the effect out
    pub effect: Option<Effect>,
}

impl Taint {
    pub fn new(key: impl Into<String>, value: impl Into<String>, effect: Option<Effect>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            effect,
        }
    }
}

impl PartialEq for Taint {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value && self.effect == other.effect
    }
}

/// Renders `key[=value][:effect]`
impl fmt::Display for Taint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_body(f, &self.key, &self.value, self.effect)
    }
}

/// Parse a taint specifier: `key[=value][:effect]`
pub fn parse_taint(text: &str) -> SpecifierResult<Taint> {
    let Body { key, value, effect } = parse_body(text, "taint", text)?;
    Ok(Taint::new(key, value, effect))
}

/// Render a node's taints for display, `none` when there are none
pub fn print_taints(taints: &[Taint]) -> String {
    print_entries(taints)
}
