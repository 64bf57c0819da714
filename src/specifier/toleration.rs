// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use std::fmt;

use super::{Body, Effect, Operator, SpecifierResult, parse_body, print_entries, write_body};

/// Workload-side acceptance of a matching taint
#[derive(Debug, Clone, Default, Eq)]
pub struct Toleration {
    pub key: String,
    pub value: String,
    pub effect: Option<Effect>,
    pub operator: Operator,
}

impl Toleration {
    pub fn new(
        operator: Operator,
        key: impl Into<String>,
        value: impl Into<String>,
        effect: Option<Effect>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            effect,
            operator,
        }
    }
}

/// Operator is part of the comparison. Both sides hold a normalized
/// `Operator`, so an unset operator always compares as `Equal`.
impl PartialEq for Toleration {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.value == other.value
            && self.effect == other.effect
            && self.operator == other.operator
    }
}

/// Renders `Operator(key[=value][:effect])`
impl fmt::Display for Toleration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.operator)?;
        write_body(f, &self.key, &self.value, self.effect)?;
        f.write_str(")")
    }
}

/// Split `Operator(body)` into the operator keyword and the body.
///
/// Finds the first `(`, then the first `)`. Anything else (no parens, a
/// single paren, `)` ahead of `(`) is not a wrapper and yields `None`.
fn split_operator(text: &str) -> Option<(&str, &str)> {
    let open = text.find('(')?;
    let close = text.find(')')?;
    if close < open {
        return None;
    }
    Some((&text[..open], &text[open + 1..close]))
}

/// Parse a toleration specifier: `[Operator(]key[=value][:effect][)]`
///
/// Only `Exists` (any case) changes the operator; other keywords are
/// accepted and leave the default `Equal`.
pub fn parse_toleration(text: &str) -> SpecifierResult<Toleration> {
    let (operator, inner) = match split_operator(text) {
        Some((outer, inner)) if outer.trim().eq_ignore_ascii_case(Operator::Exists.as_str()) => {
            (Operator::Exists, inner)
        }
        Some((_, inner)) => (Operator::Equal, inner),
        None => (Operator::default(), text),
    };

    let Body { key, value, effect } = parse_body(inner, "toleration", text)?;
    Ok(Toleration::new(operator, key, value, effect))
}

/// Render a workload's tolerations for display, `none` when there are none
pub fn print_tolerations(tolerations: &[Toleration]) -> String {
    print_entries(tolerations)
}
