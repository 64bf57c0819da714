// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Match / no-match filtering of a taint or toleration inventory

use std::collections::HashMap;

/// Identity of the object that owns a list of taints or tolerations.
/// Namespace and kind are opaque labels; nodes carry an empty namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceReference {
    pub namespace: String,
    pub name: String,
    pub kind: String,
}

impl ResourceReference {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            kind: kind.into(),
        }
    }
}

/// Resource identity -> its taints or tolerations, in cluster order
pub type Inventory<T> = HashMap<ResourceReference, Vec<T>>;

/// Whether resources are kept when the predicate matches or when it does not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// `--match`
    Match,
    /// `--no-match`
    NoMatch,
}

impl MatchMode {
    pub fn keep_on_match(&self) -> bool {
        matches!(self, MatchMode::Match)
    }
}

/// Keep the resources whose list matches (or does not match) `predicate`.
///
/// Every retained resource keeps its full original list. Elements are
/// compared in order; `hit` holds the last comparison made. With
/// `keep_on_match` the scan stops at the first equal element. Without it the
/// whole list is scanned and only the *last* element decides, so
/// `[predicate, other]` is still retained by a no-match filter. Empty lists
/// never match.
pub fn filter<T: PartialEq>(inventory: Inventory<T>, predicate: &T, keep_on_match: bool) -> Inventory<T> {
    inventory
        .into_iter()
        .filter(|(_, items)| {
            let mut hit = false;
            for item in items {
                hit = item == predicate;
                if keep_on_match && hit {
                    break;
                }
            }
            hit == keep_on_match
        })
        .collect()
}
