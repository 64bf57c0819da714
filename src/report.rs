// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Turning a (filtered) inventory into display rows

use crate::filter::Inventory;
use crate::output::Report;
use crate::specifier::{Taint, Toleration, print_taints, print_tolerations};

/// `NAME, TAINTS`, one row per node, sorted by node name
pub fn taints_report(inventory: Inventory<Taint>) -> Report {
    let mut entries: Vec<_> = inventory.into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.name.cmp(&b.name));

    Report {
        columns: vec!["NAME".to_string(), "TAINTS".to_string()],
        rows: entries
            .into_iter()
            .map(|(reference, taints)| vec![reference.name, print_taints(&taints)])
            .collect(),
    }
}

/// `NAMESPACE, NAME, TOLERATIONS`, sorted by namespace then name
pub fn tolerations_report(inventory: Inventory<Toleration>) -> Report {
    let mut entries: Vec<_> = inventory.into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.namespace.cmp(&b.namespace).then_with(|| a.name.cmp(&b.name)));

    Report {
        columns: vec![
            "NAMESPACE".to_string(),
            "NAME".to_string(),
            "TOLERATIONS".to_string(),
        ],
        rows: entries
            .into_iter()
            .map(|(reference, tolerations)| {
                vec![
                    reference.namespace,
                    reference.name,
                    print_tolerations(&tolerations),
                ]
            })
            .collect(),
    }
}
