// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Resource addressing and taint/toleration extraction
//!
//! Objects are listed as `DynamicObject`s, so the taint and toleration lists
//! are read from the untyped JSON body at fixed paths, deserialized into the
//! k8s-openapi types and normalized into the specifier types.

use std::fmt;

use anyhow::{Context, Result};
use k8s_openapi::api::core::v1 as corev1;
use kube::api::DynamicObject;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::trace;

use crate::filter::{Inventory, ResourceReference};
use crate::specifier::{Effect, Operator, SpecifierResult, Taint, Toleration, validate_effect};

/// Node taints
pub const TAINT_PATH: &[&str] = &["spec", "taints"];

/// Pod template tolerations of workload controllers
pub const TOLERATION_PATH: &[&str] = &["spec", "template", "spec", "tolerations"];

/// Resource type addressed by `apiVersion` + plural resource name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupVersionResource {
    /// Empty for the core group
    pub group: String,
    pub version: String,
    pub resource: String,
}

impl GroupVersionResource {
    /// Build from an `apiVersion` string and a resource name.
    ///
    /// - `"apps/v1", "deployments"` -> group `apps`, version `v1`
    /// - `"v1", "pods"` -> core group, version `v1`
    ///
    /// Any other shape leaves group and version empty; resolution against
    /// the cluster rejects it later.
    pub fn parse(api_version: &str, resource: &str) -> Self {
        let parts: Vec<&str> = api_version.split('/').collect();
        let (group, version) = match parts.as_slice() {
            [version] => ("", *version),
            [group, version] => (*group, *version),
            _ => ("", ""),
        };
        Self {
            group: group.to_string(),
            version: version.to_string(),
            resource: resource.to_string(),
        }
    }

    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for GroupVersionResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.api_version(), self.resource)
    }
}

/// Follow `path` through nested objects and return the array at its end.
/// A missing field or a non-array value yields `None`.
fn nested_slice<'a>(object: &'a Value, path: &[&str]) -> Option<&'a Vec<Value>> {
    path.iter()
        .try_fold(object, |current, field| current.get(field))?
        .as_array()
}

/// Deserialize every entry of the array at `path`, then normalize it
fn extract<A, T>(
    object: &Value,
    path: &[&str],
    normalize: fn(A) -> SpecifierResult<T>,
) -> Result<Vec<T>>
where
    A: DeserializeOwned,
{
    let Some(entries) = nested_slice(object, path) else {
        trace!(path = %path.join("."), "Field not present, treating as empty");
        return Ok(Vec::new());
    };

    entries
        .iter()
        .map(|entry| {
            let raw: A = serde_json::from_value(entry.clone())
                .with_context(|| format!("Failed to decode {} entry: {}", path.join("."), entry))?;
            Ok(normalize(raw)?)
        })
        .collect()
}

fn effect_from_api(effect: &str) -> SpecifierResult<Option<Effect>> {
    if effect.is_empty() {
        Ok(None)
    } else {
        validate_effect(effect).map(Some)
    }
}

/// Normalize a k8s-openapi taint
pub fn taint_from_api(taint: corev1::Taint) -> SpecifierResult<Taint> {
    let effect = effect_from_api(&taint.effect)?;
    Ok(Taint::new(taint.key, taint.value.unwrap_or_default(), effect))
}

/// Normalize a k8s-openapi toleration. An empty operator becomes `Equal`.
pub fn toleration_from_api(toleration: corev1::Toleration) -> SpecifierResult<Toleration> {
    let operator = Operator::from_inventory(toleration.operator.as_deref())?;
    let effect = effect_from_api(toleration.effect.as_deref().unwrap_or_default())?;
    Ok(Toleration::new(
        operator,
        toleration.key.unwrap_or_default(),
        toleration.value.unwrap_or_default(),
        effect,
    ))
}

/// Read the taints of a node body (`spec.taints`)
pub fn extract_taints(object: &Value) -> Result<Vec<Taint>> {
    extract(object, TAINT_PATH, taint_from_api)
}

/// Read the pod template tolerations of a workload body (`spec.template.spec.tolerations`)
pub fn extract_tolerations(object: &Value) -> Result<Vec<Toleration>> {
    extract(object, TOLERATION_PATH, toleration_from_api)
}

/// Identity of a listed object. List responses do not carry a kind per item,
/// so the resolved kind is passed in.
pub fn reference_for(object: &DynamicObject, kind: &str) -> ResourceReference {
    ResourceReference::new(
        object.metadata.namespace.clone().unwrap_or_default(),
        object.metadata.name.clone().unwrap_or_default(),
        kind,
    )
}

/// Build the inventory for a listing. Every object gets an entry, even when
/// it carries no taints or tolerations.
pub fn build_inventory<T>(
    objects: &[DynamicObject],
    kind: &str,
    extract: fn(&Value) -> Result<Vec<T>>,
) -> Result<Inventory<T>> {
    objects
        .iter()
        .map(|object| {
            let reference = reference_for(object, kind);
            let items = extract(&object.data)
                .with_context(|| format!("Failed to read {} '{}'", kind, reference.name))?;
            Ok((reference, items))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specifier::SpecifierError;
    use kube::discovery::ApiResource;
    use serde_json::json;

    fn deployment_resource() -> ApiResource {
        ApiResource::erase::<k8s_openapi::api::apps::v1::Deployment>(&())
    }

    fn node_resource() -> ApiResource {
        ApiResource::erase::<corev1::Node>(&())
    }

    fn deployment(namespace: &str, name: &str, tolerations: Value) -> DynamicObject {
        DynamicObject::new(name, &deployment_resource())
            .within(namespace)
            .data(json!({ "spec": { "template": { "spec": { "tolerations": tolerations } } } }))
    }

    fn node(name: &str, taints: Value) -> DynamicObject {
        DynamicObject::new(name, &node_resource()).data(json!({ "spec": { "taints": taints } }))
    }

    #[test]
    fn test_parse_group_version() {
        let gvr = GroupVersionResource::parse("apps/v1", "deployments");
        assert_eq!(gvr.group, "apps");
        assert_eq!(gvr.version, "v1");
        assert_eq!(gvr.resource, "deployments");
        assert_eq!(gvr.api_version(), "apps/v1");
    }

    #[test]
    fn test_parse_core_version() {
        let gvr = GroupVersionResource::parse("v1", "deployments");
        assert_eq!(
            gvr,
            GroupVersionResource {
                group: String::new(),
                version: "v1".to_string(),
                resource: "deployments".to_string(),
            }
        );
        assert_eq!(gvr.to_string(), "v1 deployments");
    }

    #[test]
    fn test_parse_too_many_slashes() {
        let gvr = GroupVersionResource::parse("a/b/c", "things");
        assert!(gvr.group.is_empty());
        assert!(gvr.version.is_empty());
        assert_eq!(gvr.resource, "things");
    }

    #[test]
    fn test_nested_slice() {
        let value = json!({ "spec": { "taints": [1, 2] } });
        assert_eq!(nested_slice(&value, TAINT_PATH).map(Vec::len), Some(2));
        assert!(nested_slice(&value, TOLERATION_PATH).is_none());
        assert!(nested_slice(&json!({ "spec": { "taints": "x" } }), TAINT_PATH).is_none());
    }

    #[test]
    fn test_extract_taints() {
        let body = json!({ "spec": { "taints": [
            { "key": "key", "value": "value", "effect": "NoSchedule" },
            { "key": "key2", "effect": "NoExecute", "timeAdded": "2024-01-01T00:00:00Z" },
        ] } });
        let taints = extract_taints(&body).unwrap();
        assert_eq!(
            taints,
            vec![
                Taint::new("key", "value", Some(Effect::NoSchedule)),
                Taint::new("key2", "", Some(Effect::NoExecute)),
            ]
        );
    }

    #[test]
    fn test_extract_taints_missing_path() {
        assert!(extract_taints(&json!({ "spec": {} })).unwrap().is_empty());
        assert!(extract_taints(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_extract_taints_unknown_effect() {
        let body = json!({ "spec": { "taints": [ { "key": "k", "effect": "Sometimes" } ] } });
        let err = extract_taints(&body).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SpecifierError>(),
            Some(&SpecifierError::InvalidEffect("Sometimes".to_string()))
        );
    }

    #[test]
    fn test_extract_taints_malformed_entry() {
        let body = json!({ "spec": { "taints": [ "not-an-object" ] } });
        let err = extract_taints(&body).unwrap_err();
        assert!(err.to_string().contains("spec.taints"));
    }

    #[test]
    fn test_extract_tolerations_defaults_operator() {
        let body = json!({ "spec": { "template": { "spec": { "tolerations": [
            { "key": "key3", "value": "value", "effect": "NoSchedule" },
            { "key": "key4", "operator": "Exists", "effect": "NoSchedule" },
            { "operator": "Exists" },
            { "key": "key5", "operator": "", "value": "v", "tolerationSeconds": 300 },
        ] } } } });
        let tolerations = extract_tolerations(&body).unwrap();
        assert_eq!(
            tolerations,
            vec![
                Toleration::new(Operator::Equal, "key3", "value", Some(Effect::NoSchedule)),
                Toleration::new(Operator::Exists, "key4", "", Some(Effect::NoSchedule)),
                Toleration::new(Operator::Exists, "", "", None),
                Toleration::new(Operator::Equal, "key5", "v", None),
            ]
        );
    }

    #[test]
    fn test_extract_tolerations_unknown_operator() {
        let body = json!({ "spec": { "template": { "spec": { "tolerations": [
            { "key": "k", "operator": "Contains" },
        ] } } } });
        let err = extract_tolerations(&body).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SpecifierError>(),
            Some(&SpecifierError::InvalidOperator("Contains".to_string()))
        );
    }

    #[test]
    fn test_build_toleration_inventory() {
        let objects = vec![
            deployment(
                "kube-system",
                "coredns",
                json!([
                    { "key": "key", "value": "value", "effect": "NoSchedule", "operator": "Equal" },
                    { "key": "key2", "value": "value2", "effect": "NoSchedule", "operator": "Exists" },
                ]),
            ),
            DynamicObject::new("nginx", &deployment_resource())
                .within("kube-system")
                .data(json!({ "spec": { "replicas": 1 } })),
        ];

        let inventory = build_inventory(&objects, "Deployment", extract_tolerations).unwrap();
        assert_eq!(inventory.len(), 2);
        assert_eq!(
            inventory[&ResourceReference::new("kube-system", "coredns", "Deployment")],
            vec![
                Toleration::new(Operator::Equal, "key", "value", Some(Effect::NoSchedule)),
                Toleration::new(Operator::Exists, "key2", "value2", Some(Effect::NoSchedule)),
            ]
        );
        assert!(inventory[&ResourceReference::new("kube-system", "nginx", "Deployment")].is_empty());
    }

    #[test]
    fn test_build_taint_inventory() {
        let objects = vec![
            node(
                "ip-1-2-3-4.ec2.internal",
                json!([{ "key": "key", "value": "value", "effect": "NoSchedule" }]),
            ),
            DynamicObject::new("ip-1-2-3-5.ec2.internal", &node_resource()).data(json!({})),
        ];

        let inventory = build_inventory(&objects, "Node", extract_taints).unwrap();
        assert_eq!(
            inventory[&ResourceReference::new("", "ip-1-2-3-4.ec2.internal", "Node")],
            vec![Taint::new("key", "value", Some(Effect::NoSchedule))]
        );
        assert!(inventory[&ResourceReference::new("", "ip-1-2-3-5.ec2.internal", "Node")].is_empty());
    }

    #[test]
    fn test_build_inventory_names_failing_object() {
        let objects = vec![node("bad-node", json!([{ "key": "k", "effect": "Nope" }]))];
        let err = build_inventory(&objects, "Node", extract_taints).unwrap_err();
        assert!(err.to_string().contains("bad-node"));
    }
}
