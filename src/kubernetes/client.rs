use anyhow::{Context, Result, anyhow, bail};
use k8s_openapi::api::core::v1::Node;
use kube::api::{DynamicObject, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::discovery::{ApiCapabilities, ApiResource, Scope};
use kube::{Api, Client, Config};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::resources::{GroupVersionResource, build_inventory, extract_taints, extract_tolerations};
use crate::filter::Inventory;
use crate::specifier::{Taint, Toleration};

/// Timeout for connecting to K8s API
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for reading K8s API responses
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum retry attempts for transient failures
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (doubles each retry)
const RETRY_BASE_DELAY: Duration = Duration::from_millis(100);

/// Page size for paginated list requests
const PAGE_SIZE: u32 = 500;

/// Lists nodes and workloads and turns them into taint/toleration inventories
pub struct InventoryClient {
    client: Client,
}

impl InventoryClient {
    /// Connect using an explicit kubeconfig, or infer the configuration
    /// (in-cluster service account first, then the default kubeconfig)
    pub async fn connect(kubeconfig: Option<&Path>, context: Option<&str>) -> Result<Self> {
        let options = KubeConfigOptions {
            context: context.map(String::from),
            ..Default::default()
        };

        let mut config = match (kubeconfig, context) {
            (Some(path), _) => {
                let kubeconfig = Kubeconfig::read_from(path)
                    .with_context(|| format!("Failed to read kubeconfig: {}", path.display()))?;
                Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .with_context(|| format!("Failed to load kubeconfig: {}", path.display()))?
            }
            (None, Some(ctx)) => Config::from_kubeconfig(&options)
                .await
                .with_context(|| format!("Failed to load kubeconfig for context '{}'", ctx))?,
            (None, None) => Config::infer()
                .await
                .context("Failed to infer Kubernetes configuration")?,
        };

        // Set timeouts for reliability
        config.connect_timeout = Some(CONNECT_TIMEOUT);
        config.read_timeout = Some(READ_TIMEOUT);

        debug!(cluster_url = %config.cluster_url, "Creating Kubernetes client");
        let client = Client::try_from(config).context("Failed to create Kubernetes client")?;

        Ok(Self { client })
    }

    /// Taints of every node in the cluster
    pub async fn node_taints(&self) -> Result<Inventory<Taint>> {
        let ar = ApiResource::erase::<Node>(&());
        let api: Api<DynamicObject> = Api::all_with(self.client.clone(), &ar);

        let nodes = self.list_all(&api, &ar.plural).await?;
        info!(count = nodes.len(), "Listed nodes");

        build_inventory(&nodes, &ar.kind, extract_taints)
    }

    /// Pod template tolerations of every object of the given resource type.
    /// `None` lists across all namespaces.
    pub async fn resource_tolerations(
        &self,
        gvr: &GroupVersionResource,
        namespace: Option<&str>,
    ) -> Result<Inventory<Toleration>> {
        let (ar, caps) = self.resolve(gvr).await?;

        // Create API handle based on resource scope
        let (api, scope): (Api<DynamicObject>, &str) = if caps.scope == Scope::Namespaced {
            match namespace {
                Some(ns) => (Api::namespaced_with(self.client.clone(), ns, &ar), "namespaced"),
                None => (Api::all_with(self.client.clone(), &ar), "all-namespaces"),
            }
        } else {
            (Api::all_with(self.client.clone(), &ar), "cluster-scoped")
        };
        debug!(resource = %gvr, scope = %scope, namespace = ?namespace, "API scope");

        let objects = self.list_all(&api, &ar.plural).await?;
        info!(resource = %gvr, count = objects.len(), "Listed resources");

        build_inventory(&objects, &ar.kind, extract_tolerations)
    }

    /// Look up the API resource for a group/version/resource through discovery.
    /// The resource may be given by plural name or by kind.
    async fn resolve(&self, gvr: &GroupVersionResource) -> Result<(ApiResource, ApiCapabilities)> {
        if gvr.version.is_empty() {
            bail!(
                "Invalid apiVersion for '{}': expected <version> or <group>/<version>",
                gvr.resource
            );
        }

        let gv = kube::core::GroupVersion::gv(&gvr.group, &gvr.version);
        let group = kube::discovery::pinned_group(&self.client, &gv)
            .await
            .with_context(|| format!("Failed to discover API group '{}'", gvr.api_version()))?;

        group
            .recommended_resources()
            .into_iter()
            .find(|(ar, _)| ar.plural == gvr.resource || ar.kind.eq_ignore_ascii_case(&gvr.resource))
            .ok_or_else(|| {
                anyhow!(
                    "Resource '{}' not found in API group '{}'",
                    gvr.resource,
                    gvr.api_version()
                )
            })
    }

    /// List every object, following continue tokens
    async fn list_all(&self, api: &Api<DynamicObject>, resource: &str) -> Result<Vec<DynamicObject>> {
        let mut all_items: Vec<DynamicObject> = Vec::new();
        let mut continue_token: Option<String> = None;
        let mut page_count = 0u32;

        loop {
            let mut params = ListParams::default().limit(PAGE_SIZE);
            if let Some(ref token) = continue_token {
                params = params.continue_token(token);
            }

            let list = self.list_page_with_retry(api, &params, resource).await?;

            let items_count = list.items.len();
            all_items.extend(list.items);
            page_count += 1;

            match list.metadata.continue_ {
                Some(token) if !token.is_empty() => {
                    debug!(
                        resource = %resource,
                        page = page_count,
                        items_this_page = items_count,
                        total_so_far = all_items.len(),
                        "Fetched page, continuing"
                    );
                    continue_token = Some(token);
                }
                _ => break,
            }
        }

        Ok(all_items)
    }

    /// Fetch a single page with retry logic
    async fn list_page_with_retry(
        &self,
        api: &Api<DynamicObject>,
        params: &ListParams,
        resource: &str,
    ) -> Result<kube::api::ObjectList<DynamicObject>> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match api.list(params).await {
                Ok(list) => return Ok(list),
                Err(e) if is_retryable_error(&e) => {
                    let delay = RETRY_BASE_DELAY * 2u32.pow(attempt);
                    warn!(
                        resource = %resource,
                        attempt = attempt + 1,
                        max_attempts = MAX_RETRIES,
                        delay_ms = delay.as_millis(),
                        error = %e,
                        "Retryable error, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => {
                    debug!(resource = %resource, error = %e, "Non-retryable error");
                    return Err(anyhow!("K8s API error listing {}: {}", resource, e));
                }
            }
        }

        Err(anyhow!(
            "Failed to list {} after {} retries: {}",
            resource,
            MAX_RETRIES,
            last_error.map(|e| e.to_string()).unwrap_or_default()
        ))
    }
}

/// Transient failures: transport errors and 429/503/504 responses
fn is_retryable_error(err: &kube::Error) -> bool {
    match err {
        kube::Error::HyperError(_) => true,
        kube::Error::Api(api_err) => is_retryable_status(api_err.code),
        _ => false,
    }
}

fn is_retryable_status(code: u16) -> bool {
    matches!(code, 429 | 503 | 504)
}
