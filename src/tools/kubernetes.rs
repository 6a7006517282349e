//! LKE (Linode Kubernetes Engine) tools.

use serde::Deserialize;
use serde_json::json;

use super::{
    body_from, object_schema, paged_schema, parse_args, PageArgs, RegistryError, ToolCategory,
    ToolRegistry,
};

#[derive(Debug, Deserialize)]
struct ClusterId {
    id: u64,
}

fn cluster_id_schema() -> serde_json::Value {
    object_schema(
        json!({
            "id": {
                "type": "integer",
                "description": "LKE cluster ID"
            }
        }),
        &["id"],
    )
}

pub(super) fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(
        ToolCategory::Kubernetes,
        "list_kubernetes_clusters",
        "List LKE clusters on the account.",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/lke/clusters", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Kubernetes,
        "get_kubernetes_cluster",
        "Get details of a single LKE cluster.",
        cluster_id_schema(),
        |client, args| async move {
            let ClusterId { id } = parse_args(args)?;
            client
                .get(&format!("/lke/clusters/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Kubernetes,
        "create_kubernetes_cluster",
        "Create an LKE cluster with one or more node pools.",
        object_schema(
            json!({
                "label": {"type": "string", "description": "Cluster label"},
                "region": {"type": "string", "description": "Region ID, e.g. us-east"},
                "k8s_version": {"type": "string", "description": "Kubernetes version, e.g. 1.31"},
                "node_pools": {
                    "type": "array",
                    "description": "Node pools, each with a type and count",
                    "items": {
                        "type": "object",
                        "properties": {
                            "type": {"type": "string"},
                            "count": {"type": "integer"}
                        },
                        "required": ["type", "count"]
                    }
                },
                "tags": {"type": "array", "items": {"type": "string"}, "description": "Tags to apply"}
            }),
            &["label", "region", "k8s_version", "node_pools"],
        ),
        |client, args| async move {
            client
                .post("/lke/clusters", &body_from(args))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Kubernetes,
        "delete_kubernetes_cluster",
        "Delete an LKE cluster and all of its node pools.",
        cluster_id_schema(),
        |client, args| async move {
            let ClusterId { id } = parse_args(args)?;
            client
                .delete(&format!("/lke/clusters/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Kubernetes,
        "list_kubernetes_node_pools",
        "List the node pools of an LKE cluster.",
        cluster_id_schema(),
        |client, args| async move {
            let ClusterId { id } = parse_args(args)?;
            client
                .get(&format!("/lke/clusters/{id}/pools"))
                .await
                .map_err(Into::into)
        },
    )?;

    Ok(())
}
