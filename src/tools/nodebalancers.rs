//! NodeBalancer tools.

use serde::Deserialize;
use serde_json::json;

use super::{
    body_from, object_schema, paged_schema, parse_args, PageArgs, RegistryError, ToolCategory,
    ToolRegistry,
};

#[derive(Debug, Deserialize)]
struct NodeBalancerId {
    id: u64,
}

fn nodebalancer_id_schema() -> serde_json::Value {
    object_schema(
        json!({
            "id": {
                "type": "integer",
                "description": "NodeBalancer ID"
            }
        }),
        &["id"],
    )
}

pub(super) fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(
        ToolCategory::NodeBalancers,
        "list_nodebalancers",
        "List NodeBalancers on the account.",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/nodebalancers", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::NodeBalancers,
        "get_nodebalancer",
        "Get details of a single NodeBalancer.",
        nodebalancer_id_schema(),
        |client, args| async move {
            let NodeBalancerId { id } = parse_args(args)?;
            client
                .get(&format!("/nodebalancers/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::NodeBalancers,
        "create_nodebalancer",
        "Create a NodeBalancer in a region.",
        object_schema(
            json!({
                "region": {"type": "string", "description": "Region ID, e.g. us-east"},
                "label": {"type": "string", "description": "Display label"},
                "client_conn_throttle": {
                    "type": "integer",
                    "description": "Connections per second per client IP (0 disables throttling)"
                },
                "tags": {"type": "array", "items": {"type": "string"}, "description": "Tags to apply"}
            }),
            &["region"],
        ),
        |client, args| async move {
            client
                .post("/nodebalancers", &body_from(args))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::NodeBalancers,
        "delete_nodebalancer",
        "Delete a NodeBalancer and all of its configs.",
        nodebalancer_id_schema(),
        |client, args| async move {
            let NodeBalancerId { id } = parse_args(args)?;
            client
                .delete(&format!("/nodebalancers/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    Ok(())
}
