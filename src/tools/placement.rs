//! Placement group tools.

use serde::Deserialize;
use serde_json::json;

use super::{
    body_from, object_schema, paged_schema, parse_args, PageArgs, RegistryError, ToolCategory,
    ToolRegistry,
};

#[derive(Debug, Deserialize)]
struct GroupId {
    id: u64,
}

fn group_id_schema() -> serde_json::Value {
    object_schema(
        json!({
            "id": {
                "type": "integer",
                "description": "Placement group ID"
            }
        }),
        &["id"],
    )
}

pub(super) fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(
        ToolCategory::Placement,
        "list_placement_groups",
        "List placement groups on the account.",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/placement/groups", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Placement,
        "get_placement_group",
        "Get details of a single placement group.",
        group_id_schema(),
        |client, args| async move {
            let GroupId { id } = parse_args(args)?;
            client
                .get(&format!("/placement/groups/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Placement,
        "create_placement_group",
        "Create a placement group controlling how instances spread across hosts.",
        object_schema(
            json!({
                "label": {"type": "string", "description": "Group label"},
                "region": {"type": "string", "description": "Region ID, e.g. us-east"},
                "placement_group_type": {
                    "type": "string",
                    "description": "Spread policy: anti_affinity:local or affinity:local"
                },
                "placement_group_policy": {
                    "type": "string",
                    "description": "Enforcement: strict or flexible"
                }
            }),
            &["label", "region", "placement_group_type"],
        ),
        |client, args| async move {
            client
                .post("/placement/groups", &body_from(args))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Placement,
        "delete_placement_group",
        "Delete a placement group. It must contain no instances.",
        group_id_schema(),
        |client, args| async move {
            let GroupId { id } = parse_args(args)?;
            client
                .delete(&format!("/placement/groups/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    Ok(())
}
