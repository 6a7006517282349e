//! VPC and subnet tools.

use serde::Deserialize;
use serde_json::json;

use super::{
    body_from, object_schema, paged_schema, parse_args, PageArgs, RegistryError, ToolCategory,
    ToolRegistry,
};

#[derive(Debug, Deserialize)]
struct VpcId {
    id: u64,
}

fn vpc_id_schema() -> serde_json::Value {
    object_schema(
        json!({
            "id": {
                "type": "integer",
                "description": "VPC ID"
            }
        }),
        &["id"],
    )
}

pub(super) fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(
        ToolCategory::Vpcs,
        "list_vpcs",
        "List VPCs on the account.",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/vpcs", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Vpcs,
        "get_vpc",
        "Get details of a single VPC.",
        vpc_id_schema(),
        |client, args| async move {
            let VpcId { id } = parse_args(args)?;
            client.get(&format!("/vpcs/{id}")).await.map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Vpcs,
        "create_vpc",
        "Create a VPC, optionally with initial subnets.",
        object_schema(
            json!({
                "label": {"type": "string", "description": "VPC label"},
                "region": {"type": "string", "description": "Region ID, e.g. us-east"},
                "description": {"type": "string", "description": "Free-form description"},
                "subnets": {
                    "type": "array",
                    "description": "Initial subnets, each with a label and IPv4 range",
                    "items": {
                        "type": "object",
                        "properties": {
                            "label": {"type": "string"},
                            "ipv4": {"type": "string"}
                        },
                        "required": ["label", "ipv4"]
                    }
                }
            }),
            &["label", "region"],
        ),
        |client, args| async move {
            client
                .post("/vpcs", &body_from(args))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Vpcs,
        "delete_vpc",
        "Delete a VPC. All of its subnets must be empty.",
        vpc_id_schema(),
        |client, args| async move {
            let VpcId { id } = parse_args(args)?;
            client
                .delete(&format!("/vpcs/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Vpcs,
        "list_vpc_subnets",
        "List the subnets of a VPC.",
        vpc_id_schema(),
        |client, args| async move {
            let VpcId { id } = parse_args(args)?;
            client
                .get(&format!("/vpcs/{id}/subnets"))
                .await
                .map_err(Into::into)
        },
    )?;

    Ok(())
}
