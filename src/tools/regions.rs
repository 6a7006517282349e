//! Datacenter region tools.

use serde::Deserialize;
use serde_json::json;

use super::{
    object_schema, paged_schema, parse_args, PageArgs, RegistryError, ToolCategory, ToolRegistry,
};

#[derive(Debug, Deserialize)]
struct RegionId {
    id: String,
}

pub(super) fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(
        ToolCategory::Regions,
        "list_regions",
        "List available datacenter regions and their capabilities.",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/regions", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Regions,
        "get_region",
        "Get details of a single datacenter region.",
        object_schema(
            json!({
                "id": {"type": "string", "description": "Region ID, e.g. us-east"}
            }),
            &["id"],
        ),
        |client, args| async move {
            let RegionId { id } = parse_args(args)?;
            client
                .get(&format!("/regions/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    Ok(())
}
