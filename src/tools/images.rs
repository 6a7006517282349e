//! Disk image tools.

use serde::Deserialize;
use serde_json::json;

use super::{
    object_schema, paged_schema, parse_args, PageArgs, RegistryError, ToolCategory, ToolRegistry,
};

#[derive(Debug, Deserialize)]
struct ImageId {
    id: String,
}

fn image_id_schema() -> serde_json::Value {
    object_schema(
        json!({
            "id": {
                "type": "string",
                "description": "Image ID, e.g. linode/debian12 or private/12345"
            }
        }),
        &["id"],
    )
}

pub(super) fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(
        ToolCategory::Images,
        "list_images",
        "List available disk images (public and private).",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/images", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Images,
        "get_image",
        "Get details of a single disk image.",
        image_id_schema(),
        |client, args| async move {
            let ImageId { id } = parse_args(args)?;
            client
                .get(&format!("/images/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Images,
        "delete_image",
        "Delete a private disk image.",
        image_id_schema(),
        |client, args| async move {
            let ImageId { id } = parse_args(args)?;
            client
                .delete(&format!("/images/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    Ok(())
}
