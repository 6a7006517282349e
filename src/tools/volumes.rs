//! Block storage volume tools.

use serde::Deserialize;
use serde_json::json;

use super::{
    body_from, object_schema, paged_schema, parse_args, PageArgs, RegistryError, ToolCategory,
    ToolRegistry,
};

#[derive(Debug, Deserialize)]
struct VolumeId {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct AttachArgs {
    id: u64,
    linode_id: u64,
}

fn volume_id_schema() -> serde_json::Value {
    object_schema(
        json!({
            "id": {
                "type": "integer",
                "description": "Volume ID"
            }
        }),
        &["id"],
    )
}

pub(super) fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(
        ToolCategory::Volumes,
        "list_volumes",
        "List block storage volumes on the account.",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/volumes", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Volumes,
        "get_volume",
        "Get details of a single block storage volume.",
        volume_id_schema(),
        |client, args| async move {
            let VolumeId { id } = parse_args(args)?;
            client
                .get(&format!("/volumes/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Volumes,
        "create_volume",
        "Create a block storage volume, optionally attached to an instance.",
        object_schema(
            json!({
                "label": {"type": "string", "description": "Volume label"},
                "region": {"type": "string", "description": "Region ID (required unless linode_id is set)"},
                "size": {"type": "integer", "description": "Size in GB (default: 20)"},
                "linode_id": {"type": "integer", "description": "Instance to attach the new volume to"},
                "tags": {"type": "array", "items": {"type": "string"}, "description": "Tags to apply"}
            }),
            &["label"],
        ),
        |client, args| async move {
            client
                .post("/volumes", &body_from(args))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Volumes,
        "attach_volume",
        "Attach a volume to a Linode instance.",
        object_schema(
            json!({
                "id": {"type": "integer", "description": "Volume ID"},
                "linode_id": {"type": "integer", "description": "Instance to attach to"}
            }),
            &["id", "linode_id"],
        ),
        |client, args| async move {
            let AttachArgs { id, linode_id } = parse_args(args)?;
            client
                .post(
                    &format!("/volumes/{id}/attach"),
                    &json!({ "linode_id": linode_id }),
                )
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Volumes,
        "detach_volume",
        "Detach a volume from the instance it is attached to.",
        volume_id_schema(),
        |client, args| async move {
            let VolumeId { id } = parse_args(args)?;
            client
                .post(&format!("/volumes/{id}/detach"), &json!({}))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Volumes,
        "delete_volume",
        "Delete a block storage volume. The volume must be detached first.",
        volume_id_schema(),
        |client, args| async move {
            let VolumeId { id } = parse_args(args)?;
            client
                .delete(&format!("/volumes/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    Ok(())
}
