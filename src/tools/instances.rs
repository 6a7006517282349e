//! Compute instance tools.
//!
//! Wrappers over `/linode/instances` and the power-state actions. The
//! action endpoints (boot/reboot/shutdown) answer with an empty body on
//! success, which the client maps to `{}`.

use serde::Deserialize;
use serde_json::json;

use super::{
    body_from, object_schema, paged_schema, parse_args, PageArgs, RegistryError, ToolCategory,
    ToolRegistry,
};

#[derive(Debug, Deserialize)]
struct InstanceId {
    id: u64,
}

fn instance_id_schema() -> serde_json::Value {
    object_schema(
        json!({
            "id": {
                "type": "integer",
                "description": "Instance ID"
            }
        }),
        &["id"],
    )
}

pub(super) fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(
        ToolCategory::Instances,
        "list_instances",
        "List Linode instances on the account.",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/linode/instances", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Instances,
        "get_instance",
        "Get details of a single Linode instance.",
        instance_id_schema(),
        |client, args| async move {
            let InstanceId { id } = parse_args(args)?;
            client
                .get(&format!("/linode/instances/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Instances,
        "create_instance",
        "Create a new Linode instance. Requires a region and an instance type; \
         supply an image and root_pass to deploy a bootable disk.",
        object_schema(
            json!({
                "region": {"type": "string", "description": "Region ID, e.g. us-east"},
                "type": {"type": "string", "description": "Instance type ID, e.g. g6-standard-2"},
                "label": {"type": "string", "description": "Display label"},
                "image": {"type": "string", "description": "Image ID, e.g. linode/debian12"},
                "root_pass": {"type": "string", "description": "Root password for the deployed image"},
                "authorized_keys": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "SSH public keys to install for root"
                },
                "backups_enabled": {"type": "boolean", "description": "Enable the backup service"},
                "tags": {"type": "array", "items": {"type": "string"}, "description": "Tags to apply"}
            }),
            &["region", "type"],
        ),
        |client, args| async move {
            client
                .post("/linode/instances", &body_from(args))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Instances,
        "boot_instance",
        "Boot a powered-off Linode instance.",
        instance_id_schema(),
        |client, args| async move {
            let InstanceId { id } = parse_args(args)?;
            client
                .post(&format!("/linode/instances/{id}/boot"), &json!({}))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Instances,
        "reboot_instance",
        "Reboot a running Linode instance.",
        instance_id_schema(),
        |client, args| async move {
            let InstanceId { id } = parse_args(args)?;
            client
                .post(&format!("/linode/instances/{id}/reboot"), &json!({}))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Instances,
        "shutdown_instance",
        "Shut down a running Linode instance.",
        instance_id_schema(),
        |client, args| async move {
            let InstanceId { id } = parse_args(args)?;
            client
                .post(&format!("/linode/instances/{id}/shutdown"), &json!({}))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Instances,
        "delete_instance",
        "Delete a Linode instance. This is irreversible and destroys its disks.",
        instance_id_schema(),
        |client, args| async move {
            let InstanceId { id } = parse_args(args)?;
            client
                .delete(&format!("/linode/instances/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Instances,
        "list_instance_types",
        "List available Linode instance types with pricing and specs.",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/linode/types", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    Ok(())
}
