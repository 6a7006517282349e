//! Longview monitoring client tools.

use serde::Deserialize;
use serde_json::json;

use super::{
    body_from, object_schema, paged_schema, parse_args, PageArgs, RegistryError, ToolCategory,
    ToolRegistry,
};

#[derive(Debug, Deserialize)]
struct ClientId {
    id: u64,
}

fn client_id_schema() -> serde_json::Value {
    object_schema(
        json!({
            "id": {
                "type": "integer",
                "description": "Longview client ID"
            }
        }),
        &["id"],
    )
}

pub(super) fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(
        ToolCategory::Longview,
        "list_longview_clients",
        "List Longview monitoring clients on the account.",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/longview/clients", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Longview,
        "get_longview_client",
        "Get details of a single Longview client, including its install code.",
        client_id_schema(),
        |client, args| async move {
            let ClientId { id } = parse_args(args)?;
            client
                .get(&format!("/longview/clients/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Longview,
        "create_longview_client",
        "Create a Longview client for monitoring a host.",
        object_schema(
            json!({
                "label": {"type": "string", "description": "Client label"}
            }),
            &[],
        ),
        |client, args| async move {
            client
                .post("/longview/clients", &body_from(args))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Longview,
        "delete_longview_client",
        "Delete a Longview client.",
        client_id_schema(),
        |client, args| async move {
            let ClientId { id } = parse_args(args)?;
            client
                .delete(&format!("/longview/clients/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    Ok(())
}
