//! Managed database tools.

use serde::Deserialize;
use serde_json::json;

use super::{
    object_schema, paged_schema, parse_args, PageArgs, RegistryError, ToolCategory, ToolRegistry,
};

#[derive(Debug, Deserialize)]
struct EngineId {
    id: String,
}

pub(super) fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(
        ToolCategory::Databases,
        "list_databases",
        "List managed database clusters of all engines on the account.",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/databases/instances", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Databases,
        "list_database_engines",
        "List available managed database engines and versions.",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/databases/engines", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Databases,
        "get_database_engine",
        "Get details of a single managed database engine version.",
        object_schema(
            json!({
                "id": {"type": "string", "description": "Engine ID, e.g. mysql/8.0.30"}
            }),
            &["id"],
        ),
        |client, args| async move {
            let EngineId { id } = parse_args(args)?;
            client
                .get(&format!("/databases/engines/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    Ok(())
}
