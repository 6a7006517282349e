//! StackScript tools.

use serde::Deserialize;
use serde_json::json;

use super::{
    body_from, object_schema, paged_schema, parse_args, PageArgs, RegistryError, ToolCategory,
    ToolRegistry,
};

#[derive(Debug, Deserialize)]
struct StackScriptId {
    id: u64,
}

fn stackscript_id_schema() -> serde_json::Value {
    object_schema(
        json!({
            "id": {
                "type": "integer",
                "description": "StackScript ID"
            }
        }),
        &["id"],
    )
}

pub(super) fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(
        ToolCategory::StackScripts,
        "list_stackscripts",
        "List StackScripts visible to the account.",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/linode/stackscripts", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::StackScripts,
        "get_stackscript",
        "Get details of a single StackScript, including its script body.",
        stackscript_id_schema(),
        |client, args| async move {
            let StackScriptId { id } = parse_args(args)?;
            client
                .get(&format!("/linode/stackscripts/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::StackScripts,
        "create_stackscript",
        "Create a StackScript for deploying configured instances.",
        object_schema(
            json!({
                "label": {"type": "string", "description": "StackScript label"},
                "script": {"type": "string", "description": "The script body, starting with a shebang"},
                "images": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Image IDs the script may deploy onto"
                },
                "description": {"type": "string", "description": "What the script does"},
                "is_public": {"type": "boolean", "description": "Publish to the public library"}
            }),
            &["label", "script", "images"],
        ),
        |client, args| async move {
            client
                .post("/linode/stackscripts", &body_from(args))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::StackScripts,
        "delete_stackscript",
        "Delete a private StackScript.",
        stackscript_id_schema(),
        |client, args| async move {
            let StackScriptId { id } = parse_args(args)?;
            client
                .delete(&format!("/linode/stackscripts/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    Ok(())
}
