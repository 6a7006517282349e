//! Account tag tools. Tags are addressed by label, not by numeric id.

use serde::Deserialize;
use serde_json::json;

use super::{
    body_from, object_schema, paged_schema, parse_args, PageArgs, RegistryError, ToolCategory,
    ToolRegistry,
};

#[derive(Debug, Deserialize)]
struct TagLabel {
    label: String,
}

pub(super) fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(
        ToolCategory::Tags,
        "list_tags",
        "List tags on the account.",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/tags", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Tags,
        "create_tag",
        "Create a tag, optionally attaching it to existing resources.",
        object_schema(
            json!({
                "label": {"type": "string", "description": "Tag label"},
                "linodes": {
                    "type": "array",
                    "items": {"type": "integer"},
                    "description": "Instance IDs to tag"
                },
                "volumes": {
                    "type": "array",
                    "items": {"type": "integer"},
                    "description": "Volume IDs to tag"
                }
            }),
            &["label"],
        ),
        |client, args| async move {
            client
                .post("/tags", &body_from(args))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Tags,
        "delete_tag",
        "Delete a tag from the account and all tagged resources.",
        object_schema(
            json!({
                "label": {"type": "string", "description": "Tag label"}
            }),
            &["label"],
        ),
        |client, args| async move {
            let TagLabel { label } = parse_args(args)?;
            client
                .delete(&format!("/tags/{label}"))
                .await
                .map_err(Into::into)
        },
    )?;

    Ok(())
}
