//! Profile tools for the authenticated user.

use serde::Deserialize;
use serde_json::json;

use super::{
    object_schema, paged_schema, parse_args, PageArgs, RegistryError, ToolCategory, ToolRegistry,
};

#[derive(Debug, Deserialize)]
struct SshKeyId {
    id: u64,
}

pub(super) fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(
        ToolCategory::Profile,
        "get_profile",
        "Get the authenticated user's profile.",
        object_schema(json!({}), &[]),
        |client, _args| async move { client.get("/profile").await.map_err(Into::into) },
    )?;

    registry.register(
        ToolCategory::Profile,
        "list_ssh_keys",
        "List the authenticated user's SSH keys.",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/profile/sshkeys", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Profile,
        "get_ssh_key",
        "Get a single SSH key by ID.",
        object_schema(
            json!({
                "id": {"type": "integer", "description": "SSH key ID"}
            }),
            &["id"],
        ),
        |client, args| async move {
            let SshKeyId { id } = parse_args(args)?;
            client
                .get(&format!("/profile/sshkeys/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    Ok(())
}
