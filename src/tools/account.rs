//! Account tools.

use serde_json::json;

use super::{object_schema, paged_schema, parse_args, PageArgs, RegistryError, ToolCategory, ToolRegistry};

pub(super) fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(
        ToolCategory::Account,
        "get_account",
        "Get account details: contact information, balance and active promotions.",
        object_schema(json!({}), &[]),
        |client, _args| async move { client.get("/account").await.map_err(Into::into) },
    )?;

    registry.register(
        ToolCategory::Account,
        "list_account_events",
        "List recent account events (provisioning, boots, configuration changes).",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/account/events", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Account,
        "list_account_users",
        "List users on the account.",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/account/users", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    Ok(())
}
