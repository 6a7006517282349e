//! Support ticket tools.

use serde::Deserialize;
use serde_json::json;

use super::{
    body_from, object_schema, paged_schema, parse_args, PageArgs, RegistryError, ToolCategory,
    ToolRegistry,
};

#[derive(Debug, Deserialize)]
struct TicketId {
    id: u64,
}

pub(super) fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(
        ToolCategory::Support,
        "list_support_tickets",
        "List support tickets on the account.",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/support/tickets", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Support,
        "get_support_ticket",
        "Get a single support ticket with its status and description.",
        object_schema(
            json!({
                "id": {"type": "integer", "description": "Ticket ID"}
            }),
            &["id"],
        ),
        |client, args| async move {
            let TicketId { id } = parse_args(args)?;
            client
                .get(&format!("/support/tickets/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Support,
        "create_support_ticket",
        "Open a support ticket, optionally linked to a specific resource.",
        object_schema(
            json!({
                "summary": {"type": "string", "description": "Short summary of the issue"},
                "description": {"type": "string", "description": "Full description of the issue"},
                "linode_id": {"type": "integer", "description": "Related instance ID, if any"},
                "domain_id": {"type": "integer", "description": "Related domain ID, if any"}
            }),
            &["summary", "description"],
        ),
        |client, args| async move {
            client
                .post("/support/tickets", &body_from(args))
                .await
                .map_err(Into::into)
        },
    )?;

    Ok(())
}
