//! IP address and firewall tools.

use serde::Deserialize;
use serde_json::json;

use super::{
    body_from, object_schema, paged_schema, parse_args, PageArgs, RegistryError, ToolCategory,
    ToolRegistry,
};

#[derive(Debug, Deserialize)]
struct AddressArg {
    address: String,
}

#[derive(Debug, Deserialize)]
struct FirewallId {
    id: u64,
}

pub(super) fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(
        ToolCategory::Networking,
        "list_ip_addresses",
        "List IP addresses on the account.",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/networking/ips", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Networking,
        "get_ip_address",
        "Get details of a single IP address.",
        object_schema(
            json!({
                "address": {"type": "string", "description": "IP address, e.g. 203.0.113.1"}
            }),
            &["address"],
        ),
        |client, args| async move {
            let AddressArg { address } = parse_args(args)?;
            client
                .get(&format!("/networking/ips/{address}"))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Networking,
        "list_firewalls",
        "List cloud firewalls on the account.",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/networking/firewalls", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Networking,
        "get_firewall",
        "Get details of a single cloud firewall, including its rules.",
        object_schema(
            json!({
                "id": {"type": "integer", "description": "Firewall ID"}
            }),
            &["id"],
        ),
        |client, args| async move {
            let FirewallId { id } = parse_args(args)?;
            client
                .get(&format!("/networking/firewalls/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Networking,
        "create_firewall",
        "Create a cloud firewall with an initial rule set.",
        object_schema(
            json!({
                "label": {"type": "string", "description": "Firewall label"},
                "rules": {
                    "type": "object",
                    "description": "Rule set with inbound/outbound rules and policies"
                },
                "tags": {"type": "array", "items": {"type": "string"}, "description": "Tags to apply"}
            }),
            &["label", "rules"],
        ),
        |client, args| async move {
            client
                .post("/networking/firewalls", &body_from(args))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Networking,
        "delete_firewall",
        "Delete a cloud firewall.",
        object_schema(
            json!({
                "id": {"type": "integer", "description": "Firewall ID"}
            }),
            &["id"],
        ),
        |client, args| async move {
            let FirewallId { id } = parse_args(args)?;
            client
                .delete(&format!("/networking/firewalls/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    Ok(())
}
