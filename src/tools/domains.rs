//! DNS domain and record tools.

use serde::Deserialize;
use serde_json::{json, Value};

use super::{
    body_from, object_schema, page_properties, paged_schema, parse_args, PageArgs, RegistryError,
    ToolCategory, ToolRegistry,
};

#[derive(Debug, Deserialize)]
struct DomainId {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct RecordArgs {
    domain_id: u64,
    #[serde(flatten)]
    body: serde_json::Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RecordListArgs {
    domain_id: u64,
    #[serde(flatten)]
    page: PageArgs,
}

fn domain_id_schema() -> Value {
    object_schema(
        json!({
            "id": {
                "type": "integer",
                "description": "Domain ID"
            }
        }),
        &["id"],
    )
}

pub(super) fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(
        ToolCategory::Domains,
        "list_domains",
        "List DNS domains on the account.",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/domains", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Domains,
        "get_domain",
        "Get details of a single DNS domain.",
        domain_id_schema(),
        |client, args| async move {
            let DomainId { id } = parse_args(args)?;
            client
                .get(&format!("/domains/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Domains,
        "create_domain",
        "Create a DNS domain (master or slave zone).",
        object_schema(
            json!({
                "domain": {"type": "string", "description": "The zone name, e.g. example.com"},
                "type": {"type": "string", "description": "Zone type: master or slave"},
                "soa_email": {"type": "string", "description": "SOA contact email (master zones)"},
                "tags": {"type": "array", "items": {"type": "string"}, "description": "Tags to apply"}
            }),
            &["domain", "type"],
        ),
        |client, args| async move {
            client
                .post("/domains", &body_from(args))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Domains,
        "delete_domain",
        "Delete a DNS domain and all of its records.",
        domain_id_schema(),
        |client, args| async move {
            let DomainId { id } = parse_args(args)?;
            client
                .delete(&format!("/domains/{id}"))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Domains,
        "list_domain_records",
        "List the records of a DNS domain.",
        object_schema(
            {
                let mut properties = page_properties();
                properties["domain_id"] = json!({
                    "type": "integer",
                    "description": "Domain ID"
                });
                properties
            },
            &["domain_id"],
        ),
        |client, args| async move {
            let RecordListArgs { domain_id, page } = parse_args(args)?;
            client
                .get_paged(
                    &format!("/domains/{domain_id}/records"),
                    page.page,
                    page.page_size,
                )
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::Domains,
        "create_domain_record",
        "Create a record (A, AAAA, CNAME, MX, TXT, ...) inside a DNS domain.",
        object_schema(
            json!({
                "domain_id": {"type": "integer", "description": "Domain ID"},
                "type": {"type": "string", "description": "Record type, e.g. A or CNAME"},
                "name": {"type": "string", "description": "Record name (subdomain)"},
                "target": {"type": "string", "description": "Record target"},
                "ttl_sec": {"type": "integer", "description": "TTL in seconds"}
            }),
            &["domain_id", "type"],
        ),
        |client, args| async move {
            let RecordArgs { domain_id, body } = parse_args(args)?;
            client
                .post(&format!("/domains/{domain_id}/records"), &Value::Object(body))
                .await
                .map_err(Into::into)
        },
    )?;

    Ok(())
}
