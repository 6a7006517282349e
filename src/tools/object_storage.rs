//! Object storage tools.

use serde::Deserialize;
use serde_json::json;

use super::{
    body_from, object_schema, paged_schema, parse_args, PageArgs, RegistryError, ToolCategory,
    ToolRegistry,
};

#[derive(Debug, Deserialize)]
struct BucketArgs {
    cluster: String,
    bucket: String,
}

pub(super) fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(
        ToolCategory::ObjectStorage,
        "list_object_storage_clusters",
        "List object storage clusters and their regions.",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/object-storage/clusters", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::ObjectStorage,
        "list_object_storage_buckets",
        "List object storage buckets on the account.",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/object-storage/buckets", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::ObjectStorage,
        "get_object_storage_bucket",
        "Get details of a single object storage bucket.",
        object_schema(
            json!({
                "cluster": {"type": "string", "description": "Cluster ID, e.g. us-east-1"},
                "bucket": {"type": "string", "description": "Bucket name"}
            }),
            &["cluster", "bucket"],
        ),
        |client, args| async move {
            let BucketArgs { cluster, bucket } = parse_args(args)?;
            client
                .get(&format!("/object-storage/buckets/{cluster}/{bucket}"))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::ObjectStorage,
        "create_object_storage_bucket",
        "Create an object storage bucket in a cluster.",
        object_schema(
            json!({
                "label": {"type": "string", "description": "Bucket name"},
                "cluster": {"type": "string", "description": "Cluster ID, e.g. us-east-1"},
                "acl": {"type": "string", "description": "Access control level, e.g. private"},
                "cors_enabled": {"type": "boolean", "description": "Enable CORS on the bucket"}
            }),
            &["label", "cluster"],
        ),
        |client, args| async move {
            client
                .post("/object-storage/buckets", &body_from(args))
                .await
                .map_err(Into::into)
        },
    )?;

    registry.register(
        ToolCategory::ObjectStorage,
        "list_object_storage_keys",
        "List object storage access keys on the account.",
        paged_schema(),
        |client, args| async move {
            let page: PageArgs = parse_args(args)?;
            client
                .get_paged("/object-storage/keys", page.page, page.page_size)
                .await
                .map_err(Into::into)
        },
    )?;

    Ok(())
}
