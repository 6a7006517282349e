//! Tool registry: the callable Linode API surface.
//!
//! Tools are grouped into a fixed set of categories. A single
//! [`register_tools`] call at startup activates either every category or
//! the validated subset the operator selected; after that the registry is
//! sealed and only read (the advertised `listChanged` capability is false
//! for exactly this reason).
//!
//! The per-category modules are deliberately thin: each tool names an API
//! path, describes its arguments with a hand-written JSON Schema, and
//! forwards to the [`LinodeClient`]. Anything clever belongs in the
//! client or in the caller, not here.

mod account;
mod databases;
mod domains;
mod images;
mod instances;
mod kubernetes;
mod longview;
mod networking;
mod nodebalancers;
mod object_storage;
mod placement;
mod profile;
mod regions;
mod stackscripts;
mod support;
mod tags;
mod volumes;
mod vpcs;

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::linode::{ClientError, LinodeClient};

/// A named grouping of tools that can be enabled or disabled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCategory {
    /// Linode compute instances.
    Instances,
    /// Block storage volumes.
    Volumes,
    /// IP addresses and firewalls.
    Networking,
    /// NodeBalancers.
    NodeBalancers,
    /// DNS domains and records.
    Domains,
    /// Managed databases.
    Databases,
    /// LKE clusters.
    Kubernetes,
    /// Disk images.
    Images,
    /// StackScripts.
    StackScripts,
    /// Datacenter regions.
    Regions,
    /// VPCs and subnets.
    Vpcs,
    /// Object storage clusters, buckets and keys.
    ObjectStorage,
    /// Placement groups.
    Placement,
    /// Longview monitoring clients.
    Longview,
    /// Account-wide tags.
    Tags,
    /// The authenticated user's profile.
    Profile,
    /// Account details, events and users.
    Account,
    /// Support tickets.
    Support,
}

impl ToolCategory {
    /// Every known category, in the order tools are registered.
    pub const ALL: &'static [Self] = &[
        Self::Instances,
        Self::Volumes,
        Self::Networking,
        Self::NodeBalancers,
        Self::Domains,
        Self::Databases,
        Self::Kubernetes,
        Self::Images,
        Self::StackScripts,
        Self::Regions,
        Self::Vpcs,
        Self::ObjectStorage,
        Self::Placement,
        Self::Longview,
        Self::Tags,
        Self::Profile,
        Self::Account,
        Self::Support,
    ];

    /// The CLI-facing name of this category.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Instances => "instances",
            Self::Volumes => "volumes",
            Self::Networking => "networking",
            Self::NodeBalancers => "nodebalancers",
            Self::Domains => "domains",
            Self::Databases => "databases",
            Self::Kubernetes => "kubernetes",
            Self::Images => "images",
            Self::StackScripts => "stackscripts",
            Self::Regions => "regions",
            Self::Vpcs => "vpcs",
            Self::ObjectStorage => "objectstorage",
            Self::Placement => "placement",
            Self::Longview => "longview",
            Self::Tags => "tags",
            Self::Profile => "profile",
            Self::Account => "account",
            Self::Support => "support",
        }
    }

    /// Looks up a category by its CLI name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.name() == lowered)
    }

    /// The names of every known category.
    #[must_use]
    pub fn known_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|category| category.name()).collect()
    }
}

impl std::fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised while registering tools. Fatal at startup.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Two tools were registered under the same name.
    #[error("duplicate tool name: {name}")]
    DuplicateTool {
        /// The conflicting tool name.
        name: &'static str,
    },
}

/// Errors raised while invoking a tool.
///
/// Never fatal: the dispatcher renders these as error-shaped tool
/// results and keeps serving.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The tool arguments did not match the tool's schema.
    #[error("invalid tool arguments: {0}")]
    InvalidArguments(#[source] serde_json::Error),

    /// The underlying API call failed.
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// A tool as advertised in the tools/list response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
}

type ToolHandler =
    Box<dyn Fn(Arc<LinodeClient>, Value) -> BoxFuture<'static, Result<Value, ToolError>> + Send + Sync>;

struct RegisteredTool {
    category: ToolCategory,
    definition: ToolDefinition,
    handler: ToolHandler,
}

/// The registered-tool set, built once at startup and then only read.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one tool under a category.
    ///
    /// # Errors
    ///
    /// Returns an error if a tool with the same name already exists.
    pub fn register<F, Fut>(
        &mut self,
        category: ToolCategory,
        name: &'static str,
        description: &'static str,
        input_schema: Value,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(Arc<LinodeClient>, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
    {
        if self.tools.iter().any(|tool| tool.definition.name == name) {
            return Err(RegistryError::DuplicateTool { name });
        }

        self.tools.push(RegisteredTool {
            category,
            definition: ToolDefinition {
                name,
                description,
                input_schema,
            },
            handler: Box::new(move |client, args| {
                Box::pin(handler(client, args)) as BoxFuture<'static, Result<Value, ToolError>>
            }),
        });

        Ok(())
    }

    /// Advertised definitions, in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter().map(|tool| &tool.definition)
    }

    /// Invokes a tool by name.
    ///
    /// Returns `None` for an unknown tool name; the caller decides how to
    /// report that.
    pub async fn call(
        &self,
        name: &str,
        client: Arc<LinodeClient>,
        args: Value,
    ) -> Option<Result<Value, ToolError>> {
        let tool = self.tools.iter().find(|tool| tool.definition.name == name)?;
        Some((tool.handler)(client, args).await)
    }

    /// Whether a tool with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.iter().any(|tool| tool.definition.name == name)
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// The categories with at least one registered tool.
    #[must_use]
    pub fn categories(&self) -> Vec<ToolCategory> {
        let mut seen = Vec::new();
        for tool in &self.tools {
            if !seen.contains(&tool.category) {
                seen.push(tool.category);
            }
        }
        seen
    }
}

/// Registers every enabled category's tools.
///
/// `filter` of `None` means all categories. The filter was validated
/// upstream, so an empty result here can only mean an explicitly empty
/// filter.
///
/// # Errors
///
/// Returns the first registration error; the caller treats it as fatal.
pub fn register_tools(
    registry: &mut ToolRegistry,
    filter: Option<&[ToolCategory]>,
) -> Result<(), RegistryError> {
    for &category in ToolCategory::ALL {
        if let Some(enabled) = filter {
            if !enabled.contains(&category) {
                continue;
            }
        }

        match category {
            ToolCategory::Instances => instances::register(registry)?,
            ToolCategory::Volumes => volumes::register(registry)?,
            ToolCategory::Networking => networking::register(registry)?,
            ToolCategory::NodeBalancers => nodebalancers::register(registry)?,
            ToolCategory::Domains => domains::register(registry)?,
            ToolCategory::Databases => databases::register(registry)?,
            ToolCategory::Kubernetes => kubernetes::register(registry)?,
            ToolCategory::Images => images::register(registry)?,
            ToolCategory::StackScripts => stackscripts::register(registry)?,
            ToolCategory::Regions => regions::register(registry)?,
            ToolCategory::Vpcs => vpcs::register(registry)?,
            ToolCategory::ObjectStorage => object_storage::register(registry)?,
            ToolCategory::Placement => placement::register(registry)?,
            ToolCategory::Longview => longview::register(registry)?,
            ToolCategory::Tags => tags::register(registry)?,
            ToolCategory::Profile => profile::register(registry)?,
            ToolCategory::Account => account::register(registry)?,
            ToolCategory::Support => support::register(registry)?,
        }
    }

    Ok(())
}

/// Standard pagination arguments accepted by every list tool.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageArgs {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

/// Deserialises tool arguments, treating absent arguments as `{}`.
pub(crate) fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    let args = if args.is_null() {
        Value::Object(Map::new())
    } else {
        args
    };
    serde_json::from_value(args).map_err(ToolError::InvalidArguments)
}

/// Normalises pass-through request bodies: absent arguments become `{}`.
pub(crate) fn body_from(args: Value) -> Value {
    if args.is_null() {
        Value::Object(Map::new())
    } else {
        args
    }
}

/// Builds a JSON Schema for an object with the given properties.
pub(crate) fn object_schema(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// Schema shared by list tools: pagination only.
pub(crate) fn paged_schema() -> Value {
    object_schema(page_properties(), &[])
}

/// The standard pagination property block.
pub(crate) fn page_properties() -> Value {
    json!({
        "page": {
            "type": "integer",
            "description": "Page number (default: 1)"
        },
        "page_size": {
            "type": "integer",
            "description": "Results per page (default: 100, max: 500)"
        }
    })
}
