//! linode-mcp-server: MCP server exposing the Linode API as tools
//!
//! This library turns the Linode REST API (v4) into a set of
//! discoverable, invocable tools for AI agents, served over the Model
//! Context Protocol on either stdio or a streamable HTTP endpoint.
//!
//! # Modules
//!
//! - [`config`] — CLI option resolution and validation
//! - [`error`] — error taxonomy (options, startup, transport)
//! - [`bootstrap`] — ordered startup sequence
//! - [`mcp`] — protocol core, capabilities, sessions, transports
//! - [`linode`] — authenticated Linode API client
//! - [`tools`] — tool registry and per-category API wrappers

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod linode;
pub mod mcp;
pub mod tools;
