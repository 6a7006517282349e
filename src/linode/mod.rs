//! Linode API v4 client.
//!
//! A thin authenticated JSON client. It knows how to shape requests and
//! decode Linode's error envelope; everything else (which endpoints exist,
//! what their bodies mean) lives with the tools that call it.

mod client;
mod error;

pub use client::{LinodeClient, API_BASE_URL};
pub use error::ClientError;
