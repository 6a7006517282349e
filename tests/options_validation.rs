//! Integration tests for option resolution and validation.
//!
//! These cover the observable validation contract: which inputs are
//! accepted, which fail, and what the diagnostics say.

use linode_mcp_server::config::{resolve_options, RawOptions, TransportOptions};
use linode_mcp_server::error::OptionsError;
use linode_mcp_server::tools::ToolCategory;

fn raw(transport: &str) -> RawOptions {
    RawOptions {
        transport: transport.to_string(),
        ..RawOptions::default()
    }
}

// =============================================================================
// Transport Selection
// =============================================================================

#[test]
fn test_sse_rejection_names_both_alternatives() {
    for spelling in ["sse", "SSE", "Sse"] {
        let err = resolve_options(raw(spelling), None).unwrap_err();
        assert!(matches!(err, OptionsError::DeprecatedTransport));
        let msg = err.to_string();
        assert!(msg.contains("no longer supported"));
        assert!(msg.contains("stdio"));
        assert!(msg.contains("http"));
    }
}

#[test]
fn test_unknown_transport_lists_supported_set() {
    let err = resolve_options(raw("websocket"), None).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("websocket"));
    assert!(msg.contains("stdio"));
    assert!(msg.contains("http"));
}

#[test]
fn test_missing_token_message_is_distinct() {
    let token_msg = resolve_options(raw("stdio"), None).unwrap_err().to_string();
    let transport_msg = resolve_options(raw("websocket"), None)
        .unwrap_err()
        .to_string();
    let sse_msg = resolve_options(raw("sse"), None).unwrap_err().to_string();

    assert_ne!(token_msg, transport_msg);
    assert_ne!(token_msg, sse_msg);
    assert!(token_msg.contains("token"));
}

#[test]
fn test_http_defaults_are_8080_and_mcp() {
    let options = resolve_options(raw("http"), None).unwrap();
    assert_eq!(
        options.transport,
        TransportOptions::Http {
            host: "127.0.0.1".to_string(),
            port: 8080,
            endpoint: "/mcp".to_string(),
        }
    );
}

// =============================================================================
// Token Resolution
// =============================================================================

#[test]
fn test_token_resolution_order() {
    // Explicit flag wins.
    let mut input = raw("stdio");
    input.token = Some("from-flag".to_string());
    let options = resolve_options(input, Some("from-env".to_string())).unwrap();
    assert_eq!(options.token.as_deref(), Some("from-flag"));

    // Environment is the fallback.
    let options = resolve_options(raw("stdio"), Some("from-env".to_string())).unwrap();
    assert_eq!(options.token.as_deref(), Some("from-env"));

    // Absent everywhere fails for stdio only.
    assert!(matches!(
        resolve_options(raw("stdio"), None),
        Err(OptionsError::MissingToken)
    ));
    assert!(resolve_options(raw("http"), None).is_ok());
}

// =============================================================================
// Category Validation
// =============================================================================

#[test]
fn test_invalid_categories_list_offenders_and_full_set() {
    let mut input = raw("http");
    input.categories = Some(vec![
        "instances".to_string(),
        "volumes".to_string(),
        "x".to_string(),
    ]);

    let err = resolve_options(input, None).unwrap_err();
    let OptionsError::InvalidCategories { ref invalid } = err else {
        panic!("expected InvalidCategories, got {err}");
    };
    assert_eq!(invalid, &vec!["x".to_string()]);

    // The diagnostic names the offender and enumerates every category.
    let msg = err.to_string();
    assert!(msg.contains(": x."));
    for category in ToolCategory::ALL {
        assert!(msg.contains(category.name()), "missing {category}");
    }
}

#[test]
fn test_valid_categories_pass_through_in_order() {
    let mut input = raw("http");
    input.categories = Some(vec!["domains".to_string(), "instances".to_string()]);
    let options = resolve_options(input, None).unwrap();
    assert_eq!(
        options.enabled_categories,
        Some(vec![ToolCategory::Domains, ToolCategory::Instances])
    );
}

#[test]
fn test_known_category_enumeration_is_stable() {
    // Every name maps back to its category exactly once; the CLI
    // --list-categories output is derived from this same enumeration.
    let names = ToolCategory::known_names();
    assert_eq!(names.len(), ToolCategory::ALL.len());
    let mut sorted = names.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), names.len());
}
