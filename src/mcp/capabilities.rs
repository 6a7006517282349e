//! Server capability advertisement and the completions patch.
//!
//! Some MCP hosts refuse to talk to a server that does not advertise the
//! optional `completions` capability, so the advertisement is augmented in
//! two places:
//!
//! 1. [`CompletionsPatch::apply`] runs once at startup, owned by the
//!    lifecycle controller. It mutates the server's stored capability set.
//! 2. The server's advertising accessor calls [`ServerCapabilities::ensure_completions`]
//!    on every read, so every caller observes the capability even if the
//!    startup patch never ran.
//!
//! Both paths check before adding: a capability that is already present,
//! with whatever parameters it was given, is left untouched.

use serde::Serialize;

/// Capabilities advertised during initialisation.
///
/// Each field maps a capability name to its advertised parameters; absent
/// fields are omitted from the advertisement entirely.
#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,

    /// Argument-completion capability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completions: Option<CompletionsCapability>,
}

impl Default for ServerCapabilities {
    fn default() -> Self {
        Self {
            tools: Some(ToolsCapability::default()),
            completions: None,
        }
    }
}

impl ServerCapabilities {
    /// Adds the completions capability if (and only if) it is absent.
    ///
    /// Returns `true` when the capability was added by this call.
    pub fn ensure_completions(&mut self) -> bool {
        if self.completions.is_some() {
            return false;
        }
        self.completions = Some(CompletionsCapability::default());
        true
    }
}

/// Tool-specific capabilities.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolsCapability {
    /// Whether the tool list can change during the session. It cannot:
    /// the registry is sealed before the transport starts.
    #[serde(rename = "listChanged", skip_serializing_if = "is_false")]
    pub list_changed: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if requires fn(&T) -> bool
const fn is_false(b: &bool) -> bool {
    !*b
}

/// Parameters of the completions capability. The protocol currently
/// defines none, so this serialises to `{}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompletionsCapability {}

/// One-time capability augmentation, owned by the lifecycle controller.
///
/// The one-shot flag lives here, in a value the controller constructs and
/// holds, rather than in hidden module state. Applying the patch twice in
/// one process is a logged no-op.
#[derive(Debug, Default)]
pub struct CompletionsPatch {
    applied: bool,
}

impl CompletionsPatch {
    /// Creates an unapplied patch.
    #[must_use]
    pub const fn new() -> Self {
        Self { applied: false }
    }

    /// Ensures `capabilities` advertises completions.
    ///
    /// Never fatal: the patch is best-effort and the server is usable
    /// without it, so there is no error path out of here.
    pub fn apply(&mut self, capabilities: &mut ServerCapabilities) {
        if self.applied {
            tracing::warn!("completions capability patch already applied; skipping");
            return;
        }

        if capabilities.ensure_completions() {
            tracing::debug!("completions capability added to advertisement");
        }

        self.applied = true;
    }

    /// Whether the patch has run.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        self.applied
    }
}
