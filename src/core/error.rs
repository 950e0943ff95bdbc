//! Framework error types
//!
//! Every variant here is a hard failure: it aborts the tool call and
//! propagates past the tool boundary. Recoverable outcomes are reported as
//! `ToolResult::error` instead.

use thiserror::Error;

/// Errors that can occur in the delegation framework
#[derive(Error, Debug)]
pub enum FrameworkError {
    /// Session not found
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// A session with this ID already exists
    #[error("session already exists: {0}")]
    SessionAlreadyExists(String),

    /// The invocation context carries no session ID
    #[error("session id missing from context")]
    MissingSessionId,

    /// The invocation context carries no message ID
    #[error("agent message id missing from context")]
    MissingMessageId,

    /// The invocation context carries no tool call ID
    #[error("tool call id missing from context")]
    MissingToolCallId,

    /// A required agent role is not configured
    #[error("{0} agent not configured")]
    AgentNotConfigured(String),

    /// Provider config for the selected model does not exist
    #[error("{}", provider_not_configured_message(.small))]
    ProviderNotConfigured {
        /// Provider ID that was looked up
        provider: String,
        /// Whether the lookup was for the small tier
        small: bool,
    },

    /// The selected model is missing from its provider's catalog
    #[error("model {model} not found for provider {provider}")]
    ModelNotFound {
        /// Provider ID
        provider: String,
        /// Model ID
        model: String,
    },

    /// Creating the child session failed
    #[error("error creating session: {0}")]
    SessionCreation(#[source] Box<FrameworkError>),

    /// Reading a session during cost rollup failed
    #[error("error getting {label}: {source}")]
    SessionRead {
        /// "session" or "parent session"
        label: &'static str,
        /// Underlying failure
        #[source]
        source: Box<FrameworkError>,
    },

    /// Persisting the parent session failed
    #[error("error saving parent session: {0}")]
    SessionSave(#[source] Box<FrameworkError>),

    /// Resolving models for a tier failed
    #[error("error building models: {0}")]
    ModelResolution(#[source] Box<FrameworkError>),

    /// Rendering the system prompt failed
    #[error("error building system prompt: {0}")]
    PromptBuild(#[source] Box<FrameworkError>),

    /// Assembling the sub-agent tool set failed
    #[error("error building tools: {0}")]
    ToolBuild(#[source] Box<FrameworkError>),

    /// A prompt template is malformed or uses an unknown placeholder
    #[error("invalid template: {0}")]
    InvalidTemplate(String),

    /// An agent role's tool allow-list cannot be satisfied
    #[error("invalid tool scope: {0}")]
    InvalidToolScope(String),

    /// A message or tool call ID contains the child-ID separator
    #[error("ambiguous agent tool session id: message {message_id:?}, call {call_id:?}")]
    AmbiguousToolSessionId {
        message_id: String,
        call_id: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The ambient context was cancelled
    #[error("Agent interrupted")]
    Interrupted,

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

fn provider_not_configured_message(small: &bool) -> &'static str {
    if *small {
        "small model provider not configured"
    } else {
        "model provider not configured"
    }
}

impl FrameworkError {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        FrameworkError::Other(msg.into())
    }

    /// Create a provider lookup error for the given tier
    pub fn provider_not_configured(provider: impl Into<String>, small: bool) -> Self {
        FrameworkError::ProviderNotConfigured {
            provider: provider.into(),
            small,
        }
    }

    /// Whether this error (or the error it wraps) is a cancellation
    pub fn is_interrupted(&self) -> bool {
        match self {
            FrameworkError::Interrupted => true,
            FrameworkError::SessionCreation(inner)
            | FrameworkError::SessionSave(inner)
            | FrameworkError::ModelResolution(inner)
            | FrameworkError::PromptBuild(inner)
            | FrameworkError::ToolBuild(inner)
            | FrameworkError::SessionRead { source: inner, .. } => inner.is_interrupted(),
            _ => false,
        }
    }
}

/// Result type alias for framework operations
pub type FrameworkResult<T> = Result<T, FrameworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FrameworkError::SessionNotFound("abc123".into());
        assert_eq!(err.to_string(), "Session not found: abc123");

        let err = FrameworkError::MissingMessageId;
        assert_eq!(err.to_string(), "agent message id missing from context");
    }

    #[test]
    fn test_provider_not_configured_by_tier() {
        let large = FrameworkError::provider_not_configured("openai", false);
        assert_eq!(large.to_string(), "model provider not configured");

        let small = FrameworkError::provider_not_configured("openai", true);
        assert_eq!(small.to_string(), "small model provider not configured");
    }

    #[test]
    fn test_wrapped_messages() {
        let err = FrameworkError::SessionCreation(Box::new(FrameworkError::SessionAlreadyExists(
            "m$$c".into(),
        )));
        assert_eq!(
            err.to_string(),
            "error creating session: session already exists: m$$c"
        );

        let err = FrameworkError::SessionRead {
            label: "parent session",
            source: Box::new(FrameworkError::SessionNotFound("p".into())),
        };
        assert_eq!(
            err.to_string(),
            "error getting parent session: Session not found: p"
        );
    }

    #[test]
    fn test_is_interrupted_sees_through_wrappers() {
        let err = FrameworkError::SessionSave(Box::new(FrameworkError::Interrupted));
        assert!(err.is_interrupted());
        let err = FrameworkError::ToolBuild(Box::new(FrameworkError::Interrupted));
        assert!(err.is_interrupted());
        assert!(!FrameworkError::MissingSessionId.is_interrupted());
    }

    #[test]
    fn test_build_errors_keep_source() {
        use std::error::Error;

        let err = FrameworkError::PromptBuild(Box::new(FrameworkError::InvalidTemplate(
            "unknown placeholder 'user'".into(),
        )));
        assert_eq!(
            err.to_string(),
            "error building system prompt: invalid template: unknown placeholder 'user'"
        );
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "invalid template: unknown placeholder 'user'");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let framework_err: FrameworkError = io_err.into();
        assert!(matches!(framework_err, FrameworkError::Io(_)));
    }
}
