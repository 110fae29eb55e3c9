//! Correlation identifiers
//!
//! A diff run is a single synchronous call, but callers (the CLI, a
//! rendering service) still want to tie its log lines and any error it
//! returns back to the request that asked for it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! correlation_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh, time-ordered identifier (UUIDv7)
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Wrap an identifier received from an upstream caller
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

correlation_id!(
    /// Identifier for one diff request
    RequestId
);

correlation_id!(
    /// Identifier propagated from an upstream trace, if the caller has one
    TraceId
);

/// Correlation context handed to a diff run
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub trace_id: Option<TraceId>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an id minted elsewhere
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            trace_id: None,
        }
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_unique() {
        let a = RequestId::new();
        let b = RequestId::new();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn test_minted_ids_are_uuid_v7() {
        for id in [RequestId::new().to_string(), TraceId::new().to_string()] {
            let parsed = uuid::Uuid::parse_str(&id).unwrap();
            assert_eq!(parsed.get_version_num(), 7);
        }
    }

    #[test]
    fn test_display_matches_as_str() {
        let id = TraceId::from_string("trace-1");
        assert_eq!(id.to_string(), "trace-1");
        assert_eq!(id.as_str(), "trace-1");
    }

    #[test]
    fn test_context_carries_trace_id() {
        let trace = TraceId::new();
        let ctx = RequestContext::new().with_trace_id(trace.clone());
        assert_eq!(ctx.trace_id, Some(trace));
    }

    #[test]
    fn test_context_reuses_request_id() {
        let id = RequestId::from_string("req-42");
        let ctx = RequestContext::with_request_id(id.clone());
        assert_eq!(ctx.request_id, id);
        assert!(ctx.trace_id.is_none());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = RequestId::from_string("req-7");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"req-7\"");
        let back: RequestId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
