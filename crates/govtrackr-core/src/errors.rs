use crate::snapshot::ValueKind;
use govtrackr_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using the canonical error facility
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (the CLI, a rendering
/// layer showing "unable to compare this field") can match on without
/// parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    /// Snapshot bytes are not UTF-8 JSON, or the root is not a keyed record
    InvalidSnapshot,
    /// Diff options failed validation
    InvalidConfig,

    // Comparison
    /// The same key holds incompatible container/primitive kinds on the two sides
    TypeKindMismatch,
    /// Nesting exceeds the configured maximum depth
    MaxDepthExceeded,

    // Integration/IO
    Io,
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidSnapshot => "ERR_INVALID_SNAPSHOT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::TypeKindMismatch => "ERR_TYPE_KIND_MISMATCH",
            ExErrorKind::MaxDepthExceeded => "ERR_MAX_DEPTH_EXCEEDED",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the operation,
/// the snapshot path and correlation ids for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the dot-delimited snapshot path the error refers to
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain errors raised while parsing, configuring or comparing snapshots
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiffError {
    /// Same key holds a primitive on one side and a container on the other,
    /// or an object on one side and an array on the other
    #[error("Cannot compare {left} with {right} at {path}")]
    TypeKindMismatch {
        path: String,
        left: ValueKind,
        right: ValueKind,
    },

    /// Nesting below `path` goes deeper than the configured bound
    #[error("Nesting below {path} exceeds the maximum depth of {limit}")]
    MaxDepthExceeded { path: String, limit: usize },

    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    #[error("Invalid diff options: {reason}")]
    InvalidConfig { reason: String },
}

impl From<DiffError> for ExError {
    fn from(err: DiffError) -> Self {
        let message = err.to_string();
        match err {
            DiffError::TypeKindMismatch { path, .. } => ExError::new(ExErrorKind::TypeKindMismatch)
                .with_op("diff")
                .with_path(path)
                .with_message(message),

            DiffError::MaxDepthExceeded { path, .. } => ExError::new(ExErrorKind::MaxDepthExceeded)
                .with_op("diff")
                .with_path(path)
                .with_message(message),

            DiffError::InvalidSnapshot { .. } => ExError::new(ExErrorKind::InvalidSnapshot)
                .with_op("parse_snapshot")
                .with_message(message),

            DiffError::InvalidConfig { .. } => ExError::new(ExErrorKind::InvalidConfig)
                .with_op("load_options")
                .with_message(message),
        }
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}
