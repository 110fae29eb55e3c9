//! Diff configuration.
//!
//! Options can be built in code or loaded from a TOML file:
//!
//! ```toml
//! max_depth = 32
//! fail_fast = false
//! ```

use crate::errors::{DiffError, ExError};
use serde::{Deserialize, Serialize};

/// Default bound on nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options controlling a single diff run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffOptions {
    /// Deepest path (in segments) whose children are still compared.
    /// Containers below it are reported with a `MaxDepthExceeded` issue.
    pub max_depth: usize,
    /// Abort on the first type-kind mismatch or depth overflow instead of
    /// recording it inline
    pub fail_fast: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            fail_fast: false,
        }
    }
}

impl DiffOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Parse and validate options from TOML text.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` — malformed TOML, unknown keys, or failed validation
    pub fn from_toml_str(text: &str) -> Result<Self, ExError> {
        let options: DiffOptions = toml::from_str(text).map_err(|e| DiffError::InvalidConfig {
            reason: e.to_string(),
        })?;
        options.validate()?;
        Ok(options)
    }

    /// # Errors
    ///
    /// - `InvalidConfig` — `max_depth` is zero
    pub fn validate(&self) -> Result<(), ExError> {
        if self.max_depth == 0 {
            return Err(DiffError::InvalidConfig {
                reason: "max_depth must be at least 1".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
