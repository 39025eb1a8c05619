//! Error taxonomy
//!
//! Configuration errors abort before the first generation. Policy errors end
//! the generation they occur in. Render errors are fatal to the process.
//! Nothing in the core retries.

use std::path::PathBuf;

/// Invalid or unreadable configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// A decision policy could not produce an action
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("policy produced a non-finite action: {0}")]
    NonFinite(f32),
    #[error("policy failed: {0}")]
    Failed(String),
}

/// Unrecoverable presentation failure
#[derive(Debug, thiserror::Error)]
#[error("render failed: {0}")]
pub struct RenderError(pub String);

/// Anything that halts an evaluation
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("policy of member {member} failed: {source}")]
    Policy {
        member: usize,
        #[source]
        source: PolicyError,
    },
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("optimizer failed: {0}")]
    Optimizer(String),
}
