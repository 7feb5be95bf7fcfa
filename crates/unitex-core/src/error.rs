// Error type shared by every unitex crate.

use crate::enums::Stage;

/// Errors raised by the gateway and the pipeline orchestrator.
///
/// Ordinary gateway failures (copying a missing file, removing an absent
/// directory) are reported as `false` return values and never reach this type.
#[derive(Debug, thiserror::Error)]
pub enum UnitexError {
    /// An operation was invoked in the wrong state (double open, reading a
    /// write-mode handle, tagging a closed corpus).
    #[error("usage error: {0}")]
    Usage(String),

    /// A resource or option required by the requested operation is missing
    /// or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The native engine reported failure, or an expected artifact is absent
    /// after it returned.
    #[error("{stage} failed: {reason}")]
    Stage { stage: Stage, reason: String },

    /// A produced artifact could not be interpreted.
    #[error("malformed {artifact}: {reason}")]
    Format {
        artifact: &'static str,
        reason: String,
    },

    /// The operation exists in the API but has no implementation.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl UnitexError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn stage(stage: Stage, reason: impl Into<String>) -> Self {
        Self::Stage {
            stage,
            reason: reason.into(),
        }
    }

    pub fn format(artifact: &'static str, reason: impl Into<String>) -> Self {
        Self::Format {
            artifact,
            reason: reason.into(),
        }
    }

    /// The pipeline stage this error belongs to, if any.
    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, UnitexError>;
