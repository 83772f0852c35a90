use std::fmt;

use crate::core::Phase;

/// Errors reported by the scheduler.
#[derive(Debug)]
pub enum HeartError {
    /// Rejected configuration (zero fps cap, zero step rate, missing targets).
    InvalidConfiguration(String),

    /// A host hook returned an error; the run ended after it.
    Phase {
        phase: Phase,
        source: anyhow::Error,
    },

    /// A host hook panicked on the loop thread.
    Panicked { message: String },

    /// The hooks went down with a panicking run, so the heart cannot start again.
    HooksLost,

    /// The OS refused to spawn the loop thread.
    Spawn(std::io::Error),
}

impl HeartError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub(crate) fn phase(phase: Phase, source: anyhow::Error) -> Self {
        Self::Phase { phase, source }
    }

    /// Phase whose hook failed, if that is what ended the run.
    pub fn failed_phase(&self) -> Option<Phase> {
        match self {
            Self::Phase { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

impl fmt::Display for HeartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration(msg) => write!(f, "invalid heart configuration: {msg}"),
            Self::Phase { phase, source } => write!(f, "{phase} hook failed: {source:#}"),
            Self::Panicked { message } => write!(f, "heart loop panicked: {message}"),
            Self::HooksLost => f.write_str("hooks were lost to an earlier panic"),
            Self::Spawn(e) => write!(f, "failed to spawn heart thread: {e}"),
        }
    }
}

impl std::error::Error for HeartError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Phase { source, .. } => Some(&**source),
            Self::Spawn(e) => Some(e),
            _ => None,
        }
    }
}
