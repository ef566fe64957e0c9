use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{mention::CompletionError, visible::ApplyError};

/// Broad error category used for caller-facing handling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PanelErrorCategory {
    /// Invalid construction parameters or configuration.
    Config,
    /// A command referenced something the panel does not know about.
    InvalidInput,
    /// Internal bug or invariant break.
    Internal,
}

/// Stable error payload emitted across the command/event boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Error)]
#[error("{category:?}:{code}: {message}")]
pub struct PanelError {
    /// High-level error category.
    pub category: PanelErrorCategory,
    /// Stable machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl PanelError {
    pub fn new(
        category: PanelErrorCategory,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            code: code.into(),
            message: message.into(),
        }
    }

    /// A source set needs at least one source.
    pub fn empty_sources() -> Self {
        Self::new(
            PanelErrorCategory::Config,
            "empty_sources",
            "a context source set needs at least one source",
        )
    }

    /// A wallpaper list was opened at a wallpaper it does not contain.
    pub fn missing_central_wallpaper() -> Self {
        Self::new(
            PanelErrorCategory::InvalidInput,
            "central_wallpaper_missing",
            "the central wallpaper is not part of the list",
        )
    }
}

impl From<CompletionError> for PanelError {
    fn from(err: CompletionError) -> Self {
        let code = match &err {
            CompletionError::UnknownPeer(_) => "unknown_peer",
            CompletionError::CursorOutOfBounds { .. } => "cursor_out_of_bounds",
        };
        Self::new(PanelErrorCategory::InvalidInput, code, err.to_string())
    }
}

impl From<ApplyError> for PanelError {
    fn from(err: ApplyError) -> Self {
        Self::new(
            PanelErrorCategory::Internal,
            "transition_not_applicable",
            err.to_string(),
        )
    }
}
