//! Error taxonomy for the pet core
//!
//! Every variant is absorbed locally by the component that hits it; only
//! startup (config, character load) turns these into fatal `anyhow` errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PetError {
    /// Platform window handle missing when a geometry command is issued
    #[error("window handle unavailable for {0}")]
    GeometryUnavailable(&'static str),

    /// Gesture or request with no entry in the transition table
    #[error("'{request}' has no transition from {state}")]
    InvalidTransition { request: &'static str, state: String },

    /// Loaded character lacks a clip the coordinator needs
    #[error("character '{character}' has no animation named '{clip}'")]
    MissingClip { character: String, clip: String },

    /// Engine was handed a handle it never issued (or already disposed)
    #[error("unknown character handle {0}")]
    UnknownCharacter(u32),

    /// Character manifest describes an unusable animation
    #[error("asset error: {0}")]
    Asset(String),

    /// Releasing a resource failed during shutdown
    #[error("failed to dispose {resource}: {reason}")]
    Dispose { resource: &'static str, reason: String },
}
