//! Error types for session setup and lifecycle commands

use thiserror::Error;

use crate::sim::GamePhase;

/// Errors surfaced to the embedding UI layer.
#[derive(Debug, Error)]
pub enum SimError {
    /// A lifecycle command that is not legal in the current state.
    #[error("cannot {action} while {phase:?} (paused: {paused})")]
    InvalidTransition {
        action: &'static str,
        phase: GamePhase,
        paused: bool,
    },

    #[error("unknown {kind} id: {value:?}")]
    UnknownId { kind: &'static str, value: String },

    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to spawn simulation thread: {0}")]
    Spawn(#[from] std::io::Error),
}
