//! Engine error types.

use thiserror::Error;

use crate::engine::GameState;

/// Errors produced by the reveal quiz engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The selected study set has no questions; the engine stays in `Setup`.
    #[error("study set has no questions")]
    EmptySet,

    /// An action was attempted in a state where it is not valid.
    #[error("'{action}' is not valid in the {state} state")]
    InvalidAction {
        action: &'static str,
        state: GameState,
    },

    /// A timed action was attempted while the session is paused.
    #[error("session is paused")]
    Paused,
}
