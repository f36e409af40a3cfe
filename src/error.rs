//! Error types for scene construction and state transitions.

use crate::state::AppState;

/// Errors raised by a scene resource while it is built or loaded.
///
/// `Clone` so a shared pre-fetch result can be handed to every waiter.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// The factory could not create the resource.
    #[error("scene construction failed: {0}")]
    Construction(String),

    /// The resource was created but never became ready.
    #[error("scene never became ready: {0}")]
    NotReady(String),

    /// The resource was disposed before it finished loading.
    #[error("scene was disposed before it became ready")]
    Disposed,
}

/// Errors returned by the transition controller.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    /// Building or loading the target scene failed. The previous scene is
    /// still active and interactive.
    #[error("failed to build the {target} scene: {source}")]
    ConstructionFailure {
        target: AppState,
        #[source]
        source: SceneError,
    },

    /// A transition was requested while another one is still in flight.
    #[error("transition to {requested} ignored: transition to {in_flight} is in flight")]
    DoubleTransitionRequest {
        requested: AppState,
        in_flight: AppState,
    },

    /// The requested target is not reachable from the current state.
    #[error("cannot go from {from} to {to}")]
    InvalidStateTransition { from: AppState, to: AppState },
}

impl TransitionError {
    /// Returns true for the kinds that are no-ops rather than failures.
    pub fn is_ignored(&self) -> bool {
        matches!(
            self,
            TransitionError::DoubleTransitionRequest { .. }
                | TransitionError::InvalidStateTransition { .. }
        )
    }
}
