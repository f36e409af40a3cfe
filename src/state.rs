//! Application states and the registry that records which one is current.

use std::cell::Cell;
use std::fmt;

/// The logical screens the application moves through.
///
/// The states form a cycle: `Start → Cutscene → Game → Lose → Start`.
/// There is no terminal state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AppState {
    /// Start menu with a "PLAY" button.
    #[default]
    Start,
    /// Gameplay.
    Game,
    /// Lose screen offering a way back to the start menu.
    Lose,
    /// Story cutscene, during which gameplay is pre-fetched.
    Cutscene,
}

impl AppState {
    /// All states, in declaration order.
    pub const ALL: [AppState; 4] = [
        AppState::Start,
        AppState::Game,
        AppState::Lose,
        AppState::Cutscene,
    ];

    /// The state this one advances to along the cycle.
    pub fn next(self) -> AppState {
        match self {
            AppState::Start => AppState::Cutscene,
            AppState::Cutscene => AppState::Game,
            AppState::Game => AppState::Lose,
            AppState::Lose => AppState::Start,
        }
    }

    /// Returns true if `target` is the only state reachable from `self`.
    pub fn can_advance_to(self, target: AppState) -> bool {
        self.next() == target
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppState::Start => "start",
            AppState::Game => "game",
            AppState::Lose => "lose",
            AppState::Cutscene => "cutscene",
        }
    }
}

impl fmt::Display for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single source of truth for the current [`AppState`].
///
/// Only the scene context writes it, as the last step of a commit, so
/// `current()` never disagrees with what is on screen.
#[derive(Debug, Default)]
pub struct StateRegistry {
    current: Cell<AppState>,
}

impl StateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The state whose scene is currently active.
    pub fn current(&self) -> AppState {
        self.current.get()
    }

    pub(crate) fn set(&self, state: AppState) {
        self.current.set(state);
    }
}
