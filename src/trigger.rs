//! Input triggers: UI buttons that request a transition.
//!
//! Every trigger attached to a scene shares that scene's [`InputGate`]. The
//! controller closes the gate synchronously when the scene starts being
//! replaced, so a click queued against a superseded scene never reaches the
//! controller.

use crate::state::AppState;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Shared on/off switch for the triggers of one scene. Starts closed.
#[derive(Clone, Debug, Default)]
pub struct InputGate(Rc<Cell<bool>>);

impl InputGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) {
        self.0.set(true);
    }

    pub fn close(&self) {
        self.0.set(false);
    }

    pub fn is_open(&self) -> bool {
        self.0.get()
    }
}

/// Which pointer edge activates a button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActivateOn {
    #[default]
    PointerDown,
    PointerUp,
}

/// A labelled action requesting a transition to `target`.
#[derive(Clone)]
pub struct Trigger {
    label: String,
    target: AppState,
    gate: InputGate,
    action: Rc<dyn Fn(AppState)>,
}

impl Trigger {
    pub fn new(
        label: impl Into<String>,
        target: AppState,
        gate: InputGate,
        action: impl Fn(AppState) + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            target,
            gate,
            action: Rc::new(action),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn target(&self) -> AppState {
        self.target
    }

    pub fn is_enabled(&self) -> bool {
        self.gate.is_open()
    }

    /// Run the action if the owning scene still accepts input.
    ///
    /// Returns true if the action ran.
    pub fn fire(&self) -> bool {
        if !self.gate.is_open() {
            log::debug!("trigger '{}' ignored: input detached", self.label);
            return false;
        }
        log::debug!("trigger '{}' fired -> {}", self.label, self.target);
        (self.action)(self.target);
        true
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("label", &self.label)
            .field("target", &self.target)
            .field("enabled", &self.gate.is_open())
            .finish()
    }
}
