//! The owned "current state + current scene" slot and its two-phase swap.

use super::resource::SceneResource;
use crate::state::{AppState, StateRegistry};
use crate::trigger::InputGate;
use std::cell::RefCell;
use std::rc::Rc;

struct ActiveScene<R> {
    scene: Rc<R>,
    gate: InputGate,
}

/// A scene that finished loading and waits to be committed.
///
/// Invisible to the render loop. Its gate stays closed until the commit, so
/// its triggers cannot fire early.
pub struct StagedScene<R> {
    scene: Rc<R>,
    gate: InputGate,
    state: Option<AppState>,
}

impl<R: SceneResource> StagedScene<R> {
    /// Stage `scene` as the scene of `state`. `None` leaves the registry
    /// untouched on commit.
    pub fn new(scene: Rc<R>, state: Option<AppState>) -> Self {
        Self {
            scene,
            gate: InputGate::new(),
            state,
        }
    }

    pub fn scene(&self) -> &Rc<R> {
        &self.scene
    }

    pub fn gate(&self) -> &InputGate {
        &self.gate
    }

    pub fn state(&self) -> Option<AppState> {
        self.state
    }

    /// Drop a staged scene that will never be committed.
    pub fn abandon(self) {
        self.gate.close();
        self.scene.detach_input();
        self.scene.dispose();
    }
}

/// Holds the active scene and the state registry.
///
/// Shared between the transition controller (the only writer) and the render
/// driver (which reads the active scene once per frame). All mutation happens
/// in synchronous methods, so on a single thread no frame can observe a
/// half-finished swap.
pub struct SceneContext<R> {
    active: RefCell<Option<ActiveScene<R>>>,
    registry: StateRegistry,
}

impl<R: SceneResource> SceneContext<R> {
    pub fn new() -> Self {
        Self {
            active: RefCell::new(None),
            registry: StateRegistry::new(),
        }
    }

    pub fn current(&self) -> AppState {
        self.registry.current()
    }

    pub fn registry(&self) -> &StateRegistry {
        &self.registry
    }

    pub fn has_active(&self) -> bool {
        self.active.borrow().is_some()
    }

    /// Run `f` against the active scene, if any.
    ///
    /// The borrow ends when `f` returns; callers never hold the scene across
    /// frames.
    pub fn with_active<T>(&self, f: impl FnOnce(&R) -> T) -> Option<T> {
        let active = self.active.borrow();
        active.as_ref().map(|active| f(&active.scene))
    }

    /// Stop the active scene from taking input while it is being replaced.
    pub(crate) fn suspend_input(&self) {
        if let Some(active) = self.active.borrow().as_ref() {
            active.gate.close();
            active.scene.detach_input();
        }
    }

    /// Give input back to the active scene after an aborted transition.
    pub(crate) fn resume_input(&self) {
        if let Some(active) = self.active.borrow().as_ref() {
            active.scene.attach_input();
            active.gate.open();
        }
    }

    /// Promote `staged` to the active scene and dispose the one it replaces.
    ///
    /// The registry is written last, once the new scene is active.
    pub(crate) fn commit(&self, staged: StagedScene<R>) {
        let StagedScene { scene, gate, state } = staged;

        let previous = self.active.replace(Some(ActiveScene {
            scene: Rc::clone(&scene),
            gate: gate.clone(),
        }));

        if let Some(previous) = previous {
            previous.gate.close();
            previous.scene.detach_input();
            log::debug!("disposing {} scene", previous.scene.kind());
            previous.scene.dispose();
        }

        scene.attach_input();
        gate.open();

        if let Some(state) = state {
            self.registry.set(state);
            log::info!("entered {state} ({} scene active)", scene.kind());
        } else {
            log::info!("{} scene active", scene.kind());
        }
    }
}

impl<R: SceneResource> Default for SceneContext<R> {
    fn default() -> Self {
        Self::new()
    }
}
