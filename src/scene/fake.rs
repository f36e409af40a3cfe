//! Instrumented scene resource for tests.
//!
//! Every fake shares a [`Ledger`] that records constructions and disposals
//! and collects lifecycle violations (double dispose, dispose with input
//! still attached, activation after dispose).

use super::blueprint::{ButtonSpec, Dressing, SceneKind};
use super::resource::{ReadyFuture, SceneFactory, SceneResource};
use crate::error::SceneError;
use crate::surface::LoadingIndicator;
use crate::trigger::Trigger;
use futures::FutureExt;
use futures::channel::oneshot;
use futures::future;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

type ReadySender = oneshot::Sender<Result<(), SceneError>>;

#[derive(Default)]
pub struct Ledger {
    next_id: Cell<usize>,
    constructed: RefCell<Vec<(usize, SceneKind)>>,
    disposed: RefCell<Vec<usize>>,
    violations: RefCell<Vec<String>>,
    failing_construction: RefCell<HashSet<SceneKind>>,
    failing_readiness: RefCell<HashSet<SceneKind>>,
    manual: RefCell<HashSet<SceneKind>>,
    pending: RefCell<Vec<(SceneKind, ReadySender)>>,
}

impl Ledger {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Make `construct` fail for `kind`.
    pub fn fail_construction(&self, kind: SceneKind) {
        self.failing_construction.borrow_mut().insert(kind);
    }

    /// Make readiness fail for `kind`.
    pub fn fail_readiness(&self, kind: SceneKind) {
        self.failing_readiness.borrow_mut().insert(kind);
    }

    /// Undo any injected failure for `kind`.
    pub fn heal(&self, kind: SceneKind) {
        self.failing_construction.borrow_mut().remove(&kind);
        self.failing_readiness.borrow_mut().remove(&kind);
    }

    /// Hold readiness of `kind` until [`Ledger::resolve`] is called.
    pub fn hold(&self, kind: SceneKind) {
        self.manual.borrow_mut().insert(kind);
    }

    /// Resolve every held scene of `kind`. Returns how many were resolved.
    pub fn resolve(&self, kind: SceneKind) -> usize {
        self.settle(kind, Ok(()))
    }

    /// Fail every held scene of `kind`.
    pub fn reject(&self, kind: SceneKind, reason: &str) -> usize {
        self.settle(kind, Err(SceneError::NotReady(reason.into())))
    }

    fn settle(&self, kind: SceneKind, outcome: Result<(), SceneError>) -> usize {
        let mut pending = self.pending.borrow_mut();
        let mut settled = 0;
        let mut kept = Vec::new();
        for (pending_kind, sender) in pending.drain(..) {
            if pending_kind == kind {
                let _ = sender.send(outcome.clone());
                settled += 1;
            } else {
                kept.push((pending_kind, sender));
            }
        }
        *pending = kept;
        settled
    }

    pub fn constructed(&self) -> Vec<SceneKind> {
        self.constructed.borrow().iter().map(|(_, kind)| *kind).collect()
    }

    pub fn construct_count(&self, kind: SceneKind) -> usize {
        self.constructed
            .borrow()
            .iter()
            .filter(|(_, k)| *k == kind)
            .count()
    }

    pub fn disposed(&self) -> Vec<SceneKind> {
        let constructed = self.constructed.borrow();
        self.disposed
            .borrow()
            .iter()
            .filter_map(|id| constructed.iter().find(|(c, _)| c == id).map(|(_, k)| *k))
            .collect()
    }

    pub fn violations(&self) -> Vec<String> {
        self.violations.borrow().clone()
    }

    fn violation(&self, message: String) {
        self.violations.borrow_mut().push(message);
    }
}

pub struct FakeScene {
    id: usize,
    kind: SceneKind,
    ledger: Rc<Ledger>,
    ready: RefCell<Option<future::Shared<ReadyFuture>>>,
    input: Cell<bool>,
    disposed: Cell<bool>,
    dressing: RefCell<Option<Dressing>>,
    buttons: RefCell<Vec<(ButtonSpec, Trigger)>>,
}

impl FakeScene {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    pub fn has_input(&self) -> bool {
        self.input.get()
    }

    pub fn dressing(&self) -> Option<Dressing> {
        self.dressing.borrow().clone()
    }

    /// The trigger behind the button labelled `label`.
    pub fn trigger(&self, label: &str) -> Option<Trigger> {
        self.buttons
            .borrow()
            .iter()
            .find(|(spec, _)| spec.label == label)
            .map(|(_, trigger)| trigger.clone())
    }

    /// Simulate a click on the button labelled `label`.
    ///
    /// Like a real UI layer, a scene without input swallows the click.
    pub fn press(&self, label: &str) -> bool {
        if !self.input.get() || self.disposed.get() {
            return false;
        }
        self.trigger(label).is_some_and(|trigger| trigger.fire())
    }
}

impl SceneResource for FakeScene {
    fn kind(&self) -> SceneKind {
        self.kind
    }

    fn when_ready(&self) -> ReadyFuture {
        if self.disposed.get() {
            return future::ready(Err(SceneError::Disposed)).boxed_local();
        }
        match self.ready.borrow().as_ref() {
            Some(shared) => shared.clone().boxed_local(),
            None => future::ready(Ok(())).boxed_local(),
        }
    }

    fn dress(&self, dressing: &Dressing) {
        *self.dressing.borrow_mut() = Some(dressing.clone());
    }

    fn on_activate(&self, button: ButtonSpec, trigger: Trigger) {
        self.buttons.borrow_mut().push((button, trigger));
    }

    fn attach_input(&self) {
        if self.disposed.get() {
            self.ledger
                .violation(format!("{} #{} attached after dispose", self.kind, self.id));
        }
        self.input.set(true);
    }

    fn detach_input(&self) {
        self.input.set(false);
    }

    fn dispose(&self) {
        if self.disposed.replace(true) {
            self.ledger
                .violation(format!("{} #{} disposed twice", self.kind, self.id));
            return;
        }
        if self.input.get() {
            self.ledger.violation(format!(
                "{} #{} disposed with input attached",
                self.kind, self.id
            ));
        }
        self.buttons.borrow_mut().clear();
        self.ledger.disposed.borrow_mut().push(self.id);
    }
}

pub struct FakeFactory {
    pub ledger: Rc<Ledger>,
}

impl FakeFactory {
    pub fn new(ledger: &Rc<Ledger>) -> Self {
        Self {
            ledger: Rc::clone(ledger),
        }
    }
}

impl SceneFactory for FakeFactory {
    type Scene = FakeScene;

    fn construct(&self, kind: SceneKind) -> Result<FakeScene, SceneError> {
        let ledger = &self.ledger;
        if ledger.failing_construction.borrow().contains(&kind) {
            return Err(SceneError::Construction(format!("{kind} refused")));
        }

        let id = ledger.next_id.get();
        ledger.next_id.set(id + 1);
        ledger.constructed.borrow_mut().push((id, kind));

        let ready: Option<future::Shared<ReadyFuture>> =
            if ledger.failing_readiness.borrow().contains(&kind) {
                let failed =
                    future::ready(Err::<(), _>(SceneError::NotReady(format!("{kind} broken"))));
                Some(failed.boxed_local().shared())
            } else if ledger.manual.borrow().contains(&kind) {
                let (sender, receiver) = oneshot::channel();
                ledger.pending.borrow_mut().push((kind, sender));
                let held = receiver.map(|outcome| outcome.unwrap_or(Err(SceneError::Disposed)));
                Some(held.boxed_local().shared())
            } else {
                None
            };

        Ok(FakeScene {
            id,
            kind,
            ledger: Rc::clone(ledger),
            ready: RefCell::new(ready),
            input: Cell::new(false),
            disposed: Cell::new(false),
            dressing: RefCell::new(None),
            buttons: RefCell::new(Vec::new()),
        })
    }
}

/// Loading indicator that remembers every show/hide.
#[derive(Default)]
pub struct RecordingIndicator {
    pub shown: Cell<usize>,
    pub hidden: Cell<usize>,
}

impl RecordingIndicator {
    pub fn is_visible(&self) -> bool {
        self.shown.get() > self.hidden.get()
    }
}

impl LoadingIndicator for RecordingIndicator {
    fn show_loading(&self) {
        self.shown.set(self.shown.get() + 1);
    }

    fn hide_loading(&self) {
        self.hidden.set(self.hidden.get() + 1);
    }
}
