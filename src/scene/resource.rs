//! The contract between the transition controller and scene implementations.

use super::blueprint::{ButtonSpec, Dressing, SceneKind};
use crate::error::SceneError;
use crate::trigger::Trigger;
use futures::future::LocalBoxFuture;

/// Resolves once a scene has finished loading.
pub type ReadyFuture = LocalBoxFuture<'static, Result<(), SceneError>>;

/// A disposable bundle of drawable and interactive state for one screen.
///
/// Resources are shared behind `Rc` and mutated through `&self`, so
/// implementations use interior mutability. The controller guarantees the
/// lifecycle: constructed, awaited, activated at most once, disposed exactly
/// once. Input is always detached before `dispose` is called.
pub trait SceneResource {
    fn kind(&self) -> SceneKind;

    /// Resolves when the scene is ready to be drawn.
    ///
    /// May be called more than once; every call observes the same outcome.
    fn when_ready(&self) -> ReadyFuture;

    /// Apply camera, backdrop and props.
    fn dress(&self, dressing: &Dressing);

    /// Register a button whose activation fires `trigger`.
    fn on_activate(&self, button: ButtonSpec, trigger: Trigger);

    fn attach_input(&self);

    fn detach_input(&self);

    /// Release everything the scene owns. Never called twice.
    fn dispose(&self);
}

/// Builds scene resources.
pub trait SceneFactory {
    type Scene: SceneResource + 'static;

    /// Create the resource. Loading continues until
    /// [`SceneResource::when_ready`] resolves.
    fn construct(&self, kind: SceneKind) -> Result<Self::Scene, SceneError>;
}
