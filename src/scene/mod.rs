//! Scene resources and the slot that holds the active one.
//!
//! A scene is a self-contained screen: camera, backdrop, props and the
//! buttons that move the application to its next state. Scenes go through a
//! strict lifecycle:
//!
//! 1. **Construct**: a [`SceneFactory`] builds the resource.
//! 2. **Stage**: it is dressed, given its triggers and awaited until ready
//!    ([`StagedScene`]). The render loop cannot see it yet.
//! 3. **Commit**: [`SceneContext`] swaps it in as the active scene, disposes
//!    the one it replaces and records the new state, in one synchronous step.
//! 4. **Dispose**: when the next commit displaces it.
//!
//! The gameplay scene skips the wait in step 2: it is started during the
//! cutscene as a [`Prefetch`] and committed when the player moves on.

pub mod blueprint;
mod context;
#[cfg(test)]
pub(crate) mod fake;
mod prefetch;
mod resource;

pub use blueprint::{ButtonSpec, Dressing, Prop, SceneBlueprint, SceneKind};
pub use context::{SceneContext, StagedScene};
pub use prefetch::Prefetch;
pub use resource::{ReadyFuture, SceneFactory, SceneResource};
