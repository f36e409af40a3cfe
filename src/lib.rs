//! # Stagehand
//!
//! **One active scene per frame, swapped only when the next one is ready.**
//!
//! Stagehand drives a real-time application through a fixed cycle of states,
//! `Start → Cutscene → Game → Lose → Start`, each shown by its own scene. A
//! transition builds the next scene off to the side, waits until it is
//! ready, and then swaps it in and disposes the old one in a single step.
//! The render loop never sees a half-built scene.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> Result<(), stagehand::AppError> {
//!     env_logger::init();
//!     stagehand::run_with_config(stagehand::AppConfig::new().title("Demo"))
//! }
//! ```
//!
//! ## Pieces
//!
//! - [`TransitionController`] stages and commits scenes and owns the
//!   gameplay pre-fetch.
//! - [`SceneContext`] holds the active scene and the [`StateRegistry`].
//! - [`RenderDriver`] runs pending transitions and renders whatever is
//!   active, once per frame.
//! - [`SceneResource`] and [`SceneFactory`] are the seams a renderer plugs
//!   into; [`GpuScene`] is the wgpu one.

mod app;
mod camera;
mod controller;
mod driver;
mod error;
mod gpu;
mod gpu_scene;
mod input;
mod overlay;
pub mod scene;
mod state;
mod surface;
mod trigger;
mod ui;

pub use app::{AppConfig, AppError, run, run_with_config};
pub use camera::{CameraRig, DEFAULT_FOV};
pub use controller::TransitionController;
pub use driver::RenderDriver;
pub use error::{SceneError, TransitionError};
pub use gpu::{GpuContext, GpuError};
pub use gpu_scene::{GpuScene, GpuSceneFactory};
pub use input::Pointer;
pub use overlay::{Overlay, OverlayVertex, ShapeBatch};
pub use scene::{
    ButtonSpec, Dressing, Prefetch, Prop, SceneBlueprint, SceneContext, SceneFactory, SceneKind,
    SceneResource, StagedScene,
};
pub use state::{AppState, StateRegistry};
pub use surface::{LoadingFlag, LoadingIndicator, LoadingScope, RenderSurface};
pub use trigger::{ActivateOn, InputGate, Trigger};
pub use ui::{ButtonLayout, Color, HAlign, Length, Rect, VAlign};

pub use glam::{Vec2, Vec3};
